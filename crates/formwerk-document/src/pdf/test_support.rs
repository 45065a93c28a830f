// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF fixtures for unit tests.

use lopdf::{Dictionary, Document, Object, Stream};

/// Build a PDF with `num_pages` pages, each drawing the text `{prefix}-Page-{n}`.
///
/// `/MediaBox` and `/Resources` live on the `/Pages` node and are inherited by
/// the pages, and all pages share one font object.
pub fn create_test_pdf(num_pages: u32, prefix: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let resources = Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![(
            "F1",
            Object::Reference(font_id),
        )])),
    )]);

    let mut kids = Vec::new();
    for page_num in 1..=num_pages {
        let content = format!("BT /F1 12 Tf 50 700 Td ({}-Page-{}) Tj ET", prefix, page_num);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        ("Kids", Object::Array(kids)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// The text label drawn on each page of a fixture PDF, in page order.
pub fn page_labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc.get_page_content(page_id).unwrap();
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').unwrap() + 1;
            let end = text[start..].find(')').unwrap() + start;
            text[start..end].to_string()
        })
        .collect()
}

/// A two-page PDF whose first page links to the second, once through a link
/// annotation's `/Dest` and once through a GoTo action.
///
/// The second page carries a large content stream so that copying it by
/// accident shows up in the output size.
pub fn create_linked_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let first_id = doc.new_object_id();
    let second_id = doc.new_object_id();

    let first_content = doc.add_object(Stream::new(
        Dictionary::new(),
        b"BT 50 700 Td (Link-Page-1) Tj ET".to_vec(),
    ));
    let mut filler = b"BT 50 700 Td (Link-Page-2) Tj ET\n".to_vec();
    filler.extend(std::iter::repeat_n(b'%', 64 * 1024));
    let second_content = doc.add_object(Stream::new(Dictionary::new(), filler));

    let destination = Object::Array(vec![
        Object::Reference(second_id),
        Object::Name(b"Fit".to_vec()),
    ]);
    let link = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Annot".to_vec())),
        ("Subtype", Object::Name(b"Link".to_vec())),
        ("P", Object::Reference(first_id)),
        ("Dest", destination.clone()),
    ]);
    let action = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Annot".to_vec())),
        ("Subtype", Object::Name(b"Link".to_vec())),
        (
            "A",
            Object::Dictionary(Dictionary::from_iter(vec![
                ("S", Object::Name(b"GoTo".to_vec())),
                ("D", destination),
            ])),
        ),
    ]);

    doc.objects.insert(
        first_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(first_content)),
            (
                "Annots",
                Object::Array(vec![Object::Dictionary(link), Object::Dictionary(action)]),
            ),
        ])),
    );
    doc.objects.insert(
        second_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(second_content)),
        ])),
    );
    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(2)),
            (
                "Kids",
                Object::Array(vec![Object::Reference(first_id), Object::Reference(second_id)]),
            ),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(595),
                    Object::Integer(842),
                ]),
            ),
        ])),
    );

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Number of `/Type /Page` objects in a PDF, reachable from the page tree
/// or not.
pub fn page_object_count(bytes: &[u8]) -> usize {
    let doc = Document::load_mem(bytes).unwrap();
    doc.objects
        .values()
        .filter(|object| {
            matches!(
                object.as_dict().and_then(|dict| dict.get(b"Type")),
                Ok(Object::Name(name)) if name == b"Page"
            )
        })
        .count()
}
