// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the formwerk-document crate: image resizing and
// PDF splitting on small synthetic inputs.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};
use lopdf::{Dictionary, Document, Object, Stream};

use formwerk_core::{MediaType, ResizeOptions, SourceFile, SplitMethod};
use formwerk_document::{ImageProcessor, ImageTools, PdfTools};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 640x480 gradient encoded as PNG.
fn gradient_png() -> SourceFile {
    let img = RgbImage::from_fn(640, 480, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    let bytes = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(img))
        .encode(MediaType::Png, 1.0)
        .expect("encode fixture");
    SourceFile::from_named_bytes("gradient.png", bytes)
}

/// A PDF with `num_pages` one-line text pages.
fn text_pdf(num_pages: u32) -> SourceFile {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for n in 1..=num_pages {
        let content = format!("BT /F1 12 Tf 50 700 Td (Page {}) Tj ET", n);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
        ]));
        kids.push(Object::Reference(page_id));
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(num_pages as i64)),
            ("Kids", Object::Array(kids)),
        ])),
    );
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save fixture");
    SourceFile::from_named_bytes("text.pdf", bytes)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_resize(c: &mut Criterion) {
    let tools = ImageTools::default();
    let file = gradient_png();
    let options = ResizeOptions {
        width: Some(320),
        ..ResizeOptions::default()
    };

    c.bench_function("resize png 640x480 -> 320w", |b| {
        b.iter(|| black_box(tools.resize(black_box(&file), &options).expect("resize")));
    });
}

fn bench_split_all(c: &mut Criterion) {
    let tools = PdfTools::default();
    let file = text_pdf(50);

    c.bench_function("split all (50 pages)", |b| {
        b.iter(|| black_box(tools.split(black_box(&file), &SplitMethod::All).expect("split")));
    });
}

criterion_group!(benches, bench_resize, bench_split_all);
criterion_main!(benches);
