// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — assemble a new document from pages copied out of existing ones,
// using `lopdf`.
//
// The destination starts as an empty catalog + page tree. Pages are deep-copied
// with every object they reference, except other pages of the source; attributes
// a page inherits from its page tree ancestors are written onto the copy so it
// stands alone.

use std::collections::{HashMap, HashSet};

use formwerk_core::error::{FormwerkError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, warn};

/// Page attributes that may be inherited from `/Pages` nodes.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Keys holding explicit destinations: `/Dest` on link annotations and
/// outline items, `/D` on GoTo actions.
const DESTINATION_KEYS: [&[u8]; 2] = [b"Dest", b"D"];

/// Bound on `/Parent` hops when resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 64;

/// US Letter, used when a page has no `/MediaBox` anywhere in its ancestry.
const DEFAULT_MEDIA_BOX: [i64; 4] = [0, 0, 612, 792];

/// Builds a new PDF document page by page.
pub struct PdfWriter {
    document: Document,
    /// Object id of the destination's root `/Pages` node.
    pages_id: ObjectId,
    /// Copied pages, in output order.
    kids: Vec<ObjectId>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    /// Create an empty destination document.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        document.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(Vec::new())),
                ("Count", Object::Integer(0)),
            ])),
        );
        let catalog_id = document.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        document.trailer.set("Root", Object::Reference(catalog_id));

        Self {
            document,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> u32 {
        self.kids.len() as u32
    }

    /// Append `page_ids` from `source`, in the given order.
    ///
    /// Objects shared between those pages (fonts, images) are copied once.
    /// Other pages of `source` are never copied: references to them, such as
    /// link destinations, are dropped.
    pub fn append_pages(&mut self, source: &Document, page_ids: &[ObjectId]) -> Result<()> {
        let selected: HashSet<ObjectId> = page_ids.iter().copied().collect();
        let mut scope = CopyScope {
            source,
            copied: HashMap::new(),
            excluded: source
                .get_pages()
                .into_values()
                .filter(|id| !selected.contains(id))
                .collect(),
        };
        for &page_id in page_ids {
            let new_id = self.copy_page(&mut scope, page_id)?;
            self.kids.push(new_id);
        }
        debug!(
            appended = page_ids.len(),
            skipped = scope.excluded.len(),
            total = self.kids.len(),
            "Pages appended"
        );
        Ok(())
    }

    /// Finalise the page tree and serialise the document.
    pub fn save(mut self) -> Result<Vec<u8>> {
        let count = self.kids.len() as i64;
        let kids = self.kids.iter().map(|&id| Object::Reference(id)).collect();

        match self.document.objects.get_mut(&self.pages_id) {
            Some(Object::Dictionary(pages)) => {
                pages.set("Kids", Object::Array(kids));
                pages.set("Count", Object::Integer(count));
            }
            _ => {
                return Err(FormwerkError::Encode(
                    "PDF page tree root is missing".to_string(),
                ));
            }
        }

        let mut output = Vec::new();
        self.document
            .save_to(&mut output)
            .map_err(|err| FormwerkError::Encode(format!("failed to serialise PDF: {}", err)))?;
        debug!(pages = count, output_bytes = output.len(), "PDF serialised");
        Ok(output)
    }

    // -- Copying ----------------------------------------------------------------

    fn copy_page(&mut self, scope: &mut CopyScope<'_>, page_id: ObjectId) -> Result<ObjectId> {
        let source = scope.source;
        let page = source.get_dictionary(page_id).map_err(|err| {
            FormwerkError::Decode(format!("PDF: cannot read page object {:?}: {}", page_id, err))
        })?;

        let mut standalone = page.clone();
        for key in INHERITABLE_KEYS {
            if !standalone.has(key)
                && let Some(value) = inherited_attribute(source, page, key)
            {
                standalone.set(key.to_vec(), value.clone());
            }
        }
        if !standalone.has(b"MediaBox") {
            warn!(?page_id, "Page has no MediaBox, using US Letter");
            standalone.set(
                "MediaBox",
                Object::Array(DEFAULT_MEDIA_BOX.iter().map(|&v| Object::Integer(v)).collect()),
            );
        }

        // Reserve the id first so references back to this page resolve to the copy.
        let new_id = self.document.new_object_id();
        scope.copied.insert(page_id, new_id);

        let mut cloned = self.copy_object(scope, &Object::Dictionary(standalone));
        if let Object::Dictionary(dict) = &mut cloned {
            dict.set("Parent", Object::Reference(self.pages_id));
        }
        self.document.objects.insert(new_id, cloned);
        Ok(new_id)
    }

    /// Deep-copy an object into the destination, following references.
    ///
    /// `/Parent` entries are dropped: they point into the source's page tree,
    /// and the caller re-links the page itself. Already-copied objects are
    /// reused through the scope, which also breaks reference cycles.
    fn copy_object(&mut self, scope: &mut CopyScope<'_>, object: &Object) -> Object {
        match object {
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(scope, dict)),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy_object(scope, item))
                    .collect(),
            ),
            Object::Stream(stream) => {
                let dict = self.copy_dictionary(scope, &stream.dict);
                Object::Stream(Stream::new(dict, stream.content.clone()))
            }
            Object::Reference(ref_id) => {
                if let Some(&new_id) = scope.copied.get(ref_id) {
                    return Object::Reference(new_id);
                }
                if scope.excluded.contains(ref_id) {
                    return Object::Null;
                }
                let source = scope.source;
                match source.get_object(*ref_id) {
                    Ok(referenced) => {
                        let new_id = self.document.new_object_id();
                        scope.copied.insert(*ref_id, new_id);
                        let cloned = self.copy_object(scope, referenced);
                        self.document.objects.insert(new_id, cloned);
                        Object::Reference(new_id)
                    }
                    Err(err) => {
                        warn!(?ref_id, %err, "Cannot resolve reference, using Null");
                        Object::Null
                    }
                }
            }
            other => other.clone(),
        }
    }

    fn copy_dictionary(&mut self, scope: &mut CopyScope<'_>, dict: &Dictionary) -> Dictionary {
        let mut new_dict = Dictionary::new();
        for (key, value) in dict.iter() {
            if key == b"Parent" {
                continue;
            }
            if DESTINATION_KEYS.contains(&key.as_slice()) && scope.targets_excluded_page(value) {
                debug!(key = %String::from_utf8_lossy(key), "Dropping destination to an unselected page");
                continue;
            }
            let cloned_value = self.copy_object(scope, value);
            new_dict.set(key.clone(), cloned_value);
        }
        new_dict
    }
}

/// State for one `append_pages` call.
struct CopyScope<'a> {
    source: &'a Document,
    /// Source object id to destination object id.
    copied: HashMap<ObjectId, ObjectId>,
    /// Source pages that are not being appended.
    excluded: HashSet<ObjectId>,
}

impl CopyScope<'_> {
    /// Whether `value` is an explicit destination (`[page /Fit ...]`) whose
    /// page is not being copied.
    fn targets_excluded_page(&self, value: &Object) -> bool {
        let Ok(items) = value.as_array() else {
            return false;
        };
        matches!(items.first(), Some(Object::Reference(id)) if self.excluded.contains(id))
    }
}

/// Look up `key` on the ancestors of `page`, nearest first.
fn inherited_attribute<'a>(
    source: &'a Document,
    page: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = page;
    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = current.get(b"Parent").ok()?.as_reference().ok()?;
        let parent = source.get_dictionary(parent_id).ok()?;
        if let Ok(value) = parent.get(key) {
            return Some(value);
        }
        current = parent;
    }
    None
}
