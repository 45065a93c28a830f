// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — load an existing document and pull page selections out of it
// using the `lopdf` crate.

use formwerk_core::PageIndexSet;
use formwerk_core::error::{FormwerkError, Result};
use lopdf::{Document, ObjectId};
use tracing::{debug, instrument};

use super::writer::PdfWriter;

/// A decoded source PDF.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Page object ids in page order.
    pages: Vec<ObjectId>,
}

impl PdfReader {
    /// Decode PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data)
            .map_err(|err| FormwerkError::Decode(format!("PDF: {}", err)))?;

        // `get_pages` is keyed by 1-based page number, so values come out in order.
        let pages: Vec<ObjectId> = document.get_pages().into_values().collect();
        debug!(pages = pages.len(), "PDF loaded from bytes");

        Ok(Self { document, pages })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// All page object ids, in page order.
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.pages
    }

    /// Page object ids for a selection of zero-based indices.
    pub fn select(&self, set: &PageIndexSet) -> Result<Vec<ObjectId>> {
        set.indices()
            .iter()
            .map(|&index| {
                self.pages.get(index as usize).copied().ok_or_else(|| {
                    FormwerkError::invalid(format!(
                        "page {} out of range (document has {} pages)",
                        index + 1,
                        self.pages.len()
                    ))
                })
            })
            .collect()
    }

    /// Copy the selected pages, in selection order, into a new document and
    /// return its serialised bytes.
    #[instrument(skip(self), fields(pages = set.len()))]
    pub fn extract(&self, set: &PageIndexSet) -> Result<Vec<u8>> {
        let page_ids = self.select(set)?;
        let mut writer = PdfWriter::new();
        writer.append_pages(&self.document, &page_ids)?;
        writer.save()
    }
}
