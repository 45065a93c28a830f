// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF tools — merge several documents, split one into page subsets, count pages.

use formwerk_core::error::{FormwerkError, Result};
use formwerk_core::{MediaType, MergeResult, OutputFile, SourceFile, SplitMethod, SplitResult, ToolConfig};
use tracing::{debug, info, instrument, warn};

use super::pages;
use super::reader::PdfReader;
use super::writer::PdfWriter;

/// PDF transform facade.
#[derive(Debug, Clone)]
pub struct PdfTools {
    merged_name: String,
}

impl Default for PdfTools {
    fn default() -> Self {
        Self::new(&ToolConfig::default())
    }
}

impl PdfTools {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            merged_name: config.merged_name.clone(),
        }
    }

    /// Merge documents in input order, each contributing all of its pages in
    /// their original order.
    ///
    /// All-or-nothing: the first source that fails to decode aborts the merge.
    #[instrument(skip_all, fields(documents = files.len()))]
    pub fn merge(&self, files: &[SourceFile]) -> Result<MergeResult> {
        if files.is_empty() {
            return Err(FormwerkError::invalid("no documents to merge"));
        }

        let mut writer = PdfWriter::new();
        let mut total_pages: u32 = 0;

        for file in files {
            let reader = PdfReader::from_bytes(&file.bytes).map_err(|err| match err {
                FormwerkError::Decode(detail) => {
                    FormwerkError::Decode(format!("{} ({})", detail, file.name))
                }
                other => other,
            })?;
            writer.append_pages(reader.document(), reader.page_ids())?;
            total_pages += reader.page_count();
            debug!(name = %file.name, pages = reader.page_count(), total_pages, "Document appended");
        }

        let bytes = writer.save()?;
        info!(total_pages, output_bytes = bytes.len(), "Merge complete");

        Ok(MergeResult {
            file: OutputFile::new(self.merged_name.clone(), MediaType::Pdf, bytes),
            total_pages,
        })
    }

    /// Split a document into one or more new documents.
    ///
    /// Outputs are returned in the order their page selections were computed.
    #[instrument(skip(self, file, method), fields(name = %file.name, method = method.name()))]
    pub fn split(&self, file: &SourceFile, method: &SplitMethod) -> Result<SplitResult> {
        let reader = PdfReader::from_bytes(&file.bytes)?;
        let total_pages = reader.page_count();
        let sets = pages::plan(method, total_pages)?;

        info!(total_pages, outputs = sets.len(), "Splitting PDF");

        let mut files = Vec::with_capacity(sets.len());
        for set in &sets {
            let bytes = reader.extract(set)?;
            let name = pages::output_name(file.base_name(), method, set, sets.len());
            debug!(%name, pages = set.len(), "Split output written");
            files.push(OutputFile::new(name, MediaType::Pdf, bytes));
        }

        Ok(SplitResult { files, total_pages })
    }

    /// Page count of a document, or 0 if it cannot be decoded.
    ///
    /// Unlike `merge` and `split` this never fails; use
    /// [`PdfTools::try_page_count`] to see the decode error.
    pub fn page_count(&self, file: &SourceFile) -> u32 {
        match self.try_page_count(file) {
            Ok(count) => count,
            Err(err) => {
                warn!(name = %file.name, %err, "Could not count pages, reporting 0");
                0
            }
        }
    }

    /// Page count of a document.
    pub fn try_page_count(&self, file: &SourceFile) -> Result<u32> {
        Ok(PdfReader::from_bytes(&file.bytes)?.page_count())
    }
}
