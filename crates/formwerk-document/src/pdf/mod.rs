// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — reading, page selection, assembling new documents, and the
// merge / split / page-count tools.

pub mod pages;
pub mod reader;
pub mod tools;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_support;

pub use reader::PdfReader;
pub use tools::PdfTools;
pub use writer::PdfWriter;
