// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// formwerk-document — File transforms for the Formwerk toolkit.
//
// Provides image tools (compress, convert, resize), PDF tools (merge, split,
// page count) and best-effort ZIP bundling of the produced files.

pub mod archive;
pub mod image;
pub mod pdf;

// Re-export the primary structs so callers can use `formwerk_document::PdfTools` etc.
pub use archive::{Archiver, ZipArchiver, bundle_as_archive};
pub use image::processor::ImageProcessor;
pub use image::tools::ImageTools;
pub use pdf::reader::PdfReader;
pub use pdf::tools::PdfTools;
pub use pdf::writer::PdfWriter;
