// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decoding, resampling and encoding, plus the file-level
// compress / convert / resize tools built on top.

pub mod processor;
pub mod tools;

pub use processor::ImageProcessor;
pub use tools::{ImageTools, target_dimensions};
