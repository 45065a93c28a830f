// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Formwerk.

use thiserror::Error;

/// Top-level error type for all Formwerk operations.
#[derive(Debug, Error)]
pub enum FormwerkError {
    // -- Input errors --
    /// The source could not be parsed as the expected format.
    #[error("failed to decode {0}")]
    Decode(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    // -- Processing errors --
    #[error("compression failed: {0}")]
    CompressionFailed(String),

    #[error("encoding failed: {0}")]
    Encode(String),

    #[error("archive creation failed: {0}")]
    Archive(String),

    /// A worker running a transform stopped before returning a result.
    #[error("background task failed: {0}")]
    Task(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FormwerkError {
    /// Shorthand for [`FormwerkError::InvalidParameter`].
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidParameter(detail.into())
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FormwerkError>;
