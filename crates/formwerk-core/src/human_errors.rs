// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the people using the tools.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity decides how a front end presents it.

use crate::error::FormwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Trying again may work.
    Transient,
    /// The user has to change something (settings, page numbers, file choice).
    ActionRequired,
    /// The file itself cannot be processed.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `FormwerkError` into a `HumanError`.
pub fn humanize_error(err: &FormwerkError) -> HumanError {
    match err {
        FormwerkError::Decode(detail) => {
            if detail.starts_with("PDF") {
                HumanError {
                    message: "There's a problem with this PDF file.".into(),
                    suggestion: "The file may be damaged or password protected. Try opening it in a PDF viewer first.".into(),
                    severity: Severity::Permanent,
                }
            } else {
                HumanError {
                    message: "This image couldn't be opened.".into(),
                    suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
                    severity: Severity::Permanent,
                }
            }
        }

        FormwerkError::InvalidParameter(detail) => humanize_parameter_error(detail),

        FormwerkError::UnsupportedFormat(detail) => HumanError {
            message: "This file type isn't supported.".into(),
            suggestion: format!("Use JPEG, PNG, WebP, GIF, BMP, TIFF or PDF. (Got: {detail})"),
            severity: Severity::ActionRequired,
        },

        FormwerkError::CompressionFailed(_) => HumanError {
            message: "The image couldn't be compressed.".into(),
            suggestion: "Check that the file is a valid image, or try a different output format.".into(),
            severity: Severity::Permanent,
        },

        FormwerkError::Encode(_) => HumanError {
            message: "The result couldn't be written in the chosen format.".into(),
            suggestion: "Try a different output format.".into(),
            severity: Severity::ActionRequired,
        },

        FormwerkError::Archive(_) => HumanError {
            message: "The ZIP archive couldn't be created.".into(),
            suggestion: "The files will be saved one by one instead.".into(),
            severity: Severity::Transient,
        },

        FormwerkError::Task(_) => HumanError {
            message: "Something went wrong while processing the file.".into(),
            suggestion: "Try again with different settings. If it keeps failing, please report it.".into(),
            severity: Severity::Permanent,
        },

        FormwerkError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "Permission denied.".into(),
                suggestion: "Check the file and folder permissions, or choose a different output folder.".into(),
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                severity: Severity::Transient,
            },
        },

        FormwerkError::Serialization(_) => HumanError {
            message: "The configuration file couldn't be read.".into(),
            suggestion: "Check that it is valid JSON.".into(),
            severity: Severity::ActionRequired,
        },
    }
}

/// Map parameter errors to advice about the specific setting.
fn humanize_parameter_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    let suggestion = if lower.contains("invalid range") {
        "The first page must not come after the last page. Check the page range.".to_string()
    } else if lower.contains("no pages selected") {
        "Select at least one page to extract.".to_string()
    } else if lower.contains("invalid method") {
        "Choose one of: all, range, custom.".to_string()
    } else if lower.contains("out of range") {
        "One of the page numbers is beyond the end of the document.".to_string()
    } else if lower.contains("no documents") {
        "Choose at least one PDF to merge.".to_string()
    } else if lower.contains("too large") {
        "Choose a smaller width or height.".to_string()
    } else if lower.contains("quality") {
        "Use a quality between 0.0 and 1.0.".to_string()
    } else if lower.contains("input file") {
        "Choose a different output folder so the original file is kept.".to_string()
    } else if lower.contains("already exists") {
        "Choose a different output folder, or allow existing files to be replaced.".to_string()
    } else if lower.contains("share the name") {
        "Give each output a different name.".to_string()
    } else {
        format!("Check the settings and try again. ({detail})")
    };

    HumanError {
        message: "Those settings don't work for this file.".into(),
        suggestion,
        severity: Severity::ActionRequired,
    }
}
