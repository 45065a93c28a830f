// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page selection for splitting: turn a split method into page-index sets, and
// name the document produced from each set.

use formwerk_core::error::{FormwerkError, Result};
use formwerk_core::{PageIndexSet, SplitMethod};

/// Compute the page-index sets a split produces for a `total_pages` document.
///
/// `All` yields one singleton per page; `Range` and `Custom` yield exactly one
/// set. Range bounds are clamped to the document before being checked.
pub fn plan(method: &SplitMethod, total_pages: u32) -> Result<Vec<PageIndexSet>> {
    match method {
        SplitMethod::All => Ok((0..total_pages).map(PageIndexSet::single).collect()),

        SplitMethod::Range { start, end } => {
            let first = (*start).max(1);
            let last = (*end).min(total_pages);
            if first > last {
                return Err(FormwerkError::invalid(format!(
                    "invalid range: pages {}-{} of a {} page document",
                    start, end, total_pages
                )));
            }
            Ok(vec![PageIndexSet::contiguous(first - 1, last - 1)])
        }

        SplitMethod::Custom { pages } => {
            if pages.is_empty() {
                return Err(FormwerkError::invalid("no pages selected"));
            }
            if let Some(&bad) = pages.iter().find(|&&p| p == 0 || p > total_pages) {
                return Err(FormwerkError::invalid(format!(
                    "page {} out of range (document has {} pages)",
                    bad, total_pages
                )));
            }
            Ok(vec![PageIndexSet::from_indices(
                pages.iter().map(|&p| p - 1),
            )])
        }
    }
}

/// Name of the document built from `set`.
///
/// `outputs` is the number of documents the split produces in total.
pub fn output_name(base: &str, method: &SplitMethod, set: &PageIndexSet, outputs: usize) -> String {
    let joined = || {
        set.page_numbers()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join("-")
    };

    match method {
        SplitMethod::All => format!("{}_page_{}.pdf", base, joined()),
        SplitMethod::Range { .. } => {
            let first = set.page_numbers().next().unwrap_or_default();
            let last = set.page_numbers().last().unwrap_or_default();
            format!("{}_pages_{}-{}.pdf", base, first, last)
        }
        SplitMethod::Custom { .. } if outputs > 1 => format!("{}_pages_{}.pdf", base, joined()),
        SplitMethod::Custom { .. } => format!("{}_selected_pages.pdf", base),
    }
}
