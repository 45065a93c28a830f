// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output directory handling.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use formwerk_core::OutputFile;
use formwerk_core::error::{FormwerkError, Result};

/// Create the output directory if needed and return it.
pub async fn ensure(dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    Ok(dir.to_path_buf())
}

/// Path for a produced file inside `dir`.
///
/// Names come from source file names, so anything that is not a plain file
/// name (separators, `..`) is rejected rather than written outside `dir`.
pub fn target_path(dir: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(dir.join(name)),
        _ => Err(FormwerkError::invalid(format!(
            "refusing to write output named '{}'",
            name
        ))),
    }
}

/// Resolve the target of every file before any of them is written.
///
/// Fails if a name is not a plain file name, if two files share a name, if
/// a target is one of `inputs`, or if a target exists and `overwrite` is off.
pub async fn plan_writes(
    dir: &Path,
    files: &[OutputFile],
    inputs: &[PathBuf],
    overwrite: bool,
) -> Result<Vec<PathBuf>> {
    let mut protected = HashSet::with_capacity(inputs.len());
    for input in inputs {
        protected.insert(resolve(input).await);
    }

    let mut names = HashSet::with_capacity(files.len());
    let mut targets = Vec::with_capacity(files.len());
    for file in files {
        let path = target_path(dir, &file.name)?;
        if !names.insert(file.name.as_str()) {
            return Err(FormwerkError::invalid(format!(
                "two outputs share the name '{}'",
                file.name
            )));
        }
        if protected.contains(&resolve(&path).await) {
            return Err(FormwerkError::invalid(format!(
                "'{}' would overwrite an input file",
                path.display()
            )));
        }
        if !overwrite && tokio::fs::try_exists(&path).await? {
            return Err(FormwerkError::invalid(format!(
                "'{}' already exists",
                path.display()
            )));
        }
        targets.push(path);
    }
    Ok(targets)
}

/// Canonical form of `path`. A file that does not exist yet resolves through
/// its parent directory.
async fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = tokio::fs::canonicalize(path).await {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            match tokio::fs::canonicalize(parent).await {
                Ok(parent) => parent.join(name),
                Err(_) => path.to_path_buf(),
            }
        }
        _ => path.to_path_buf(),
    }
}
