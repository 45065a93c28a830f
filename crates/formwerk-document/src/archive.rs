// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Archive bundling — pack produced files into a single ZIP when an archiver is
// available, otherwise hand them back one by one.
//
// Bundling is an enhancement only: a missing archiver or a failed pack both
// degrade to individual delivery, never to an error.

use std::io::{Cursor, Write};

use formwerk_core::error::{FormwerkError, Result};
use formwerk_core::{Delivery, MediaType, OutputFile};
use tracing::{info, instrument, warn};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Something that can pack files into one archive payload.
pub trait Archiver {
    /// Pack `files` as flat entries named after each file.
    fn pack(&self, files: &[OutputFile]) -> Result<Vec<u8>>;
}

/// ZIP archiver backed by the `zip` crate.
#[derive(Debug, Clone, Copy)]
pub struct ZipArchiver {
    compression: CompressionMethod,
}

impl Default for ZipArchiver {
    fn default() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }
}

impl ZipArchiver {
    /// An archiver that stores entries without compression.
    pub fn stored() -> Self {
        Self {
            compression: CompressionMethod::Stored,
        }
    }
}

impl Archiver for ZipArchiver {
    fn pack(&self, files: &[OutputFile]) -> Result<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(self.compression);

        for file in files {
            writer
                .start_file(file.name.as_str(), options)
                .map_err(|err| FormwerkError::Archive(format!("{}: {}", file.name, err)))?;
            writer
                .write_all(&file.bytes)
                .map_err(|err| FormwerkError::Archive(format!("{}: {}", file.name, err)))?;
        }

        let cursor = writer
            .finish()
            .map_err(|err| FormwerkError::Archive(err.to_string()))?;
        Ok(cursor.into_inner())
    }
}

/// Bundle `files` into one archive named `archive_name`.
///
/// With no archiver, or if packing fails, the files are delivered individually.
#[instrument(skip(files, archiver), fields(count = files.len(), available = archiver.is_some()))]
pub fn bundle_as_archive(
    files: Vec<OutputFile>,
    archive_name: &str,
    archiver: Option<&dyn Archiver>,
) -> Delivery {
    let Some(archiver) = archiver else {
        info!("No archiver available, delivering files individually");
        return Delivery::Individual(files);
    };

    match archiver.pack(&files) {
        Ok(bytes) => {
            let name = if archive_name.to_ascii_lowercase().ends_with(".zip") {
                archive_name.to_string()
            } else {
                format!("{}.zip", archive_name)
            };
            info!(%name, archive_bytes = bytes.len(), "Files bundled");
            Delivery::Archive(OutputFile::new(name, MediaType::Zip, bytes))
        }
        Err(err) => {
            warn!(%err, "Archive creation failed, delivering files individually");
            Delivery::Individual(files)
        }
    }
}
