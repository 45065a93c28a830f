// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the transform facades and offers async methods
// for the command dispatcher.
//
// Facade calls are CPU-bound and synchronous, so each one runs on the blocking
// pool: a single await per decode → transform → encode pipeline.

use std::path::{Path, PathBuf};

use formwerk_core::error::{FormwerkError, Result};
use formwerk_core::{
    CompressOptions, ConvertOptions, Delivery, MergeResult, OutputFile, ResizeOptions, SourceFile,
    SplitMethod, SplitResult, ToolConfig, make_names_unique,
};
use formwerk_document::{ImageTools, PdfTools, ZipArchiver, bundle_as_archive};
use tracing::{debug, info};

use super::output_dir;

/// Transform facades plus the configuration they were built from.
#[derive(Debug, Clone)]
pub struct ToolServices {
    config: ToolConfig,
    images: ImageTools,
    pdfs: PdfTools,
    output_dir: PathBuf,
    /// Replace existing files in the output directory.
    overwrite: bool,
}

impl ToolServices {
    pub fn new(config: ToolConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            images: ImageTools::new(&config),
            pdfs: PdfTools::new(&config),
            config,
            output_dir: output_dir.into(),
            overwrite: false,
        }
    }

    /// Allow `save` to replace files that already exist. Inputs are still
    /// never replaced.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    // -- Input ----------------------------------------------------------------

    /// Read the given paths as source files, in order.
    pub async fn load_sources(&self, paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let source = SourceFile::from_path_bytes(path, tokio::fs::read(path).await?);
            debug!(name = %source.name, bytes = source.len(), "Source loaded");
            sources.push(source);
        }
        Ok(sources)
    }

    // -- Images ---------------------------------------------------------------

    pub async fn compress(
        &self,
        sources: Vec<SourceFile>,
        options: CompressOptions,
    ) -> Result<Vec<OutputFile>> {
        let images = self.images.clone();
        run_blocking(move || {
            sources
                .iter()
                .map(|file| images.compress(file, &options))
                .collect()
        })
        .await
    }

    pub async fn convert(
        &self,
        sources: Vec<SourceFile>,
        options: ConvertOptions,
    ) -> Result<Vec<OutputFile>> {
        let images = self.images.clone();
        run_blocking(move || {
            sources
                .iter()
                .map(|file| images.convert(file, &options))
                .collect()
        })
        .await
    }

    pub async fn resize(
        &self,
        sources: Vec<SourceFile>,
        options: ResizeOptions,
    ) -> Result<Vec<OutputFile>> {
        let images = self.images.clone();
        run_blocking(move || {
            sources
                .iter()
                .map(|file| images.resize(file, &options))
                .collect()
        })
        .await
    }

    /// Natural dimensions of each image, in input order.
    pub async fn dimensions(&self, sources: Vec<SourceFile>) -> Result<Vec<(String, (u32, u32))>> {
        let images = self.images.clone();
        run_blocking(move || {
            sources
                .into_iter()
                .map(|file| -> Result<(String, (u32, u32))> {
                    let dims = images.dimensions(&file)?;
                    Ok((file.name, dims))
                })
                .collect()
        })
        .await
    }

    // -- PDFs -----------------------------------------------------------------

    pub async fn merge(&self, sources: Vec<SourceFile>) -> Result<MergeResult> {
        let pdfs = self.pdfs.clone();
        run_blocking(move || pdfs.merge(&sources)).await
    }

    pub async fn split(&self, source: SourceFile, method: SplitMethod) -> Result<SplitResult> {
        let pdfs = self.pdfs.clone();
        run_blocking(move || pdfs.split(&source, &method)).await
    }

    /// Page counts, 0 for anything that is not a readable PDF.
    pub async fn page_counts(&self, sources: Vec<SourceFile>) -> Result<Vec<(String, u32)>> {
        let pdfs = self.pdfs.clone();
        run_blocking(move || {
            Ok(sources
                .into_iter()
                .map(|file| {
                    let count = pdfs.page_count(&file);
                    (file.name, count)
                })
                .collect())
        })
        .await
    }

    // -- Output ---------------------------------------------------------------

    /// Decide how to hand produced files over.
    ///
    /// Repeated names within the batch are made unique first. Several files
    /// are bundled when an archive name is given or the configuration asks
    /// for it; a single file is always delivered as-is.
    pub async fn deliver(
        &self,
        mut files: Vec<OutputFile>,
        archive_name: Option<String>,
    ) -> Result<Delivery> {
        let renamed = make_names_unique(&mut files);
        if renamed > 0 {
            info!(renamed, "Outputs with repeated names were renamed");
        }

        let wants_archive = archive_name.is_some() || self.config.archive_outputs;
        if !wants_archive || files.len() < 2 {
            return Ok(Delivery::Individual(files));
        }
        let name = archive_name.unwrap_or_else(|| self.config.archive_name.clone());
        run_blocking(move || {
            let archiver = ZipArchiver::default();
            Ok(bundle_as_archive(files, &name, Some(&archiver)))
        })
        .await
    }

    /// Write delivered files into the output directory.
    ///
    /// Every target is checked before the first write, so a rejected name
    /// leaves nothing behind. `inputs` are never replaced.
    pub async fn save(&self, delivery: &Delivery, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let dir = output_dir::ensure(&self.output_dir).await?;
        let targets =
            output_dir::plan_writes(&dir, delivery.files(), inputs, self.overwrite).await?;
        let mut written = Vec::with_capacity(targets.len());
        for (file, path) in delivery.files().iter().zip(targets) {
            tokio::fs::write(&path, &file.bytes).await?;
            info!(path = %path.display(), bytes = file.len(), "Saved");
            written.push(path);
        }
        Ok(written)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Run a synchronous transform on the blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| FormwerkError::Task(err.to_string()))?
}
