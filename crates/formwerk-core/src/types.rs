// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Formwerk: files in and out, per-call transform options,
// and page selections for PDF splitting.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FormwerkError, Result};

/// Media types the toolkit reads or produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Jpeg,
    Png,
    WebP,
    Gif,
    Bmp,
    Tiff,
    Pdf,
    Zip,
    /// Anything we could not identify from the name or declared type.
    OctetStream,
}

impl MediaType {
    /// MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::Pdf => "application/pdf",
            Self::Zip => "application/zip",
            Self::OctetStream => "application/octet-stream",
        }
    }

    /// Canonical file extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Pdf => "pdf",
            Self::Zip => "zip",
            Self::OctetStream => "bin",
        }
    }

    /// Infer the media type from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::WebP),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            "pdf" => Some(Self::Pdf),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }

    /// Parse a MIME type string, ignoring parameters such as `; charset=`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::WebP),
            "image/gif" => Some(Self::Gif),
            "image/bmp" => Some(Self::Bmp),
            "image/tiff" => Some(Self::Tiff),
            "application/pdf" => Some(Self::Pdf),
            "application/zip" => Some(Self::Zip),
            "application/octet-stream" => Some(Self::OctetStream),
            _ => None,
        }
    }

    /// Parse a user-supplied format name: an extension or a MIME type.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_extension(name.trim_start_matches('.'))
            .or_else(|| Self::from_mime(name))
            .ok_or_else(|| FormwerkError::UnsupportedFormat(name.to_string()))
    }

    /// Raster image formats.
    pub fn is_image(&self) -> bool {
        matches!(
            self,
            Self::Jpeg | Self::Png | Self::WebP | Self::Gif | Self::Bmp | Self::Tiff
        )
    }

    /// Formats whose encoder honours a quality setting.
    pub fn is_lossy(&self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Split a file name into its base name and extension.
///
/// `"report.final.pdf"` yields `("report.final", Some("pdf"))`. Names without a
/// dot, or whose only dot is the leading one, have no extension.
pub fn split_file_name(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => (base, Some(ext)),
        _ => (name, None),
    }
}

/// An input file supplied by the caller. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub media_type: MediaType,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    /// Create a source file with an explicitly declared media type.
    pub fn new(name: impl Into<String>, media_type: MediaType, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            bytes,
        }
    }

    /// Create a source file, inferring the media type from the name's extension.
    pub fn from_named_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = split_file_name(&name)
            .1
            .and_then(MediaType::from_extension)
            .unwrap_or(MediaType::OctetStream);
        Self::new(name, media_type, bytes)
    }

    /// Wrap bytes read from `path`, named after the path's last component.
    pub fn from_path_bytes(path: impl AsRef<Path>, bytes: Vec<u8>) -> Self {
        let name = path
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        Self::from_named_bytes(name, bytes)
    }

    /// File name without its extension.
    pub fn base_name(&self) -> &str {
        split_file_name(&self.name).0
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A freshly produced file. Its bytes never alias a [`SourceFile`]'s storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub media_type: MediaType,
    pub bytes: Vec<u8>,
}

impl OutputFile {
    pub fn new(name: impl Into<String>, media_type: MediaType, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            bytes,
        }
    }

    /// Build an output named `{base}.{ext}` for the given media type.
    pub fn with_base_name(base: &str, media_type: MediaType, bytes: Vec<u8>) -> Self {
        Self::new(
            format!("{}.{}", base, media_type.extension()),
            media_type,
            bytes,
        )
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Rename files whose name repeats an earlier one in the batch.
///
/// The first file keeps its name; later ones become `{base}_1.{ext}`,
/// `{base}_2.{ext}` and so on, skipping any name already in the batch.
/// Returns how many files were renamed.
pub fn make_names_unique(files: &mut [OutputFile]) -> usize {
    let mut taken: HashSet<String> = files.iter().map(|f| f.name.clone()).collect();
    let mut seen = HashSet::with_capacity(files.len());
    let mut renamed = 0;

    for file in files.iter_mut() {
        if seen.insert(file.name.clone()) {
            continue;
        }
        let (base, ext) = split_file_name(&file.name);
        let mut n = 1;
        let unique = loop {
            let candidate = match ext {
                Some(ext) => format!("{}_{}.{}", base, n, ext),
                None => format!("{}_{}", base, n),
            };
            if !taken.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        taken.insert(unique.clone());
        seen.insert(unique.clone());
        file.name = unique;
        renamed += 1;
    }
    renamed
}

// -- Transform options --------------------------------------------------------

/// Options for best-effort image compression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressOptions {
    /// Target upper bound for the output size, in mebibytes.
    pub max_size_mb: f64,
    /// Longest side allowed in the output, in pixels.
    pub max_dimension: u32,
    /// Encoder quality in `0.0..=1.0`.
    pub quality: f32,
    /// Output format; `None` keeps the source format.
    pub output_format: Option<MediaType>,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            max_size_mb: 10.0,
            max_dimension: 1920,
            quality: 0.8,
            output_format: None,
        }
    }
}

impl CompressOptions {
    pub fn max_size_bytes(&self) -> u64 {
        (self.max_size_mb.max(0.0) * 1024.0 * 1024.0) as u64
    }
}

/// Options for re-encoding an image to another format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertOptions {
    pub format: MediaType,
    /// Encoder quality in `0.0..=1.0`. Ignored when `lossless` is set.
    pub quality: f32,
    pub lossless: bool,
}

impl ConvertOptions {
    /// Quality actually handed to the encoder.
    pub fn effective_quality(&self) -> f32 {
        if self.lossless {
            1.0
        } else {
            self.quality.clamp(0.0, 1.0)
        }
    }
}

/// Options for resizing an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub maintain_aspect_ratio: bool,
    /// Output format; `None` keeps the source format.
    pub output_format: Option<MediaType>,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            maintain_aspect_ratio: true,
            output_format: None,
        }
    }
}

// -- PDF page selection -------------------------------------------------------

/// How a PDF is split into output documents. Page numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum SplitMethod {
    /// One output per page.
    All,
    /// One output holding pages `start..=end`, clamped to the document.
    Range { start: u32, end: u32 },
    /// One output holding the listed pages, in ascending order.
    Custom { pages: Vec<u32> },
}

impl SplitMethod {
    /// Build a method from its name plus the options a caller collected.
    ///
    /// Missing range bounds default to the whole document.
    pub fn parse(
        method: &str,
        start: Option<u32>,
        end: Option<u32>,
        pages: Vec<u32>,
    ) -> Result<Self> {
        match method {
            "all" => Ok(Self::All),
            "range" => Ok(Self::Range {
                start: start.unwrap_or(1),
                end: end.unwrap_or(u32::MAX),
            }),
            "custom" => Ok(Self::Custom { pages }),
            other => Err(FormwerkError::invalid(format!("invalid method '{other}'"))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Range { .. } => "range",
            Self::Custom { .. } => "custom",
        }
    }
}

/// An ordered, duplicate-free selection of zero-based page indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageIndexSet(Vec<u32>);

impl PageIndexSet {
    /// Build a set from arbitrary indices; they are sorted and deduplicated.
    pub fn from_indices(indices: impl IntoIterator<Item = u32>) -> Self {
        let mut indices: Vec<u32> = indices.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        Self(indices)
    }

    pub fn single(index: u32) -> Self {
        Self(vec![index])
    }

    /// Indices `first..=last`.
    pub fn contiguous(first: u32, last: u32) -> Self {
        Self((first..=last).collect())
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    /// The selection as 1-based page numbers.
    pub fn page_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().map(|index| index + 1)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// -- Results ------------------------------------------------------------------

/// Outcome of merging several PDFs.
#[derive(Debug, Clone)]
pub struct MergeResult {
    pub file: OutputFile,
    pub total_pages: u32,
}

/// Outcome of splitting a PDF.
#[derive(Debug, Clone)]
pub struct SplitResult {
    /// Output documents, in the order their page selections were computed.
    pub files: Vec<OutputFile>,
    /// Page count of the source document.
    pub total_pages: u32,
}

/// How a set of produced files is handed to the caller.
#[derive(Debug, Clone)]
pub enum Delivery {
    /// Everything packed into one archive.
    Archive(OutputFile),
    /// Each file on its own.
    Individual(Vec<OutputFile>),
}

impl Delivery {
    /// Files the caller should save.
    pub fn files(&self) -> &[OutputFile] {
        match self {
            Self::Archive(file) => std::slice::from_ref(file),
            Self::Individual(files) => files,
        }
    }

    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Archive(_))
    }
}
