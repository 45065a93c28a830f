// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, resample and re-encode a single in-memory image
// (the "surface") using the `image` crate.

use std::io::Cursor;

use formwerk_core::MediaType;
use formwerk_core::error::{FormwerkError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use tracing::{debug, instrument};

/// Image processing pipeline operating on a single decoded image.
///
/// Transformations consume `self` and return a new `ImageProcessor`, so calls
/// chain:
///
/// ```ignore
/// let bytes = ImageProcessor::from_bytes(&data)?
///     .resize_exact(200, 150)
///     .encode(MediaType::Jpeg, 0.8)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode raw encoded bytes (JPEG, PNG, WebP, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| FormwerkError::Decode(format!("image: {}", err)))?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    // -- Transformations ------------------------------------------------------

    /// Resize to fit within `max_width` x `max_height`, preserving aspect
    /// ratio. Uses Lanczos3 filtering.
    #[instrument(skip(self))]
    pub fn resize(self, max_width: u32, max_height: u32) -> Self {
        let resized = self
            .image
            .resize(max_width, max_height, FilterType::Lanczos3);
        debug!(
            new_w = resized.width(),
            new_h = resized.height(),
            "Resize complete"
        );
        Self { image: resized }
    }

    /// Resize to exactly `width` x `height`, ignoring aspect ratio.
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        if (width, height) == self.dimensions() {
            return self;
        }
        let resized = self
            .image
            .resize_exact(width, height, FilterType::Lanczos3);
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as `format`.
    ///
    /// `quality` (0.0..=1.0) is honoured by JPEG. The WebP encoder is lossless
    /// and the remaining formats have no quality setting.
    pub fn encode(&self, format: MediaType, quality: f32) -> Result<Vec<u8>> {
        match format {
            MediaType::Jpeg => self.to_jpeg_bytes(quality_percent(quality)),
            MediaType::WebP => self.to_webp_bytes(),
            MediaType::Png => encode_to_format(&self.image, ImageFormat::Png),
            MediaType::Gif | MediaType::Bmp | MediaType::Tiff => {
                let rgba = DynamicImage::ImageRgba8(self.image.to_rgba8());
                let image_format = image_format(format).ok_or_else(|| {
                    FormwerkError::UnsupportedFormat(format.mime_type().to_string())
                })?;
                encode_to_format(&rgba, image_format)
            }
            MediaType::Pdf | MediaType::Zip | MediaType::OctetStream => Err(
                FormwerkError::UnsupportedFormat(format!("{} is not an image format", format)),
            ),
        }
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| FormwerkError::Encode(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Encode the current image as lossless WebP bytes.
    pub fn to_webp_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgba = self.image.to_rgba8();
        let encoder = WebPEncoder::new_lossless(&mut buffer);
        rgba.write_with_encoder(encoder)
            .map_err(|err| FormwerkError::Encode(format!("WebP encoding failed: {}", err)))?;
        Ok(buffer)
    }
}

/// Detect the media type of encoded image bytes from their signature.
pub fn sniff_media_type(data: &[u8]) -> Option<MediaType> {
    let format = image::guess_format(data).ok()?;
    match format {
        ImageFormat::Jpeg => Some(MediaType::Jpeg),
        ImageFormat::Png => Some(MediaType::Png),
        ImageFormat::WebP => Some(MediaType::WebP),
        ImageFormat::Gif => Some(MediaType::Gif),
        ImageFormat::Bmp => Some(MediaType::Bmp),
        ImageFormat::Tiff => Some(MediaType::Tiff),
        _ => None,
    }
}

/// The `image` crate's format for a media type, if it is an image.
pub fn image_format(media_type: MediaType) -> Option<ImageFormat> {
    match media_type {
        MediaType::Jpeg => Some(ImageFormat::Jpeg),
        MediaType::Png => Some(ImageFormat::Png),
        MediaType::WebP => Some(ImageFormat::WebP),
        MediaType::Gif => Some(ImageFormat::Gif),
        MediaType::Bmp => Some(ImageFormat::Bmp),
        MediaType::Tiff => Some(ImageFormat::Tiff),
        MediaType::Pdf | MediaType::Zip | MediaType::OctetStream => None,
    }
}

/// Map a 0.0..=1.0 quality onto the JPEG encoder's 1..=100 scale.
fn quality_percent(quality: f32) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| FormwerkError::Encode(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}
