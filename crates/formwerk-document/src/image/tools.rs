// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image tools — compression, format conversion and resizing of whole files.
//
// Each call is a self-contained decode → transform → encode pipeline over a
// `SourceFile`, producing a fresh `OutputFile`.

use formwerk_core::error::{FormwerkError, Result};
use formwerk_core::{
    CompressOptions, ConvertOptions, MediaType, OutputFile, ResizeOptions, SourceFile, ToolConfig,
};
use tracing::{debug, info, instrument};

use super::processor::{ImageProcessor, sniff_media_type};

/// Upper bound on encode attempts while chasing the compression size target.
const MAX_COMPRESS_ATTEMPTS: u32 = 10;

/// Per-attempt shrink factor for quality (lossy) or dimensions (lossless).
const COMPRESS_STEP: f64 = 0.9;

/// Largest side a resize may produce.
const MAX_OUTPUT_SIDE: u32 = 65_535;

/// Largest surface a resize may produce (16384 x 16384).
const MAX_OUTPUT_PIXELS: u64 = 1 << 28;

/// Image transform facade.
///
/// Holds only configuration; every method is independent of every other call.
#[derive(Debug, Clone)]
pub struct ImageTools {
    compression: CompressOptions,
}

impl Default for ImageTools {
    fn default() -> Self {
        Self::new(&ToolConfig::default())
    }
}

impl ImageTools {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            compression: config.compression.clone(),
        }
    }

    /// Natural pixel dimensions of an image file.
    pub fn dimensions(&self, file: &SourceFile) -> Result<(u32, u32)> {
        Ok(ImageProcessor::from_bytes(&file.bytes)?.dimensions())
    }

    // -- Compression ------------------------------------------------------------

    /// Compress with the configured defaults.
    pub fn compress_default(&self, file: &SourceFile) -> Result<OutputFile> {
        self.compress(file, &self.compression)
    }

    /// Best-effort compression.
    ///
    /// Downscales so the longer side is at most `max_dimension`, then encodes.
    /// While the output is larger than `max_size_mb`, quality (lossy formats)
    /// or dimensions (lossless formats) are stepped down, for a bounded number
    /// of attempts. The last encoding is returned even if still over target.
    ///
    /// Every failure is reported as [`FormwerkError::CompressionFailed`].
    #[instrument(skip(self, file, options), fields(name = %file.name, bytes_in = file.len()))]
    pub fn compress(&self, file: &SourceFile, options: &CompressOptions) -> Result<OutputFile> {
        self.compress_inner(file, options)
            .map_err(|err| match err {
                FormwerkError::CompressionFailed(_) => err,
                other => FormwerkError::CompressionFailed(other.to_string()),
            })
    }

    fn compress_inner(&self, file: &SourceFile, options: &CompressOptions) -> Result<OutputFile> {
        let format = match options.output_format {
            Some(format) => format,
            None => source_image_type(file)?,
        };
        if !format.is_image() {
            return Err(FormwerkError::UnsupportedFormat(format.mime_type().to_string()));
        }

        let mut processor = ImageProcessor::from_bytes(&file.bytes)?;
        let max_dimension = options.max_dimension.max(1);
        if processor.width().max(processor.height()) > max_dimension {
            processor = processor.resize(max_dimension, max_dimension);
        }

        let target = options.max_size_bytes();
        let mut quality = checked_quality(options.quality)?.clamp(0.01, 1.0);
        let mut bytes = processor.encode(format, quality)?;
        let mut attempts = 1;

        while bytes.len() as u64 > target && attempts < MAX_COMPRESS_ATTEMPTS {
            if format.is_lossy() {
                quality = (quality as f64 * COMPRESS_STEP) as f32;
            } else {
                let (w, h) = processor.dimensions();
                if (w, h) == (1, 1) {
                    break;
                }
                processor = processor.resize_exact(
                    to_pixels(w as f64 * COMPRESS_STEP),
                    to_pixels(h as f64 * COMPRESS_STEP),
                );
            }
            bytes = processor.encode(format, quality)?;
            attempts += 1;
            debug!(attempts, quality, size = bytes.len(), "Re-encoded toward size target");
        }

        info!(
            bytes_in = file.len(),
            bytes_out = bytes.len(),
            attempts,
            "Image compressed"
        );
        Ok(OutputFile::with_base_name(file.base_name(), format, bytes))
    }

    // -- Conversion -------------------------------------------------------------

    /// Re-encode an image in another format at its natural dimensions.
    ///
    /// The output keeps the source's base name with the new extension.
    #[instrument(skip(self, file), fields(name = %file.name))]
    pub fn convert(&self, file: &SourceFile, options: &ConvertOptions) -> Result<OutputFile> {
        if !options.format.is_image() {
            return Err(FormwerkError::UnsupportedFormat(
                options.format.mime_type().to_string(),
            ));
        }
        let quality = checked_quality(options.effective_quality())?;
        let processor = ImageProcessor::from_bytes(&file.bytes)?;
        let bytes = processor.encode(options.format, quality)?;
        info!(
            to = %options.format,
            width = processor.width(),
            height = processor.height(),
            bytes_out = bytes.len(),
            "Image converted"
        );
        Ok(OutputFile::with_base_name(file.base_name(), options.format, bytes))
    }

    /// Convert to WebP.
    pub fn convert_to_web_format(
        &self,
        file: &SourceFile,
        quality: f32,
        lossless: bool,
    ) -> Result<OutputFile> {
        self.convert(
            file,
            &ConvertOptions {
                format: MediaType::WebP,
                quality,
                lossless,
            },
        )
    }

    // -- Resizing -----------------------------------------------------------------

    /// Resize an image. See [`target_dimensions`] for how the size is chosen.
    ///
    /// The output is named `{base}_{width}x{height}.{ext}`.
    #[instrument(skip(self, file), fields(name = %file.name))]
    pub fn resize(&self, file: &SourceFile, options: &ResizeOptions) -> Result<OutputFile> {
        let format = match options.output_format {
            Some(format) => format,
            None => source_image_type(file)?,
        };

        let processor = ImageProcessor::from_bytes(&file.bytes)?;
        let natural = processor.dimensions();
        let (width, height) = target_dimensions(natural, options)?;

        info!(
            from_w = natural.0,
            from_h = natural.1,
            width,
            height,
            "Resizing image"
        );

        let bytes = processor.resize_exact(width, height).encode(format, 1.0)?;
        Ok(OutputFile::new(
            format!("{}_{}x{}.{}", file.base_name(), width, height, format.extension()),
            format,
            bytes,
        ))
    }
}

/// Compute the output size of a resize.
///
/// - aspect ratio kept, one side given: the other follows the natural ratio;
/// - aspect ratio kept, both given: the largest size fitting the box;
/// - aspect ratio not kept: requested sides verbatim, missing sides natural;
/// - nothing given: natural size.
///
/// Fractional results are rounded half away from zero, never below 1 px.
/// Sizes beyond what an image buffer can hold are rejected.
pub fn target_dimensions(natural: (u32, u32), options: &ResizeOptions) -> Result<(u32, u32)> {
    if options.width == Some(0) || options.height == Some(0) {
        return Err(FormwerkError::invalid("target dimensions must be positive"));
    }

    let (natural_w, natural_h) = (natural.0 as f64, natural.1 as f64);

    let dims = match (options.width, options.height, options.maintain_aspect_ratio) {
        (None, None, _) => natural,
        (Some(w), None, true) => (w, to_pixels(w as f64 * natural_h / natural_w)),
        (None, Some(h), true) => (to_pixels(h as f64 * natural_w / natural_h), h),
        (Some(w), Some(h), true) => {
            let scale = (w as f64 / natural_w).min(h as f64 / natural_h);
            (to_pixels(natural_w * scale), to_pixels(natural_h * scale))
        }
        (w, h, false) => (w.unwrap_or(natural.0), h.unwrap_or(natural.1)),
    };

    let (width, height) = dims;
    if width > MAX_OUTPUT_SIDE
        || height > MAX_OUTPUT_SIDE
        || u64::from(width) * u64::from(height) > MAX_OUTPUT_PIXELS
    {
        return Err(FormwerkError::invalid(format!(
            "target size {}x{} is too large",
            width, height
        )));
    }
    Ok(dims)
}

/// Quality must be a real number; NaN and infinities are rejected.
fn checked_quality(quality: f32) -> Result<f32> {
    if quality.is_finite() {
        Ok(quality)
    } else {
        Err(FormwerkError::invalid(format!("quality {} is not a number", quality)))
    }
}

/// Round a fractional pixel size to a valid surface dimension.
fn to_pixels(value: f64) -> u32 {
    value.round().max(1.0) as u32
}

/// The image type of a source: its declared type if that is an image,
/// otherwise whatever its bytes look like.
fn source_image_type(file: &SourceFile) -> Result<MediaType> {
    if file.media_type.is_image() {
        return Ok(file.media_type);
    }
    sniff_media_type(&file.bytes)
        .ok_or_else(|| FormwerkError::Decode(format!("image: unrecognised format in {}", file.name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn png_file(name: &str, width: u32, height: u32) -> SourceFile {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
        });
        let bytes = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(img))
            .encode(MediaType::Png, 1.0)
            .unwrap();
        SourceFile::from_named_bytes(name, bytes)
    }

    fn resize_opts(width: Option<u32>, height: Option<u32>, keep: bool) -> ResizeOptions {
        ResizeOptions {
            width,
            height,
            maintain_aspect_ratio: keep,
            output_format: None,
        }
    }

    #[test]
    fn width_only_follows_aspect_ratio() {
        let dims = target_dimensions((400, 300), &resize_opts(Some(200), None, true)).unwrap();
        assert_eq!(dims, (200, 150));
    }

    #[test]
    fn height_only_follows_aspect_ratio() {
        let dims = target_dimensions((400, 300), &resize_opts(None, Some(60), true)).unwrap();
        assert_eq!(dims, (80, 60));
    }

    #[test]
    fn box_fits_rather_than_stretches() {
        let dims = target_dimensions((400, 200), &resize_opts(Some(100), Some(100), true)).unwrap();
        assert_eq!(dims, (100, 50));
    }

    #[test]
    fn box_can_enlarge() {
        let dims = target_dimensions((100, 50), &resize_opts(Some(400), Some(400), true)).unwrap();
        assert_eq!(dims, (400, 200));
    }

    #[test]
    fn stretch_uses_requested_sides() {
        let dims = target_dimensions((400, 200), &resize_opts(Some(100), Some(100), false)).unwrap();
        assert_eq!(dims, (100, 100));
        let dims = target_dimensions((400, 200), &resize_opts(Some(100), None, false)).unwrap();
        assert_eq!(dims, (100, 200));
    }

    #[test]
    fn fractional_sizes_round_half_up() {
        // 5 * 1 / 2 = 2.5
        let dims = target_dimensions((2, 1), &resize_opts(Some(5), None, true)).unwrap();
        assert_eq!(dims, (5, 3));
        let dims = target_dimensions((1000, 1), &resize_opts(Some(10), None, true)).unwrap();
        assert_eq!(dims, (10, 1));
    }

    #[test]
    fn zero_dimension_is_invalid() {
        let err = target_dimensions((10, 10), &resize_opts(Some(0), None, true)).unwrap_err();
        assert!(matches!(err, FormwerkError::InvalidParameter(_)));
    }

    #[test]
    fn oversized_targets_are_invalid() {
        let err = target_dimensions((400, 300), &resize_opts(Some(4_000_000_000), None, true))
            .unwrap_err();
        assert!(matches!(err, FormwerkError::InvalidParameter(_)));

        let err = target_dimensions((400, 300), &resize_opts(Some(70_000), Some(1), false))
            .unwrap_err();
        assert!(matches!(err, FormwerkError::InvalidParameter(_)));

        let err = target_dimensions((400, 300), &resize_opts(Some(20_000), Some(20_000), false))
            .unwrap_err();
        assert!(matches!(err, FormwerkError::InvalidParameter(_)));

        let dims = target_dimensions((400, 300), &resize_opts(Some(16_384), None, true)).unwrap();
        assert_eq!(dims, (16_384, 12_288));
    }

    #[test]
    fn dimensions_reports_natural_size() {
        let tools = ImageTools::default();
        assert_eq!(tools.dimensions(&png_file("a.png", 37, 23)).unwrap(), (37, 23));

        let broken = SourceFile::from_named_bytes("broken.png", b"nope".to_vec());
        assert!(matches!(
            tools.dimensions(&broken).unwrap_err(),
            FormwerkError::Decode(_)
        ));
    }

    #[test]
    fn resize_names_output_with_dimensions() {
        let tools = ImageTools::default();
        let out = tools
            .resize(&png_file("photo.png", 400, 300), &resize_opts(Some(200), None, true))
            .unwrap();
        assert_eq!(out.name, "photo_200x150.png");
        assert_eq!(out.media_type, MediaType::Png);
        let decoded = ImageProcessor::from_bytes(&out.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (200, 150));
    }

    #[test]
    fn resize_to_other_format() {
        let tools = ImageTools::default();
        let mut opts = resize_opts(Some(100), Some(100), true);
        opts.output_format = Some(MediaType::Jpeg);
        let out = tools.resize(&png_file("wide.png", 400, 200), &opts).unwrap();
        assert_eq!(out.name, "wide_100x50.jpg");
        assert_eq!(sniff_media_type(&out.bytes), Some(MediaType::Jpeg));
    }

    #[test]
    fn resize_rejects_non_images() {
        let tools = ImageTools::default();
        let file = SourceFile::new("x.png", MediaType::Png, b"nope".to_vec());
        let err = tools.resize(&file, &ResizeOptions::default()).unwrap_err();
        assert!(matches!(err, FormwerkError::Decode(_)));
    }

    #[test]
    fn webp_conversion_keeps_dimensions_and_base_name() {
        let tools = ImageTools::default();
        let out = tools
            .convert_to_web_format(&png_file("scan.page.png", 37, 23), 0.5, false)
            .unwrap();
        assert_eq!(out.name, "scan.page.webp");
        assert_eq!(out.media_type, MediaType::WebP);
        let decoded = ImageProcessor::from_bytes(&out.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (37, 23));
    }

    #[test]
    fn convert_undecodable_is_decode_error() {
        let tools = ImageTools::default();
        let file = SourceFile::from_named_bytes("broken.jpg", vec![0xFF, 0xD8, 0x00]);
        let err = tools.convert_to_web_format(&file, 0.8, true).unwrap_err();
        assert!(matches!(err, FormwerkError::Decode(_)));
    }

    #[test]
    fn compress_caps_longest_side() {
        let tools = ImageTools::default();
        let options = CompressOptions {
            max_dimension: 64,
            ..CompressOptions::default()
        };
        let out = tools.compress(&png_file("big.png", 256, 128), &options).unwrap();
        assert_eq!(out.name, "big.png");
        let decoded = ImageProcessor::from_bytes(&out.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (64, 32));
    }

    #[test]
    fn compress_steps_toward_size_target() {
        let tools = ImageTools::default();
        let file = png_file("noise.png", 200, 200);
        let unbounded = tools
            .compress(
                &file,
                &CompressOptions {
                    output_format: Some(MediaType::Jpeg),
                    quality: 1.0,
                    ..CompressOptions::default()
                },
            )
            .unwrap();
        let bounded = tools
            .compress(
                &file,
                &CompressOptions {
                    output_format: Some(MediaType::Jpeg),
                    quality: 1.0,
                    max_size_mb: 0.001,
                    ..CompressOptions::default()
                },
            )
            .unwrap();
        assert_eq!(bounded.name, "noise.jpg");
        assert!(bounded.len() < unbounded.len());
    }

    #[test]
    fn compress_failure_is_generic() {
        let tools = ImageTools::default();
        let file = SourceFile::from_named_bytes("broken.png", b"garbage".to_vec());
        let err = tools.compress_default(&file).unwrap_err();
        assert!(matches!(err, FormwerkError::CompressionFailed(_)));
    }

    #[test]
    fn nan_quality_is_rejected() {
        let tools = ImageTools::default();
        let file = png_file("q.png", 8, 8);

        let err = tools
            .convert(
                &file,
                &ConvertOptions {
                    format: MediaType::Jpeg,
                    quality: f32::NAN,
                    lossless: false,
                },
            )
            .unwrap_err();
        assert!(matches!(err, FormwerkError::InvalidParameter(_)));

        let err = tools
            .compress(
                &file,
                &CompressOptions {
                    quality: f32::NAN,
                    ..CompressOptions::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, FormwerkError::CompressionFailed(_)));

        // Lossless ignores the quality value entirely.
        let out = tools.convert_to_web_format(&file, f32::NAN, true).unwrap();
        assert_eq!(out.media_type, MediaType::WebP);
    }
}
