// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Compress, convert and resize images; merge and split PDFs.
#[derive(Parser, Debug)]
#[command(name = "formwerk", version)]
#[command(about = "Local image and PDF toolkit: compress, convert, resize, merge, split")]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, help = "Path to a JSON configuration file")]
    pub config: Option<PathBuf>,

    /// Where produced files are written
    #[arg(short, long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// Bundle multi-file results into this ZIP archive
    #[arg(long, global = true, value_name = "ARCHIVE")]
    pub zip: Option<String>,

    /// Replace files that already exist in the output directory
    #[arg(long, global = true)]
    pub force: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Shrink images toward a size target
    Compress {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Target upper bound in MB
        #[arg(long)]
        max_size_mb: Option<f64>,
        /// Longest side in pixels
        #[arg(long)]
        max_dimension: Option<u32>,
        /// Encoder quality, 0.0 to 1.0
        #[arg(short, long, value_parser = parse_quality)]
        quality: Option<f32>,
        /// Output format (defaults to the source format)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Re-encode images in another format
    Convert {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Target format: webp, jpg, png, gif, bmp, tiff
        #[arg(short, long, default_value = "webp")]
        format: String,
        /// Encoder quality, 0.0 to 1.0
        #[arg(short, long, value_parser = parse_quality)]
        quality: Option<f32>,
        /// Encode at maximum quality
        #[arg(long)]
        lossless: bool,
    },

    /// Resize images
    Resize {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short = 'W', long)]
        width: Option<u32>,
        #[arg(short = 'H', long)]
        height: Option<u32>,
        /// Use width and height verbatim instead of fitting
        #[arg(long)]
        stretch: bool,
        /// Output format, or "original"
        #[arg(short, long, default_value = "original")]
        format: String,
    },

    /// Merge PDFs in the order given
    Merge {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// File name of the merged PDF
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Split a PDF into several documents
    Split {
        file: PathBuf,
        /// all, range or custom
        #[arg(short, long, default_value = "all")]
        method: String,
        /// First page of the range (1-based)
        #[arg(long)]
        start: Option<u32>,
        /// Last page of the range (1-based)
        #[arg(long)]
        end: Option<u32>,
        /// Pages to extract for the custom method, e.g. 1,3,5
        #[arg(long, value_delimiter = ',')]
        pages: Vec<u32>,
    },

    /// Print the page count of PDFs
    Pages {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the pixel dimensions of images
    Info {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

impl Command {
    /// Files the command reads.
    pub fn inputs(&self) -> Vec<PathBuf> {
        match self {
            Self::Compress { files, .. }
            | Self::Convert { files, .. }
            | Self::Resize { files, .. }
            | Self::Merge { files, .. }
            | Self::Pages { files }
            | Self::Info { files } => files.clone(),
            Self::Split { file, .. } => vec![file.clone()],
        }
    }
}

/// Encoder quality: a finite number from 0.0 to 1.0.
fn parse_quality(raw: &str) -> Result<f32, String> {
    let value: f32 = raw.parse().map_err(|err| format!("{err}"))?;
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("must be between 0.0 and 1.0, got {raw}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_split_with_custom_pages() {
        let cli = Cli::parse_from([
            "formwerk", "split", "doc.pdf", "--method", "custom", "--pages", "3,1,2",
        ]);
        match cli.command {
            Command::Split { method, pages, .. } => {
                assert_eq!(method, "custom");
                assert_eq!(pages, vec![3, 1, 2]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from(["formwerk", "merge", "a.pdf", "b.pdf", "--zip", "out.zip", "-o", "dist"]);
        assert_eq!(cli.zip.as_deref(), Some("out.zip"));
        assert_eq!(cli.output_dir, PathBuf::from("dist"));
    }

    #[test]
    fn convert_defaults_to_webp() {
        let cli = Cli::parse_from(["formwerk", "convert", "a.png"]);
        match cli.command {
            Command::Convert { format, lossless, .. } => {
                assert_eq!(format, "webp");
                assert!(!lossless);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn quality_must_be_a_fraction() {
        let cli = Cli::parse_from(["formwerk", "compress", "a.png", "--quality", "0.5"]);
        match cli.command {
            Command::Compress { quality, .. } => assert_eq!(quality, Some(0.5)),
            other => panic!("unexpected command: {other:?}"),
        }
        for bad in ["NaN", "inf", "1.5", "-0.1", "high"] {
            assert!(
                Cli::try_parse_from(["formwerk", "convert", "a.png", "--quality", bad]).is_err(),
                "accepted quality {bad}"
            );
        }
    }

    #[test]
    fn inputs_cover_every_command() {
        let cli = Cli::parse_from(["formwerk", "split", "doc.pdf", "--force"]);
        assert!(cli.force);
        assert_eq!(cli.command.inputs(), vec![PathBuf::from("doc.pdf")]);

        let cli = Cli::parse_from(["formwerk", "info", "a.png", "b.png"]);
        assert_eq!(
            cli.command.inputs(),
            vec![PathBuf::from("a.png"), PathBuf::from("b.png")]
        );
    }
}
