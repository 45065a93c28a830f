// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Formwerk — local image and PDF toolkit.
//
// Entry point. Initialises logging, loads configuration, and dispatches the
// requested command to the service layer.

mod cli;
mod services;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use formwerk_core::human_errors::humanize_error;
use formwerk_core::{
    CompressOptions, ConvertOptions, FormwerkError, MediaType, ResizeOptions, SplitMethod,
    ToolConfig,
};

use cli::{Cli, Command};
use services::tool_services::ToolServices;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            match err.downcast_ref::<FormwerkError>() {
                Some(formwerk_err) => eprintln!("{}", humanize_error(formwerk_err)),
                None => eprintln!("{err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ToolConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ToolConfig::default(),
    };
    let services = ToolServices::new(config, &cli.output_dir).with_overwrite(cli.force);
    let inputs = cli.command.inputs();

    tracing::info!(output_dir = %services.output_dir().display(), "Formwerk starting");

    let outputs = match cli.command {
        Command::Compress {
            files,
            max_size_mb,
            max_dimension,
            quality,
            format,
        } => {
            let defaults = &services.config().compression;
            let options = CompressOptions {
                max_size_mb: max_size_mb.unwrap_or(defaults.max_size_mb),
                max_dimension: max_dimension.unwrap_or(defaults.max_dimension),
                quality: quality.unwrap_or(defaults.quality),
                output_format: match format {
                    Some(name) => Some(MediaType::parse(&name)?),
                    None => defaults.output_format,
                },
            };
            let sources = services.load_sources(&files).await?;
            services.compress(sources, options).await?
        }

        Command::Convert {
            files,
            format,
            quality,
            lossless,
        } => {
            let options = ConvertOptions {
                format: MediaType::parse(&format)?,
                quality: quality.unwrap_or(services.config().web_quality),
                lossless,
            };
            let sources = services.load_sources(&files).await?;
            services.convert(sources, options).await?
        }

        Command::Resize {
            files,
            width,
            height,
            stretch,
            format,
        } => {
            let options = ResizeOptions {
                width,
                height,
                maintain_aspect_ratio: !stretch,
                output_format: parse_output_format(&format)?,
            };
            let sources = services.load_sources(&files).await?;
            services.resize(sources, options).await?
        }

        Command::Merge { files, name } => {
            let sources = services.load_sources(&files).await?;
            let mut result = services.merge(sources).await?;
            if let Some(name) = name {
                result.file.name = name;
            }
            println!("merged {} pages into {}", result.total_pages, result.file.name);
            vec![result.file]
        }

        Command::Split {
            file,
            method,
            start,
            end,
            pages,
        } => {
            let method = SplitMethod::parse(&method, start, end, pages)?;
            let source = services
                .load_sources(std::slice::from_ref(&file))
                .await?
                .remove(0);
            let result = services.split(source, method).await?;
            println!(
                "split {} pages into {} documents",
                result.total_pages,
                result.files.len()
            );
            result.files
        }

        Command::Pages { files } => {
            let sources = services.load_sources(&files).await?;
            for (name, count) in services.page_counts(sources).await? {
                println!("{name}\t{count}");
            }
            return Ok(());
        }

        Command::Info { files } => {
            let sources = services.load_sources(&files).await?;
            for (name, (width, height)) in services.dimensions(sources).await? {
                println!("{name}\t{width}x{height}");
            }
            return Ok(());
        }
    };

    let delivery = services.deliver(outputs, cli.zip).await?;
    for path in services.save(&delivery, &inputs).await? {
        println!("{}", path.display());
    }
    Ok(())
}

/// `original` keeps the source format; anything else names a format.
fn parse_output_format(name: &str) -> Result<Option<MediaType>, FormwerkError> {
    if name.eq_ignore_ascii_case("original") {
        Ok(None)
    } else {
        MediaType::parse(name).map(Some)
    }
}
