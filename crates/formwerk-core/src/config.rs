// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::CompressOptions;

/// Settings shared by the transform facades and the command-line front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Defaults for image compression.
    pub compression: CompressOptions,
    /// Quality used for format conversion when none is given.
    pub web_quality: f32,
    /// File name of a merged PDF.
    pub merged_name: String,
    /// Bundle multi-file results into a single archive.
    pub archive_outputs: bool,
    /// File name of the archive when bundling.
    pub archive_name: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            compression: CompressOptions::default(),
            web_quality: 0.9,
            merged_name: "merged.pdf".into(),
            archive_outputs: false,
            archive_name: "formwerk-output.zip".into(),
        }
    }
}

impl ToolConfig {
    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&data)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
