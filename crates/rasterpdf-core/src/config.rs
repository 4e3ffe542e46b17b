// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encoder configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RasterPdfError, Result};
use crate::types::{CompressionMethod, OutputFormat, RenderIntent};

/// Strip height used for PCLm when nothing else is configured.
pub const DEFAULT_PCLM_STRIP_HEIGHT: u32 = 16;

/// Settings for one encoder run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// PDF or PCLm.
    pub output_format: OutputFormat,
    /// Emit raw device color spaces and skip all calibration.
    pub color_management_disabled: bool,
    /// Overrides the rendering intent found in each page header.
    pub render_intent: Option<RenderIntent>,
    /// Device ICC profile applied to every page.
    pub icc_profile: Option<PathBuf>,
    /// Preferred PCLm strip height in scanlines.
    pub pclm_strip_height: u32,
    /// Compression methods the consumer accepts for PCLm strips.
    pub pclm_compression: Vec<CompressionMethod>,
    /// Resolution declared for PCLm pages; the header resolution otherwise.
    pub pclm_source_resolution: Option<u32>,
    /// Quality (1-100) for DCT compressed strips.
    pub jpeg_quality: u8,
    /// Document title for the /Info dictionary.
    pub title: Option<String>,
    /// Producer string for the /Info dictionary.
    pub producer: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Pdf,
            color_management_disabled: false,
            render_intent: None,
            icc_profile: None,
            pclm_strip_height: DEFAULT_PCLM_STRIP_HEIGHT,
            pclm_compression: vec![CompressionMethod::Flate],
            pclm_source_resolution: None,
            jpeg_quality: 85,
            title: None,
            producer: "rastertopdf".into(),
        }
    }
}

impl EncoderConfig {
    /// Default settings for the given output format.
    pub fn for_format(output_format: OutputFormat) -> Self {
        Self {
            output_format,
            ..Self::default()
        }
    }

    /// Load settings from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the encoder cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.pclm_strip_height == 0 {
            return Err(RasterPdfError::Configuration(
                "PCLm strip height must be at least one line".into(),
            ));
        }
        if self.pclm_compression.is_empty() {
            return Err(RasterPdfError::Configuration(
                "no acceptable PCLm compression method".into(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(RasterPdfError::Configuration(format!(
                "JPEG quality {} outside 1-100",
                self.jpeg_quality
            )));
        }
        if self.pclm_source_resolution == Some(0) {
            return Err(RasterPdfError::Configuration(
                "PCLm source resolution must be positive".into(),
            ));
        }
        Ok(())
    }

    /// The single strip compression method used for the whole document.
    pub fn strip_compression(&self) -> Result<CompressionMethod> {
        CompressionMethod::select(&self.pclm_compression).ok_or_else(|| {
            RasterPdfError::Configuration("no acceptable PCLm compression method".into())
        })
    }
}
