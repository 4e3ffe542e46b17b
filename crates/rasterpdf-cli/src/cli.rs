// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and their mapping onto `EncoderConfig`.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use rasterpdf_core::error::Result;
use rasterpdf_core::{CompressionMethod, EncoderConfig, OutputFormat, RenderIntent};

/// Output document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// One image per page
    Pdf,
    /// Strip-based PCLm
    Pclm,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => Self::Pdf,
            FormatArg::Pclm => Self::Pclm,
        }
    }
}

fn parse_compression(value: &str) -> std::result::Result<CompressionMethod, String> {
    CompressionMethod::from_keyword(value)
        .ok_or_else(|| format!("unknown compression `{value}` (expected flate, rle or jpeg)"))
}

fn parse_intent(value: &str) -> std::result::Result<RenderIntent, String> {
    match RenderIntent::from_keyword(value) {
        RenderIntent::Unspecified => Err(format!(
            "unknown rendering intent `{value}` (expected Perceptual, Relative, RelativeBpc, Absolute or Saturation)"
        )),
        intent => Ok(intent),
    }
}

/// Convert a CUPS or PWG raster stream into a PDF or PCLm document.
#[derive(Parser, Debug)]
#[command(name = "rastertopdf")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Raster input file, or "-" for stdin
    pub input: Option<PathBuf>,

    /// Path of the document to write; stdout when absent
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Output document type
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<FormatArg>,

    /// Device ICC profile
    #[arg(short = 'p', long)]
    pub profile: Option<PathBuf>,

    /// Emit device color spaces without calibration
    #[arg(long = "no-color-management", action = ArgAction::SetTrue)]
    pub no_color_management: bool,

    /// Rendering intent overriding the page headers
    #[arg(short = 'i', long, value_parser = parse_intent)]
    pub intent: Option<RenderIntent>,

    /// Preferred PCLm strip height in lines
    #[arg(long = "strip-height")]
    pub strip_height: Option<u32>,

    /// Acceptable PCLm strip compression (flate, rle, jpeg)
    #[arg(short = 'c', long, value_delimiter = ',', value_parser = parse_compression)]
    pub compression: Vec<CompressionMethod>,

    /// JSON configuration file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Document title
    #[arg(short = 't', long)]
    pub title: Option<String>,
}

impl Args {
    /// Build the encoder configuration: file (or defaults), then flags.
    pub fn encoder_config(&self) -> Result<EncoderConfig> {
        let mut config = match &self.config {
            Some(path) => EncoderConfig::load(path)?,
            None => EncoderConfig::default(),
        };
        if let Some(format) = self.format {
            config.output_format = format.into();
        }
        if let Some(profile) = &self.profile {
            config.icc_profile = Some(profile.clone());
        }
        if self.no_color_management {
            config.color_management_disabled = true;
        }
        if self.intent.is_some() {
            config.render_intent = self.intent;
        }
        if let Some(height) = self.strip_height {
            config.pclm_strip_height = height;
        }
        if !self.compression.is_empty() {
            config.pclm_compression = self.compression.clone();
        }
        if let Some(title) = &self.title {
            config.title = Some(title.clone());
        }
        config.validate()?;
        Ok(config)
    }

    /// The input path, `None` for stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|path| path.as_os_str() != "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rasterpdf_core::RasterPdfError;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("rastertopdf").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_read_stdin_and_write_pdf() {
        let args = parse(&[]);
        assert!(args.input_path().is_none());
        assert_eq!(args.encoder_config().unwrap(), EncoderConfig::default());

        let args = parse(&["-"]);
        assert!(args.input_path().is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "--format",
            "pclm",
            "--no-color-management",
            "--intent",
            "RelativeBpc",
            "--strip-height",
            "32",
            "--compression",
            "flate,rle",
            "-c",
            "jpeg",
            "--title",
            "Report",
            "page.ras",
        ]);
        let config = args.encoder_config().unwrap();
        assert_eq!(config.output_format, OutputFormat::Pclm);
        assert!(config.color_management_disabled);
        assert_eq!(config.render_intent, Some(RenderIntent::RelativeBpc));
        assert_eq!(config.pclm_strip_height, 32);
        assert_eq!(
            config.pclm_compression,
            vec![
                CompressionMethod::Flate,
                CompressionMethod::Rle,
                CompressionMethod::Dct
            ]
        );
        assert_eq!(config.title.as_deref(), Some("Report"));
        assert_eq!(args.input_path(), Some(&PathBuf::from("page.ras")));
    }

    #[test]
    fn unknown_keywords_are_rejected() {
        let base = ["rastertopdf"];
        assert!(Args::try_parse_from(base.iter().chain(&["--compression", "lzw"])).is_err());
        assert!(Args::try_parse_from(base.iter().chain(&["--intent", "vivid"])).is_err());
        assert!(Args::try_parse_from(base.iter().chain(&["--format", "tiff"])).is_err());
    }

    #[test]
    fn zero_strip_height_is_a_configuration_error() {
        let err = parse(&["--strip-height", "0"]).encoder_config().unwrap_err();
        assert!(matches!(err, RasterPdfError::Configuration(_)));
    }

    #[test]
    fn config_file_is_overridden_by_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filter.json");
        std::fs::write(
            &path,
            r#"{ "output_format": "pclm", "pclm_strip_height": 64, "title": "From file" }"#,
        )
        .unwrap();

        let args = parse(&["--config", path.to_str().unwrap(), "--title", "From flag"]);
        let config = args.encoder_config().unwrap();
        assert_eq!(config.output_format, OutputFormat::Pclm);
        assert_eq!(config.pclm_strip_height, 64);
        assert_eq!(config.title.as_deref(), Some("From flag"));
    }
}
