// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the raster-to-PDF filter.

use thiserror::Error;

/// Top-level error type for all encoder operations.
#[derive(Debug, Error)]
pub enum RasterPdfError {
    // -- Setup errors (detected before any pixel is processed) --
    #[error("unsupported configuration: {0}")]
    Configuration(String),

    #[error("color management failed: {0}")]
    ColorManagement(String),

    // -- Input / output --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid raster stream: {0}")]
    InvalidRaster(String),

    #[error("page buffer of {bytes_per_line} bytes x {height} lines does not fit in memory")]
    Allocation { bytes_per_line: u32, height: u32 },

    // -- Document construction --
    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("strip compression failed: {0}")]
    Compression(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Programming defects --
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

impl RasterPdfError {
    /// True for errors caused by the job's settings rather than its data.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::ColorManagement(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RasterPdfError>;
