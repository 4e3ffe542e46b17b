// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable diagnostics for failed print jobs.
//
// Every technical error is mapped to a one-line explanation plus a hint about
// what to change. The filter prints these on stderr before exiting non-zero.

use crate::error::RasterPdfError;

/// Who has to act for the job to succeed next time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The queue or job options ask for something the filter cannot produce.
    Configuration,
    /// The incoming raster data is broken or truncated.
    Input,
    /// The output could not be written.
    Output,
    /// A bug in the filter.
    Internal,
}

/// A diagnostic with a summary and an actionable hint.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `RasterPdfError` into a `HumanError`.
pub fn humanize_error(err: &RasterPdfError) -> HumanError {
    match err {
        RasterPdfError::Configuration(detail) => HumanError {
            message: format!("The print job settings are not supported: {detail}."),
            suggestion: "Pick a different color mode, bit depth or color profile for this queue."
                .into(),
            severity: Severity::Configuration,
        },

        RasterPdfError::ColorManagement(detail) => HumanError {
            message: format!("The color profile could not be used: {detail}."),
            suggestion: "Check that the ICC profile file is readable and describes a Gray, RGB or CMYK device, or disable color management.".into(),
            severity: Severity::Configuration,
        },

        RasterPdfError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::UnexpectedEof => HumanError {
                message: "The raster data ended in the middle of a page.".into(),
                suggestion: "The rendering stage before this filter probably crashed; check its log.".into(),
                severity: Severity::Input,
            },
            std::io::ErrorKind::NotFound => HumanError {
                message: "A file needed by the job could not be found.".into(),
                suggestion: format!("Check the input and profile paths. ({io_err})"),
                severity: Severity::Configuration,
            },
            std::io::ErrorKind::BrokenPipe => HumanError {
                message: "The next stage stopped reading the document.".into(),
                suggestion: "The job was probably cancelled downstream.".into(),
                severity: Severity::Output,
            },
            _ => HumanError {
                message: "Reading or writing the document failed.".into(),
                suggestion: format!("Check free disk space and permissions. ({io_err})"),
                severity: Severity::Output,
            },
        },

        RasterPdfError::InvalidRaster(detail) => HumanError {
            message: format!("The raster data is not valid: {detail}."),
            suggestion: "Make sure the previous filter produces CUPS or PWG raster.".into(),
            severity: Severity::Input,
        },

        RasterPdfError::Allocation {
            bytes_per_line,
            height,
        } => HumanError {
            message: format!(
                "A page of {bytes_per_line} bytes per line and {height} lines is too large to hold in memory."
            ),
            suggestion: "Lower the print resolution or the paper size.".into(),
            severity: Severity::Input,
        },

        RasterPdfError::Pdf(_) | RasterPdfError::Compression(_) => HumanError {
            message: "The output document could not be assembled.".into(),
            suggestion: "Try another PCLm compression method or plain PDF output.".into(),
            severity: Severity::Output,
        },

        RasterPdfError::Serialization(_) => HumanError {
            message: "The encoder configuration file could not be read.".into(),
            suggestion: "Fix the JSON syntax in the configuration file.".into(),
            severity: Severity::Configuration,
        },

        RasterPdfError::InvariantViolation(detail) => HumanError {
            message: format!("Internal error: {detail}."),
            suggestion: "Please report this together with the job's raster data.".into(),
            severity: Severity::Internal,
        },
    }
}
