// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rasterpdf — Core types, configuration and error definitions shared by the
// encoder and the command-line filter.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use config::EncoderConfig;
pub use error::{RasterPdfError, Result};
pub use types::*;
