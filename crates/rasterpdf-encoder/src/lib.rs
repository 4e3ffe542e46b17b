// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rasterpdf-encoder — Raster stream to PDF / PCLm document encoder.
//
// Reads CUPS/PWG raster pages, converts their pixels to the document's color
// space (optionally through Little CMS), and writes either a PDF with one
// image per page or a PCLm document made of compressed strips.

pub mod color;
pub mod encoder;
pub mod page;
pub mod pclm;
pub mod pdf;
pub mod raster;
pub mod sink;

// Re-export the primary structs so callers can use `rasterpdf_encoder::RasterEncoder` etc.
pub use color::{ColorProfile, ConversionPlan, PixelTransform};
pub use encoder::RasterEncoder;
pub use pdf::{DocumentInfo, DocumentWriter};
pub use raster::{RasterReader, RasterWriter};
