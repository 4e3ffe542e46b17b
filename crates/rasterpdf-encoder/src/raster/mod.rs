// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CUPS / PWG raster stream input.

pub mod header;
pub mod reader;
pub mod writer;

pub use reader::RasterReader;
pub use writer::RasterWriter;
