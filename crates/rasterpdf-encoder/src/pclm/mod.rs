// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PCLm strip encoder.

pub mod compress;
pub mod strips;

pub use compress::StripCompressor;
pub use strips::{
    StripDescriptor, page_content, points_per_pixel, strip_heights, strip_name, strip_offsets,
};
