// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PCLm strip geometry and the page content stream that places the strips.

use std::fmt::Write as _;

use rasterpdf_core::{CompressionMethod, POINTS_PER_INCH};

use crate::pdf::format_number;

/// One compressed horizontal slice of a page.
#[derive(Debug, Clone)]
pub struct StripDescriptor {
    /// Scanlines in this strip.
    pub height: u32,
    pub data: Vec<u8>,
    pub method: CompressionMethod,
}

/// Heights of the strips covering `page_height` lines, top to bottom.
///
/// All strips are `preferred` high except the last, which takes the rest.
pub fn strip_heights(page_height: u32, preferred: u32) -> Vec<u32> {
    let preferred = preferred.max(1);
    let count = page_height.div_ceil(preferred);
    (0..count)
        .map(|i| preferred.min(page_height - i * preferred))
        .collect()
}

/// Bottom edge of each strip in page pixels, counting up from the page's
/// bottom edge.
pub fn strip_offsets(page_height: u32, heights: &[u32]) -> Vec<u32> {
    let mut anchor = page_height;
    heights
        .iter()
        .map(|height| {
            anchor = anchor.saturating_sub(*height);
            anchor
        })
        .collect()
}

/// Size of one device pixel in PDF units. The content stream scale and the
/// MediaBox are both derived from this value.
pub fn points_per_pixel(resolution: u32) -> f32 {
    POINTS_PER_INCH / resolution.max(1) as f32
}

/// XObject name of strip `index`.
pub fn strip_name(index: usize) -> String {
    format!("Image{index}")
}

/// Content stream for a PCLm page: scale pixels to points once, then place
/// each strip in its own marked-content block.
pub fn page_content(resolution: u32, width: u32, page_height: u32, heights: &[u32]) -> Vec<u8> {
    let scale = format_number(points_per_pixel(resolution));
    let mut content = format!("{scale} 0 0 {scale} 0 0 cm\n");
    for (index, (height, y)) in heights
        .iter()
        .zip(strip_offsets(page_height, heights))
        .enumerate()
    {
        let _ = write!(
            content,
            "/P <</MCID 0>> BDC q\n{width} 0 0 {height} 0 {y} cm\n/{} Do Q\nEMC\n",
            strip_name(index)
        );
    }
    content.into_bytes()
}
