// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanline conversion engine.
//
// A page's scanlines all go through one `ConversionPlan`: an optional bit
// inversion followed by an optional color-model change. Model changes work on
// 8-bit samples only; other depths are copied or inverted byte-wise.

use rasterpdf_core::error::{RasterPdfError, Result};
use rasterpdf_core::{ColorModel, RasterPageHeader};

use super::cms::ManagedTransform;

/// Closed set of per-pixel transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelTransform {
    Identity,
    /// Flip every bit (ink-referenced to light-referenced).
    Invert,
    GrayToRgb,
    RgbToGray,
    CmykToRgb,
    RgbToCmyk,
    CmykToGray,
    GrayToCmyk,
}

impl PixelTransform {
    /// The transform from one color model to another.
    pub fn between(from: ColorModel, to: ColorModel) -> Self {
        match (from, to) {
            (ColorModel::Gray, ColorModel::Rgb) => Self::GrayToRgb,
            (ColorModel::Gray, ColorModel::Cmyk) => Self::GrayToCmyk,
            (ColorModel::Rgb, ColorModel::Gray) => Self::RgbToGray,
            (ColorModel::Rgb, ColorModel::Cmyk) => Self::RgbToCmyk,
            (ColorModel::Cmyk, ColorModel::Gray) => Self::CmykToGray,
            (ColorModel::Cmyk, ColorModel::Rgb) => Self::CmykToRgb,
            _ => Self::Identity,
        }
    }

    /// Whether this transform changes the number of channels.
    pub fn changes_model(&self) -> bool {
        !matches!(self, Self::Identity | Self::Invert)
    }

    /// Apply to a run of pixels. `src` and `dst` must hold the same number of
    /// pixels in their respective models; byte-wise transforms use the
    /// shorter of the two lengths.
    pub fn apply(&self, src: &[u8], dst: &mut [u8]) {
        match self {
            Self::Identity => {
                let len = src.len().min(dst.len());
                dst[..len].copy_from_slice(&src[..len]);
            }
            Self::Invert => {
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = !*s;
                }
            }
            Self::GrayToRgb => {
                for (d, s) in dst.chunks_exact_mut(3).zip(src) {
                    d.fill(*s);
                }
            }
            Self::RgbToGray => {
                for (d, s) in dst.iter_mut().zip(src.chunks_exact(3)) {
                    *d = luminance(s[0], s[1], s[2]);
                }
            }
            Self::CmykToRgb => {
                for (d, s) in dst.chunks_exact_mut(3).zip(src.chunks_exact(4)) {
                    let k = s[3];
                    d[0] = 255u8.saturating_sub(s[0]).saturating_sub(k);
                    d[1] = 255u8.saturating_sub(s[1]).saturating_sub(k);
                    d[2] = 255u8.saturating_sub(s[2]).saturating_sub(k);
                }
            }
            Self::RgbToCmyk => {
                for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(3)) {
                    let (c, m, y) = (255 - s[0], 255 - s[1], 255 - s[2]);
                    let k = c.min(m).min(y);
                    d.copy_from_slice(&[c - k, m - k, y - k, k]);
                }
            }
            Self::CmykToGray => {
                for (d, s) in dst.iter_mut().zip(src.chunks_exact(4)) {
                    *d = 255u8
                        .saturating_sub(luminance(s[0], s[1], s[2]))
                        .saturating_sub(s[3]);
                }
            }
            Self::GrayToCmyk => {
                for (d, s) in dst.chunks_exact_mut(4).zip(src) {
                    d.copy_from_slice(&[0, 0, 0, 255 - *s]);
                }
            }
        }
    }
}

/// Weighted sum used for all gray reductions (31/61/8 percent).
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 31 + u32::from(g) * 61 + u32::from(b) * 8) / 100) as u8
}

/// The model-change stage of a plan.
pub enum ColorStage {
    Pixel(PixelTransform),
    /// ICC transform through the color-management engine.
    Managed(ManagedTransform),
}

impl std::fmt::Debug for ColorStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pixel(transform) => write!(f, "Pixel({transform:?})"),
            Self::Managed(_) => f.write_str("Managed"),
        }
    }
}

/// Conversion chosen once per page and applied to each of its scanlines.
#[derive(Debug)]
pub struct ConversionPlan {
    bit_step: PixelTransform,
    color_stage: ColorStage,
    /// Bytes of real pixel data at the start of each raster line.
    input_len: usize,
    output_len: usize,
    /// Holds the inverted line between the two stages.
    scratch: Vec<u8>,
}

impl ConversionPlan {
    /// Build a plan for `header` producing `output_channels` samples per
    /// pixel.
    pub fn new(
        header: &RasterPageHeader,
        bit_step: PixelTransform,
        color_stage: ColorStage,
        output_channels: u32,
    ) -> Result<Self> {
        if !matches!(bit_step, PixelTransform::Identity | PixelTransform::Invert) {
            return Err(RasterPdfError::InvariantViolation(format!(
                "{bit_step:?} is not a bit-level transform"
            )));
        }
        let changes_model = match &color_stage {
            ColorStage::Pixel(transform) => transform.changes_model(),
            ColorStage::Managed(_) => true,
        };
        if changes_model && header.bits_per_component != 8 {
            return Err(RasterPdfError::Configuration(format!(
                "color model change needs 8 bits per component, page has {}",
                header.bits_per_component
            )));
        }

        let width = u64::from(header.width);
        let bpc = u64::from(header.bits_per_component);
        let input_len = (width * u64::from(header.bits_per_pixel)).div_ceil(8) as usize;
        let output_len = (width * u64::from(output_channels) * bpc).div_ceil(8) as usize;
        let scratch = if bit_step == PixelTransform::Invert {
            vec![0u8; input_len]
        } else {
            Vec::new()
        };

        Ok(Self {
            bit_step,
            color_stage,
            input_len,
            output_len,
            scratch,
        })
    }

    /// Length of one converted line. Raster line padding is not carried over.
    pub fn output_line_len(&self) -> usize {
        self.output_len
    }

    /// Convert one raster line into `dst`.
    pub fn convert_line(&mut self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        if src.len() < self.input_len || dst.len() < self.output_len {
            return Err(RasterPdfError::InvariantViolation(format!(
                "scanline of {} bytes into {} bytes, plan needs {} into {}",
                src.len(),
                dst.len(),
                self.input_len,
                self.output_len
            )));
        }
        let mut line = &src[..self.input_len];
        if self.bit_step == PixelTransform::Invert {
            PixelTransform::Invert.apply(line, &mut self.scratch);
            line = &self.scratch;
        }
        let dst = &mut dst[..self.output_len];
        match &self.color_stage {
            ColorStage::Pixel(transform) => transform.apply(line, dst),
            ColorStage::Managed(transform) => transform.apply(line, dst),
        }
        Ok(())
    }
}
