// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Color-space resolution.
//
// Given a page header, the job's color settings and the signature of the
// device profile (if any), decide how each scanline is converted and which
// PDF color space the resulting image declares. Nothing here touches pixel
// data or the color-management engine, so every decision is made before a
// page is opened.

use rasterpdf_core::error::{RasterPdfError, Result};
use rasterpdf_core::{ColorModel, OutputFormat, RasterColorSpace, RasterPageHeader, RenderIntent};
use tracing::debug;

use super::cms::ProfileSignature;
use super::convert::PixelTransform;

/// Which document-level profile an `ICCBased` space refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileRole {
    /// The device profile supplied by the job.
    Device,
    /// A standard profile describing the raster data (sRGB).
    Source,
}

/// Color space declared on an image XObject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PdfColorSpace {
    Device(ColorModel),
    IccBased { role: ProfileRole, model: ColorModel },
    /// sGray as CalGray.
    CalGray { black_point: bool },
    /// Adobe RGB as CalRGB.
    AdobeRgb { black_point: bool },
    /// CIE XYZ as an identity CalRGB.
    CieXyz { black_point: bool },
    CieLab,
}

impl PdfColorSpace {
    /// Components per pixel in the image stream.
    pub fn channels(&self) -> u32 {
        match self {
            Self::Device(model) | Self::IccBased { model, .. } => model.channels(),
            Self::CalGray { .. } => 1,
            Self::AdobeRgb { .. } | Self::CieXyz { .. } | Self::CieLab => 3,
        }
    }

    /// The closest device space; PCLm only allows these.
    pub fn device_model(&self) -> ColorModel {
        match self {
            Self::Device(model) | Self::IccBased { model, .. } => *model,
            Self::CalGray { .. } => ColorModel::Gray,
            Self::AdobeRgb { .. } | Self::CieXyz { .. } | Self::CieLab => ColorModel::Rgb,
        }
    }
}

/// How the model-change stage of a plan is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorStep {
    Pixel(PixelTransform),
    /// Through the color-management engine, from the standard profile of
    /// `from` into the device profile.
    Managed { from: ColorModel, to: ColorModel },
}

/// Job-wide inputs to resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    pub output_format: OutputFormat,
    pub color_management_disabled: bool,
    /// Signature of the device profile, when one is configured.
    pub device_profile: Option<ProfileSignature>,
    /// Whether an sRGB profile is available for embedding.
    pub srgb_available: bool,
}

/// Everything decided for one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorResolution {
    pub bit_step: PixelTransform,
    pub color_step: ColorStep,
    pub color_space: PdfColorSpace,
    pub bits_per_component: u32,
    /// Value for the image `/Intent` entry.
    pub intent: Option<&'static str>,
}

impl ColorResolution {
    pub fn output_channels(&self) -> u32 {
        self.color_space.channels()
    }
}

fn unsupported(header: &RasterPageHeader, why: &str) -> RasterPdfError {
    RasterPdfError::Configuration(format!(
        "{:?} at {} bits per component: {why}",
        header.color_space, header.bits_per_component
    ))
}

/// Resolve the conversion and declared color space for a page.
pub fn resolve(
    header: &RasterPageHeader,
    intent: RenderIntent,
    options: &ResolveOptions,
) -> Result<ColorResolution> {
    let space = header.color_space;
    let channels = space
        .channels()
        .ok_or_else(|| unsupported(header, "unknown color space"))?;
    if channels != header.channels() {
        return Err(unsupported(
            header,
            &format!(
                "{} bits per pixel do not carry {channels} colorants",
                header.bits_per_pixel
            ),
        ));
    }

    let bit_step = if space.is_ink_referenced() {
        PixelTransform::Invert
    } else {
        PixelTransform::Identity
    };
    let identity = ColorStep::Pixel(PixelTransform::Identity);
    let black_point = intent.black_point_compensation();

    let (color_step, color_space) = if options.color_management_disabled {
        let model = match space {
            RasterColorSpace::CieLab | RasterColorSpace::CieXyz => ColorModel::Rgb,
            _ => space
                .model()
                .ok_or_else(|| unsupported(header, "no device color space"))?,
        };
        (identity, PdfColorSpace::Device(model))
    } else if let Some(signature) = options.device_profile {
        let to = signature.model().ok_or_else(|| {
            RasterPdfError::Configuration(format!(
                "{signature:?} profiles are not supported, only Gray, RGB and CMYK"
            ))
        })?;
        let from = space
            .model()
            .ok_or_else(|| unsupported(header, &format!("cannot convert to a {to:?} profile")))?;
        if from.channels() != channels {
            return Err(unsupported(
                header,
                &format!("{channels} colorants are not {from:?} data"),
            ));
        }
        if from != to && header.bits_per_component != 8 {
            return Err(unsupported(
                header,
                &format!("conversion to a {to:?} profile needs 8 bits per component"),
            ));
        }
        let step = if from == to {
            identity
        } else if matches!(from, ColorModel::Gray | ColorModel::Rgb) {
            ColorStep::Managed { from, to }
        } else {
            ColorStep::Pixel(PixelTransform::between(from, to))
        };
        (
            step,
            PdfColorSpace::IccBased {
                role: ProfileRole::Device,
                model: to,
            },
        )
    } else {
        let declared = match space {
            RasterColorSpace::White | RasterColorSpace::Black | RasterColorSpace::Icc(1) => {
                PdfColorSpace::Device(ColorModel::Gray)
            }
            RasterColorSpace::SGray => PdfColorSpace::CalGray { black_point },
            RasterColorSpace::Rgb | RasterColorSpace::Icc(3) => {
                PdfColorSpace::Device(ColorModel::Rgb)
            }
            RasterColorSpace::SRgb if options.srgb_available => PdfColorSpace::IccBased {
                role: ProfileRole::Source,
                model: ColorModel::Rgb,
            },
            RasterColorSpace::SRgb => PdfColorSpace::Device(ColorModel::Rgb),
            RasterColorSpace::AdobeRgb => PdfColorSpace::AdobeRgb { black_point },
            RasterColorSpace::Cmyk | RasterColorSpace::DeviceN(_) | RasterColorSpace::Icc(4) => {
                PdfColorSpace::Device(ColorModel::Cmyk)
            }
            RasterColorSpace::CieLab => PdfColorSpace::CieLab,
            RasterColorSpace::CieXyz => PdfColorSpace::CieXyz { black_point },
            _ => return Err(unsupported(header, "no calibrated equivalent")),
        };
        (identity, declared)
    };

    if color_space.channels() != header.channels() && color_step == identity {
        return Err(unsupported(
            header,
            &format!(
                "{} colorants cannot be declared as {:?}",
                header.channels(),
                color_space
            ),
        ));
    }

    let color_space = if options.output_format == OutputFormat::Pclm {
        if header.bits_per_component != 8 {
            return Err(unsupported(header, "PCLm needs 8 bits per component"));
        }
        let model = color_space.device_model();
        if model == ColorModel::Cmyk {
            return Err(unsupported(header, "PCLm only carries Gray or RGB"));
        }
        PdfColorSpace::Device(model)
    } else {
        color_space
    };

    let intent_name = if options.color_management_disabled {
        None
    } else {
        intent.pdf_name()
    };

    debug!(
        color_space = ?color_space,
        color_step = ?color_step,
        bit_step = ?bit_step,
        "resolved page color"
    );
    Ok(ColorResolution {
        bit_step,
        color_step,
        color_space,
        bits_per_component: header.bits_per_component,
        intent: intent_name,
    })
}
