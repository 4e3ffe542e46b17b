// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for raster pages and the documents produced from them.

use serde::{Deserialize, Serialize};

use crate::error::{RasterPdfError, Result};

/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Padding a scanline may carry beyond its pixel data, in bytes.
pub const MAX_LINE_PADDING: u32 = 8;

/// Output document flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One full-page image per page.
    #[default]
    Pdf,
    /// PCLm: pages made of independently compressed horizontal strips.
    Pclm,
}

impl OutputFormat {
    /// MIME type of the produced document.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Pclm => "application/PCLm",
        }
    }
}

/// PCLm strip compression methods.
///
/// The declaration order is the ordinal used when picking one method out of
/// the acceptable set: the highest ordinal wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMethod {
    /// JPEG baseline (`/DCTDecode`).
    Dct,
    /// zlib deflate (`/FlateDecode`).
    Flate,
    /// PackBits style run-length coding (`/RunLengthDecode`).
    Rle,
}

impl CompressionMethod {
    /// Parse an IPP/PPD keyword such as `jpeg`, `flate` or `rle`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "dct" => Some(Self::Dct),
            "flate" | "deflate" => Some(Self::Flate),
            "rle" => Some(Self::Rle),
            _ => None,
        }
    }

    /// Name of the PDF filter that decodes this method.
    pub fn pdf_filter(&self) -> &'static str {
        match self {
            Self::Dct => "DCTDecode",
            Self::Flate => "FlateDecode",
            Self::Rle => "RunLengthDecode",
        }
    }

    /// Pick the method used for a whole document from the acceptable set.
    ///
    /// Returns `None` for an empty set.
    pub fn select(acceptable: &[CompressionMethod]) -> Option<Self> {
        acceptable.iter().copied().max()
    }
}

/// Byte order of multi-byte fields and samples in a raster stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

/// Color model of an output image: the number and meaning of its channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorModel {
    Gray,
    Rgb,
    Cmyk,
}

impl ColorModel {
    /// Number of channels per pixel.
    pub fn channels(&self) -> u32 {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
            Self::Cmyk => 4,
        }
    }

    /// Name of the matching PDF device color space.
    pub fn device_space(&self) -> &'static str {
        match self {
            Self::Gray => "DeviceGray",
            Self::Rgb => "DeviceRGB",
            Self::Cmyk => "DeviceCMYK",
        }
    }
}

/// Color space declared by a raster page header (`cupsColorSpace`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RasterColorSpace {
    /// Luminance, 0 = black.
    White,
    Rgb,
    Rgba,
    /// Black ink, 0 = no ink.
    Black,
    Cmy,
    Ymc,
    Cmyk,
    Ymck,
    Kcmy,
    KcmyCm,
    Gmck,
    Gmcs,
    WhiteInk,
    Gold,
    Silver,
    CieXyz,
    CieLab,
    Rgbw,
    /// sGray luminance.
    SGray,
    SRgb,
    AdobeRgb,
    /// ICC-tagged color with the given number of colorants (1..=15).
    Icc(u8),
    /// Device-N color with the given number of colorants (1..=15).
    DeviceN(u8),
    /// A code this filter does not know.
    Other(u32),
}

impl RasterColorSpace {
    /// Decode the numeric `cupsColorSpace` field.
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::White,
            1 => Self::Rgb,
            2 => Self::Rgba,
            3 => Self::Black,
            4 => Self::Cmy,
            5 => Self::Ymc,
            6 => Self::Cmyk,
            7 => Self::Ymck,
            8 => Self::Kcmy,
            9 => Self::KcmyCm,
            10 => Self::Gmck,
            11 => Self::Gmcs,
            12 => Self::WhiteInk,
            13 => Self::Gold,
            14 => Self::Silver,
            15 => Self::CieXyz,
            16 => Self::CieLab,
            17 => Self::Rgbw,
            18 => Self::SGray,
            19 => Self::SRgb,
            20 => Self::AdobeRgb,
            32..=46 => Self::Icc((code - 31) as u8),
            48..=62 => Self::DeviceN((code - 47) as u8),
            other => Self::Other(other),
        }
    }

    /// Encode back to the numeric `cupsColorSpace` field.
    pub fn code(&self) -> u32 {
        match self {
            Self::White => 0,
            Self::Rgb => 1,
            Self::Rgba => 2,
            Self::Black => 3,
            Self::Cmy => 4,
            Self::Ymc => 5,
            Self::Cmyk => 6,
            Self::Ymck => 7,
            Self::Kcmy => 8,
            Self::KcmyCm => 9,
            Self::Gmck => 10,
            Self::Gmcs => 11,
            Self::WhiteInk => 12,
            Self::Gold => 13,
            Self::Silver => 14,
            Self::CieXyz => 15,
            Self::CieLab => 16,
            Self::Rgbw => 17,
            Self::SGray => 18,
            Self::SRgb => 19,
            Self::AdobeRgb => 20,
            Self::Icc(n) => 31 + u32::from(*n),
            Self::DeviceN(n) => 47 + u32::from(*n),
            Self::Other(code) => *code,
        }
    }

    /// Single-channel space whose samples count ink rather than light.
    ///
    /// PDF gray is additive (0 = black), so these samples are inverted.
    pub fn is_ink_referenced(&self) -> bool {
        matches!(self, Self::Black)
    }

    /// The Gray/RGB/CMYK family this space belongs to, if any.
    ///
    /// Device-N variants fold into CMYK.
    pub fn model(&self) -> Option<ColorModel> {
        match self {
            Self::White | Self::Black | Self::SGray | Self::Icc(1) => Some(ColorModel::Gray),
            Self::Rgb | Self::SRgb | Self::AdobeRgb | Self::Icc(3) => Some(ColorModel::Rgb),
            Self::Cmyk | Self::Icc(4) | Self::DeviceN(_) => Some(ColorModel::Cmyk),
            _ => None,
        }
    }

    /// Number of colorants carried per pixel for chunky data.
    pub fn channels(&self) -> Option<u32> {
        match self {
            Self::White
            | Self::Black
            | Self::SGray
            | Self::WhiteInk
            | Self::Gold
            | Self::Silver => Some(1),
            Self::Rgb | Self::SRgb | Self::AdobeRgb | Self::Cmy | Self::Ymc => Some(3),
            Self::CieXyz | Self::CieLab => Some(3),
            Self::Rgba | Self::Rgbw | Self::Cmyk | Self::Ymck | Self::Kcmy | Self::Gmck => {
                Some(4)
            }
            Self::Gmcs => Some(4),
            Self::KcmyCm => Some(6),
            Self::Icc(n) | Self::DeviceN(n) => Some(u32::from(*n)),
            Self::Other(_) => None,
        }
    }

    /// True for spaces where all-ones samples mean "white".
    pub fn is_additive(&self) -> bool {
        matches!(
            self,
            Self::White
                | Self::Rgb
                | Self::Rgba
                | Self::Rgbw
                | Self::SGray
                | Self::SRgb
                | Self::AdobeRgb
        )
    }
}

/// Rendering intent requested for a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderIntent {
    /// No intent requested.
    #[default]
    Unspecified,
    Perceptual,
    Relative,
    /// Relative colorimetric with black point compensation.
    RelativeBpc,
    Absolute,
    Saturation,
}

impl RenderIntent {
    /// Parse the `cupsRenderingIntent` string. Unknown strings are unspecified.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim() {
            "Perceptual" => Self::Perceptual,
            "Relative" => Self::Relative,
            "RelativeBpc" => Self::RelativeBpc,
            "Absolute" => Self::Absolute,
            "Saturation" => Self::Saturation,
            _ => Self::Unspecified,
        }
    }

    /// The keyword written back into a raster header.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Unspecified => "",
            Self::Perceptual => "Perceptual",
            Self::Relative => "Relative",
            Self::RelativeBpc => "RelativeBpc",
            Self::Absolute => "Absolute",
            Self::Saturation => "Saturation",
        }
    }

    /// Value of the image `/Intent` entry.
    pub fn pdf_name(&self) -> Option<&'static str> {
        match self {
            Self::Unspecified => None,
            Self::Perceptual => Some("Perceptual"),
            Self::Relative | Self::RelativeBpc => Some("RelativeColorimetric"),
            Self::Absolute => Some("AbsoluteColorimetric"),
            Self::Saturation => Some("Saturation"),
        }
    }

    pub fn black_point_compensation(&self) -> bool {
        matches!(self, Self::RelativeBpc)
    }
}

/// Geometry and color description of one raster page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterPageHeader {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels (scanlines).
    pub height: u32,
    pub bits_per_pixel: u32,
    pub bits_per_component: u32,
    pub bytes_per_line: u32,
    pub color_space: RasterColorSpace,
    /// `cupsColorOrder`: 0 chunky, 1 banded, 2 planar.
    pub color_order: u32,
    pub render_intent: RenderIntent,
    /// Horizontal and vertical resolution in dots per inch.
    pub resolution: [u32; 2],
    /// Media size in points as declared by the producer.
    pub page_size: [u32; 2],
    pub page_size_name: String,
}

impl RasterPageHeader {
    /// Header for a chunky page with tightly packed scanlines.
    pub fn new(
        width: u32,
        height: u32,
        color_space: RasterColorSpace,
        bits_per_component: u32,
        resolution: u32,
    ) -> Self {
        let channels = color_space.channels().unwrap_or(1);
        let bits_per_pixel = channels * bits_per_component;
        let bytes_per_line = (width * bits_per_pixel).div_ceil(8);
        let to_points = |pixels: u32| pixels * 72 / resolution.max(1);
        Self {
            width,
            height,
            bits_per_pixel,
            bits_per_component,
            bytes_per_line,
            color_space,
            color_order: 0,
            render_intent: RenderIntent::Unspecified,
            resolution: [resolution, resolution],
            page_size: [to_points(width), to_points(height)],
            page_size_name: String::new(),
        }
    }

    /// Number of samples per pixel.
    pub fn channels(&self) -> u32 {
        self.bits_per_pixel / self.bits_per_component.max(1)
    }

    /// Bytes per pixel as used by the v2 compression packets (at least one).
    pub fn bytes_per_pixel(&self) -> usize {
        self.bits_per_pixel.div_ceil(8).max(1) as usize
    }

    /// Page width in PDF units at the header's resolution.
    pub fn width_points(&self) -> f32 {
        pixels_to_points(self.width, self.resolution[0])
    }

    /// Page height in PDF units at the header's resolution.
    pub fn height_points(&self) -> f32 {
        pixels_to_points(self.height, self.resolution[1])
    }

    /// Size of the full-page buffer, or an allocation error on overflow.
    pub fn page_buffer_len(&self) -> Result<usize> {
        (self.bytes_per_line as usize)
            .checked_mul(self.height as usize)
            .filter(|len| *len <= isize::MAX as usize)
            .ok_or(RasterPdfError::Allocation {
                bytes_per_line: self.bytes_per_line,
                height: self.height,
            })
    }

    /// A zeroed buffer for one raw scanline, or an allocation error.
    pub fn scanline_buffer(&self) -> Result<Vec<u8>> {
        let len = self.bytes_per_line as usize;
        let mut line = Vec::new();
        line.try_reserve_exact(len)
            .map_err(|_| RasterPdfError::Allocation {
                bytes_per_line: self.bytes_per_line,
                height: 1,
            })?;
        line.resize(len, 0);
        Ok(line)
    }

    /// Check that the header describes a page this filter can lay out.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterPdfError::InvalidRaster(format!(
                "empty page geometry {}x{}",
                self.width, self.height
            )));
        }
        if !matches!(self.bits_per_component, 1 | 2 | 4 | 8 | 16) {
            return Err(RasterPdfError::InvalidRaster(format!(
                "unsupported bits per color {}",
                self.bits_per_component
            )));
        }
        if self.bits_per_pixel == 0 || self.bits_per_pixel % self.bits_per_component != 0 {
            return Err(RasterPdfError::InvalidRaster(format!(
                "bits per pixel {} is not a multiple of bits per color {}",
                self.bits_per_pixel, self.bits_per_component
            )));
        }
        let min_line = (u64::from(self.width) * u64::from(self.bits_per_pixel)).div_ceil(8);
        if u64::from(self.bytes_per_line) < min_line {
            return Err(RasterPdfError::InvalidRaster(format!(
                "bytes per line {} too small for {} pixels at {} bits",
                self.bytes_per_line, self.width, self.bits_per_pixel
            )));
        }
        if u64::from(self.bytes_per_line) > min_line + u64::from(MAX_LINE_PADDING) {
            return Err(RasterPdfError::InvalidRaster(format!(
                "bytes per line {} too large for {} pixels at {} bits",
                self.bytes_per_line, self.width, self.bits_per_pixel
            )));
        }
        if self.color_order != 0 {
            return Err(RasterPdfError::InvalidRaster(format!(
                "color order {} is not supported, only chunky pixels",
                self.color_order
            )));
        }
        if self.resolution[0] == 0 || self.resolution[1] == 0 {
            return Err(RasterPdfError::InvalidRaster("zero resolution".into()));
        }
        Ok(())
    }
}

/// Convert a pixel count at `dpi` into PDF units.
pub fn pixels_to_points(pixels: u32, dpi: u32) -> f32 {
    pixels as f32 / dpi.max(1) as f32 * POINTS_PER_INCH
}
