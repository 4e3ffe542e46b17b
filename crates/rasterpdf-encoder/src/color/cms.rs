// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Adapter over Little CMS (`lcms2`): loading and synthesizing ICC profiles,
// reading their color space signature, and running 8-bit transforms between
// Gray, RGB and CMYK.

use std::path::Path;

use lcms2::{CIExyY, ColorSpaceSignature, Intent, PixelFormat, Profile, ToneCurve, Transform};
use rasterpdf_core::error::{RasterPdfError, Result};
use rasterpdf_core::{ColorModel, RenderIntent};
use tracing::debug;

/// D65 in xyY, as used for every synthesized profile.
const D65: CIExyY = CIExyY {
    x: 0.3127,
    y: 0.3290,
    Y: 1.0,
};

const SGRAY_GAMMA: f64 = 2.2;

/// Data color space a profile describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSignature {
    Gray,
    Rgb,
    Cmyk,
    Lab,
    Xyz,
    /// Any other signature (Luv, YCbCr, n-color...).
    Other,
}

impl ProfileSignature {
    /// The output color model a profile with this signature drives.
    pub fn model(&self) -> Option<ColorModel> {
        match self {
            Self::Gray => Some(ColorModel::Gray),
            Self::Rgb => Some(ColorModel::Rgb),
            Self::Cmyk => Some(ColorModel::Cmyk),
            Self::Lab | Self::Xyz | Self::Other => None,
        }
    }
}

impl From<ColorSpaceSignature> for ProfileSignature {
    fn from(signature: ColorSpaceSignature) -> Self {
        match signature {
            ColorSpaceSignature::GrayData => Self::Gray,
            ColorSpaceSignature::RgbData => Self::Rgb,
            ColorSpaceSignature::CmykData => Self::Cmyk,
            ColorSpaceSignature::LabData => Self::Lab,
            ColorSpaceSignature::XYZData => Self::Xyz,
            _ => Self::Other,
        }
    }
}

fn cms_error(context: &str, err: lcms2::Error) -> RasterPdfError {
    RasterPdfError::ColorManagement(format!("{context}: {err}"))
}

/// An owned ICC profile together with its serialized bytes.
pub struct ColorProfile {
    profile: Profile,
    signature: ProfileSignature,
    icc: Vec<u8>,
}

impl std::fmt::Debug for ColorProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorProfile")
            .field("signature", &self.signature)
            .field("icc_len", &self.icc.len())
            .finish()
    }
}

impl ColorProfile {
    /// Parse a profile from ICC bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let profile = Profile::new_icc(bytes).map_err(|e| cms_error("unreadable ICC profile", e))?;
        let signature = ProfileSignature::from(profile.color_space());
        debug!(?signature, bytes = bytes.len(), "loaded ICC profile");
        Ok(Self {
            profile,
            signature,
            icc: bytes.to_vec(),
        })
    }

    /// Read and parse a profile file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// The built-in sRGB profile.
    pub fn srgb() -> Result<Self> {
        Self::synthesized(Profile::new_srgb())
    }

    /// A D65, gamma 2.2 gray profile (sGray).
    pub fn sgray() -> Result<Self> {
        let curve = ToneCurve::new(SGRAY_GAMMA);
        let profile =
            Profile::new_gray(&D65, &curve).map_err(|e| cms_error("sGray synthesis failed", e))?;
        Self::synthesized(profile)
    }

    /// Standard source profile for 8-bit data in `model`, if one exists.
    pub fn standard_source(model: ColorModel) -> Option<Result<Self>> {
        match model {
            ColorModel::Gray => Some(Self::sgray()),
            ColorModel::Rgb => Some(Self::srgb()),
            ColorModel::Cmyk => None,
        }
    }

    fn synthesized(profile: Profile) -> Result<Self> {
        let icc = profile
            .icc()
            .map_err(|e| cms_error("profile serialization failed", e))?;
        Ok(Self {
            signature: ProfileSignature::from(profile.color_space()),
            profile,
            icc,
        })
    }

    pub fn signature(&self) -> ProfileSignature {
        self.signature
    }

    /// Serialized profile, as embedded in the document.
    pub fn icc_bytes(&self) -> &[u8] {
        &self.icc
    }
}

fn lcms_intent(intent: RenderIntent) -> Intent {
    match intent {
        RenderIntent::Unspecified | RenderIntent::Perceptual => Intent::Perceptual,
        RenderIntent::Relative | RenderIntent::RelativeBpc => Intent::RelativeColorimetric,
        RenderIntent::Absolute => Intent::AbsoluteColorimetric,
        RenderIntent::Saturation => Intent::Saturation,
    }
}

fn pixel_format(model: ColorModel) -> PixelFormat {
    match model {
        ColorModel::Gray => PixelFormat::GRAY_8,
        ColorModel::Rgb => PixelFormat::RGB_8,
        ColorModel::Cmyk => PixelFormat::CMYK_8,
    }
}

/// Run a typed transform over packed 8-bit pixels.
fn run<const I: usize, const O: usize>(
    transform: &Transform<[u8; I], [u8; O]>,
    src: &[u8],
    dst: &mut [u8],
) {
    let (input, _) = src.as_chunks::<I>();
    let (output, _) = dst.as_chunks_mut::<O>();
    let pixels = input.len().min(output.len());
    transform.transform_pixels(&input[..pixels], &mut output[..pixels]);
}

macro_rules! managed_transforms {
    ($($variant:ident: $from:ident($i:literal) => $to:ident($o:literal)),* $(,)?) => {
        enum Typed {
            $($variant(Transform<[u8; $i], [u8; $o]>),)*
        }

        impl Typed {
            fn build(
                source: &ColorProfile,
                target: &ColorProfile,
                from: ColorModel,
                to: ColorModel,
                intent: Intent,
                black_point_compensation: bool,
            ) -> Result<Self> {
                match (from, to) {
                    $((ColorModel::$from, ColorModel::$to) => {
                        let transform = if black_point_compensation {
                            Transform::new_flags(
                                &source.profile,
                                pixel_format(from),
                                &target.profile,
                                pixel_format(to),
                                intent,
                                lcms2::Flags::BLACKPOINT_COMPENSATION,
                            )
                        } else {
                            Transform::new(
                                &source.profile,
                                pixel_format(from),
                                &target.profile,
                                pixel_format(to),
                                intent,
                            )
                        };
                        transform
                            .map(Self::$variant)
                            .map_err(|e| cms_error("transform creation failed", e))
                    })*
                }
            }

            fn apply(&self, src: &[u8], dst: &mut [u8]) {
                match self {
                    $(Self::$variant(transform) => run(transform, src, dst),)*
                }
            }
        }
    };
}

managed_transforms! {
    GrayToGray: Gray(1) => Gray(1),
    GrayToRgb: Gray(1) => Rgb(3),
    GrayToCmyk: Gray(1) => Cmyk(4),
    RgbToGray: Rgb(3) => Gray(1),
    RgbToRgb: Rgb(3) => Rgb(3),
    RgbToCmyk: Rgb(3) => Cmyk(4),
    CmykToGray: Cmyk(4) => Gray(1),
    CmykToRgb: Cmyk(4) => Rgb(3),
    CmykToCmyk: Cmyk(4) => Cmyk(4),
}

/// An 8-bit transform from a source profile into a device profile.
pub struct ManagedTransform {
    inner: Typed,
}

impl ManagedTransform {
    pub fn new(
        source: &ColorProfile,
        target: &ColorProfile,
        intent: RenderIntent,
    ) -> Result<Self> {
        let (Some(from), Some(to)) = (source.signature.model(), target.signature.model()) else {
            return Err(RasterPdfError::Configuration(format!(
                "cannot transform {:?} data into a {:?} profile",
                source.signature, target.signature
            )));
        };
        debug!(?from, ?to, ?intent, "creating managed transform");
        let inner = Typed::build(
            source,
            target,
            from,
            to,
            lcms_intent(intent),
            intent.black_point_compensation(),
        )?;
        Ok(Self { inner })
    }

    /// Transform packed pixels from `src` into `dst`.
    pub fn apply(&self, src: &[u8], dst: &mut [u8]) {
        self.inner.apply(src, dst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_profiles_report_their_signature() {
        assert_eq!(ColorProfile::srgb().unwrap().signature(), ProfileSignature::Rgb);
        assert_eq!(ColorProfile::sgray().unwrap().signature(), ProfileSignature::Gray);
    }

    #[test]
    fn profile_bytes_round_trip_through_the_parser() {
        let srgb = ColorProfile::srgb().unwrap();
        let reparsed = ColorProfile::from_bytes(srgb.icc_bytes()).unwrap();
        assert_eq!(reparsed.signature(), ProfileSignature::Rgb);
        assert_eq!(reparsed.icc_bytes(), srgb.icc_bytes());
    }

    #[test]
    fn garbage_is_a_color_management_error() {
        let err = ColorProfile::from_bytes(b"definitely not an ICC profile").unwrap_err();
        assert!(matches!(err, RasterPdfError::ColorManagement(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ColorProfile::open(dir.path().join("absent.icc")).unwrap_err();
        assert!(matches!(err, RasterPdfError::Io(_)));
    }

    #[test]
    fn gray_to_srgb_keeps_black_and_white() {
        let source = ColorProfile::sgray().unwrap();
        let target = ColorProfile::srgb().unwrap();
        let transform = ManagedTransform::new(&source, &target, RenderIntent::Perceptual).unwrap();
        let mut rgb = [0u8; 6];
        transform.apply(&[0, 255], &mut rgb);
        assert!(rgb[..3].iter().all(|&v| v <= 3), "{rgb:?}");
        assert!(rgb[3..].iter().all(|&v| v >= 252), "{rgb:?}");
    }
}
