// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Color handling — per-pixel conversion, color-space resolution, calibrated
// color spaces and the Little CMS adapter.

pub mod calibration;
pub mod cms;
pub mod convert;
pub mod resolve;

pub use cms::{ColorProfile, ManagedTransform, ProfileSignature};
pub use convert::{ColorStage, ConversionPlan, PixelTransform};
pub use resolve::{
    ColorResolution, ColorStep, PdfColorSpace, ProfileRole, ResolveOptions, resolve,
};
