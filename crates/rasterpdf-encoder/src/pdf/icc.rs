// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ICC profile embedding.

use lopdf::{Dictionary, Object, ObjectId};
use rasterpdf_core::ColorModel;

use super::writer::DocumentWriter;
use crate::color::ColorProfile;

/// Write `profile` as an ICC stream with `/N` and `/Alternate` set.
///
/// Returns `None` for profiles that are not Gray, RGB or CMYK.
pub fn embed(writer: &mut DocumentWriter, profile: &ColorProfile) -> Option<ObjectId> {
    let model = profile.signature().model()?;
    let dict = Dictionary::from_iter(vec![
        ("N", Object::Integer(i64::from(model.channels()))),
        ("Alternate", Object::Name(model.device_space().as_bytes().to_vec())),
    ]);
    Some(writer.add_stream(dict, profile.icc_bytes().to_vec()))
}

/// `[/ICCBased ref]`
pub fn icc_based(profile_id: ObjectId) -> Object {
    Object::Array(vec![
        Object::Name(b"ICCBased".to_vec()),
        Object::Reference(profile_id),
    ])
}

/// Device space to fall back on when a profile cannot be embedded.
pub fn device_space(model: ColorModel) -> Object {
    Object::Name(model.device_space().as_bytes().to_vec())
}
