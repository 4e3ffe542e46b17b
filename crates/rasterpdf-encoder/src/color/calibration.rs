// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Calibrated (CIE-based, non-ICC) PDF color space arrays.

use lopdf::{Dictionary, Object, dictionary};

/// D65 white point in XYZ.
pub const D65_WHITE_POINT: [f32; 3] = [0.9505, 1.0, 1.0890];

/// Black point written under black point compensation.
pub const DEFAULT_BLACK_POINT: [f32; 3] = [0.0, 0.0, 0.0];

pub const SGRAY_GAMMA: f32 = 2.2;

pub const ADOBE_RGB_GAMMA: [f32; 3] = [2.2, 2.2, 2.2];

/// Adobe RGB (1998) to XYZ, column-major as `/Matrix` expects.
pub const ADOBE_RGB_MATRIX: [f32; 9] = [
    0.6097, 0.3111, 0.0195, 0.2053, 0.6257, 0.0609, 0.1492, 0.0632, 0.7446,
];

const IDENTITY_MATRIX: [f32; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

fn reals(values: &[f32]) -> Object {
    Object::Array(values.iter().copied().map(Object::Real).collect())
}

fn white_and_black(black_point: bool) -> Dictionary {
    let mut dict = dictionary! {
        "WhitePoint" => reals(&D65_WHITE_POINT),
    };
    if black_point {
        dict.set("BlackPoint", reals(&DEFAULT_BLACK_POINT));
    }
    dict
}

/// `[/CalGray << /WhitePoint D65 /Gamma 2.2 >>]`
pub fn cal_gray(black_point: bool) -> Object {
    let mut dict = white_and_black(black_point);
    dict.set("Gamma", Object::Real(SGRAY_GAMMA));
    Object::Array(vec![Object::Name(b"CalGray".to_vec()), Object::Dictionary(dict)])
}

fn cal_rgb(gamma: &[f32; 3], matrix: &[f32; 9], black_point: bool) -> Object {
    let mut dict = white_and_black(black_point);
    dict.set("Gamma", reals(gamma));
    dict.set("Matrix", reals(matrix));
    Object::Array(vec![Object::Name(b"CalRGB".to_vec()), Object::Dictionary(dict)])
}

/// CalRGB approximation of Adobe RGB (1998).
pub fn adobe_rgb(black_point: bool) -> Object {
    cal_rgb(&ADOBE_RGB_GAMMA, &ADOBE_RGB_MATRIX, black_point)
}

/// CalRGB that passes XYZ samples straight through.
pub fn cie_xyz(black_point: bool) -> Object {
    cal_rgb(&[1.0, 1.0, 1.0], &IDENTITY_MATRIX, black_point)
}

/// `[/Lab << /WhitePoint D65 /Range [-128 127 -128 127] >>]`
pub fn cie_lab() -> Object {
    let dict = dictionary! {
        "WhitePoint" => reals(&D65_WHITE_POINT),
        "Range" => vec![
            Object::Integer(-128),
            Object::Integer(127),
            Object::Integer(-128),
            Object::Integer(127),
        ],
    };
    Object::Array(vec![Object::Name(b"Lab".to_vec()), Object::Dictionary(dict)])
}
