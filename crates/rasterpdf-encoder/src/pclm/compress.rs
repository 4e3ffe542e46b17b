// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Strip compression: zlib deflate, PackBits run-length and baseline JPEG.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use rasterpdf_core::error::{RasterPdfError, Result};
use rasterpdf_core::{ColorModel, CompressionMethod};

/// End-of-data marker of a `/RunLengthDecode` stream.
const RLE_EOD: u8 = 128;
const RLE_MAX_RUN: usize = 128;

/// zlib-compress `data` for a `/FlateDecode` stream.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 4), Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|err| RasterPdfError::Compression(format!("deflate failed: {err}")))
}

/// PackBits-encode `data` for a `/RunLengthDecode` stream.
///
/// Length byte `0..=127` copies the next `n + 1` bytes, `129..=255` repeats
/// the next byte `257 - n` times, `128` ends the data.
pub fn run_length(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / RLE_MAX_RUN + 2);
    let mut i = 0;
    while i < data.len() {
        let run = data[i..]
            .iter()
            .take(RLE_MAX_RUN)
            .take_while(|&&b| b == data[i])
            .count();
        if run >= 2 {
            out.push((257 - run) as u8);
            out.push(data[i]);
            i += run;
            continue;
        }

        let start = i;
        while i < data.len()
            && i - start < RLE_MAX_RUN
            && !(i + 1 < data.len() && data[i] == data[i + 1])
        {
            i += 1;
        }
        out.push((i - start - 1) as u8);
        out.extend_from_slice(&data[start..i]);
    }
    out.push(RLE_EOD);
    out
}

/// Baseline JPEG of an 8-bit Gray or RGB strip.
pub fn jpeg(
    data: &[u8],
    width: u32,
    height: u32,
    model: ColorModel,
    quality: u8,
) -> Result<Vec<u8>> {
    let color_type = match model {
        ColorModel::Gray => ExtendedColorType::L8,
        ColorModel::Rgb => ExtendedColorType::Rgb8,
        ColorModel::Cmyk => {
            return Err(RasterPdfError::Compression(
                "JPEG strips must be Gray or RGB".into(),
            ));
        }
    };
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .write_image(data, width, height, color_type)
        .map_err(|err| RasterPdfError::Compression(format!("JPEG encoding failed: {err}")))?;
    Ok(buf)
}

/// Compresses strips with the document's single method.
#[derive(Debug, Clone, Copy)]
pub struct StripCompressor {
    pub method: CompressionMethod,
    pub jpeg_quality: u8,
}

impl StripCompressor {
    pub fn compress(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        model: ColorModel,
    ) -> Result<Vec<u8>> {
        match self.method {
            CompressionMethod::Flate => deflate(data),
            CompressionMethod::Rle => Ok(run_length(data)),
            CompressionMethod::Dct => jpeg(data, width, height, model, self.jpeg_quality),
        }
    }
}
