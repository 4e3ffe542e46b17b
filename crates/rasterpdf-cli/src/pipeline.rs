// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The filter loop: raster pages in, encoder pages out.

use std::io::{Read, Write};

use rasterpdf_core::EncoderConfig;
use rasterpdf_core::error::Result;
use rasterpdf_encoder::{RasterEncoder, RasterReader};
use tracing::{info, instrument};

/// Encode every page of the raster stream `input` into `output`.
///
/// Returns the number of pages written.
#[instrument(skip_all, fields(format = ?config.output_format))]
pub fn run<R: Read, W: Write>(config: EncoderConfig, input: R, output: W) -> Result<usize> {
    let mut reader = RasterReader::new(input)?;
    let mut encoder = RasterEncoder::create_document(config, output)?;

    while let Some(header) = reader.read_header()? {
        encoder.begin_page(&header)?;
        let mut line = header.scanline_buffer()?;
        for index in 0..header.height {
            reader.read_scanline(&mut line)?;
            encoder.write_scanline(index, &line)?;
        }
    }

    encoder.close_document()?;
    let pages = encoder.page_count();
    info!(pages, "document written");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rasterpdf_core::{
        ByteOrder, CompressionMethod, OutputFormat, RasterColorSpace, RasterPageHeader,
        RasterPdfError,
    };
    use rasterpdf_encoder::RasterWriter;

    fn raster(pages: &[RasterPageHeader], compressed: bool) -> Vec<u8> {
        let mut writer = if compressed {
            RasterWriter::compressed(Vec::new(), ByteOrder::LittleEndian).unwrap()
        } else {
            RasterWriter::new(Vec::new(), ByteOrder::BigEndian).unwrap()
        };
        for header in pages {
            let mut pixels = vec![0u8; header.page_buffer_len().unwrap()];
            for (index, byte) in pixels.iter_mut().enumerate() {
                *byte = (index % 7 * 40) as u8;
            }
            writer.write_page(header, &pixels).unwrap();
        }
        writer.into_inner().unwrap()
    }

    #[test]
    fn every_page_reaches_the_document() {
        let pages = [
            RasterPageHeader::new(32, 16, RasterColorSpace::SGray, 8, 72),
            RasterPageHeader::new(16, 8, RasterColorSpace::Rgb, 8, 72),
            RasterPageHeader::new(8, 8, RasterColorSpace::Cmyk, 8, 72),
        ];
        let config = EncoderConfig {
            color_management_disabled: true,
            ..EncoderConfig::default()
        };
        for compressed in [false, true] {
            let mut out = Vec::new();
            let count = run(config.clone(), raster(&pages, compressed).as_slice(), &mut out).unwrap();
            assert_eq!(count, 3);
            assert!(out.starts_with(b"%PDF-1.7"));
        }
    }

    #[test]
    fn pclm_output_carries_its_marker() {
        let pages = [RasterPageHeader::new(24, 40, RasterColorSpace::SRgb, 8, 300)];
        let config = EncoderConfig {
            pclm_compression: vec![CompressionMethod::Flate, CompressionMethod::Rle],
            ..EncoderConfig::for_format(OutputFormat::Pclm)
        };
        let mut out = Vec::new();
        assert_eq!(run(config, raster(&pages, true).as_slice(), &mut out).unwrap(), 1);
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("%PCLm 1.0"));
        assert!(text.contains("/RunLengthDecode"));
    }

    #[test]
    fn empty_stream_is_invalid_raster() {
        let err = run(EncoderConfig::default(), std::io::empty(), Vec::new()).unwrap_err();
        assert!(matches!(err, RasterPdfError::InvalidRaster(_)));
    }

    #[test]
    fn truncated_page_is_an_io_error() {
        let pages = [RasterPageHeader::new(32, 16, RasterColorSpace::SGray, 8, 72)];
        let mut bytes = raster(&pages, false);
        bytes.truncate(bytes.len() - 40);
        let err = run(EncoderConfig::default(), bytes.as_slice(), Vec::new()).unwrap_err();
        assert!(matches!(err, RasterPdfError::Io(_)));
    }

    #[test]
    fn header_only_stream_yields_an_empty_document() {
        let bytes = raster(&[], false);
        let mut out = Vec::new();
        assert_eq!(run(EncoderConfig::default(), bytes.as_slice(), &mut out).unwrap(), 0);
        assert!(out.starts_with(b"%PDF-1.7"));
    }
}
