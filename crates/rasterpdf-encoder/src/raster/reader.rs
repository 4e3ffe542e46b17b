// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster stream reader — pulls page headers and scanlines out of a CUPS or PWG
// raster stream, undoing v2 run-length compression and normalising 16-bit
// samples to the big-endian order PDF image streams use.

use std::io::{ErrorKind, Read};

use rasterpdf_core::error::{RasterPdfError, Result};
use rasterpdf_core::{ByteOrder, RasterPageHeader};
use tracing::{debug, instrument, warn};

use super::header::{HEADER_LEN, SyncWord, decode_header};

/// Sequential reader over one raster stream.
///
/// ```ignore
/// let mut reader = RasterReader::new(std::io::stdin().lock())?;
/// while let Some(header) = reader.read_header()? {
///     let mut line = vec![0u8; header.bytes_per_line as usize];
///     for _ in 0..header.height {
///         reader.read_scanline(&mut line)?;
///     }
/// }
/// ```
pub struct RasterReader<R> {
    input: R,
    sync: SyncWord,
    /// Header of the page being read.
    header: Option<RasterPageHeader>,
    /// Scanlines of the current page not yet handed out.
    lines_remaining: u32,
    /// Last decompressed line (v2 streams only).
    line: Vec<u8>,
    /// How many more times `line` is repeated (v2 streams only).
    line_repeats: u32,
}

impl<R: Read> RasterReader<R> {
    /// Start reading a stream; consumes and checks the sync word.
    pub fn new(mut input: R) -> Result<Self> {
        let mut word = [0u8; 4];
        input.read_exact(&mut word).map_err(|err| {
            if err.kind() == ErrorKind::UnexpectedEof {
                RasterPdfError::InvalidRaster("stream is empty".into())
            } else {
                RasterPdfError::Io(err)
            }
        })?;
        let sync = SyncWord::parse(word).ok_or_else(|| {
            RasterPdfError::InvalidRaster(format!("unknown sync word {:02x?}", word))
        })?;
        debug!(byte_order = ?sync.byte_order, compressed = sync.compressed, "raster stream opened");

        Ok(Self {
            input,
            sync,
            header: None,
            lines_remaining: 0,
            line: Vec::new(),
            line_repeats: 0,
        })
    }

    /// Read the next page header, or `None` at the end of the stream.
    ///
    /// Scanlines of the previous page that were not read are skipped.
    #[instrument(skip(self))]
    pub fn read_header(&mut self) -> Result<Option<RasterPageHeader>> {
        if self.lines_remaining > 0 {
            warn!(skipped = self.lines_remaining, "skipping unread scanlines");
            let mut scratch = self
                .header
                .as_ref()
                .map(RasterPageHeader::scanline_buffer)
                .transpose()?
                .unwrap_or_default();
            while self.lines_remaining > 0 {
                self.read_scanline(&mut scratch)?;
            }
        }

        let mut raw = [0u8; HEADER_LEN];
        if !read_full_or_eof(&mut self.input, &mut raw)? {
            self.header = None;
            return Ok(None);
        }

        let header = decode_header(&raw, self.sync.byte_order);
        header.validate()?;
        debug!(
            width = header.width,
            height = header.height,
            bits_per_pixel = header.bits_per_pixel,
            color_space = ?header.color_space,
            "raster page header"
        );

        // Only v2 streams decode through the line buffer.
        self.line = if self.sync.compressed {
            header.scanline_buffer()?
        } else {
            Vec::new()
        };
        self.lines_remaining = header.height;
        self.line_repeats = 0;
        self.header = Some(header.clone());
        Ok(Some(header))
    }

    /// Read one scanline into `buf`, returning the number of bytes written.
    ///
    /// Returns 0 once every line of the current page has been read.
    pub fn read_scanline(&mut self, buf: &mut [u8]) -> Result<usize> {
        let Some(header) = self.header.as_ref() else {
            return Err(RasterPdfError::InvariantViolation(
                "scanline requested before a page header".into(),
            ));
        };
        if self.lines_remaining == 0 {
            return Ok(0);
        }
        let line_len = header.bytes_per_line as usize;
        let Some(out) = buf.get_mut(..line_len) else {
            return Err(RasterPdfError::InvariantViolation(format!(
                "scanline buffer of {} bytes is shorter than a {} byte line",
                buf.len(),
                line_len
            )));
        };
        let swap_samples =
            header.bits_per_component == 16 && self.sync.byte_order == ByteOrder::LittleEndian;

        if self.sync.compressed {
            if self.line_repeats == 0 {
                let white = if header.color_space.is_additive() { 0xFF } else { 0x00 };
                let pixel_len = header.bytes_per_pixel();
                self.line_repeats =
                    decode_packed_line(&mut self.input, &mut self.line, pixel_len, white)?;
            }
            out.copy_from_slice(&self.line);
            self.line_repeats -= 1;
        } else {
            self.input.read_exact(out)?;
        }

        if swap_samples {
            swap_sample_bytes(out);
        }
        self.lines_remaining -= 1;
        Ok(line_len)
    }
}

/// Fill `buf` completely, or report a clean end of stream before its first
/// byte. A stream ending part-way through is an I/O error.
fn read_full_or_eof<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(RasterPdfError::Io(std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("page header truncated after {filled} bytes"),
                )));
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(true)
}

fn read_byte<R: Read>(input: &mut R) -> Result<u8> {
    let mut byte = [0u8; 1];
    input.read_exact(&mut byte)?;
    Ok(byte[0])
}

/// Decode one v2 line into `line` and return how many times it is used.
///
/// Packet codes: `0..=127` repeat the next pixel `n + 1` times, `129..=255`
/// copy `257 - n` literal pixels, `128` clears the rest of the line to white.
fn decode_packed_line<R: Read>(
    input: &mut R,
    line: &mut [u8],
    pixel_len: usize,
    white: u8,
) -> Result<u32> {
    let repeats = u32::from(read_byte(input)?) + 1;
    let mut pos = 0;
    let mut pixel = vec![0u8; pixel_len];

    while pos < line.len() {
        let code = read_byte(input)?;
        let remaining = line.len() - pos;
        if code == 128 {
            line[pos..].fill(white);
            pos = line.len();
        } else if code & 0x80 != 0 {
            let count = ((257 - usize::from(code)) * pixel_len).min(remaining);
            input.read_exact(&mut line[pos..pos + count])?;
            pos += count;
        } else {
            let count = ((usize::from(code) + 1) * pixel_len).min(remaining);
            input.read_exact(&mut pixel)?;
            for (dst, src) in line[pos..pos + count]
                .iter_mut()
                .zip(pixel.iter().cycle())
            {
                *dst = *src;
            }
            pos += count;
        }
    }
    Ok(repeats)
}

/// Swap each pair of bytes in place (16-bit little-endian to big-endian).
pub(crate) fn swap_sample_bytes(line: &mut [u8]) {
    for pair in line.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rasterpdf_core::RasterColorSpace;

    use super::*;
    use crate::raster::writer::RasterWriter;

    fn gradient(header: &RasterPageHeader) -> Vec<u8> {
        (0..header.bytes_per_line * header.height)
            .map(|i| (i % 251) as u8)
            .collect()
    }

    #[test]
    fn reads_uncompressed_pages_in_order() {
        let first = RasterPageHeader::new(16, 4, RasterColorSpace::Black, 8, 300);
        let second = RasterPageHeader::new(8, 2, RasterColorSpace::SRgb, 8, 150);
        let mut stream = Vec::new();
        let mut writer = RasterWriter::new(&mut stream, ByteOrder::BigEndian).unwrap();
        writer.write_page(&first, &gradient(&first)).unwrap();
        writer.write_page(&second, &gradient(&second)).unwrap();

        let mut reader = RasterReader::new(Cursor::new(stream)).unwrap();
        let header = reader.read_header().unwrap().unwrap();
        assert_eq!(header, first);
        let mut line = vec![0u8; 16];
        assert_eq!(reader.read_scanline(&mut line).unwrap(), 16);
        assert_eq!(line, gradient(&first)[..16]);

        // The three unread lines of page one are skipped.
        assert_eq!(reader.read_header().unwrap().unwrap(), second);
        let mut all = Vec::new();
        let mut line = vec![0u8; 24];
        while reader.read_scanline(&mut line).unwrap() > 0 {
            all.extend_from_slice(&line);
        }
        assert_eq!(all, gradient(&second));
        assert!(reader.read_header().unwrap().is_none());
    }

    #[test]
    fn compressed_stream_matches_uncompressed_content() {
        let header = RasterPageHeader::new(40, 6, RasterColorSpace::Rgb, 8, 300);
        let mut pixels = vec![0xFFu8; (header.bytes_per_line * header.height) as usize];
        // A few literal pixels in line 2 and a solid line 4.
        pixels[2 * 120..2 * 120 + 9].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        pixels[4 * 120..5 * 120].fill(0x40);

        let mut stream = Vec::new();
        let mut writer = RasterWriter::compressed(&mut stream, ByteOrder::LittleEndian).unwrap();
        writer.write_page(&header, &pixels).unwrap();
        let packed = stream.len() - 4 - HEADER_LEN;
        assert!(packed < pixels.len(), "{packed} packed bytes");

        let mut reader = RasterReader::new(Cursor::new(stream)).unwrap();
        reader.read_header().unwrap().unwrap();
        let mut decoded = Vec::new();
        let mut line = vec![0u8; 120];
        for _ in 0..header.height {
            reader.read_scanline(&mut line).unwrap();
            decoded.extend_from_slice(&line);
        }
        assert_eq!(decoded, pixels);
    }

    #[test]
    fn clear_to_end_of_line_uses_white_for_additive_spaces() {
        let header = RasterPageHeader::new(4, 1, RasterColorSpace::SGray, 8, 300);
        let mut stream = b"RaS2".to_vec();
        stream.extend_from_slice(&crate::raster::header::encode_header(
            &header,
            ByteOrder::BigEndian,
        ));
        // One line, pixel 0x10 once, then clear to end of line.
        stream.extend_from_slice(&[0x00, 0x00, 0x10, 0x80]);

        let mut reader = RasterReader::new(Cursor::new(stream)).unwrap();
        reader.read_header().unwrap().unwrap();
        let mut line = [0u8; 4];
        reader.read_scanline(&mut line).unwrap();
        assert_eq!(line, [0x10, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn sixteen_bit_little_endian_samples_become_big_endian() {
        let header = RasterPageHeader::new(2, 1, RasterColorSpace::SGray, 16, 300);
        let mut stream = b"3SaR".to_vec();
        stream.extend_from_slice(&crate::raster::header::encode_header(
            &header,
            ByteOrder::LittleEndian,
        ));
        stream.extend_from_slice(&[0x34, 0x12, 0x78, 0x56]);

        let mut reader = RasterReader::new(Cursor::new(stream)).unwrap();
        reader.read_header().unwrap().unwrap();
        let mut line = [0u8; 4];
        reader.read_scanline(&mut line).unwrap();
        assert_eq!(line, [0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn truncated_scanline_is_an_io_error() {
        let header = RasterPageHeader::new(8, 2, RasterColorSpace::Black, 8, 300);
        let mut stream = b"RaS3".to_vec();
        stream.extend_from_slice(&crate::raster::header::encode_header(
            &header,
            ByteOrder::BigEndian,
        ));
        stream.extend_from_slice(&[0u8; 11]);

        let mut reader = RasterReader::new(Cursor::new(stream)).unwrap();
        reader.read_header().unwrap().unwrap();
        let mut line = [0u8; 8];
        reader.read_scanline(&mut line).unwrap();
        let err = reader.read_scanline(&mut line).unwrap_err();
        assert!(matches!(err, RasterPdfError::Io(ref io) if io.kind() == ErrorKind::UnexpectedEof));
    }

    #[test]
    fn oversized_line_length_is_rejected_before_allocating() {
        let mut header = RasterPageHeader::new(1, 1, RasterColorSpace::SGray, 8, 300);
        header.bytes_per_line = u32::MAX;
        for sync in [b"RaS2", b"RaS3"] {
            let mut stream = sync.to_vec();
            stream.extend_from_slice(&crate::raster::header::encode_header(
                &header,
                ByteOrder::BigEndian,
            ));
            let mut reader = RasterReader::new(Cursor::new(stream)).unwrap();
            assert!(matches!(
                reader.read_header(),
                Err(RasterPdfError::InvalidRaster(_))
            ));
        }
    }

    #[test]
    fn rejects_unknown_sync_word_and_empty_input() {
        assert!(matches!(
            RasterReader::new(Cursor::new(b"%PDF-1.7".to_vec())),
            Err(RasterPdfError::InvalidRaster(_))
        ));
        assert!(matches!(
            RasterReader::new(Cursor::new(Vec::new())),
            Err(RasterPdfError::InvalidRaster(_))
        ));
    }
}
