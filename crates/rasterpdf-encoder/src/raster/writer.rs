// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster stream writer — produces CUPS raster v3 (plain) or v2 (run-length
// compressed) streams. Used to build fixtures for tests and benchmarks.

use std::io::Write;

use rasterpdf_core::error::{RasterPdfError, Result};
use rasterpdf_core::{ByteOrder, RasterPageHeader};

use super::header::{SyncWord, encode_header};
use super::reader::swap_sample_bytes;

/// Longest run or literal a single packet can describe, in pixels.
const MAX_PACKET_PIXELS: usize = 128;
/// Most times one encoded line can be repeated.
const MAX_LINE_REPEATS: usize = 256;

pub struct RasterWriter<W> {
    output: W,
    sync: SyncWord,
}

impl<W: Write> RasterWriter<W> {
    /// Start an uncompressed (v3) stream.
    pub fn new(output: W, byte_order: ByteOrder) -> Result<Self> {
        Self::start(output, byte_order, false)
    }

    /// Start a run-length compressed (v2) stream.
    pub fn compressed(output: W, byte_order: ByteOrder) -> Result<Self> {
        Self::start(output, byte_order, true)
    }

    fn start(mut output: W, byte_order: ByteOrder, compressed: bool) -> Result<Self> {
        let sync = SyncWord {
            byte_order,
            compressed,
        };
        output.write_all(&sync.bytes())?;
        Ok(Self { output, sync })
    }

    /// Write a page header followed by `pixels`, which hold `height` lines of
    /// `bytes_per_line` bytes with 16-bit samples in big-endian order.
    pub fn write_page(&mut self, header: &RasterPageHeader, pixels: &[u8]) -> Result<()> {
        let expected = header.page_buffer_len()?;
        if pixels.len() != expected {
            return Err(RasterPdfError::InvariantViolation(format!(
                "page data is {} bytes, header describes {}",
                pixels.len(),
                expected
            )));
        }
        self.output
            .write_all(&encode_header(header, self.sync.byte_order))?;

        let line_len = header.bytes_per_line as usize;
        let swap =
            header.bits_per_component == 16 && self.sync.byte_order == ByteOrder::LittleEndian;
        let mut lines: Vec<Vec<u8>> = pixels
            .chunks_exact(line_len.max(1))
            .map(|line| {
                let mut line = line.to_vec();
                if swap {
                    swap_sample_bytes(&mut line);
                }
                line
            })
            .collect();

        if !self.sync.compressed {
            for line in &lines {
                self.output.write_all(line)?;
            }
            return Ok(());
        }

        let pixel_len = header.bytes_per_pixel();
        let mut index = 0;
        while index < lines.len() {
            let repeats = lines[index..]
                .iter()
                .take(MAX_LINE_REPEATS)
                .take_while(|line| **line == lines[index])
                .count();
            let line = std::mem::take(&mut lines[index]);
            self.output.write_all(&[(repeats - 1) as u8])?;
            self.output.write_all(&pack_line(&line, pixel_len))?;
            index += repeats;
        }
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.output.flush()?;
        Ok(self.output)
    }
}

/// Run-length encode one line into repeat and literal packets.
fn pack_line(line: &[u8], pixel_len: usize) -> Vec<u8> {
    // A trailing partial pixel is padded for repeat packets; literal packets
    // only carry the bytes that exist.
    let pixel_count = line.len().div_ceil(pixel_len);
    let mut padded = line.to_vec();
    padded.resize(pixel_count * pixel_len, 0);
    let pixel = |i: usize| &padded[i * pixel_len..(i + 1) * pixel_len];

    let mut out = Vec::with_capacity(line.len() + line.len() / 64 + 2);
    let mut start = 0;
    while start < pixel_count {
        let run = (start..pixel_count)
            .take(MAX_PACKET_PIXELS)
            .take_while(|&i| pixel(i) == pixel(start))
            .count();
        if run > 1 || start + 1 == pixel_count {
            out.push((run - 1) as u8);
            out.extend_from_slice(pixel(start));
            start += run;
            continue;
        }

        // Literal: extend until two equal neighbours start a new run.
        let mut end = start + 1;
        while end < pixel_count
            && end - start < MAX_PACKET_PIXELS
            && !(end + 1 < pixel_count && pixel(end) == pixel(end + 1))
        {
            end += 1;
        }
        let count = end - start;
        if count == 1 {
            out.push(0);
            out.extend_from_slice(pixel(start));
        } else {
            out.push((257 - count) as u8);
            let bytes_end = (end * pixel_len).min(line.len());
            out.extend_from_slice(&padded[start * pixel_len..bytes_end]);
        }
        start = end;
    }
    out
}
