// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binary layout of the 1796-byte CUPS/PWG page header (`cups_page_header2_t`).
//
// Only the fields the encoder needs are decoded; everything else is skipped
// on read and zero-filled on write.

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};
use rasterpdf_core::{ByteOrder, RasterColorSpace, RasterPageHeader, RenderIntent};

/// Size of one page header on the wire.
pub const HEADER_LEN: usize = 1796;

const OFF_HW_RESOLUTION: usize = 276;
const OFF_PAGE_SIZE: usize = 352;
const OFF_WIDTH: usize = 372;
const OFF_HEIGHT: usize = 376;
const OFF_BITS_PER_COLOR: usize = 384;
const OFF_BITS_PER_PIXEL: usize = 388;
const OFF_BYTES_PER_LINE: usize = 392;
const OFF_COLOR_ORDER: usize = 396;
const OFF_COLOR_SPACE: usize = 400;
const OFF_NUM_COLORS: usize = 420;
const OFF_RENDERING_INTENT: usize = 1668;
const OFF_PAGE_SIZE_NAME: usize = 1732;
const STRING_LEN: usize = 64;

/// Stream flavour announced by the 4-byte sync word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWord {
    pub byte_order: ByteOrder,
    /// Version 2 streams carry run-length compressed scanlines.
    pub compressed: bool,
}

impl SyncWord {
    /// Recognise a sync word: `RaSt`, `RaS2`, `RaS3` or their byte-swapped
    /// forms.
    pub fn parse(word: [u8; 4]) -> Option<Self> {
        let (byte_order, version) = match &word {
            b"RaSt" => (ByteOrder::BigEndian, 1),
            b"tSaR" => (ByteOrder::LittleEndian, 1),
            b"RaS2" => (ByteOrder::BigEndian, 2),
            b"2SaR" => (ByteOrder::LittleEndian, 2),
            b"RaS3" => (ByteOrder::BigEndian, 3),
            b"3SaR" => (ByteOrder::LittleEndian, 3),
            _ => return None,
        };
        Some(Self {
            byte_order,
            compressed: version == 2,
        })
    }

    /// The on-wire bytes for this flavour.
    pub fn bytes(&self) -> [u8; 4] {
        match (self.byte_order, self.compressed) {
            (ByteOrder::BigEndian, true) => *b"RaS2",
            (ByteOrder::LittleEndian, true) => *b"2SaR",
            (ByteOrder::BigEndian, false) => *b"RaS3",
            (ByteOrder::LittleEndian, false) => *b"3SaR",
        }
    }
}

fn read_u32(raw: &[u8], offset: usize, order: ByteOrder) -> u32 {
    let field = &raw[offset..offset + 4];
    match order {
        ByteOrder::BigEndian => BigEndian::read_u32(field),
        ByteOrder::LittleEndian => LittleEndian::read_u32(field),
    }
}

fn write_u32(raw: &mut [u8], offset: usize, order: ByteOrder, value: u32) {
    let field = &mut raw[offset..offset + 4];
    match order {
        ByteOrder::BigEndian => BigEndian::write_u32(field, value),
        ByteOrder::LittleEndian => LittleEndian::write_u32(field, value),
    }
}

fn read_string(raw: &[u8], offset: usize) -> String {
    let field = &raw[offset..offset + STRING_LEN];
    let end = field.iter().position(|&b| b == 0).unwrap_or(STRING_LEN);
    String::from_utf8_lossy(&field[..end]).into_owned()
}

fn write_string(raw: &mut [u8], offset: usize, value: &str) {
    // Keep room for the terminating NUL.
    let bytes = value.as_bytes();
    let len = bytes.len().min(STRING_LEN - 1);
    raw[offset..offset + len].copy_from_slice(&bytes[..len]);
}

/// Decode the fields of a page header.
pub fn decode_header(raw: &[u8; HEADER_LEN], order: ByteOrder) -> RasterPageHeader {
    RasterPageHeader {
        width: read_u32(raw, OFF_WIDTH, order),
        height: read_u32(raw, OFF_HEIGHT, order),
        bits_per_pixel: read_u32(raw, OFF_BITS_PER_PIXEL, order),
        bits_per_component: read_u32(raw, OFF_BITS_PER_COLOR, order),
        bytes_per_line: read_u32(raw, OFF_BYTES_PER_LINE, order),
        color_space: RasterColorSpace::from_code(read_u32(raw, OFF_COLOR_SPACE, order)),
        color_order: read_u32(raw, OFF_COLOR_ORDER, order),
        render_intent: RenderIntent::from_keyword(&read_string(raw, OFF_RENDERING_INTENT)),
        resolution: [
            read_u32(raw, OFF_HW_RESOLUTION, order),
            read_u32(raw, OFF_HW_RESOLUTION + 4, order),
        ],
        page_size: [
            read_u32(raw, OFF_PAGE_SIZE, order),
            read_u32(raw, OFF_PAGE_SIZE + 4, order),
        ],
        page_size_name: read_string(raw, OFF_PAGE_SIZE_NAME),
    }
}

/// Encode a page header; unused fields are zero.
pub fn encode_header(header: &RasterPageHeader, order: ByteOrder) -> [u8; HEADER_LEN] {
    let mut raw = [0u8; HEADER_LEN];
    write_u32(&mut raw, OFF_HW_RESOLUTION, order, header.resolution[0]);
    write_u32(&mut raw, OFF_HW_RESOLUTION + 4, order, header.resolution[1]);
    write_u32(&mut raw, OFF_PAGE_SIZE, order, header.page_size[0]);
    write_u32(&mut raw, OFF_PAGE_SIZE + 4, order, header.page_size[1]);
    write_u32(&mut raw, OFF_WIDTH, order, header.width);
    write_u32(&mut raw, OFF_HEIGHT, order, header.height);
    write_u32(&mut raw, OFF_BITS_PER_COLOR, order, header.bits_per_component);
    write_u32(&mut raw, OFF_BITS_PER_PIXEL, order, header.bits_per_pixel);
    write_u32(&mut raw, OFF_BYTES_PER_LINE, order, header.bytes_per_line);
    write_u32(&mut raw, OFF_COLOR_ORDER, order, header.color_order);
    write_u32(&mut raw, OFF_COLOR_SPACE, order, header.color_space.code());
    write_u32(&mut raw, OFF_NUM_COLORS, order, header.channels());
    write_string(&mut raw, OFF_RENDERING_INTENT, header.render_intent.keyword());
    write_string(&mut raw, OFF_PAGE_SIZE_NAME, &header.page_size_name);
    raw
}
