// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-page state: the converted pixel buffer (whole page or strips) and the
// plan that fills it.

use rasterpdf_core::RasterPageHeader;
use rasterpdf_core::error::{RasterPdfError, Result};

use crate::color::{ColorResolution, ConversionPlan};
use crate::pclm::strip_heights;

/// Converted pixels of one page, held as one or more horizontal bands.
#[derive(Debug)]
pub struct PageBuffer {
    line_len: usize,
    height: u32,
    band_height: u32,
    bands: Vec<Vec<u8>>,
}

fn reserve(len: usize, line_len: usize, height: u32) -> Result<Vec<u8>> {
    let mut band = Vec::new();
    band.try_reserve_exact(len)
        .map_err(|_| RasterPdfError::Allocation {
            bytes_per_line: line_len as u32,
            height,
        })?;
    band.resize(len, 0);
    Ok(band)
}

impl PageBuffer {
    /// Total size of a page buffer, or an allocation error if it cannot be
    /// addressed. Checked before anything is allocated.
    pub fn required_len(line_len: usize, height: u32) -> Result<usize> {
        line_len
            .checked_mul(height as usize)
            .filter(|len| *len <= isize::MAX as usize)
            .ok_or(RasterPdfError::Allocation {
                bytes_per_line: u32::try_from(line_len).unwrap_or(u32::MAX),
                height,
            })
    }

    /// Allocate `height` zeroed lines, split into bands of `band_height`
    /// lines (one band when `None`).
    pub fn allocate(line_len: usize, height: u32, band_height: Option<u32>) -> Result<Self> {
        Self::required_len(line_len, height)?;
        let band_height = band_height.unwrap_or(height).clamp(1, height.max(1));
        let bands = strip_heights(height, band_height)
            .into_iter()
            .map(|lines| reserve(line_len * lines as usize, line_len, height))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            line_len,
            height,
            band_height,
            bands,
        })
    }

    /// Mutable view of line `index`.
    pub fn line_mut(&mut self, index: u32) -> Result<&mut [u8]> {
        if index >= self.height {
            return Err(RasterPdfError::InvariantViolation(format!(
                "scanline {index} outside a page of {} lines",
                self.height
            )));
        }
        let band = (index / self.band_height) as usize;
        let offset = (index % self.band_height) as usize * self.line_len;
        self.bands
            .get_mut(band)
            .and_then(|band| band.get_mut(offset..offset + self.line_len))
            .ok_or_else(|| {
                RasterPdfError::InvariantViolation(format!("scanline {index} has no backing band"))
            })
    }

    /// Bands with their line counts, top to bottom.
    pub fn into_bands(self) -> Vec<(u32, Vec<u8>)> {
        let line_len = self.line_len.max(1);
        self.bands
            .into_iter()
            .map(|band| ((band.len() / line_len) as u32, band))
            .collect()
    }

    /// The whole page as one contiguous buffer.
    pub fn into_contiguous(self) -> Vec<u8> {
        let mut bands = self.bands.into_iter();
        let mut page = bands.next().unwrap_or_default();
        for band in bands {
            page.extend_from_slice(&band);
        }
        page
    }
}

/// The page currently being assembled.
#[derive(Debug)]
pub struct PageState {
    pub header: RasterPageHeader,
    pub color: ColorResolution,
    plan: ConversionPlan,
    buffer: PageBuffer,
    lines_written: u32,
}

impl PageState {
    pub fn new(
        header: RasterPageHeader,
        color: ColorResolution,
        plan: ConversionPlan,
        band_height: Option<u32>,
    ) -> Result<Self> {
        let buffer = PageBuffer::allocate(plan.output_line_len(), header.height, band_height)?;
        Ok(Self {
            header,
            color,
            plan,
            buffer,
            lines_written: 0,
        })
    }

    /// Convert `raw` into line `index` of the page.
    pub fn put_scanline(&mut self, index: u32, raw: &[u8]) -> Result<()> {
        let line = self.buffer.line_mut(index)?;
        self.plan.convert_line(raw, line)?;
        self.lines_written += 1;
        Ok(())
    }

    /// Number of `put_scanline` calls so far.
    pub fn lines_written(&self) -> u32 {
        self.lines_written
    }

    pub fn into_buffer(self) -> PageBuffer {
        self.buffer
    }
}
