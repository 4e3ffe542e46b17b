// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page sinks — turn a finished page buffer into document objects.
//
// PDF pages carry one flate-compressed image; PCLm pages carry a stack of
// independently compressed strips.

use lopdf::{Dictionary, Object, dictionary};
use rasterpdf_core::error::Result;
use rasterpdf_core::{CompressionMethod, RasterPageHeader};
use tracing::debug;

use crate::color::ColorResolution;
use crate::page::PageBuffer;
use crate::pclm::{self, StripCompressor, StripDescriptor};
use crate::pdf::{DocumentWriter, format_number};

/// A completed page handed to a sink.
pub struct FinishedPage {
    pub header: RasterPageHeader,
    pub color: ColorResolution,
    /// Resolved `/ColorSpace` value, with any ICC stream already written.
    pub color_space: Object,
    pub buffer: PageBuffer,
}

/// Image XObject dictionary for `width` x `height` pixels.
fn image_dict(
    width: u32,
    height: u32,
    color: &ColorResolution,
    color_space: Object,
    filter: &str,
) -> Dictionary {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => color_space,
        "BitsPerComponent" => i64::from(color.bits_per_component),
        "Filter" => Object::Name(filter.as_bytes().to_vec()),
    };
    if let Some(intent) = color.intent {
        dict.set("Intent", Object::Name(intent.as_bytes().to_vec()));
    }
    dict
}

/// Output-format specific page finalization.
pub trait PageSink {
    /// Add the page's image objects and the page itself to the document.
    fn finish_page(&mut self, writer: &mut DocumentWriter, page: FinishedPage) -> Result<()>;

    /// Band height the page buffer should be split into, `None` for one band.
    fn band_height(&self) -> Option<u32>;
}

/// One full-page image per page.
#[derive(Debug, Default)]
pub struct PdfPageSink;

impl PageSink for PdfPageSink {
    fn finish_page(&mut self, writer: &mut DocumentWriter, page: FinishedPage) -> Result<()> {
        let width = page.header.width_points();
        let height = page.header.height_points();
        let dict = image_dict(
            page.header.width,
            page.header.height,
            &page.color,
            page.color_space,
            CompressionMethod::Flate.pdf_filter(),
        );
        let data = pclm::compress::deflate(&page.buffer.into_contiguous())?;
        let image_id = writer.add_stream(dict, data);

        let content = format!(
            "{} 0 0 {} 0 0 cm\n/I Do\n",
            format_number(width),
            format_number(height)
        );
        writer.add_page([width, height], &[("I".into(), image_id)], content.into_bytes())?;
        Ok(())
    }

    fn band_height(&self) -> Option<u32> {
        None
    }
}

/// Strip-based PCLm pages.
#[derive(Debug)]
pub struct PclmPageSink {
    pub compressor: StripCompressor,
    pub strip_height: u32,
    /// Declared resolution; the header's horizontal resolution when `None`.
    pub source_resolution: Option<u32>,
}

impl PageSink for PclmPageSink {
    fn finish_page(&mut self, writer: &mut DocumentWriter, page: FinishedPage) -> Result<()> {
        let resolution = self
            .source_resolution
            .unwrap_or(page.header.resolution[0])
            .max(1);
        let width = page.header.width;
        let page_height = page.header.height;
        let model = page.color.color_space.device_model();
        let device_space = Object::Name(model.device_space().as_bytes().to_vec());

        let strips = page
            .buffer
            .into_bands()
            .into_iter()
            .map(|(height, band)| {
                let data = self.compressor.compress(&band, width, height, model)?;
                Ok(StripDescriptor {
                    height,
                    data,
                    method: self.compressor.method,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut xobjects = Vec::with_capacity(strips.len());
        let mut heights = Vec::with_capacity(strips.len());
        for (index, strip) in strips.into_iter().enumerate() {
            let dict = image_dict(
                width,
                strip.height,
                &page.color,
                device_space.clone(),
                strip.method.pdf_filter(),
            );
            heights.push(strip.height);
            xobjects.push((pclm::strip_name(index), writer.add_stream(dict, strip.data)));
        }
        debug!(
            strips = heights.len(),
            method = ?self.compressor.method,
            resolution,
            "PCLm page encoded"
        );

        let content = pclm::page_content(resolution, width, page_height, &heights);
        let scale = pclm::points_per_pixel(resolution);
        let media_box = [width as f32 * scale, page_height as f32 * scale];
        writer.add_page(media_box, &xobjects, content)?;
        Ok(())
    }

    fn band_height(&self) -> Option<u32> {
        Some(self.strip_height)
    }
}
