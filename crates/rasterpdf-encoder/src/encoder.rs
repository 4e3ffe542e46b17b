// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The raster encoder — document-level state machine.
//
// One `RasterEncoder` produces one document. Pages are opened with
// `begin_page`, filled with `write_scanline`, and finalized either by the next
// `begin_page` or by `close_document`, which also serializes the document to
// the output.

use std::io::Write;

use lopdf::{Object, ObjectId};
use rasterpdf_core::error::{RasterPdfError, Result};
use rasterpdf_core::{ColorModel, EncoderConfig, OutputFormat, RasterPageHeader};
use tracing::{debug, info, instrument, warn};

use crate::color::{
    ColorProfile, ColorResolution, ColorStage, ColorStep, ConversionPlan, ManagedTransform,
    PdfColorSpace, ProfileRole, ResolveOptions, calibration, resolve,
};
use crate::page::{PageBuffer, PageState};
use crate::pclm::StripCompressor;
use crate::pdf::{DocumentInfo, DocumentWriter, icc};
use crate::sink::{FinishedPage, PageSink, PclmPageSink, PdfPageSink};

/// Encodes raster pages into a PDF or PCLm document written to `W`.
pub struct RasterEncoder<W: Write> {
    config: EncoderConfig,
    output: W,
    /// `None` once the document has been closed.
    writer: Option<DocumentWriter>,
    sink: Box<dyn PageSink>,
    /// Device profile from the configuration.
    device_profile: Option<ColorProfile>,
    /// Standard profile describing the raster data: sRGB for embedding, or
    /// the source side of a managed transform.
    source_profile: Option<ColorProfile>,
    device_icc: Option<ObjectId>,
    source_icc: Option<ObjectId>,
    page: Option<PageState>,
    pages_written: usize,
    /// Why closing failed; a retried close reports it again.
    close_error: Option<String>,
}

impl<W: Write> RasterEncoder<W> {
    /// Start a document. Loads the device profile named by the configuration.
    #[instrument(skip_all, fields(format = ?config.output_format))]
    pub fn create_document(config: EncoderConfig, output: W) -> Result<Self> {
        let device_profile = match (&config.icc_profile, config.color_management_disabled) {
            (Some(path), false) => {
                let profile = ColorProfile::open(path)?;
                info!(path = %path.display(), signature = ?profile.signature(), "using device profile");
                Some(profile)
            }
            (Some(_), true) => {
                warn!("color management disabled, ignoring the device profile");
                None
            }
            (None, _) => None,
        };
        Self::with_device_profile(config, output, device_profile)
    }

    /// Start a document with an already loaded device profile.
    pub fn with_device_profile(
        config: EncoderConfig,
        output: W,
        device_profile: Option<ColorProfile>,
    ) -> Result<Self> {
        config.validate()?;
        let sink: Box<dyn PageSink> = match config.output_format {
            OutputFormat::Pdf => Box::new(PdfPageSink),
            OutputFormat::Pclm => {
                let method = config.strip_compression()?;
                debug!(?method, strip_height = config.pclm_strip_height, "PCLm strip settings");
                Box::new(PclmPageSink {
                    compressor: StripCompressor {
                        method,
                        jpeg_quality: config.jpeg_quality,
                    },
                    strip_height: config.pclm_strip_height,
                    source_resolution: config.pclm_source_resolution,
                })
            }
        };

        let source_profile = if !config.color_management_disabled && device_profile.is_none() {
            match ColorProfile::srgb() {
                Ok(profile) => Some(profile),
                Err(err) => {
                    warn!(%err, "sRGB profile unavailable, sRGB pages fall back to DeviceRGB");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            writer: Some(DocumentWriter::new(config.output_format)),
            config,
            output,
            sink,
            device_profile,
            source_profile,
            device_icc: None,
            source_icc: None,
            page: None,
            pages_written: 0,
            close_error: None,
        })
    }

    /// Pages finalized so far, including after the document was closed.
    pub fn page_count(&self) -> usize {
        self.pages_written
    }

    /// Whether a page is open and accepting scanlines.
    pub fn has_open_page(&self) -> bool {
        self.page.is_some()
    }

    /// Open a page described by `header`, finalizing the previous page.
    ///
    /// Configuration problems are reported before the previous page is
    /// touched.
    #[instrument(skip_all, fields(
        width = header.width,
        height = header.height,
        color_space = ?header.color_space,
    ))]
    pub fn begin_page(&mut self, header: &RasterPageHeader) -> Result<()> {
        if self.writer.is_none() {
            return Err(RasterPdfError::InvariantViolation(
                "page started after the document was closed".into(),
            ));
        }
        header.validate()?;
        let intent = self.config.render_intent.unwrap_or(header.render_intent);
        let options = ResolveOptions {
            output_format: self.config.output_format,
            color_management_disabled: self.config.color_management_disabled,
            device_profile: self.device_profile.as_ref().map(ColorProfile::signature),
            srgb_available: self.source_profile.is_some(),
        };
        let color = resolve(header, intent, &options)?;
        let plan = self.build_plan(header, &color, intent)?;
        PageBuffer::required_len(plan.output_line_len(), header.height)?;

        self.finish_page()?;
        let page = PageState::new(header.clone(), color, plan, self.sink.band_height())?;
        self.page = Some(page);
        debug!(page = self.page_count() + 1, "page opened");
        Ok(())
    }

    /// Convert and store scanline `line_index` of the open page.
    pub fn write_scanline(&mut self, line_index: u32, bytes: &[u8]) -> Result<()> {
        let Some(page) = self.page.as_mut() else {
            return Err(RasterPdfError::InvariantViolation(format!(
                "scanline {line_index} written with no open page"
            )));
        };
        page.put_scanline(line_index, bytes)
    }

    /// Finalize the last page and serialize the document.
    ///
    /// Closing an already closed document does nothing, unless the first
    /// close failed: that failure is reported again.
    #[instrument(skip_all)]
    pub fn close_document(&mut self) -> Result<()> {
        if let Some(reason) = &self.close_error {
            return Err(RasterPdfError::Pdf(format!(
                "document was not written: {reason}"
            )));
        }
        if self.writer.is_none() {
            debug!("document already closed");
            return Ok(());
        }
        let result = self.write_document();
        if let Err(err) = &result {
            warn!(%err, "closing the document failed");
            self.close_error = Some(err.to_string());
        }
        result
    }

    fn write_document(&mut self) -> Result<()> {
        self.finish_page()?;
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        let info = DocumentInfo {
            title: self.config.title.clone(),
            producer: self.config.producer.clone(),
        };
        writer.finish(&info, &mut self.output)?;
        self.output.flush()?;
        Ok(())
    }

    /// Hand back the output after the document has been closed.
    pub fn into_output(self) -> W {
        self.output
    }

    fn build_plan(
        &mut self,
        header: &RasterPageHeader,
        color: &ColorResolution,
        intent: rasterpdf_core::RenderIntent,
    ) -> Result<ConversionPlan> {
        let stage = match color.color_step {
            ColorStep::Pixel(transform) => ColorStage::Pixel(transform),
            ColorStep::Managed { from, .. } => {
                self.load_standard_source(from)?;
                let source = self.source_profile.as_ref().ok_or_else(|| {
                    RasterPdfError::InvariantViolation("source profile missing".into())
                })?;
                let device = self.device_profile.as_ref().ok_or_else(|| {
                    RasterPdfError::InvariantViolation(
                        "managed transform without a device profile".into(),
                    )
                })?;
                ColorStage::Managed(ManagedTransform::new(source, device, intent)?)
            }
        };
        ConversionPlan::new(header, color.bit_step, stage, color.output_channels())
    }

    /// The standard source profile for `model`, replacing the current one
    /// if it describes another model.
    fn load_standard_source(&mut self, model: ColorModel) -> Result<()> {
        let current = self.source_profile.as_ref().and_then(|p| p.signature().model());
        if current != Some(model) {
            let profile = ColorProfile::standard_source(model).ok_or_else(|| {
                RasterPdfError::Configuration(format!("no standard profile for {model:?} data"))
            })??;
            debug!(?model, "loaded standard source profile");
            self.source_profile = Some(profile);
        }
        Ok(())
    }

    /// Hand the open page, if any, to the sink.
    fn finish_page(&mut self) -> Result<()> {
        let Some(page) = self.page.take() else {
            return Ok(());
        };
        if page.lines_written() < page.header.height {
            warn!(
                written = page.lines_written(),
                height = page.header.height,
                "page finished with missing scanlines"
            );
        }
        let color_space = self.color_space_object(&page.color.color_space)?;
        let header = page.header.clone();
        let color = page.color;
        let finished = FinishedPage {
            header,
            color,
            color_space,
            buffer: page.into_buffer(),
        };
        let writer = self.writer.as_mut().ok_or_else(|| {
            RasterPdfError::InvariantViolation("page finished after the document was closed".into())
        })?;
        self.sink.finish_page(writer, finished)?;
        self.pages_written = writer.page_count();
        info!(page = self.pages_written, "page finished");
        Ok(())
    }

    /// Build the `/ColorSpace` value, embedding ICC profiles once per document.
    fn color_space_object(&mut self, space: &PdfColorSpace) -> Result<Object> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            RasterPdfError::InvariantViolation("color space built after close".into())
        })?;
        Ok(match *space {
            PdfColorSpace::Device(model) => icc::device_space(model),
            PdfColorSpace::IccBased { role, model } => {
                let (profile, cached) = match role {
                    ProfileRole::Device => (self.device_profile.as_ref(), &mut self.device_icc),
                    ProfileRole::Source => (self.source_profile.as_ref(), &mut self.source_icc),
                };
                if cached.is_none() {
                    *cached = profile.and_then(|profile| icc::embed(writer, profile));
                }
                match *cached {
                    Some(id) => icc::icc_based(id),
                    None => {
                        warn!(?role, "profile could not be embedded, using a device space");
                        icc::device_space(model)
                    }
                }
            }
            PdfColorSpace::CalGray { black_point } => calibration::cal_gray(black_point),
            PdfColorSpace::AdobeRgb { black_point } => calibration::adobe_rgb(black_point),
            PdfColorSpace::CieXyz { black_point } => calibration::cie_xyz(black_point),
            PdfColorSpace::CieLab => calibration::cie_lab(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::ZlibDecoder;
    use lopdf::Document;
    use rasterpdf_core::{CompressionMethod, RasterColorSpace, RenderIntent};

    use super::*;

    fn encode(config: EncoderConfig, pages: &[(RasterPageHeader, Vec<u8>)]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut encoder = RasterEncoder::create_document(config, &mut out).unwrap();
        for (header, pixels) in pages {
            encoder.begin_page(header).unwrap();
            for (index, line) in pixels
                .chunks_exact(header.bytes_per_line as usize)
                .enumerate()
            {
                encoder.write_scanline(index as u32, line).unwrap();
            }
        }
        encoder.close_document().unwrap();
        drop(encoder);
        out
    }

    fn solid(header: &RasterPageHeader, value: u8) -> Vec<u8> {
        vec![value; (header.bytes_per_line * header.height) as usize]
    }

    fn page_image(doc: &Document, page_number: u32, name: &[u8]) -> lopdf::Stream {
        let pages = doc.get_pages();
        let page_id = pages[&page_number];
        let page = doc.get_dictionary(page_id).unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        let image_id = xobjects.get(name).unwrap().as_reference().unwrap();
        doc.get_object(image_id).unwrap().as_stream().unwrap().clone()
    }

    fn inflate(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
        out
    }

    fn assert_media_box(doc: &Document, page_number: u32, width: f32, height: f32) {
        let page_id = doc.get_pages()[&page_number];
        let page = doc.get_dictionary(page_id).unwrap();
        let values: Vec<f32> = page
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|value| value.as_float().unwrap())
            .collect();
        assert_eq!(values.len(), 4);
        assert_eq!(&values[..2], &[0.0, 0.0]);
        assert!((values[2] - width).abs() < 0.01, "width {values:?}");
        assert!((values[3] - height).abs() < 0.01, "height {values:?}");
    }

    #[test]
    fn every_raster_page_becomes_a_pdf_page() {
        let letter = RasterPageHeader::new(85, 110, RasterColorSpace::SGray, 8, 10);
        let small = RasterPageHeader::new(300, 150, RasterColorSpace::Rgb, 8, 300);
        let bytes = encode(
            EncoderConfig::default(),
            &[
                (letter.clone(), solid(&letter, 0xFF)),
                (small.clone(), solid(&small, 0x80)),
                (letter.clone(), solid(&letter, 0x00)),
            ],
        );
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
        assert_media_box(&doc, 1, 612.0, 792.0);
        assert_media_box(&doc, 2, 72.0, 36.0);
    }

    #[test]
    fn empty_ink_page_decodes_as_white_device_gray() {
        let header = RasterPageHeader::new(16, 4, RasterColorSpace::Black, 8, 300);
        let config = EncoderConfig {
            color_management_disabled: true,
            ..EncoderConfig::default()
        };
        let bytes = encode(config, &[(header.clone(), solid(&header, 0))]);
        let doc = Document::load_mem(&bytes).unwrap();
        let image = page_image(&doc, 1, b"I");
        assert_eq!(
            image.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceGray"
        );
        assert!(image.dict.get(b"Intent").is_err());
        let pixels = inflate(&image.content);
        assert_eq!(pixels.len(), 64);
        assert!(pixels.iter().all(|&v| v == 0xFF));
    }

    #[test]
    fn rgb_device_profile_is_embedded_once() {
        let config = EncoderConfig {
            render_intent: Some(RenderIntent::Perceptual),
            ..EncoderConfig::default()
        };
        let header = RasterPageHeader::new(8, 8, RasterColorSpace::Rgb, 8, 72);
        let mut out = Vec::new();
        let profile = ColorProfile::srgb().unwrap();
        let mut encoder =
            RasterEncoder::with_device_profile(config, &mut out, Some(profile)).unwrap();
        for _ in 0..2 {
            encoder.begin_page(&header).unwrap();
            for line in 0..8 {
                encoder.write_scanline(line, &[0x40; 24]).unwrap();
            }
        }
        encoder.close_document().unwrap();
        drop(encoder);

        let doc = Document::load_mem(&out).unwrap();
        let first = page_image(&doc, 1, b"I");
        let second = page_image(&doc, 2, b"I");
        let space = first.dict.get(b"ColorSpace").unwrap().as_array().unwrap();
        assert_eq!(space[0].as_name().unwrap(), b"ICCBased");
        let profile_id = space[1].as_reference().unwrap();
        let profile = doc.get_object(profile_id).unwrap().as_stream().unwrap();
        assert_eq!(profile.dict.get(b"N").unwrap().as_i64().unwrap(), 3);
        assert_eq!(
            profile.dict.get(b"Alternate").unwrap().as_name().unwrap(),
            b"DeviceRGB"
        );
        let second_space = second.dict.get(b"ColorSpace").unwrap().as_array().unwrap();
        assert_eq!(second_space[1].as_reference().unwrap(), profile_id);
        assert_eq!(
            first.dict.get(b"Intent").unwrap().as_name().unwrap(),
            b"Perceptual"
        );
    }

    #[test]
    fn sixteen_bit_cmyk_against_gray_profile_fails_before_the_page_opens() {
        let mut out = Vec::new();
        let profile = ColorProfile::sgray().unwrap();
        let mut encoder =
            RasterEncoder::with_device_profile(EncoderConfig::default(), &mut out, Some(profile))
                .unwrap();
        let header = RasterPageHeader::new(4, 4, RasterColorSpace::Cmyk, 16, 300);
        let err = encoder.begin_page(&header).unwrap_err();
        assert!(err.is_configuration());
        assert!(!encoder.has_open_page());
        assert_eq!(encoder.page_count(), 0);
    }

    #[test]
    fn closing_twice_or_empty_is_harmless() {
        let mut out = Vec::new();
        let mut encoder = RasterEncoder::create_document(EncoderConfig::default(), &mut out).unwrap();
        encoder.close_document().unwrap();
        encoder.close_document().unwrap();
        drop(encoder);
        let doc = Document::load_mem(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 0);

        // The open page is finalized exactly once.
        let header = RasterPageHeader::new(4, 2, RasterColorSpace::SGray, 8, 72);
        let mut encoder =
            RasterEncoder::create_document(EncoderConfig::default(), Vec::new()).unwrap();
        encoder.begin_page(&header).unwrap();
        encoder.close_document().unwrap();
        encoder.close_document().unwrap();
        assert!(encoder.begin_page(&header).is_err());
        let out = encoder.into_output();
        assert_eq!(String::from_utf8_lossy(&out).matches("%%EOF").count(), 1);
        assert_eq!(Document::load_mem(&out).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn page_count_survives_closing() {
        let header = RasterPageHeader::new(4, 2, RasterColorSpace::SGray, 8, 72);
        let mut encoder =
            RasterEncoder::create_document(EncoderConfig::default(), Vec::new()).unwrap();
        encoder.begin_page(&header).unwrap();
        encoder.begin_page(&header).unwrap();
        assert_eq!(encoder.page_count(), 1);
        encoder.close_document().unwrap();
        assert_eq!(encoder.page_count(), 2);
        encoder.close_document().unwrap();
        assert_eq!(encoder.page_count(), 2);
    }

    struct BrokenOutput;

    impl Write for BrokenOutput {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("device gone"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_close_is_reported_again() {
        let header = RasterPageHeader::new(4, 2, RasterColorSpace::SGray, 8, 72);
        let mut encoder =
            RasterEncoder::create_document(EncoderConfig::default(), BrokenOutput).unwrap();
        encoder.begin_page(&header).unwrap();
        assert!(encoder.close_document().is_err());
        let err = encoder.close_document().unwrap_err();
        assert!(err.to_string().contains("device gone"), "{err}");
        assert!(encoder.begin_page(&header).is_err());
    }

    #[test]
    fn scanline_outside_the_page_is_rejected() {
        let mut out = Vec::new();
        let mut encoder = RasterEncoder::create_document(EncoderConfig::default(), &mut out).unwrap();
        assert!(matches!(
            encoder.write_scanline(0, &[0; 4]),
            Err(RasterPdfError::InvariantViolation(_))
        ));
        let header = RasterPageHeader::new(4, 2, RasterColorSpace::SGray, 8, 72);
        encoder.begin_page(&header).unwrap();
        assert!(matches!(
            encoder.write_scanline(2, &[0; 4]),
            Err(RasterPdfError::InvariantViolation(_))
        ));
    }

    #[test]
    fn pclm_strips_cover_the_page_top_down() {
        let config = EncoderConfig {
            output_format: OutputFormat::Pclm,
            pclm_strip_height: 16,
            pclm_compression: vec![CompressionMethod::Flate, CompressionMethod::Rle],
            ..EncoderConfig::default()
        };
        let header = RasterPageHeader::new(20, 40, RasterColorSpace::SRgb, 8, 300);
        let bytes = encode(config, &[(header.clone(), solid(&header, 0xFF))]);
        assert!(String::from_utf8_lossy(&bytes[..32]).contains("%PCLm 1.0"));

        let doc = Document::load_mem(&bytes).unwrap();
        let heights: Vec<i64> = (0..3)
            .map(|i| {
                let strip = page_image(&doc, 1, format!("Image{i}").as_bytes());
                assert_eq!(
                    strip.dict.get(b"Filter").unwrap().as_name().unwrap(),
                    b"RunLengthDecode"
                );
                assert_eq!(
                    strip.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
                    b"DeviceRGB"
                );
                strip.dict.get(b"Height").unwrap().as_i64().unwrap()
            })
            .collect();
        assert_eq!(heights, vec![16, 16, 8]);

        let page_id = doc.get_pages()[&1];
        let content = String::from_utf8(doc.get_page_content(page_id).unwrap()).unwrap();
        assert!(content.contains("20 0 0 16 0 24 cm"));
        assert!(content.contains("20 0 0 16 0 8 cm"));
        assert!(content.contains("20 0 0 8 0 0 cm"));
        assert_media_box(&doc, 1, 4.8, 9.6);
    }

    #[test]
    fn pclm_document_with_defaults_loads() {
        let header = RasterPageHeader::new(8, 8, RasterColorSpace::SGray, 8, 300);
        let bytes = encode(
            EncoderConfig::for_format(OutputFormat::Pclm),
            &[(header.clone(), solid(&header, 0x20))],
        );
        assert!(bytes.starts_with(b"%PDF-1.7\n%PCLm 1.0\n"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        let strip = page_image(&doc, 1, b"Image0");
        assert_eq!(
            strip.dict.get(b"Filter").unwrap().as_name().unwrap(),
            b"FlateDecode"
        );
    }

    #[test]
    fn pclm_flate_strips_inflate_back_to_the_page() {
        let config = EncoderConfig {
            color_management_disabled: true,
            pclm_compression: vec![CompressionMethod::Flate],
            ..EncoderConfig::for_format(OutputFormat::Pclm)
        };
        let header = RasterPageHeader::new(10, 20, RasterColorSpace::Rgb, 8, 300);
        let pixels: Vec<u8> = (0..header.bytes_per_line * header.height)
            .map(|i| (i % 253) as u8)
            .collect();
        let bytes = encode(config, &[(header.clone(), pixels.clone())]);

        let doc = Document::load_mem(&bytes).unwrap();
        let mut decoded = Vec::new();
        for (index, height) in [16, 4].into_iter().enumerate() {
            let strip = page_image(&doc, 1, format!("Image{index}").as_bytes());
            assert_eq!(
                strip.dict.get(b"Filter").unwrap().as_name().unwrap(),
                b"FlateDecode"
            );
            assert_eq!(strip.dict.get(b"Height").unwrap().as_i64().unwrap(), height);
            decoded.extend(inflate(&strip.content));
        }
        assert_eq!(decoded, pixels);
    }

    #[test]
    fn pclm_dct_strips_are_jpeg() {
        let config = EncoderConfig {
            pclm_compression: vec![CompressionMethod::Dct],
            ..EncoderConfig::for_format(OutputFormat::Pclm)
        };
        let header = RasterPageHeader::new(16, 20, RasterColorSpace::SGray, 8, 300);
        let bytes = encode(config, &[(header.clone(), solid(&header, 0x80))]);

        let doc = Document::load_mem(&bytes).unwrap();
        for index in 0..2 {
            let strip = page_image(&doc, 1, format!("Image{index}").as_bytes());
            assert_eq!(
                strip.dict.get(b"Filter").unwrap().as_name().unwrap(),
                b"DCTDecode"
            );
            assert_eq!(
                strip.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
                b"DeviceGray"
            );
            assert_eq!(&strip.content[..2], &[0xFF, 0xD8]);
        }
    }

    #[test]
    fn pclm_uses_the_configured_source_resolution() {
        let config = EncoderConfig {
            output_format: OutputFormat::Pclm,
            pclm_source_resolution: Some(600),
            ..EncoderConfig::default()
        };
        let header = RasterPageHeader::new(600, 1200, RasterColorSpace::SGray, 8, 300);
        let bytes = encode(config, &[(header.clone(), solid(&header, 0xFF))]);
        let doc = Document::load_mem(&bytes).unwrap();
        assert_media_box(&doc, 1, 72.0, 144.0);
    }

    #[test]
    fn pclm_rejects_sixteen_bit_pages() {
        let config = EncoderConfig::for_format(OutputFormat::Pclm);
        let mut out = Vec::new();
        let mut encoder = RasterEncoder::create_document(config, &mut out).unwrap();
        let header = RasterPageHeader::new(4, 4, RasterColorSpace::SGray, 16, 300);
        assert!(encoder.begin_page(&header).unwrap_err().is_configuration());
    }

    #[test]
    fn calibrated_gray_carries_black_point_under_bpc() {
        let header = RasterPageHeader::new(4, 4, RasterColorSpace::SGray, 8, 72);
        let config = EncoderConfig {
            render_intent: Some(RenderIntent::RelativeBpc),
            ..EncoderConfig::default()
        };
        let bytes = encode(config, &[(header.clone(), solid(&header, 0x80))]);
        let doc = Document::load_mem(&bytes).unwrap();
        let image = page_image(&doc, 1, b"I");
        let space = image.dict.get(b"ColorSpace").unwrap().as_array().unwrap();
        assert_eq!(space[0].as_name().unwrap(), b"CalGray");
        assert!(space[1].as_dict().unwrap().get(b"BlackPoint").is_ok());
        assert_eq!(
            image.dict.get(b"Intent").unwrap().as_name().unwrap(),
            b"RelativeColorimetric"
        );
    }

    #[test]
    fn srgb_pages_embed_the_source_profile() {
        let header = RasterPageHeader::new(4, 4, RasterColorSpace::SRgb, 8, 72);
        let bytes = encode(EncoderConfig::default(), &[(header.clone(), solid(&header, 0x10))]);
        let doc = Document::load_mem(&bytes).unwrap();
        let image = page_image(&doc, 1, b"I");
        let space = image.dict.get(b"ColorSpace").unwrap().as_array().unwrap();
        assert_eq!(space[0].as_name().unwrap(), b"ICCBased");
    }

    #[test]
    fn missing_profile_file_fails_document_creation() {
        let dir = tempfile::tempdir().unwrap();
        let config = EncoderConfig {
            icc_profile: Some(dir.path().join("printer.icc")),
            ..EncoderConfig::default()
        };
        let result = RasterEncoder::create_document(config, Vec::new());
        assert!(matches!(result, Err(RasterPdfError::Io(_))));
    }
}
