// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document writer — a thin layer over `lopdf::Document` that owns the page
// tree and the trailer.
//
// Objects are added as pages are finished; the Pages node, the Catalog and
// the Info dictionary are only written when the document is serialized.

use std::io::Write;

use chrono::Utc;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use rasterpdf_core::OutputFormat;
use rasterpdf_core::error::{RasterPdfError, Result};
use tracing::{debug, info, instrument};

const PDF_VERSION: &str = "1.7";
/// Second header line of a PCLm file.
const PCLM_MARK: &str = "%PCLm 1.0";

/// Document information dictionary entries.
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub producer: String,
}

/// Builds one PDF or PCLm document in memory.
pub struct DocumentWriter {
    doc: Document,
    /// Reserved up front so pages can point at their parent.
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl DocumentWriter {
    pub fn new(format: OutputFormat) -> Self {
        let mut doc = Document::with_version(PDF_VERSION);
        if format == OutputFormat::Pclm {
            // lopdf writes the version verbatim after `%PDF-` and counts it
            // in the xref offsets; the binary mark only takes bytes >= 128.
            doc.version = format!("{PDF_VERSION}\n{PCLM_MARK}");
        }
        let pages_id = doc.new_object_id();
        debug!(format = format.mime_type(), "document started");
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    /// Add a stream object and return its reference.
    pub fn add_stream(&mut self, dict: Dictionary, content: Vec<u8>) -> ObjectId {
        self.doc.add_object(Object::Stream(Stream::new(dict, content)))
    }

    /// Number of finished pages.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append a page showing the named image XObjects.
    ///
    /// Every XObject must already be part of the document.
    pub fn add_page(
        &mut self,
        media_box: [f32; 2],
        xobjects: &[(String, ObjectId)],
        content: Vec<u8>,
    ) -> Result<ObjectId> {
        let mut resources = Dictionary::new();
        for (name, id) in xobjects {
            if !self.doc.objects.contains_key(id) {
                return Err(RasterPdfError::InvariantViolation(format!(
                    "page references XObject {name} ({id:?}) that was never written"
                )));
            }
            resources.set(name.as_bytes().to_vec(), Object::Reference(*id));
        }

        let content_id = self.add_stream(Dictionary::new(), content);
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(media_box[0]),
                Object::Real(media_box[1]),
            ],
            "Resources" => dictionary! {
                "XObject" => Object::Dictionary(resources),
            },
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);
        debug!(
            page = self.page_ids.len(),
            width = media_box[0],
            height = media_box[1],
            "page added"
        );
        Ok(page_id)
    }

    /// Write the page tree, catalog and info dictionary, then serialize.
    #[instrument(skip_all, fields(pages = self.page_ids.len()))]
    pub fn finish<W: Write>(mut self, info: &DocumentInfo, output: &mut W) -> Result<()> {
        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut info_dict = dictionary! {
            "Producer" => Object::string_literal(info.producer.as_str()),
            "CreationDate" => Object::string_literal(
                Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()
            ),
        };
        if let Some(title) = &info.title {
            info_dict.set("Title", Object::string_literal(title.as_str()));
        }
        let info_id = self.doc.add_object(info_dict);
        self.doc.trailer.set("Info", info_id);

        self.doc
            .save_to(output)
            .map_err(|err| RasterPdfError::Pdf(format!("failed to serialize document: {err}")))?;
        info!(pages = self.page_ids.len(), "document written");
        Ok(())
    }
}

/// Format a number for a content stream with the shortest representation
/// that reads back as the same `f32`, matching how lopdf writes reals.
pub fn format_number(value: f32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}
