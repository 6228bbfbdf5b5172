// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source documents — the background a user signs on.

use image::RgbaImage;
use inkpad_core::error::{InkpadError, Result};
use inkpad_core::types::{DocumentKind, DocumentType};
use tracing::{info, instrument};

use crate::classify::DocumentClassifier;
use crate::pdf::reader::{MediaBox, PdfReader};
use crate::raster::processor::ImageProcessor;

/// A loaded background document.
pub enum SourceDocument {
    /// A raster image with one implicit page.
    Image(ImageDocument),
    /// A PDF whose original bytes are kept for re-embedding on export.
    Paged(PagedDocument),
}

/// A decoded raster image.
pub struct ImageDocument {
    doc_type: DocumentType,
    pixels: RgbaImage,
}

/// A paged document and the geometry of its pages.
pub struct PagedDocument {
    bytes: Vec<u8>,
    media_boxes: Vec<MediaBox>,
}

impl SourceDocument {
    /// Classify and decode `bytes`.
    ///
    /// Rejections (`OversizeInput`, `UnsupportedFormat`) happen before any
    /// decoding; decoding failures surface as `DocumentLoad`, and a PDF without
    /// pages as `EmptyDocument`.
    #[instrument(skip(bytes), fields(bytes_len = bytes.len()))]
    pub fn load(bytes: Vec<u8>, declared_mime: Option<&str>, max_bytes: usize) -> Result<Self> {
        let doc_type = DocumentClassifier::classify(&bytes, declared_mime, max_bytes)?;

        match doc_type.kind() {
            DocumentKind::Image => {
                let pixels = ImageProcessor::from_bytes(&bytes)
                    .map_err(|err| InkpadError::DocumentLoad(err.to_string()))?
                    .into_rgba();
                info!(
                    format = doc_type.mime_type(),
                    width = pixels.width(),
                    height = pixels.height(),
                    "image document loaded"
                );
                Ok(Self::Image(ImageDocument { doc_type, pixels }))
            }
            DocumentKind::Paged => {
                let reader = PdfReader::from_bytes(&bytes)?;
                if reader.page_count() == 0 {
                    return Err(InkpadError::EmptyDocument);
                }
                let media_boxes = reader.media_boxes();
                info!(pages = media_boxes.len(), "paged document loaded");
                Ok(Self::Paged(PagedDocument { bytes, media_boxes }))
            }
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Image(_) => DocumentKind::Image,
            Self::Paged(_) => DocumentKind::Paged,
        }
    }

    pub fn doc_type(&self) -> DocumentType {
        match self {
            Self::Image(image) => image.doc_type,
            Self::Paged(_) => DocumentType::Pdf,
        }
    }

    pub fn page_count(&self) -> u32 {
        match self {
            Self::Image(_) => 1,
            Self::Paged(paged) => paged.page_count(),
        }
    }
}

impl ImageDocument {
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl PagedDocument {
    /// The original, unmodified document bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn page_count(&self) -> u32 {
        self.media_boxes.len() as u32
    }

    /// MediaBox of `page` (1-based).
    pub fn media_box(&self, page: u32) -> Option<MediaBox> {
        let index = page.checked_sub(1)? as usize;
        self.media_boxes.get(index).copied()
    }
}
