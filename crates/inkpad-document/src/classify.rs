// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input classification — decide whether incoming bytes are a raster image or a
// paged (PDF) document before any decoding happens.
//
// The declared MIME type wins when it names a supported format. Generic or
// missing types fall back to sniffing magic bytes.

use image::ImageFormat;
use tracing::{debug, warn};

use inkpad_core::error::{InkpadError, Result};
use inkpad_core::types::DocumentType;

/// MIME types that say nothing about the content and trigger sniffing.
const GENERIC_MIME_TYPES: &[&str] = &["", "application/octet-stream", "binary/octet-stream"];

/// The PDF header may be preceded by junk within the first kilobyte.
const PDF_HEADER_WINDOW: usize = 1024;

/// Classifies raw input bytes.
pub struct DocumentClassifier;

impl DocumentClassifier {
    /// Classify `bytes`, enforcing the `max_bytes` ceiling first.
    ///
    /// Fails with `OversizeInput` when the input is too large and with
    /// `UnsupportedFormat` when it is neither an image nor a PDF.
    pub fn classify(
        bytes: &[u8],
        declared_mime: Option<&str>,
        max_bytes: usize,
    ) -> Result<DocumentType> {
        if bytes.len() > max_bytes {
            warn!(size = bytes.len(), limit = max_bytes, "input rejected: too large");
            return Err(InkpadError::OversizeInput {
                size: bytes.len(),
                limit: max_bytes,
            });
        }

        let declared = declared_mime.map(str::trim).unwrap_or_default();
        if !GENERIC_MIME_TYPES.contains(&declared.to_ascii_lowercase().as_str()) {
            return DocumentType::from_mime(declared).ok_or_else(|| {
                warn!(mime = declared, "input rejected: unsupported MIME type");
                InkpadError::UnsupportedFormat(declared.to_string())
            });
        }

        let sniffed = sniff(bytes).ok_or_else(|| {
            InkpadError::UnsupportedFormat("unrecognised file content".to_string())
        })?;
        debug!(format = sniffed.mime_type(), "classified input by content");
        Ok(sniffed)
    }
}

/// Identify a document type from its leading bytes.
fn sniff(bytes: &[u8]) -> Option<DocumentType> {
    let window = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
    if window.windows(5).any(|chunk| chunk == b"%PDF-") {
        return Some(DocumentType::Pdf);
    }

    match image::guess_format(bytes).ok()? {
        ImageFormat::Png => Some(DocumentType::Png),
        ImageFormat::Jpeg => Some(DocumentType::Jpeg),
        ImageFormat::Gif => Some(DocumentType::Gif),
        ImageFormat::WebP => Some(DocumentType::Webp),
        ImageFormat::Bmp => Some(DocumentType::Bmp),
        ImageFormat::Tiff => Some(DocumentType::Tiff),
        _ => None,
    }
}
