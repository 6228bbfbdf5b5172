// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export artifacts.
//
// Paged documents are re-serialised with each page's ink layer embedded through
// a `DocumentMutator`. Image documents and standalone marks are flattened to
// PNG. Artifacts are built entirely in memory and only returned on success.

use image::RgbaImage;
use inkpad_core::error::{InkpadError, Result};
use inkpad_core::types::ExportKind;
use inkpad_document::integrity::hash_bytes;
use inkpad_document::raster::processor::encode_png;
use inkpad_document::traits::DocumentMutator;
use tracing::{info, instrument};

use crate::extract::InkLayer;

/// A finished export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub kind: ExportKind,
    pub bytes: Vec<u8>,
    /// SHA-256 of `bytes`, hex encoded.
    pub digest: String,
}

impl ExportArtifact {
    pub fn new(kind: ExportKind, bytes: Vec<u8>) -> Self {
        let digest = hash_bytes(&bytes);
        Self {
            kind,
            bytes,
            digest,
        }
    }

    pub fn file_name(&self) -> &'static str {
        self.kind.file_name()
    }

    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }
}

/// Encode a whole surface as PNG.
pub fn flatten_png(kind: ExportKind, surface: &RgbaImage) -> Result<ExportArtifact> {
    let bytes = encode_png(surface).map_err(|err| InkpadError::ExportFailed(err.to_string()))?;
    Ok(ExportArtifact::new(kind, bytes))
}

/// Embed every non-empty layer into the document held in `source` and
/// serialise it.
#[instrument(skip_all, fields(source_len = source.len(), layers = layers.len()))]
pub fn export_document<M: DocumentMutator>(source: &[u8], layers: &[InkLayer]) -> Result<ExportArtifact> {
    let mut document = M::load(source).map_err(export_failure)?;
    let mut embedded = 0;
    for layer in layers.iter().filter(|layer| !layer.is_empty()) {
        let png = layer.to_png().map_err(export_failure)?;
        document
            .embed_image(layer.page(), &png)
            .map_err(export_failure)?;
        embedded += 1;
    }
    let bytes = document.serialize().map_err(export_failure)?;
    let artifact = ExportArtifact::new(ExportKind::SignedDocumentPdf, bytes);
    info!(embedded, digest = %artifact.digest, "document exported");
    Ok(artifact)
}

fn export_failure(err: InkpadError) -> InkpadError {
    match err {
        InkpadError::ExportFailed(_) => err,
        other => InkpadError::ExportFailed(other.to_string()),
    }
}
