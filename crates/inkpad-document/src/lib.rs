// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// inkpad-document — Document handling for the Inkpad overlay engine.
//
// Classifies incoming bytes (image vs. PDF), decodes and encodes raster images,
// inspects PDF page geometry, defines the rendering and mutation collaborator
// traits, and ships one implementation of each: a renderer for images and
// blank paper, and a PDF writer that embeds transparent ink layers per page.

pub mod classify;
pub mod integrity;
pub mod pdf;
pub mod raster;
pub mod render;
pub mod source;
pub mod traits;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod testing;

// Re-export the primary structs so callers can use `inkpad_document::PdfReader` etc.
pub use classify::DocumentClassifier;
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfInkWriter;
pub use raster::processor::ImageProcessor;
pub use render::BasicRenderer;
pub use source::{ImageDocument, PagedDocument, SourceDocument};
pub use traits::{DocumentMutator, PageRenderer};
