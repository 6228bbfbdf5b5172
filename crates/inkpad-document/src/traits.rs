// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator traits.
//
// The overlay engine never rasterises or rewrites documents itself. Rendering a
// page into a bitmap and embedding ink into a document are delegated to
// implementations of these traits, so hosts can plug in a full PDF rasteriser
// or a different document format without touching the engine.

use std::future::Future;

use image::RgbaImage;
use inkpad_core::error::Result;

use crate::source::SourceDocument;

/// Rasterises document pages.
///
/// Implementations must be deterministic enough that two renders of the same
/// page differ by no more than the configured diff tolerance, because ink
/// extraction compares a stored overlay against a fresh render.
pub trait PageRenderer {
    /// Render `page` (1-based) of `source` at `scale` pixels per document unit.
    fn render_page(
        &self,
        source: &SourceDocument,
        page: u32,
        scale: f32,
    ) -> impl Future<Output = Result<RgbaImage>> + Send;
}

/// Embeds ink layers into a document and re-serialises it.
pub trait DocumentMutator: Sized {
    /// Open a document from its original bytes.
    fn load(bytes: &[u8]) -> Result<Self>;

    /// Stretch a transparent PNG over the whole of `page` (1-based).
    fn embed_image(&mut self, page: u32, png: &[u8]) -> Result<()>;

    /// Serialise the mutated document.
    fn serialize(&mut self) -> Result<Vec<u8>>;
}
