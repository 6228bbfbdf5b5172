// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine test fixtures: PNGs and a renderer whose failures can be switched on
// per page. PDFs come from `inkpad_document::testing`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use image::{Rgba, RgbaImage};
use inkpad_core::error::{InkpadError, Result};
use inkpad_document::raster::processor::encode_png;
use inkpad_document::{BasicRenderer, PageRenderer, SourceDocument};

/// A solid-colour PNG.
pub(crate) fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    encode_png(&RgbaImage::from_pixel(width, height, Rgba(color))).unwrap()
}

/// Wraps `BasicRenderer`; renders of the page stored in `fail_page` fail.
#[derive(Clone, Default)]
pub(crate) struct FlakyRenderer {
    inner: BasicRenderer,
    fail_page: Arc<AtomicU32>,
}

impl FlakyRenderer {
    /// Handle for switching failures on after the session owns the renderer.
    pub(crate) fn failure_switch(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.fail_page)
    }
}

impl PageRenderer for FlakyRenderer {
    async fn render_page(&self, source: &SourceDocument, page: u32, scale: f32) -> Result<RgbaImage> {
        if self.fail_page.load(Ordering::SeqCst) == page {
            return Err(InkpadError::RenderFailed {
                page,
                reason: "rasteriser crashed".to_string(),
            });
        }
        self.inner.render_page(source, page, scale).await
    }
}
