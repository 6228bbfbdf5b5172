// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bundled page renderer.
//
// Image documents render from their decoded pixels. Paged documents render as
// blank paper at MediaBox size, which is exact for blank forms and keeps
// headless signing and tests deterministic. Hosts with a real PDF rasteriser
// provide their own `PageRenderer`.

use image::{Rgba, RgbaImage};
use inkpad_core::error::{InkpadError, Result};
use tracing::debug;

use crate::raster::processor::ImageProcessor;
use crate::source::SourceDocument;
use crate::traits::PageRenderer;

/// Renders larger than this many pixels are refused.
const MAX_RENDER_PIXELS: u64 = 80_000_000;

/// Colour of paged-document pages.
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Renderer for image documents and blank paper.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRenderer;

impl BasicRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl PageRenderer for BasicRenderer {
    async fn render_page(&self, source: &SourceDocument, page: u32, scale: f32) -> Result<RgbaImage> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(InkpadError::RenderFailed {
                page,
                reason: format!("invalid render scale {scale}"),
            });
        }

        let rendered = match source {
            SourceDocument::Image(image) => {
                if page != 1 {
                    return Err(InkpadError::RenderFailed {
                        page,
                        reason: "image documents have a single page".to_string(),
                    });
                }
                check_size(page, image.pixels().width(), image.pixels().height(), scale)?;
                ImageProcessor::from_rgba(image.pixels().clone())
                    .scale(scale)
                    .into_rgba()
            }
            SourceDocument::Paged(paged) => {
                let media_box = paged.media_box(page).ok_or_else(|| InkpadError::RenderFailed {
                    page,
                    reason: format!("document has {} pages", paged.page_count()),
                })?;
                let width = ((media_box.width() * scale as f64).round() as u32).max(1);
                let height = ((media_box.height() * scale as f64).round() as u32).max(1);
                check_size(page, width, height, 1.0)?;
                RgbaImage::from_pixel(width, height, PAPER)
            }
        };

        debug!(
            page,
            scale,
            width = rendered.width(),
            height = rendered.height(),
            "page rendered"
        );
        Ok(rendered)
    }
}

fn check_size(page: u32, width: u32, height: u32, scale: f32) -> Result<()> {
    let scaled_w = (width as f64 * scale as f64).round() as u64;
    let scaled_h = (height as f64 * scale as f64).round() as u64;
    if scaled_w.saturating_mul(scaled_h) > MAX_RENDER_PIXELS {
        return Err(InkpadError::RenderFailed {
            page,
            reason: format!("{scaled_w}x{scaled_h} exceeds the render size limit"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::pdf_with_pages;
    use crate::raster::processor::encode_png;

    fn paged() -> SourceDocument {
        SourceDocument::load(pdf_with_pages(&[(100, 50), (60, 80)], false), None, usize::MAX)
            .unwrap()
    }

    #[tokio::test]
    async fn paged_pages_render_at_media_box_times_scale() {
        let renderer = BasicRenderer::new();
        let page = renderer.render_page(&paged(), 2, 2.0).await.unwrap();
        assert_eq!(page.dimensions(), (120, 160));
        assert_eq!(*page.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[tokio::test]
    async fn renders_are_deterministic() {
        let renderer = BasicRenderer::new();
        let source = paged();
        let first = renderer.render_page(&source, 1, 2.0).await.unwrap();
        let second = renderer.render_page(&source, 1, 2.0).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn image_documents_have_one_page() {
        let png = encode_png(&RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]))).unwrap();
        let source = SourceDocument::load(png, None, 1024 * 1024).unwrap();
        let renderer = BasicRenderer::new();

        let page = renderer.render_page(&source, 1, 1.0).await.unwrap();
        assert_eq!(*page.get_pixel(3, 3), Rgba([9, 9, 9, 255]));

        let err = renderer.render_page(&source, 2, 1.0).await.unwrap_err();
        assert!(matches!(err, InkpadError::RenderFailed { page: 2, .. }));
    }

    #[tokio::test]
    async fn out_of_range_page_fails() {
        let err = BasicRenderer::new()
            .render_page(&paged(), 3, 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, InkpadError::RenderFailed { page: 3, .. }));
    }
}
