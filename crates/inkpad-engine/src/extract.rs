// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Overlay extraction — separate the user's ink from the page background by
// differencing a stored overlay against a fresh render of the same page.

use image::{Rgba, RgbaImage};
use inkpad_core::error::{InkpadError, Result};
use inkpad_document::integrity::hash_bytes;
use inkpad_document::raster::processor::encode_png;
use tracing::debug;

use crate::surface::TRANSPARENT;

/// Transparent layer holding only the ink of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct InkLayer {
    page: u32,
    pixels: RgbaImage,
}

impl InkLayer {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    pub fn ink_pixel_count(&self) -> usize {
        self.pixels.pixels().filter(|p| p.0[3] != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.pixels().all(|p| p.0[3] == 0)
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.pixels)
    }

    /// SHA-256 of the raw RGBA pixels, hex encoded.
    pub fn digest(&self) -> String {
        hash_bytes(self.pixels.as_raw())
    }
}

/// Difference `overlay` against `background`.
///
/// A pixel is ink when any RGBA channel differs by more than `tolerance`; the
/// output takes the overlay colour at full opacity there and is transparent
/// elsewhere. Erased (fully transparent) overlay pixels never count as ink.
pub fn extract_ink(
    page: u32,
    overlay: &RgbaImage,
    background: &RgbaImage,
    tolerance: u8,
) -> Result<InkLayer> {
    if overlay.dimensions() != background.dimensions() {
        return Err(InkpadError::RenderFailed {
            page,
            reason: format!(
                "render is {}x{} but the stored overlay is {}x{}",
                background.width(),
                background.height(),
                overlay.width(),
                overlay.height()
            ),
        });
    }

    let mut pixels = RgbaImage::from_pixel(overlay.width(), overlay.height(), TRANSPARENT);
    for ((out, ink), clean) in pixels
        .pixels_mut()
        .zip(overlay.pixels())
        .zip(background.pixels())
    {
        if ink.0[3] != 0 && differs(ink, clean, tolerance) {
            *out = Rgba([ink.0[0], ink.0[1], ink.0[2], 255]);
        }
    }

    let layer = InkLayer { page, pixels };
    debug!(page, ink_pixels = layer.ink_pixel_count(), "ink extracted");
    Ok(layer)
}

/// Whether any channel differs by more than `tolerance`.
pub(crate) fn differs(a: &Rgba<u8>, b: &Rgba<u8>, tolerance: u8) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .any(|(x, y)| x.abs_diff(*y) > tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn ink_is_opaque_and_background_transparent() {
        let background = RgbaImage::from_pixel(4, 4, WHITE);
        let mut overlay = background.clone();
        overlay.put_pixel(1, 2, Rgba([20, 30, 40, 255]));

        let layer = extract_ink(1, &overlay, &background, 4).unwrap();
        assert_eq!(*layer.pixels().get_pixel(1, 2), Rgba([20, 30, 40, 255]));
        assert_eq!(*layer.pixels().get_pixel(0, 0), TRANSPARENT);
        assert_eq!(layer.ink_pixel_count(), 1);
        assert!(!layer.is_empty());
    }

    #[test]
    fn differences_within_tolerance_are_ignored() {
        let background = RgbaImage::from_pixel(2, 1, WHITE);
        let mut overlay = background.clone();
        overlay.put_pixel(0, 0, Rgba([251, 255, 255, 255]));
        overlay.put_pixel(1, 0, Rgba([250, 255, 255, 255]));

        let layer = extract_ink(1, &overlay, &background, 4).unwrap();
        assert_eq!(layer.pixels().get_pixel(0, 0).0[3], 0);
        assert_eq!(layer.pixels().get_pixel(1, 0).0[3], 255);
    }

    #[test]
    fn alpha_differences_count() {
        let background = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 100]));
        let overlay = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        assert_eq!(extract_ink(1, &overlay, &background, 4).unwrap().ink_pixel_count(), 1);
    }

    #[test]
    fn erased_pixels_are_not_ink() {
        let background = RgbaImage::from_pixel(1, 1, WHITE);
        let overlay = RgbaImage::from_pixel(1, 1, TRANSPARENT);
        assert!(extract_ink(1, &overlay, &background, 4).unwrap().is_empty());
    }

    #[test]
    fn size_mismatch_is_a_render_failure() {
        let err = extract_ink(
            2,
            &RgbaImage::new(4, 4),
            &RgbaImage::new(4, 5),
            4,
        )
        .unwrap_err();
        assert!(matches!(err, InkpadError::RenderFailed { page: 2, .. }));
    }

    #[test]
    fn extraction_is_idempotent() {
        let background = RgbaImage::from_pixel(8, 8, WHITE);
        let mut overlay = background.clone();
        overlay.put_pixel(3, 3, Rgba([0, 0, 0, 255]));

        let first = extract_ink(1, &overlay, &background, 4).unwrap();
        let second = extract_ink(1, &overlay, &background, 4).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.digest(), second.digest());
        assert_eq!(first.to_png().unwrap(), second.to_png().unwrap());
    }
}
