// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ink smoothing — soften jagged stroke edges with a 3×3 box blur applied to
// ink pixels only, leaving the background untouched.

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::extract::differs;

/// On a blank surface, a pixel with every colour channel at or above this is
/// paper rather than ink.
const NEAR_WHITE: u8 = 250;

/// Blur the ink on `surface` in place and return the number of pixels changed.
///
/// With a `background`, ink is whatever differs from it by more than
/// `tolerance`. Without one, ink is any visible pixel that is not near-white.
pub fn smooth_ink(surface: &mut RgbaImage, background: Option<&RgbaImage>, tolerance: u8) -> usize {
    let source = surface.clone();
    let (width, height) = source.dimensions();
    let background = background.filter(|bg| bg.dimensions() == source.dimensions());

    let mut changed = 0;
    for (x, y, pixel) in source.enumerate_pixels() {
        let is_ink = match background {
            Some(bg) => differs(pixel, bg.get_pixel(x, y), tolerance),
            None => pixel.0[3] != 0 && pixel.0[..3].iter().any(|c| *c < NEAR_WHITE),
        };
        if !is_ink {
            continue;
        }

        let mut sum = [0u32; 4];
        let mut count = 0u32;
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                let neighbour = source.get_pixel(nx, ny);
                for (total, channel) in sum.iter_mut().zip(neighbour.0.iter()) {
                    *total += u32::from(*channel);
                }
                count += 1;
            }
        }
        let blurred = Rgba(sum.map(|total| ((total + count / 2) / count) as u8));
        if blurred != *pixel {
            surface.put_pixel(x, y, blurred);
            changed += 1;
        }
    }

    debug!(changed, "ink smoothed");
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn background_pixels_are_untouched() {
        let background = RgbaImage::from_pixel(5, 5, WHITE);
        let mut surface = background.clone();
        surface.put_pixel(2, 2, BLACK);

        smooth_ink(&mut surface, Some(&background), 4);
        // The isolated ink pixel is lightened by its white neighbours.
        let centre = surface.get_pixel(2, 2).0;
        assert!(centre[0] > 200 && centre[0] < 255);
        // Neighbours are background and keep their colour.
        assert_eq!(*surface.get_pixel(1, 1), WHITE);
        assert_eq!(*surface.get_pixel(3, 2), WHITE);
    }

    #[test]
    fn blank_surface_uses_near_white_rule() {
        let mut surface = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 0]));
        for x in 0..3 {
            surface.put_pixel(x, 1, BLACK);
        }
        let changed = smooth_ink(&mut surface, None, 4);

        assert_eq!(changed, 3);
        // Transparent neighbours soften the line's alpha.
        assert!(surface.get_pixel(1, 1).0[3] < 255);
        assert_eq!(surface.get_pixel(1, 0).0[3], 0);
    }

    #[test]
    fn uniform_ink_is_stable() {
        let mut surface = RgbaImage::from_pixel(4, 4, BLACK);
        assert_eq!(smooth_ink(&mut surface, None, 4), 0);
    }
}
