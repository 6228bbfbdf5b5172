// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster surface — the live RGBA bitmap strokes are drawn onto.
//
// Segments are stamped as capsules (a line with round caps), which gives round
// joins between consecutive segments and a round dot for zero-length strokes.
// Only pixels whose centre lies inside the capsule are touched.

use image::{Rgba, RgbaImage};
use imageproc::rect::Rect;
use inkpad_core::types::Point;

/// Fully transparent pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Slightly more than half a pixel diagonal, so every stamp covers at least
/// one pixel centre.
const MIN_RADIUS: f32 = 0.75;

/// What a stamp does to the pixels it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    /// Overwrite with an opaque colour.
    Paint(Rgba<u8>),
    /// Clear to fully transparent.
    Erase,
}

/// The drawable bitmap of a session.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: RgbaImage,
}

impl RasterSurface {
    // -- Construction ---------------------------------------------------------

    /// A transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, TRANSPARENT),
        }
    }

    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    // -- Whole-surface operations ---------------------------------------------

    /// Copy of the current pixels.
    pub fn snapshot(&self) -> RgbaImage {
        self.pixels.clone()
    }

    /// Replace the pixels (and size) with `pixels`.
    pub fn restore(&mut self, pixels: RgbaImage) {
        self.pixels = pixels;
    }

    /// Clear every pixel to transparent, keeping the size.
    pub fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    // -- Stamping -------------------------------------------------------------

    /// Stamp a capsule of `width` from `from` to `to` and return the region
    /// that may have changed, or `None` when the capsule misses the surface.
    pub fn stamp_segment(&mut self, from: Point, to: Point, width: f32, ink: Ink) -> Option<Rect> {
        if self.pixels.width() == 0 || self.pixels.height() == 0 {
            return None;
        }
        let radius = (width / 2.0).max(MIN_RADIUS);
        if !radius.is_finite() || ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
            return None;
        }

        let left = (from.x.min(to.x) - radius).floor() as i64;
        let top = (from.y.min(to.y) - radius).floor() as i64;
        let right = (from.x.max(to.x) + radius).ceil() as i64;
        let bottom = (from.y.max(to.y) + radius).ceil() as i64;
        let bounds = Rect::at(
            left.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            top.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        )
        .of_size(
            (right - left + 1).clamp(1, u32::MAX as i64) as u32,
            (bottom - top + 1).clamp(1, u32::MAX as i64) as u32,
        );
        let canvas = Rect::at(0, 0).of_size(self.pixels.width(), self.pixels.height());
        let dirty = bounds.intersect(canvas)?;

        let color = match ink {
            Ink::Paint(color) => Rgba([color.0[0], color.0[1], color.0[2], 255]),
            Ink::Erase => TRANSPARENT,
        };
        let radius_sq = radius * radius;
        for y in dirty.top()..=dirty.bottom() {
            for x in dirty.left()..=dirty.right() {
                let centre = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_sq_to_segment(centre, from, to) <= radius_sq {
                    self.pixels.put_pixel(x as u32, y as u32, color);
                }
            }
        }
        Some(dirty)
    }
}

/// Squared distance from `p` to the segment `a`–`b`.
fn distance_sq_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    (p.x - cx) * (p.x - cx) + (p.y - cy) * (p.y - cy)
}
