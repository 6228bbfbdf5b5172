// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Viewport transform — maps device (screen) coordinates to surface pixels and
// back under zoom, pan and the display scale of the laid-out surface.
//
// The surface is laid out at `origin` with `fit` size at zoom 1. Zooming scales
// the on-screen size, panning shifts the on-screen rectangle. Neither touches
// surface pixels.

use inkpad_core::config::ZoomConfig;
use inkpad_core::types::Point;

/// Presentation state of the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    config: ZoomConfig,
    zoom: f32,
    pan: Point,
    origin: Point,
    /// On-screen size of the surface at zoom 1.
    fit_width: f32,
    fit_height: f32,
    surface_width: u32,
    surface_height: u32,
    /// Until a host lays the surface out, the fit size follows the surface.
    auto_fit: bool,
}

impl Viewport {
    /// A viewport laid out at the origin, one device pixel per surface pixel.
    pub fn new(config: ZoomConfig, surface_width: u32, surface_height: u32) -> Self {
        Self {
            config,
            zoom: 1.0,
            pan: Point::default(),
            origin: Point::default(),
            fit_width: surface_width as f32,
            fit_height: surface_height as f32,
            surface_width,
            surface_height,
            auto_fit: true,
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan_offset(&self) -> Point {
        self.pan
    }

    pub fn is_zoomed_in(&self) -> bool {
        self.zoom > 1.0
    }

    /// Surface pixels per on-screen pixel along x, at the current zoom.
    fn ratio_x(&self) -> f32 {
        surface_per_fit(self.surface_width, self.fit_width) / self.zoom
    }

    fn ratio_y(&self) -> f32 {
        surface_per_fit(self.surface_height, self.fit_height) / self.zoom
    }

    /// Top-left corner of the surface on screen.
    fn rect_origin(&self) -> Point {
        Point::new(self.origin.x + self.pan.x, self.origin.y + self.pan.y)
    }

    // -- Mapping --------------------------------------------------------------

    pub fn to_surface(&self, device: Point) -> Point {
        let rect = self.rect_origin();
        Point::new(
            (device.x - rect.x) * self.ratio_x(),
            (device.y - rect.y) * self.ratio_y(),
        )
    }

    pub fn to_device(&self, surface: Point) -> Point {
        let rect = self.rect_origin();
        Point::new(
            surface.x / self.ratio_x() + rect.x,
            surface.y / self.ratio_y() + rect.y,
        )
    }

    // -- Zoom -----------------------------------------------------------------

    /// Set the zoom level, clamped to the configured bounds and snapped to the
    /// zoom step. Returns the level actually applied.
    pub fn set_zoom(&mut self, level: f32) -> f32 {
        self.zoom = self.quantise(level);
        self.zoom
    }

    /// Set the zoom level keeping the surface point under `anchor` (device
    /// coordinates) stationary.
    pub fn set_zoom_at(&mut self, level: f32, anchor: Point) -> f32 {
        let pinned = self.to_surface(anchor);
        self.set_zoom(level);
        let moved = self.to_device(pinned);
        self.pan.x += anchor.x - moved.x;
        self.pan.y += anchor.y - moved.y;
        self.zoom
    }

    pub fn zoom_in_at(&mut self, anchor: Point) -> f32 {
        self.set_zoom_at(self.zoom + self.config.step, anchor)
    }

    pub fn zoom_out_at(&mut self, anchor: Point) -> f32 {
        self.set_zoom_at(self.zoom - self.config.step, anchor)
    }

    fn quantise(&self, level: f32) -> f32 {
        let (min, max) = (self.config.min.max(f32::EPSILON), self.config.max);
        let level = if level.is_finite() { level } else { 1.0 };
        let snapped = if self.config.step > 0.0 {
            (level / self.config.step).round() * self.config.step
        } else {
            level
        };
        snapped.clamp(min, max.max(min))
    }

    // -- Pan and layout -------------------------------------------------------

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    /// Back to zoom 1 with no pan.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Point::default();
    }

    /// Where the surface is laid out on screen and its size at zoom 1.
    pub fn set_layout(&mut self, origin: Point, fit_width: f32, fit_height: f32) {
        self.origin = origin;
        self.fit_width = fit_width;
        self.fit_height = fit_height;
        self.auto_fit = false;
    }

    pub fn set_surface_size(&mut self, width: u32, height: u32) {
        self.surface_width = width;
        self.surface_height = height;
        if self.auto_fit {
            self.fit_width = width as f32;
            self.fit_height = height as f32;
        }
    }
}

/// Surface pixels per on-screen pixel at zoom 1. Degenerate sizes map 1:1.
fn surface_per_fit(surface: u32, fit: f32) -> f32 {
    if surface == 0 || !fit.is_finite() || fit <= 0.0 {
        1.0
    } else {
        surface as f32 / fit
    }
}
