// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stroke renderer — turns timestamped pointer samples into line segments whose
// width thins out as the pen moves faster.

use image::Rgba;
use imageproc::rect::Rect;
use inkpad_core::config::StrokeConfig;
use inkpad_core::types::{InkColor, Point, Tool};
use tracing::trace;

use crate::surface::{Ink, RasterSurface};

/// Narrowest line the pen ever draws, in surface pixels.
const MIN_WIDTH: f32 = 1.0;

/// Tool, colour and base width of the pen.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub tool: Tool,
    pub color: InkColor,
    /// Base width in document units; multiplied by the render scale.
    pub base_width: f32,
}

impl StrokeStyle {
    pub fn from_config(config: &StrokeConfig) -> Self {
        Self {
            tool: config.tool,
            color: config.color,
            base_width: config.base_width,
        }
    }

    pub fn ink(&self) -> Ink {
        match self.tool {
            Tool::Pen => Ink::Paint(Rgba(self.color.to_rgba())),
            Tool::Eraser => Ink::Erase,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::from_config(&StrokeConfig::default())
    }
}

/// Transient state of the stroke in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeState {
    /// Last sample; `None` while the stroke is armed but not yet positioned.
    pub last_point: Option<Point>,
    pub last_time_ms: f64,
    /// Width of the most recent segment, in surface pixels.
    pub width: f32,
    /// Style captured when the stroke started.
    style: StrokeStyle,
    render_scale: f32,
}

/// Speed-modulated stroke rendering.
#[derive(Debug, Clone)]
pub struct StrokeRenderer {
    max_speed: f32,
    damping: f32,
    state: Option<StrokeState>,
}

impl StrokeRenderer {
    pub fn new(config: &StrokeConfig) -> Self {
        Self {
            max_speed: config.max_speed,
            damping: config.damping,
            state: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Armed but not yet positioned.
    pub fn is_armed(&self) -> bool {
        self.state.as_ref().is_some_and(|state| state.last_point.is_none())
    }

    pub fn state(&self) -> Option<&StrokeState> {
        self.state.as_ref()
    }

    /// Start a stroke without drawing. The first `extend` only positions the pen.
    pub fn arm(&mut self, style: &StrokeStyle, render_scale: f32) {
        self.state = Some(StrokeState {
            last_point: None,
            last_time_ms: 0.0,
            width: base_width(style, render_scale),
            style: style.clone(),
            render_scale,
        });
    }

    /// Start a stroke at `point` and stamp a single dot so a tap is visible.
    pub fn begin(
        &mut self,
        surface: &mut RasterSurface,
        point: Point,
        time_ms: f64,
        style: &StrokeStyle,
        render_scale: f32,
    ) -> Option<Rect> {
        let width = base_width(style, render_scale);
        self.state = Some(StrokeState {
            last_point: Some(point),
            last_time_ms: time_ms,
            width,
            style: style.clone(),
            render_scale,
        });
        surface.stamp_segment(point, point, width, style.ink())
    }

    /// Draw from the last sample to `point`.
    ///
    /// Returns the region that changed, or `None` when no stroke is active,
    /// the stroke was only being positioned, or the segment missed the surface.
    pub fn extend(&mut self, surface: &mut RasterSurface, point: Point, time_ms: f64) -> Option<Rect> {
        let (max_speed, damping) = (self.max_speed, self.damping);
        let state = self.state.as_mut()?;
        let Some(last) = state.last_point else {
            state.last_point = Some(point);
            state.last_time_ms = time_ms;
            return None;
        };

        let elapsed = time_ms - state.last_time_ms;
        if elapsed > 0.0 {
            state.width = match state.style.tool {
                Tool::Pen => {
                    let distance = last.distance_to(point) / state.render_scale;
                    let speed = distance / elapsed as f32;
                    let factor = if max_speed > 0.0 {
                        (speed / max_speed).min(1.0)
                    } else {
                        1.0
                    };
                    (base_width(&state.style, state.render_scale) * (1.0 - factor * damping))
                        .max(MIN_WIDTH)
                }
                Tool::Eraser => base_width(&state.style, state.render_scale),
            };
        }
        trace!(elapsed, width = state.width, "stroke segment");

        let dirty = surface.stamp_segment(last, point, state.width, state.style.ink());
        state.last_point = Some(point);
        state.last_time_ms = time_ms;
        dirty
    }

    /// Finish the stroke. Returns whether one was active.
    pub fn end(&mut self) -> bool {
        self.state.take().is_some()
    }
}

impl Default for StrokeRenderer {
    fn default() -> Self {
        Self::new(&StrokeConfig::default())
    }
}

fn base_width(style: &StrokeStyle, render_scale: f32) -> f32 {
    (style.base_width * render_scale).max(MIN_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink_count(surface: &RasterSurface) -> usize {
        surface.pixels().pixels().filter(|p| p.0[3] != 0).count()
    }

    #[test]
    fn begin_stamps_a_dot() {
        let mut surface = RasterSurface::new(30, 30);
        let mut renderer = StrokeRenderer::default();
        let dirty = renderer.begin(&mut surface, Point::new(15.0, 15.0), 0.0, &StrokeStyle::default(), 1.0);
        assert!(dirty.is_some());
        assert!(renderer.is_active());
        assert_eq!(surface.pixels().get_pixel(15, 15).0, [0, 0, 0, 255]);
    }

    #[test]
    fn slow_strokes_keep_base_width() {
        let mut renderer = StrokeRenderer::default();
        let mut surface = RasterSurface::new(100, 20);
        renderer.begin(&mut surface, Point::new(0.0, 10.0), 0.0, &StrokeStyle::default(), 1.0);
        renderer.extend(&mut surface, Point::new(1.0, 10.0), 1000.0);
        let width = renderer.state().unwrap().width;
        assert!((width - 5.0).abs() < 0.01, "width {width}");
    }

    #[test]
    fn fast_strokes_thin_out_to_the_floor() {
        let mut renderer = StrokeRenderer::default();
        let mut surface = RasterSurface::new(100, 20);
        renderer.begin(&mut surface, Point::new(0.0, 10.0), 0.0, &StrokeStyle::default(), 1.0);
        // 90 px in 10 ms is well above the 3 px/ms saturation speed.
        renderer.extend(&mut surface, Point::new(90.0, 10.0), 10.0);
        let width = renderer.state().unwrap().width;
        assert!((width - 1.0).abs() < 1e-4, "width {width}");
    }

    #[test]
    fn zero_elapsed_time_keeps_previous_width() {
        let mut renderer = StrokeRenderer::default();
        let mut surface = RasterSurface::new(100, 20);
        renderer.begin(&mut surface, Point::new(0.0, 10.0), 0.0, &StrokeStyle::default(), 1.0);
        renderer.extend(&mut surface, Point::new(30.0, 10.0), 10.0);
        let before = renderer.state().unwrap().width;
        renderer.extend(&mut surface, Point::new(60.0, 10.0), 10.0);
        assert_eq!(renderer.state().unwrap().width, before);
    }

    #[test]
    fn speed_is_measured_in_document_units() {
        let mut renderer = StrokeRenderer::default();
        let mut surface = RasterSurface::new(200, 40);
        renderer.begin(&mut surface, Point::new(0.0, 20.0), 0.0, &StrokeStyle::default(), 2.0);
        // 30 surface px at scale 2 is 15 document px in 10 ms: half of max speed.
        renderer.extend(&mut surface, Point::new(30.0, 20.0), 10.0);
        let expected = 10.0 * (1.0 - 0.5 * 0.9);
        assert!((renderer.state().unwrap().width - expected).abs() < 1e-3);
    }

    #[test]
    fn armed_stroke_positions_before_drawing() {
        let mut renderer = StrokeRenderer::default();
        let mut surface = RasterSurface::new(50, 50);
        renderer.arm(&StrokeStyle::default(), 1.0);
        assert!(renderer.is_armed());

        assert!(renderer.extend(&mut surface, Point::new(10.0, 10.0), 0.0).is_none());
        assert_eq!(ink_count(&surface), 0);
        assert!(!renderer.is_armed());

        assert!(renderer.extend(&mut surface, Point::new(40.0, 10.0), 100.0).is_some());
        assert!(ink_count(&surface) > 0);
        assert!(renderer.end());
        assert!(!renderer.end());
    }

    #[test]
    fn eraser_keeps_constant_width_and_clears() {
        let style = StrokeStyle {
            tool: Tool::Eraser,
            ..StrokeStyle::default()
        };
        let mut surface = RasterSurface::from_image(image::RgbaImage::from_pixel(
            100,
            20,
            Rgba([255, 255, 255, 255]),
        ));
        let mut renderer = StrokeRenderer::default();
        renderer.begin(&mut surface, Point::new(0.0, 10.0), 0.0, &style, 1.0);
        renderer.extend(&mut surface, Point::new(90.0, 10.0), 1.0);

        assert_eq!(renderer.state().unwrap().width, 5.0);
        assert_eq!(surface.pixels().get_pixel(45, 10).0[3], 0);
    }

    #[test]
    fn extend_without_stroke_is_a_no_op() {
        let mut renderer = StrokeRenderer::default();
        let mut surface = RasterSurface::new(10, 10);
        assert!(renderer.extend(&mut surface, Point::new(5.0, 5.0), 1.0).is_none());
        assert_eq!(ink_count(&surface), 0);
    }
}
