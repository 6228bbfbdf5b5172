// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editor configuration.

use serde::{Deserialize, Serialize};

use crate::types::{InkColor, PageSize, Tool};

/// Tunables for an editor session. Every field has a default, so partial
/// JSON documents deserialise cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Inputs larger than this are rejected before decoding (default 10 MiB).
    pub max_input_bytes: usize,
    /// Surface size used when no document is loaded.
    pub blank_surface: PageSize,
    /// Render scale for image documents.
    pub image_render_scale: f32,
    /// Render scale for paged documents. Higher than images to preserve quality.
    pub paged_render_scale: f32,
    /// Per-channel difference tolerated between a stored overlay and a fresh
    /// render before a pixel counts as ink.
    pub diff_tolerance: u8,
    /// Maximum undo entries kept; the oldest entry is dropped beyond this.
    pub undo_limit: usize,
    pub stroke: StrokeConfig,
    pub zoom: ZoomConfig,
    pub gesture: GestureConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 10 * 1024 * 1024,
            blank_surface: PageSize::new(800, 400),
            image_render_scale: 1.0,
            paged_render_scale: 2.0,
            diff_tolerance: 4,
            undo_limit: 50,
            stroke: StrokeConfig::default(),
            zoom: ZoomConfig::default(),
            gesture: GestureConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Pen behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    /// Base line width in document units.
    pub base_width: f32,
    /// Speed (document pixels per millisecond) at which thinning saturates.
    pub max_speed: f32,
    /// Fraction of the base width removed at saturation speed.
    pub damping: f32,
    pub color: InkColor,
    pub tool: Tool,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            base_width: 5.0,
            max_speed: 3.0,
            damping: 0.9,
            color: InkColor::BLACK,
            tool: Tool::Pen,
        }
    }
}

/// Zoom bounds and quantisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f32,
    pub max: f32,
    /// Zoom levels snap to multiples of this step.
    pub step: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.25,
            max: 4.0,
            step: 0.25,
        }
    }
}

/// Multi-touch classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Relative change in pinch distance between samples that counts as zoom.
    pub pinch_threshold: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.05,
        }
    }
}
