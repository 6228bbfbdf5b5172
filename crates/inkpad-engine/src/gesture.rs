// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Gesture recogniser — classifies raw pointer samples into drawing, pinch
// zoom/pan and single-pointer pan.
//
// One primary pointer draws. A pointer pressed with the auxiliary button pans.
// A second pointer discards the stroke in progress and starts a pinch; once a
// pinch has begun, nothing draws again until every pointer is lifted.

use std::collections::BTreeMap;

use inkpad_core::config::GestureConfig;
use inkpad_core::types::Point;
use tracing::debug;

use crate::input::PointerButton;

/// One pointer sample in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub id: u32,
    pub position: Point,
    pub time_ms: f64,
}

impl PointerSample {
    pub fn new(id: u32, x: f32, y: f32, time_ms: f64) -> Self {
        Self {
            id,
            position: Point::new(x, y),
            time_ms,
        }
    }
}

/// Classified gesture, in device coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    StartDraw { point: Point, time_ms: f64 },
    ContinueDraw { point: Point, time_ms: f64 },
    EndDraw,
    /// The stroke was the first finger of a pinch; undo what it drew.
    CancelDraw,
    StartPinch { midpoint: Point },
    /// `scale` is relative to the zoom level when the pinch started.
    ContinuePinchZoom { scale: f32, anchor: Point },
    ContinuePinchPan { dx: f32, dy: f32 },
    StartPan { point: Point },
    ContinuePan { dx: f32, dy: f32 },
    EndPan,
}

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Idle,
    Drawing {
        id: u32,
    },
    Panning {
        id: u32,
        last: Point,
    },
    Pinching {
        initial_distance: f32,
        last_distance: f32,
        last_midpoint: Point,
    },
    /// A pinch ended with a pointer still down; wait for it to lift.
    Suppressed,
}

/// Multi-pointer gesture state machine.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    pinch_threshold: f32,
    pointers: BTreeMap<u32, Point>,
    mode: Mode,
}

impl GestureRecognizer {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            pinch_threshold: config.pinch_threshold,
            pointers: BTreeMap::new(),
            mode: Mode::Idle,
        }
    }

    /// Whether no pointer is down.
    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Idle
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, Mode::Drawing { .. })
    }

    pub fn pointer_down(&mut self, sample: PointerSample, button: PointerButton) -> Vec<GestureEvent> {
        if self.pointers.len() >= 2 || self.pointers.contains_key(&sample.id) {
            return Vec::new();
        }

        match self.mode {
            Mode::Idle => match button {
                PointerButton::Primary => {
                    self.pointers.insert(sample.id, sample.position);
                    self.mode = Mode::Drawing { id: sample.id };
                    vec![GestureEvent::StartDraw {
                        point: sample.position,
                        time_ms: sample.time_ms,
                    }]
                }
                PointerButton::Auxiliary => {
                    self.pointers.insert(sample.id, sample.position);
                    self.mode = Mode::Panning {
                        id: sample.id,
                        last: sample.position,
                    };
                    vec![GestureEvent::StartPan {
                        point: sample.position,
                    }]
                }
                PointerButton::Secondary => Vec::new(),
            },
            Mode::Drawing { .. } => {
                self.pointers.insert(sample.id, sample.position);
                let mut events = vec![GestureEvent::CancelDraw];
                events.extend(self.start_pinch());
                events
            }
            Mode::Suppressed => {
                self.pointers.insert(sample.id, sample.position);
                self.start_pinch()
            }
            // A mouse pan does not combine with touches.
            Mode::Panning { .. } | Mode::Pinching { .. } => Vec::new(),
        }
    }

    /// Track a pointer move. `zoomed_in` enables two-finger panning.
    pub fn pointer_move(&mut self, sample: PointerSample, zoomed_in: bool) -> Vec<GestureEvent> {
        let Some(position) = self.pointers.get_mut(&sample.id) else {
            return Vec::new();
        };
        *position = sample.position;

        match self.mode.clone() {
            Mode::Drawing { id } if id == sample.id => vec![GestureEvent::ContinueDraw {
                point: sample.position,
                time_ms: sample.time_ms,
            }],
            Mode::Panning { id, last } if id == sample.id => {
                self.mode = Mode::Panning {
                    id,
                    last: sample.position,
                };
                vec![GestureEvent::ContinuePan {
                    dx: sample.position.x - last.x,
                    dy: sample.position.y - last.y,
                }]
            }
            Mode::Pinching {
                initial_distance,
                last_distance,
                last_midpoint,
            } => {
                let Some((distance, midpoint)) = self.pair_geometry() else {
                    return Vec::new();
                };
                self.mode = Mode::Pinching {
                    initial_distance,
                    last_distance: distance,
                    last_midpoint: midpoint,
                };

                let change = if last_distance > 0.0 {
                    (distance - last_distance).abs() / last_distance
                } else {
                    0.0
                };
                if change > self.pinch_threshold && initial_distance > 0.0 {
                    vec![GestureEvent::ContinuePinchZoom {
                        scale: distance / initial_distance,
                        anchor: midpoint,
                    }]
                } else if zoomed_in {
                    vec![GestureEvent::ContinuePinchPan {
                        dx: midpoint.x - last_midpoint.x,
                        dy: midpoint.y - last_midpoint.y,
                    }]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    pub fn pointer_up(&mut self, id: u32) -> Vec<GestureEvent> {
        if self.pointers.remove(&id).is_none() {
            return Vec::new();
        }

        match self.mode {
            Mode::Drawing { id: drawing } if drawing == id => {
                self.mode = Mode::Idle;
                vec![GestureEvent::EndDraw]
            }
            Mode::Panning { id: panning, .. } if panning == id => {
                self.mode = Mode::Idle;
                vec![GestureEvent::EndPan]
            }
            Mode::Pinching { .. } => {
                debug!(remaining = self.pointers.len(), "pinch ended");
                self.mode = if self.pointers.is_empty() {
                    Mode::Idle
                } else {
                    Mode::Suppressed
                };
                vec![GestureEvent::EndPan]
            }
            Mode::Suppressed if self.pointers.is_empty() => {
                self.mode = Mode::Idle;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// A cancelled pointer ends whatever it was doing.
    pub fn pointer_cancel(&mut self, id: u32) -> Vec<GestureEvent> {
        self.pointer_up(id)
    }

    /// Forget every pointer without emitting events.
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.mode = Mode::Idle;
    }

    fn start_pinch(&mut self) -> Vec<GestureEvent> {
        let Some((distance, midpoint)) = self.pair_geometry() else {
            return Vec::new();
        };
        self.mode = Mode::Pinching {
            initial_distance: distance,
            last_distance: distance,
            last_midpoint: midpoint,
        };
        vec![GestureEvent::StartPinch { midpoint }]
    }

    /// Distance and midpoint between the two tracked pointers.
    fn pair_geometry(&self) -> Option<(f32, Point)> {
        let mut positions = self.pointers.values();
        let a = *positions.next()?;
        let b = *positions.next()?;
        Some((a.distance_to(b), a.midpoint(b)))
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(&GestureConfig::default())
    }
}
