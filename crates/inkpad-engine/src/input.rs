// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input events and the FIFO queue a host fills and the session drains.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Which button a pointer was pressed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    /// Left mouse button, pen tip or touch.
    #[default]
    Primary,
    /// Middle mouse button; pans the view.
    Auxiliary,
    Secondary,
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Z,
    Delete,
    Backspace,
    Escape,
    Shift,
    #[serde(other)]
    Other,
}

/// A raw input event in device coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        id: u32,
        x: f32,
        y: f32,
        time_ms: f64,
        #[serde(default)]
        button: PointerButton,
    },
    PointerMove {
        id: u32,
        x: f32,
        y: f32,
        time_ms: f64,
    },
    PointerUp {
        id: u32,
    },
    PointerCancel {
        id: u32,
    },
    Wheel {
        x: f32,
        y: f32,
        #[serde(default)]
        delta_x: f32,
        delta_y: f32,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Key {
        key: Key,
        pressed: bool,
        #[serde(default)]
        modifiers: Modifiers,
    },
}

/// What the host should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    /// Surface pixels changed.
    Redraw,
    /// Zoom or pan changed.
    ViewChanged,
    /// Nothing visible changed.
    Ignored,
    /// The user asked to close the editor.
    DismissRequested,
}

/// First-in, first-out queue of pending input.
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Extend<InputEvent> for InputQueue {
    fn extend<I: IntoIterator<Item = InputEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

impl FromIterator<InputEvent> for InputQueue {
    fn from_iter<I: IntoIterator<Item = InputEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}
