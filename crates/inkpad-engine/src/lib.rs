// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// inkpad-engine — Annotation capture and document overlay engine.
//
// Turns pointer input into speed-modulated strokes on a raster surface, keeps
// per-page overlays with zoom/pan and undo across a multi-page document, and
// separates the user's ink from the rendered background so it can be embedded
// back into an export.

pub mod enhance;
pub mod export;
pub mod extract;
pub mod gesture;
pub mod input;
pub mod page;
pub mod session;
pub mod stroke;
pub mod surface;
pub mod undo;
pub mod viewport;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the primary types so callers can use `inkpad_engine::EditorSession` etc.
pub use export::ExportArtifact;
pub use extract::InkLayer;
pub use gesture::{GestureEvent, GestureRecognizer, PointerSample};
pub use input::{InputEvent, InputQueue, Key, Modifiers, PointerButton, Reaction};
pub use session::{DocumentState, EditorSession, NavigationTicket, Phase};
pub use stroke::{StrokeRenderer, StrokeStyle};
pub use surface::{Ink, RasterSurface};
pub use viewport::Viewport;
