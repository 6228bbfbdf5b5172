// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Script replay — drive an editor session from a JSON list of steps.
//
// Input steps go through the session's input queue exactly as a UI would feed
// them. The remaining steps call session operations directly, covering the
// toolbar buttons (clear, undo, enhance, page navigation, pen settings).

use inkpad_core::error::Result;
use inkpad_core::types::{Point, Tool};
use inkpad_document::PageRenderer;
use inkpad_engine::{EditorSession, InputEvent, InputQueue, Reaction};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    Input { event: InputEvent },
    GoToPage { page: u32 },
    NextPage,
    PreviousPage,
    Clear,
    Undo,
    Enhance,
    SetTool { tool: Tool },
    SetColor { color: String },
    SetWidth { width: f32 },
    Zoom { level: f32, x: f32, y: f32 },
}

/// Parse a script from JSON.
pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>> {
    Ok(serde_json::from_str(json)?)
}

/// What happened during a replay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    pub steps_run: usize,
    pub redraws: usize,
    /// The script asked to dismiss the editor; later steps were skipped.
    pub dismissed: bool,
}

/// Run `steps` against `session`, stopping at the first failing step or at a
/// dismiss request.
#[instrument(skip_all, fields(session = %session.id(), steps = steps.len()))]
pub async fn replay<R: PageRenderer>(
    session: &mut EditorSession<R>,
    steps: Vec<ScriptStep>,
) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();
    let mut queue = InputQueue::new();

    for step in steps {
        summary.steps_run += 1;
        debug!(?step, "replaying step");
        match step {
            ScriptStep::Input { event } => {
                queue.push(event);
                for reaction in session.process_queue(&mut queue) {
                    match reaction {
                        Reaction::Redraw => summary.redraws += 1,
                        Reaction::DismissRequested => summary.dismissed = true,
                        Reaction::ViewChanged | Reaction::Ignored => {}
                    }
                }
            }
            ScriptStep::GoToPage { page } => session.go_to_page(page).await?,
            ScriptStep::NextPage => session.next_page().await?,
            ScriptStep::PreviousPage => session.previous_page().await?,
            ScriptStep::Clear => session.clear_current_page()?,
            ScriptStep::Undo => {
                session.undo()?;
            }
            ScriptStep::Enhance => {
                session.enhance_ink()?;
            }
            ScriptStep::SetTool { tool } => session.set_tool(tool),
            ScriptStep::SetColor { color } => session.set_color(&color)?,
            ScriptStep::SetWidth { width } => session.set_base_width(width),
            ScriptStep::Zoom { level, x, y } => {
                session.viewport_mut().set_zoom_at(level, Point::new(x, y));
            }
        }
        if summary.dismissed {
            info!(step = summary.steps_run, "dismissed, remaining steps skipped");
            break;
        }
    }

    session.end_stroke();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpad_core::EditorConfig;
    use inkpad_core::error::InkpadError;
    use inkpad_document::BasicRenderer;

    const SCRIPT: &str = r##"[
        { "action": "set_color", "color": "#0000ff" },
        { "action": "input", "event": { "type": "pointer_down", "id": 1, "x": 10, "y": 10, "time_ms": 0 } },
        { "action": "input", "event": { "type": "pointer_move", "id": 1, "x": 90, "y": 10, "time_ms": 400 } },
        { "action": "input", "event": { "type": "pointer_up", "id": 1 } },
        { "action": "zoom", "level": 2.0, "x": 0, "y": 0 }
    ]"##;

    fn session() -> EditorSession<BasicRenderer> {
        EditorSession::new(EditorConfig::default(), BasicRenderer::new())
    }

    #[tokio::test]
    async fn script_draws_on_the_blank_surface() {
        let mut session = session();
        let summary = replay(&mut session, parse_script(SCRIPT).unwrap()).await.unwrap();

        assert_eq!(summary.steps_run, 5);
        assert_eq!(summary.redraws, 3);
        assert!(!summary.dismissed);
        assert_eq!(session.surface().get_pixel(50, 10).0, [0, 0, 255, 255]);
        assert_eq!(session.viewport().zoom(), 2.0);
    }

    #[tokio::test]
    async fn dismiss_stops_the_replay() {
        let script = r#"[
            { "action": "input", "event": { "type": "key", "key": "escape", "pressed": true } },
            { "action": "set_width", "width": 12 }
        ]"#;
        let mut session = session();
        let summary = replay(&mut session, parse_script(script).unwrap()).await.unwrap();

        assert!(summary.dismissed);
        assert_eq!(summary.steps_run, 1);
        assert_eq!(session.style().base_width, 5.0);
    }

    #[tokio::test]
    async fn failing_step_is_reported() {
        let script = r#"[ { "action": "next_page" } ]"#;
        let mut session = session();
        let err = replay(&mut session, parse_script(script).unwrap()).await.unwrap_err();
        assert!(matches!(err, InkpadError::NoDocument));
    }

    #[test]
    fn malformed_script_is_a_serialization_error() {
        let err = parse_script(r#"[ { "action": "fly" } ]"#).unwrap_err();
        assert!(matches!(err, InkpadError::Serialization(_)));
    }
}
