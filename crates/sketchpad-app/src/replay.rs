//! Replay recorded input scripts against a headless canvas.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use sketchpad_core::{
    Canvas, EditCommand, HostEvent, Shape, ShapeId, SketchConfig, SketchError, ToolKind,
};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can stop a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid script: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] SketchError),
}

/// A recorded session: the window size and the events to feed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    #[serde(default = "default_screen")]
    pub screen: Size,
    pub events: Vec<ScriptStep>,
}

fn default_screen() -> Size {
    Size::new(800.0, 600.0)
}

/// One step of a script. Raw host events, or actions a toolbar would trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    Action(ScriptAction),
    Host(HostEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptAction {
    SetTool { tool: ToolKind },
    Command { command: EditCommand },
    /// Position is in canvas coordinates.
    AddText { position: Point, content: String },
    /// Let trail fade-outs run.
    Tick { millis: u64 },
    FitToContent,
}

/// Editor state after a replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tool: ToolKind,
    pub zoom: f64,
    pub origin: Point,
    /// Back to front.
    pub shapes: Vec<Shape>,
    pub selection: Vec<ShapeId>,
    pub undo_len: usize,
    pub redo_len: usize,
    pub clipboard_len: usize,
}

impl Snapshot {
    pub fn capture(canvas: &Canvas) -> Self {
        Self {
            tool: canvas.current_tool(),
            zoom: canvas.viewport.zoom(),
            origin: canvas.viewport.origin,
            shapes: canvas.document.shapes_ordered().cloned().collect(),
            selection: canvas.selection.ids().to_vec(),
            undo_len: canvas.history.undo_len(),
            redo_len: canvas.history.redo_len(),
            clipboard_len: canvas.clipboard.len(),
        }
    }
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Apply one step to the canvas.
pub fn apply(canvas: &mut Canvas, step: &ScriptStep) {
    match step {
        ScriptStep::Host(event) => canvas.handle_event(event),
        ScriptStep::Action(action) => match action {
            ScriptAction::SetTool { tool } => canvas.set_tool(*tool),
            ScriptAction::Command { command } => {
                canvas.execute(*command);
            }
            ScriptAction::AddText { position, content } => {
                canvas.add_text(*position, content);
            }
            ScriptAction::Tick { millis } => {
                canvas.tick(Duration::from_millis(*millis));
            }
            ScriptAction::FitToContent => canvas.fit_to_content(),
        },
    }
}

/// Run a whole script on a fresh canvas.
pub fn replay(script: &Script, config: SketchConfig) -> Canvas {
    let mut canvas = Canvas::with_config(script.screen, config);
    for (index, step) in script.events.iter().enumerate() {
        log::trace!("Step {index}: {step:?}");
        apply(&mut canvas, step);
    }
    log::info!(
        "Replayed {} steps, {} shapes on canvas",
        script.events.len(),
        canvas.document.len()
    );
    canvas
}
