//! Sketchpad headless shell.
//!
//! Drives a [`sketchpad_core::Canvas`] from recorded input scripts so editor
//! behavior can be reproduced and inspected without a window.

pub mod replay;

pub use replay::{apply, replay, ReplayError, Script, ScriptAction, ScriptStep, Snapshot};
