//! Sketchpad Core Library
//!
//! Platform-agnostic viewport, shape geometry, selection interaction and
//! undo/redo logic for the Sketchpad vector sketch tool. Rendering is left to
//! the host: it reads shapes, handles, trails and the viewport transform from
//! a [`Canvas`] and feeds pointer and keyboard events back in.

pub mod canvas;
pub mod clipboard;
pub mod config;
pub mod document;
pub mod error;
pub mod handles;
pub mod history;
pub mod input;
pub mod interaction;
pub mod selection;
pub mod shapes;
pub mod tools;
pub mod trail;
pub mod viewport;

pub use canvas::Canvas;
pub use clipboard::Clipboard;
pub use config::SketchConfig;
pub use document::{Document, LayeredShape};
pub use error::{SketchError, SketchResult};
pub use handles::{Anchor, Handle, HandleKind};
pub use history::{EditKind, History, HistoryEntry};
pub use input::{EditCommand, HostEvent, Modifiers, PointerButton};
pub use interaction::{Interaction, InteractionState};
pub use selection::SelectionSet;
pub use shapes::{SerializableColor, Shape, ShapeId, ShapeKind, ShapeStyle};
pub use tools::{ToolKind, ToolManager};
pub use trail::{Trail, TrailKind};
pub use viewport::Viewport;
