//! Editor state and host event routing.

use crate::clipboard::Clipboard;
use crate::config::SketchConfig;
use crate::document::Document;
use crate::handles::{self, Handle};
use crate::history::{History, HistoryEntry};
use crate::input::{EditCommand, HostEvent, Modifiers, PointerButton};
use crate::interaction::{Interaction, InteractionState};
use crate::selection::SelectionSet;
use crate::shapes::{Shape, ShapeId};
use crate::tools::{ToolKind, ToolManager, ToolState};
use crate::trail::{Trail, TrailKind};
use crate::viewport::Viewport;
use kurbo::{Point, Size, Vec2};
use std::time::Duration;

/// Padding in screen pixels used by `fit_to_content`.
const FIT_PADDING: f64 = 50.0;

/// What the pointer is doing between down and up.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerGesture {
    None,
    /// Select tool; the interaction state machine owns the details.
    Select,
    /// Panning, with the last screen position seen.
    Pan { last: Point },
    Draw,
    Erase,
    Laser,
}

/// The whole editor: viewport, shapes, selection, history and tools.
///
/// Hosts feed it [`HostEvent`]s and read back shapes, handles, trails and
/// the viewport transform to draw.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub config: SketchConfig,
    pub viewport: Viewport,
    pub document: Document,
    pub selection: SelectionSet,
    pub history: History,
    pub tools: ToolManager,
    pub interaction: Interaction,
    pub clipboard: Clipboard,
    pub eraser_trail: Trail,
    pub laser_trail: Trail,
    /// Shapes the eraser has touched during the current stroke.
    eraser_targets: SelectionSet,
    gesture: PointerGesture,
    /// Last pointer position in canvas space, used as the paste target.
    last_pointer: Option<Point>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0))
    }
}

impl Canvas {
    /// Create an empty canvas with default settings.
    pub fn new(screen_size: Size) -> Self {
        Self::with_config(screen_size, SketchConfig::default())
    }

    /// Create an empty canvas with the given settings.
    pub fn with_config(screen_size: Size, config: SketchConfig) -> Self {
        Self {
            viewport: Viewport::with_config(screen_size, &config.viewport),
            document: Document::new(),
            selection: SelectionSet::new(),
            history: History::new(config.history.capacity),
            tools: ToolManager::new(config.freehand.clone(), config.handles.min_shape_size),
            interaction: Interaction::new(config.handles.clone()),
            clipboard: Clipboard::new(),
            eraser_trail: Trail::new(TrailKind::Eraser, config.eraser.trail.clone()),
            laser_trail: Trail::new(TrailKind::Laser, config.laser.clone()),
            eraser_targets: SelectionSet::new(),
            gesture: PointerGesture::None,
            last_pointer: None,
            config,
        }
    }

    pub fn current_tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Switch tools, abandoning whatever the pointer was doing.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.abort_gesture();
        self.tools.set_tool(tool);
        log::debug!("Tool set to {tool:?}");
    }

    /// Route one host event.
    pub fn handle_event(&mut self, event: &HostEvent) {
        match event {
            HostEvent::PointerDown {
                position,
                button,
                modifiers,
            } => self.pointer_down(*position, *button, *modifiers),
            HostEvent::PointerMove { position, .. } => self.pointer_move(*position),
            HostEvent::PointerUp { position, .. } => self.pointer_up(*position),
            HostEvent::PointerLeave => self.pointer_leave(),
            HostEvent::Wheel {
                position,
                delta,
                modifiers,
            } => self.wheel(*position, *delta, *modifiers),
            HostEvent::KeyDown { key, modifiers } => {
                self.key_down(key, *modifiers);
            }
            HostEvent::Resize { size } => self.viewport.resize(*size),
        }
    }

    pub fn pointer_down(&mut self, screen: Point, button: PointerButton, modifiers: Modifiers) {
        let point = self.viewport.screen_to_canvas(screen);
        self.last_pointer = Some(point);
        if self.gesture != PointerGesture::None {
            return;
        }

        self.gesture = match (button, self.tools.current_tool) {
            (PointerButton::Secondary, _) => PointerGesture::None,
            (PointerButton::Middle, _) | (PointerButton::Primary, ToolKind::Pan) => {
                PointerGesture::Pan { last: screen }
            }
            (PointerButton::Primary, ToolKind::Select) => {
                self.interaction.pointer_down(
                    &self.document,
                    &mut self.selection,
                    point,
                    modifiers,
                    self.viewport.zoom(),
                );
                PointerGesture::Select
            }
            (
                PointerButton::Primary,
                ToolKind::Rectangle
                | ToolKind::Ellipse
                | ToolKind::Line
                | ToolKind::Arrow
                | ToolKind::Freehand,
            ) => {
                self.tools.begin(point);
                PointerGesture::Draw
            }
            (PointerButton::Primary, ToolKind::Eraser) => {
                self.eraser_targets.clear();
                self.eraser_trail.begin(point);
                self.collect_eraser_targets(point);
                PointerGesture::Erase
            }
            (PointerButton::Primary, ToolKind::Laser) => {
                self.laser_trail.begin(point);
                PointerGesture::Laser
            }
        };
    }

    pub fn pointer_move(&mut self, screen: Point) {
        let point = self.viewport.screen_to_canvas(screen);
        self.last_pointer = Some(point);

        match self.gesture {
            PointerGesture::None => {}
            PointerGesture::Select => self.interaction.pointer_move(&mut self.document, point),
            PointerGesture::Pan { last } => {
                self.viewport.pan(screen - last);
                self.gesture = PointerGesture::Pan { last: screen };
            }
            PointerGesture::Draw => self.tools.update(point),
            PointerGesture::Erase => {
                self.eraser_trail.push(point);
                self.collect_eraser_targets(point);
            }
            PointerGesture::Laser => {
                self.laser_trail.push(point);
            }
        }
    }

    pub fn pointer_up(&mut self, screen: Point) {
        self.pointer_move(screen);
        self.finish_gesture();
    }

    /// The pointer left the canvas element: finish as if released.
    pub fn pointer_leave(&mut self) {
        if self.gesture == PointerGesture::Select {
            self.gesture = PointerGesture::None;
            self.interaction.pointer_leave(&mut self.document, &mut self.history);
            return;
        }
        self.finish_gesture();
    }

    fn finish_gesture(&mut self) {
        let gesture = std::mem::replace(&mut self.gesture, PointerGesture::None);
        match gesture {
            PointerGesture::None | PointerGesture::Pan { .. } => {}
            PointerGesture::Select => {
                self.interaction.pointer_up(&mut self.document, &mut self.history);
            }
            PointerGesture::Draw => {
                let ToolState::Active { current, .. } = self.tools.state else {
                    return;
                };
                if let Some(shape) = self.tools.end(current) {
                    let ids = self.commit_new_shapes(vec![shape], HistoryEntry::created);
                    self.selection.set(ids);
                }
            }
            PointerGesture::Erase => {
                let targets: Vec<ShapeId> = self.eraser_targets.iter().collect();
                self.eraser_targets.clear();
                self.eraser_trail.release();
                self.delete_shapes(&targets);
            }
            PointerGesture::Laser => self.laser_trail.release(),
        }
    }

    /// Drop the current gesture without committing anything.
    fn abort_gesture(&mut self) {
        let gesture = std::mem::replace(&mut self.gesture, PointerGesture::None);
        match gesture {
            PointerGesture::Select => {
                self.interaction.cancel(&mut self.document);
            }
            PointerGesture::Draw => self.tools.cancel(),
            PointerGesture::Erase => {
                self.eraser_targets.clear();
                self.eraser_trail.clear();
            }
            PointerGesture::Laser => self.laser_trail.clear(),
            PointerGesture::None | PointerGesture::Pan { .. } => {}
        }
    }

    fn collect_eraser_targets(&mut self, point: Point) {
        let radius = self.config.eraser.radius;
        for id in self.document.shapes_touching(point, radius) {
            self.eraser_targets.add(id);
        }
    }

    /// Ctrl+wheel zooms at the pointer; a plain wheel pans.
    pub fn wheel(&mut self, screen: Point, delta: Vec2, modifiers: Modifiers) {
        if modifiers.command() {
            self.viewport.wheel_zoom(screen, delta.y);
        } else {
            self.viewport.pan(-delta);
        }
    }

    /// Handle a key press. Returns true if it did something.
    pub fn key_down(&mut self, key: &str, modifiers: Modifiers) -> bool {
        if let Some(command) = EditCommand::from_key(key, modifiers) {
            return self.execute(command);
        }
        if modifiers == Modifiers::NONE {
            if let Some(tool) = ToolKind::from_shortcut(key) {
                self.set_tool(tool);
                return true;
            }
        }
        false
    }

    /// Run an editing command. Returns true if it changed anything.
    pub fn execute(&mut self, command: EditCommand) -> bool {
        log::debug!("Command {command:?}");
        match command {
            EditCommand::Copy => self.copy() > 0,
            EditCommand::Cut => self.cut() > 0,
            EditCommand::Paste => !self.paste().is_empty(),
            EditCommand::Undo => self.undo(),
            EditCommand::Redo => self.redo(),
            EditCommand::SelectAll => {
                self.select_all();
                true
            }
            EditCommand::Delete => self.delete_selected() > 0,
            EditCommand::Cancel => self.cancel(),
            EditCommand::ZoomIn => {
                self.viewport.zoom_in();
                true
            }
            EditCommand::ZoomOut => {
                self.viewport.zoom_out();
                true
            }
            EditCommand::ResetZoom => {
                self.viewport.reset();
                true
            }
        }
    }

    /// Escape: abort the active gesture, or else clear the selection.
    pub fn cancel(&mut self) -> bool {
        if self.gesture != PointerGesture::None {
            self.abort_gesture();
            return true;
        }
        let had_selection = !self.selection.is_empty();
        self.selection.clear();
        had_selection
    }

    pub fn undo(&mut self) -> bool {
        self.abort_gesture();
        let undone = self.history.undo(&mut self.document);
        // Undo and redo always leave nothing selected.
        self.selection.clear();
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.abort_gesture();
        let redone = self.history.redo(&mut self.document);
        self.selection.clear();
        redone
    }

    pub fn select_all(&mut self) {
        self.selection.set(self.document.z_order().iter().copied());
    }

    /// Copy the selection to the clipboard. Returns how many shapes were copied.
    pub fn copy(&mut self) -> usize {
        self.clipboard.copy(&self.document, &self.selection)
    }

    /// Copy, then delete the selection in one undo step.
    pub fn cut(&mut self) -> usize {
        if self.copy() == 0 {
            return 0;
        }
        self.delete_selected()
    }

    /// Paste the clipboard centered on the last pointer position and select
    /// the new shapes.
    pub fn paste(&mut self) -> Vec<ShapeId> {
        let at = self
            .last_pointer
            .unwrap_or_else(|| self.viewport.visible_rect().center());
        self.paste_at(at)
    }

    /// Paste the clipboard centered on a canvas point.
    pub fn paste_at(&mut self, at: Point) -> Vec<ShapeId> {
        let shapes = self.clipboard.instantiate(at);
        if shapes.is_empty() {
            return Vec::new();
        }
        self.abort_gesture();
        let ids = self.commit_new_shapes(shapes, HistoryEntry::pasted);
        self.selection.set(ids.iter().copied());
        ids
    }

    /// Delete the selection in one undo step. Returns how many shapes went.
    pub fn delete_selected(&mut self) -> usize {
        self.abort_gesture();
        let ids: Vec<ShapeId> = self.selection.iter().collect();
        self.delete_shapes(&ids)
    }

    fn delete_shapes(&mut self, ids: &[ShapeId]) -> usize {
        let removed = self.document.remove_shapes(ids);
        if removed.is_empty() {
            return 0;
        }
        let count = removed.len();
        self.history.push(HistoryEntry::Delete { shapes: removed });
        let document = &self.document;
        self.selection.retain(|id| document.contains(id));
        log::debug!("Deleted {count} shapes");
        count
    }

    /// Add a shape on top of the canvas as one undoable step.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.commit_new_shapes(vec![shape], HistoryEntry::created);
        id
    }

    /// Place a text shape with its top-left corner at a canvas point.
    pub fn add_text(&mut self, position: Point, content: &str) -> ShapeId {
        let mut text = Shape::text(position, content);
        text.style = self.tools.current_style.clone();
        self.add_shape(text)
    }

    fn commit_new_shapes(
        &mut self,
        shapes: Vec<Shape>,
        record: fn(&Document, &[Shape]) -> HistoryEntry,
    ) -> Vec<ShapeId> {
        let ids = shapes.iter().map(Shape::id).collect();
        for shape in &shapes {
            self.document.add_shape(shape.clone());
        }
        let entry = record(&self.document, &shapes);
        self.history.push(entry);
        ids
    }

    /// Shapes the eraser will delete on release, for highlighting.
    pub fn eraser_targets(&self) -> &[ShapeId] {
        self.eraser_targets.ids()
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.interaction.state()
    }

    /// Handles of every selected shape, for the renderer.
    pub fn selection_handles(&self) -> Vec<Handle> {
        self.selection
            .iter()
            .filter_map(|id| self.document.get_shape(id))
            .flat_map(|shape| handles::handles(shape, self.config.handles.rotate_offset))
            .collect()
    }

    /// The shape the active drawing tool would create on release.
    pub fn preview_shape(&self) -> Option<Shape> {
        self.tools.preview_shape()
    }

    /// Advance trail fade-outs. Returns true while a trail is still visible.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let eraser = self.eraser_trail.advance_fade(elapsed);
        let laser = self.laser_trail.advance_fade(elapsed);
        eraser || laser
    }

    /// Fit the view to show all shapes.
    pub fn fit_to_content(&mut self) {
        if let Some(bounds) = self.document.bounds() {
            self.viewport.fit_to_bounds(bounds, FIT_PADDING);
        }
    }
}
