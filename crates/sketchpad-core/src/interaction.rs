//! Select-tool interaction state machine.
//!
//! A press on a handle of a selected shape starts a resize or rotation, a
//! press on a shape body starts a drag of the whole selection, and a press
//! on empty canvas clears the selection. Every move recomputes the shapes
//! from the snapshots taken at press time, and release commits a single
//! `Transform` history entry when anything actually changed.

use crate::config::HandleConfig;
use crate::document::Document;
use crate::handles::{self, Anchor, HandleKind};
use crate::history::{History, HistoryEntry};
use crate::input::Modifiers;
use crate::selection::SelectionSet;
use crate::shapes::{Shape, ShapeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Observable interaction state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging,
    Resizing(Anchor),
    Rotating,
}

#[derive(Debug, Clone, Default, PartialEq)]
enum Active {
    #[default]
    Idle,
    Dragging {
        start: Point,
        originals: Vec<Shape>,
    },
    Resizing {
        anchor: Anchor,
        original: Shape,
    },
    Rotating {
        start_angle: f64,
        original: Shape,
    },
}

impl Active {
    fn originals(&self) -> &[Shape] {
        match self {
            Active::Idle => &[],
            Active::Dragging { originals, .. } => originals,
            Active::Resizing { original, .. } | Active::Rotating { original, .. } => {
                std::slice::from_ref(original)
            }
        }
    }
}

/// Drives move, resize and rotate gestures for the select tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interaction {
    active: Active,
    handles: HandleConfig,
}

impl Interaction {
    pub fn new(handles: HandleConfig) -> Self {
        Self {
            active: Active::Idle,
            handles,
        }
    }

    pub fn state(&self) -> InteractionState {
        match &self.active {
            Active::Idle => InteractionState::Idle,
            Active::Dragging { .. } => InteractionState::Dragging,
            Active::Resizing { anchor, .. } => InteractionState::Resizing(*anchor),
            Active::Rotating { .. } => InteractionState::Rotating,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.active == Active::Idle
    }

    /// Ids of the shapes being manipulated.
    pub fn active_shapes(&self) -> Vec<ShapeId> {
        self.active.originals().iter().map(Shape::id).collect()
    }

    /// Handle the pointer going down at a canvas point.
    ///
    /// `zoom` converts the handle tolerance from screen pixels to canvas
    /// units.
    pub fn pointer_down(
        &mut self,
        document: &Document,
        selection: &mut SelectionSet,
        point: Point,
        modifiers: Modifiers,
        zoom: f64,
    ) -> InteractionState {
        if !self.is_idle() {
            log::debug!("Ignoring pointer down during {:?}", self.state());
            return self.state();
        }
        selection.retain(|id| document.contains(id));

        let tolerance = self.handles.hit_tolerance / zoom;
        if let Some((shape, kind)) = self.handle_hit(document, selection, point, tolerance) {
            self.active = match kind {
                HandleKind::Anchor(anchor) => Active::Resizing {
                    anchor,
                    original: shape.clone(),
                },
                HandleKind::Rotate => Active::Rotating {
                    start_angle: handles::pointer_angle(shape.center(), point),
                    original: shape.clone(),
                },
            };
            log::debug!("Pointer down on handle {kind:?} of {}", shape.id());
            return self.state();
        }

        let Some(hit) = document.top_shape_at(point, 0.0) else {
            if !modifiers.shift {
                selection.clear();
            }
            return self.state();
        };

        if modifiers.shift {
            selection.toggle(hit);
            if !selection.contains(hit) {
                return self.state();
            }
        } else if !selection.contains(hit) {
            selection.select_only(hit);
        }

        let originals: Vec<Shape> = document
            .shapes_ordered()
            .filter(|shape| selection.contains(shape.id()))
            .cloned()
            .collect();
        log::debug!("Dragging {} shapes", originals.len());
        self.active = Active::Dragging {
            start: point,
            originals,
        };
        self.state()
    }

    /// Nearest handle among the selected shapes.
    fn handle_hit<'a>(
        &self,
        document: &'a Document,
        selection: &SelectionSet,
        point: Point,
        tolerance: f64,
    ) -> Option<(&'a Shape, HandleKind)> {
        selection
            .iter()
            .filter_map(|id| document.get_shape(id))
            .filter_map(|shape| {
                handles::nearest_handle(shape, point, tolerance, self.handles.rotate_offset)
                    .map(|(handle, distance)| (shape, handle.kind, distance))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(shape, kind, _)| (shape, kind))
    }

    /// Handle pointer movement to a canvas point.
    pub fn pointer_move(&mut self, document: &mut Document, point: Point) {
        if self.is_idle() {
            return;
        }
        if !self.targets_exist(document) {
            return;
        }

        match &self.active {
            Active::Idle => {}
            Active::Dragging { start, originals } => {
                let delta = point - *start;
                for original in originals {
                    let mut moved = original.clone();
                    moved.translate(delta);
                    document.replace(moved);
                }
            }
            Active::Resizing { anchor, original } => {
                let mut resized = original.clone();
                handles::resize(&mut resized, *anchor, point, self.handles.min_shape_size);
                document.replace(resized);
            }
            Active::Rotating {
                start_angle,
                original,
            } => {
                let angle = handles::pointer_angle(original.center(), point);
                let mut rotated = original.clone();
                rotated.set_rotation(original.rotation + angle - start_angle);
                document.replace(rotated);
            }
        }
        log::trace!("{:?} to {point:?}", self.state());
    }

    /// Finish the gesture. Pushes one `Transform` entry if any shape's
    /// geometry changed; returns whether it did.
    pub fn pointer_up(&mut self, document: &mut Document, history: &mut History) -> bool {
        if self.is_idle() || !self.targets_exist(document) {
            return false;
        }

        let active = std::mem::take(&mut self.active);
        let before: Vec<Shape> = active.originals().to_vec();
        let after: Vec<Shape> = before
            .iter()
            .filter_map(|original| document.get_shape(original.id()).cloned())
            .collect();

        let changed = before
            .iter()
            .zip(&after)
            .any(|(old, new)| old.geometry_differs(new));
        if !changed {
            log::debug!("Gesture ended without changes");
            return false;
        }

        history.push(HistoryEntry::Transform { before, after });
        true
    }

    /// The pointer left the canvas: commit like a release.
    pub fn pointer_leave(&mut self, document: &mut Document, history: &mut History) -> bool {
        self.pointer_up(document, history)
    }

    /// Abort the gesture, restoring the shapes to where they started.
    /// Returns false if nothing was in progress.
    pub fn cancel(&mut self, document: &mut Document) -> bool {
        if self.is_idle() {
            return false;
        }
        let active = std::mem::take(&mut self.active);
        for original in active.originals() {
            document.replace(original.clone());
        }
        log::debug!("Gesture cancelled");
        true
    }

    /// False (and back to idle) if a shape under manipulation has vanished.
    /// The surviving shapes are put back where the gesture started.
    fn targets_exist(&mut self, document: &mut Document) -> bool {
        let Some(missing) = self
            .active
            .originals()
            .iter()
            .find(|shape| !document.contains(shape.id()))
            .map(Shape::id)
        else {
            return true;
        };

        log::debug!("Shape {missing} vanished mid-gesture, returning to idle");
        let active = std::mem::take(&mut self.active);
        for original in active.originals() {
            document.replace(original.clone());
        }
        false
    }
}
