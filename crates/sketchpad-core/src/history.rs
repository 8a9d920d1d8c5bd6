//! Undo/redo history.
//!
//! Each entry carries the snapshots it needs to be applied in either
//! direction, so undoing never depends on the state of other entries.

use crate::document::{Document, LayeredShape};
use crate::shapes::Shape;
use serde::{Deserialize, Serialize};

/// Default number of undo steps to keep.
pub const DEFAULT_CAPACITY: usize = 50;

/// What kind of edit an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKind {
    Create,
    Paste,
    Delete,
    Transform,
}

/// One undoable edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HistoryEntry {
    /// Shapes drawn by a tool.
    Create { shapes: Vec<LayeredShape> },
    /// Shapes inserted from the clipboard.
    Paste { shapes: Vec<LayeredShape> },
    /// Shapes removed, with the layers they came from.
    Delete { shapes: Vec<LayeredShape> },
    /// Shapes moved, resized or rotated.
    Transform { before: Vec<Shape>, after: Vec<Shape> },
}

impl HistoryEntry {
    pub fn kind(&self) -> EditKind {
        match self {
            HistoryEntry::Create { .. } => EditKind::Create,
            HistoryEntry::Paste { .. } => EditKind::Paste,
            HistoryEntry::Delete { .. } => EditKind::Delete,
            HistoryEntry::Transform { .. } => EditKind::Transform,
        }
    }

    /// Record shapes just drawn into `document`, with their current layers.
    pub fn created(document: &Document, shapes: &[Shape]) -> Self {
        HistoryEntry::Create {
            shapes: layers_of(document, shapes),
        }
    }

    /// Record shapes just pasted into `document`, with their current layers.
    pub fn pasted(document: &Document, shapes: &[Shape]) -> Self {
        HistoryEntry::Paste {
            shapes: layers_of(document, shapes),
        }
    }

    fn revert(&self, document: &mut Document) {
        match self {
            HistoryEntry::Create { shapes } | HistoryEntry::Paste { shapes } => {
                remove_layers(document, shapes);
            }
            HistoryEntry::Delete { shapes } => document.restore_shapes(shapes),
            HistoryEntry::Transform { before, .. } => replace_all(document, before),
        }
    }

    fn reapply(&self, document: &mut Document) {
        match self {
            HistoryEntry::Create { shapes } | HistoryEntry::Paste { shapes } => {
                document.restore_shapes(shapes);
            }
            HistoryEntry::Delete { shapes } => remove_layers(document, shapes),
            HistoryEntry::Transform { after, .. } => replace_all(document, after),
        }
    }
}

/// Pair each shape with its layer in `document`, lowest first.
fn layers_of(document: &Document, shapes: &[Shape]) -> Vec<LayeredShape> {
    let mut layered: Vec<LayeredShape> = shapes
        .iter()
        .filter_map(|shape| {
            document.z_index(shape.id()).map(|z_index| LayeredShape {
                z_index,
                shape: shape.clone(),
            })
        })
        .collect();
    layered.sort_by_key(|layer| layer.z_index);
    layered
}

fn remove_layers(document: &mut Document, layers: &[LayeredShape]) {
    let ids: Vec<_> = layers.iter().map(|layer| layer.shape.id()).collect();
    document.remove_shapes(&ids);
}

fn replace_all(document: &mut Document, shapes: &[Shape]) {
    for shape in shapes {
        if !document.replace(shape.clone()) {
            log::debug!("Skipping history snapshot for missing shape {}", shape.id());
        }
    }
}

/// Undo and redo stacks.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl History {
    /// Create an empty history keeping at most `capacity` undo steps.
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record an edit that has already been applied to the document.
    pub fn push(&mut self, entry: HistoryEntry) {
        log::debug!("History push {:?}", entry.kind());
        self.undo_stack.push(entry);

        // Clear redo stack when new changes are made
        self.redo_stack.clear();

        if self.undo_stack.len() > self.capacity {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last edit.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, document: &mut Document) -> bool {
        let Some(entry) = self.undo_stack.pop() else {
            return false;
        };
        log::debug!("Undo {:?}", entry.kind());
        entry.revert(document);
        self.redo_stack.push(entry);
        true
    }

    /// Redo the last undone edit.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, document: &mut Document) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };
        log::debug!("Redo {:?}", entry.kind());
        entry.reapply(document);
        self.undo_stack.push(entry);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of steps that can be undone.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// The entry the next `undo` would revert.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.undo_stack.last()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handles::{self, Anchor};
    use kurbo::{Point, Vec2};

    fn document_with(shapes: &[Shape]) -> Document {
        let mut doc = Document::new();
        for shape in shapes {
            doc.add_shape(shape.clone());
        }
        doc
    }

    fn transform(
        doc: &mut Document,
        history: &mut History,
        id: crate::ShapeId,
        edit: impl Fn(&mut Shape),
    ) {
        let before = doc.get_shape(id).unwrap().clone();
        let mut after = before.clone();
        edit(&mut after);
        doc.replace(after.clone());
        history.push(HistoryEntry::Transform {
            before: vec![before],
            after: vec![after],
        });
    }

    #[test]
    fn test_undo_create() {
        let mut doc = Document::new();
        let mut history = History::default();
        let rect = Shape::rectangle(Point::new(0.0, 0.0), 100.0, 100.0);
        let id = rect.id();

        doc.add_shape(rect.clone());
        history.push(HistoryEntry::created(&doc, &[rect]));
        assert!(history.can_undo());

        assert!(history.undo(&mut doc));
        assert!(doc.is_empty());
        assert!(history.can_redo());

        assert!(history.redo(&mut doc));
        assert!(doc.get_shape(id).is_some());
    }

    #[test]
    fn test_undo_delete_restores_layer() {
        let shapes: Vec<Shape> = (0..3)
            .map(|i| Shape::rectangle(Point::new(i as f64, 0.0), 5.0, 5.0))
            .collect();
        let mut doc = document_with(&shapes);
        let original = doc.clone();
        let mut history = History::default();

        let removed = doc.remove_shapes(&[shapes[0].id(), shapes[2].id()]);
        history.push(HistoryEntry::Delete { shapes: removed });
        assert_eq!(doc.len(), 1);

        assert!(history.undo(&mut doc));
        assert_eq!(doc, original);

        assert!(history.redo(&mut doc));
        assert_eq!(doc.z_order(), &[shapes[1].id()]);
    }

    #[test]
    fn test_undo_transform_is_exact() {
        let mut rect = Shape::rectangle(Point::new(10.3, 20.7), 100.1, 50.9);
        rect.rotate(17.0);
        let id = rect.id();
        let mut doc = document_with(&[rect]);
        let original = doc.clone();
        let mut history = History::default();

        let edits: Vec<Box<dyn Fn(&mut Shape)>> = vec![
            Box::new(|s| s.translate(Vec2::new(0.1, -7.3))),
            Box::new(|s| handles::resize(s, Anchor::TopRight, Point::new(300.0, -40.0), 1.0)),
            Box::new(|s| s.rotate(123.456)),
        ];
        for edit in edits {
            transform(&mut doc, &mut history, id, edit);
            assert_ne!(doc, original);
            assert!(history.undo(&mut doc));
            assert_eq!(doc, original);
        }
    }

    #[test]
    fn test_push_clears_redo() {
        let mut doc = Document::new();
        let mut history = History::default();
        let rect = Shape::rectangle(Point::ZERO, 10.0, 10.0);
        let id = rect.id();
        doc.add_shape(rect.clone());
        history.push(HistoryEntry::created(&doc, &[rect]));

        transform(&mut doc, &mut history, id, |s| s.translate(Vec2::new(5.0, 0.0)));
        assert!(history.undo(&mut doc));
        assert!(history.can_redo());

        transform(&mut doc, &mut history, id, |s| s.rotate(10.0));
        assert!(!history.can_redo());
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut doc = Document::new();
        let mut history = History::new(3);
        let rect = Shape::rectangle(Point::ZERO, 10.0, 10.0);
        let id = rect.id();
        doc.add_shape(rect);

        for _ in 0..5 {
            transform(&mut doc, &mut history, id, |s| s.translate(Vec2::new(1.0, 0.0)));
        }
        assert_eq!(history.undo_len(), 3);

        while history.undo(&mut doc) {}
        // The two oldest moves are gone for good.
        assert!((doc.get_shape(id).unwrap().position.x - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_stacks() {
        let mut doc = Document::new();
        let mut history = History::default();
        assert!(!history.undo(&mut doc));
        assert!(!history.redo(&mut doc));
    }

    #[test]
    fn test_transform_of_missing_shape_is_skipped() {
        let rect = Shape::rectangle(Point::ZERO, 10.0, 10.0);
        let mut moved = rect.clone();
        moved.translate(Vec2::new(3.0, 3.0));

        let mut doc = Document::new();
        let mut history = History::default();
        history.push(HistoryEntry::Transform {
            before: vec![rect],
            after: vec![moved],
        });
        assert!(history.undo(&mut doc));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_added_entry_kinds() {
        let mut doc = Document::new();
        let rect = Shape::rectangle(Point::ZERO, 10.0, 10.0);
        doc.add_shape(rect.clone());
        assert_eq!(HistoryEntry::created(&doc, &[rect.clone()]).kind(), EditKind::Create);

        let entry = HistoryEntry::pasted(&doc, &[rect]);
        assert_eq!(entry.kind(), EditKind::Paste);
        let HistoryEntry::Paste { shapes } = entry else {
            panic!("expected paste");
        };
        assert_eq!(shapes[0].z_index, 0);
    }
}
