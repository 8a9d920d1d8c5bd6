//! In-process clipboard for shapes.

use crate::document::Document;
use crate::selection::SelectionSet;
use crate::shapes::Shape;
use kurbo::{Point, Rect};

/// Shapes copied from the canvas, back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clipboard {
    shapes: Vec<Shape>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Replace the contents with the selected shapes, in z-order.
    /// Returns how many shapes were copied. An empty selection leaves the
    /// clipboard untouched.
    pub fn copy(&mut self, document: &Document, selection: &SelectionSet) -> usize {
        let copied: Vec<Shape> = document
            .shapes_ordered()
            .filter(|shape| selection.contains(shape.id()))
            .cloned()
            .collect();
        if copied.is_empty() {
            return 0;
        }
        log::debug!("Copied {} shapes", copied.len());
        self.shapes = copied;
        self.shapes.len()
    }

    /// Fresh copies of the clipboard, moved so the group's bounds are
    /// centered on `at`.
    pub fn instantiate(&self, at: Point) -> Vec<Shape> {
        let Some(bounds) = self.bounds() else {
            return Vec::new();
        };
        let offset = at - bounds.center();
        self.shapes
            .iter()
            .map(|shape| {
                let mut copy = shape.clone();
                copy.regenerate_id();
                copy.translate(offset);
                copy
            })
            .collect()
    }

    fn bounds(&self) -> Option<Rect> {
        self.shapes
            .iter()
            .map(Shape::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_keeps_z_order() {
        let mut doc = Document::new();
        let back = Shape::rectangle(Point::new(0.0, 0.0), 10.0, 10.0);
        let front = Shape::rectangle(Point::new(20.0, 0.0), 10.0, 10.0);
        let (back_id, front_id) = (back.id(), front.id());
        doc.add_shape(back);
        doc.add_shape(front);

        let mut selection = SelectionSet::new();
        selection.set([front_id, back_id]);

        let mut clipboard = Clipboard::new();
        assert_eq!(clipboard.copy(&doc, &selection), 2);
        assert_eq!(clipboard.shapes()[0].id(), back_id);
        assert_eq!(clipboard.shapes()[1].id(), front_id);
    }

    #[test]
    fn test_empty_copy_keeps_contents() {
        let mut doc = Document::new();
        let rect = Shape::rectangle(Point::ZERO, 10.0, 10.0);
        let id = rect.id();
        doc.add_shape(rect);

        let mut selection = SelectionSet::new();
        selection.add(id);
        let mut clipboard = Clipboard::new();
        clipboard.copy(&doc, &selection);

        assert_eq!(clipboard.copy(&doc, &SelectionSet::new()), 0);
        assert_eq!(clipboard.len(), 1);
    }

    #[test]
    fn test_instantiate_centers_group() {
        let mut doc = Document::new();
        let a = Shape::rectangle(Point::new(0.0, 0.0), 10.0, 10.0);
        let b = Shape::rectangle(Point::new(30.0, 10.0), 10.0, 10.0);
        let ids = [a.id(), b.id()];
        doc.add_shape(a);
        doc.add_shape(b);

        let mut selection = SelectionSet::new();
        selection.set(ids);
        let mut clipboard = Clipboard::new();
        clipboard.copy(&doc, &selection);

        let pasted = clipboard.instantiate(Point::new(100.0, 100.0));
        assert_eq!(pasted.len(), 2);
        assert!(pasted.iter().all(|shape| !ids.contains(&shape.id())));
        assert_ne!(pasted[0].id(), pasted[1].id());

        // Group bounds were (0,0)-(40,20), centered on (20,10).
        assert_eq!(pasted[0].position, Point::new(80.0, 90.0));
        assert_eq!(pasted[1].position, Point::new(110.0, 100.0));

        // Instantiating twice never reuses ids.
        let again = clipboard.instantiate(Point::ZERO);
        assert_ne!(again[0].id(), pasted[0].id());
    }

    #[test]
    fn test_instantiate_empty() {
        assert!(Clipboard::new().instantiate(Point::ZERO).is_empty());
    }
}
