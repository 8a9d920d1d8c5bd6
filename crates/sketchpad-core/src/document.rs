//! Shape storage and z-order.

use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A shape together with its layer, as captured when it left the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayeredShape {
    pub z_index: usize,
    pub shape: Shape,
}

/// All shapes on the canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// All shapes in the document, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    z_order: Vec<ShapeId>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape on top of all others.
    pub fn add_shape(&mut self, shape: Shape) {
        let index = self.z_order.len();
        self.insert_at(shape, index);
    }

    /// Insert a shape at a z-index, clamped to the current layer count.
    ///
    /// A shape whose id is already present is replaced and moved.
    pub fn insert_at(&mut self, shape: Shape, z_index: usize) {
        let id = shape.id();
        self.z_order.retain(|&shape_id| shape_id != id);
        let z_index = z_index.min(self.z_order.len());
        self.z_order.insert(z_index, id);
        self.shapes.insert(id, shape);
    }

    /// Remove a shape, returning it with the z-index it had.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<(usize, Shape)> {
        let shape = self.shapes.remove(&id)?;
        let z_index = self.z_index(id).unwrap_or(self.z_order.len());
        self.z_order.retain(|&shape_id| shape_id != id);
        Some((z_index, shape))
    }

    /// Remove several shapes at once.
    ///
    /// Each entry records the z-index the shape had before any of them were
    /// removed, sorted back to front, so reinserting the list in order puts
    /// every shape back on its old layer. Unknown ids are skipped.
    pub fn remove_shapes(&mut self, ids: &[ShapeId]) -> Vec<LayeredShape> {
        let mut layers: Vec<(usize, ShapeId)> = ids
            .iter()
            .filter_map(|&id| self.z_index(id).map(|z_index| (z_index, id)))
            .collect();
        layers.sort_unstable_by_key(|(z_index, _)| *z_index);
        layers.dedup();

        let removed: Vec<LayeredShape> = layers
            .into_iter()
            .filter_map(|(z_index, id)| {
                self.shapes
                    .remove(&id)
                    .map(|shape| LayeredShape { z_index, shape })
            })
            .collect();
        self.z_order.retain(|id| self.shapes.contains_key(id));
        removed
    }

    /// Reinsert shapes captured by [`Document::remove_shapes`].
    pub fn restore_shapes(&mut self, layers: &[LayeredShape]) {
        for layer in layers {
            self.insert_at(layer.shape.clone(), layer.z_index);
        }
    }

    /// Overwrite an existing shape in place, keeping its layer.
    /// Returns false if the shape is not in the document.
    pub fn replace(&mut self, shape: Shape) -> bool {
        match self.shapes.get_mut(&shape.id()) {
            Some(existing) => {
                *existing = shape;
                true
            }
            None => false,
        }
    }

    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Position of a shape in the z-order (0 = back).
    pub fn z_index(&self, id: ShapeId) -> Option<usize> {
        self.z_order.iter().position(|&shape_id| shape_id == id)
    }

    /// Shape ids back to front.
    pub fn z_order(&self) -> &[ShapeId] {
        &self.z_order
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Bounding box of the given shapes, skipping unknown ids.
    pub fn bounds_of(&self, ids: impl IntoIterator<Item = ShapeId>) -> Option<Rect> {
        ids.into_iter()
            .filter_map(|id| self.shapes.get(&id))
            .map(Shape::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds_of(self.z_order.iter().copied())
    }

    /// Find shapes at a point (in canvas coordinates), front to back.
    pub fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|&id| {
                self.shapes
                    .get(&id)
                    .filter(|s| s.hit_test(point, tolerance))
                    .map(|_| id)
            })
            .collect()
    }

    /// Shapes within `radius` of a point, front to back. Freehand strokes
    /// only count near the stroke itself, not anywhere in their box.
    pub fn shapes_touching(&self, point: Point, radius: f64) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .filter(|id| self.shapes.get(id).is_some_and(|s| s.touches(point, radius)))
            .collect()
    }

    /// The frontmost shape at a point.
    pub fn top_shape_at(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.z_order.iter().rev().copied().find(|id| {
            self.shapes
                .get(id)
                .is_some_and(|s| s.hit_test(point, tolerance))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert!(doc.bounds().is_none());
    }

    #[test]
    fn test_add_and_remove_shape() {
        let mut doc = Document::new();
        let rect = Shape::rectangle(Point::new(0.0, 0.0), 100.0, 100.0);
        let id = rect.id();

        doc.add_shape(rect);
        assert_eq!(doc.len(), 1);
        assert!(doc.get_shape(id).is_some());

        let (z_index, removed) = doc.remove_shape(id).unwrap();
        assert_eq!(z_index, 0);
        assert_eq!(removed.id(), id);
        assert!(doc.is_empty());
        assert!(doc.remove_shape(id).is_none());
    }

    #[test]
    fn test_insert_at_restores_layer() {
        let mut doc = Document::new();
        let shapes: Vec<Shape> = (0..3)
            .map(|i| Shape::rectangle(Point::new(i as f64 * 10.0, 0.0), 5.0, 5.0))
            .collect();
        let ids: Vec<ShapeId> = shapes.iter().map(Shape::id).collect();
        for shape in shapes {
            doc.add_shape(shape);
        }

        let (z_index, middle) = doc.remove_shape(ids[1]).unwrap();
        assert_eq!(doc.z_order(), &[ids[0], ids[2]]);

        doc.insert_at(middle, z_index);
        assert_eq!(doc.z_order(), ids.as_slice());
    }

    #[test]
    fn test_remove_and_restore_many() {
        let mut doc = Document::new();
        let shapes: Vec<Shape> = (0..5)
            .map(|i| Shape::rectangle(Point::new(i as f64, 0.0), 5.0, 5.0))
            .collect();
        let ids: Vec<ShapeId> = shapes.iter().map(Shape::id).collect();
        for shape in shapes {
            doc.add_shape(shape);
        }

        let removed = doc.remove_shapes(&[ids[3], ids[1], ids[3]]);
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].z_index, 1);
        assert_eq!(removed[1].z_index, 3);
        assert_eq!(doc.z_order(), &[ids[0], ids[2], ids[4]]);

        doc.restore_shapes(&removed);
        assert_eq!(doc.z_order(), ids.as_slice());
    }

    #[test]
    fn test_insert_at_clamps_index() {
        let mut doc = Document::new();
        let rect = Shape::rectangle(Point::ZERO, 5.0, 5.0);
        let id = rect.id();
        doc.insert_at(rect, 42);
        assert_eq!(doc.z_index(id), Some(0));
    }

    #[test]
    fn test_replace_keeps_layer() {
        let mut doc = Document::new();
        let back = Shape::rectangle(Point::ZERO, 5.0, 5.0);
        let front = Shape::rectangle(Point::ZERO, 5.0, 5.0);
        let back_id = back.id();
        doc.add_shape(back.clone());
        doc.add_shape(front);

        let mut moved = back;
        moved.translate(kurbo::Vec2::new(3.0, 3.0));
        assert!(doc.replace(moved));
        assert_eq!(doc.z_index(back_id), Some(0));
        assert!((doc.get_shape(back_id).unwrap().position.x - 3.0).abs() < f64::EPSILON);

        assert!(!doc.replace(Shape::rectangle(Point::ZERO, 1.0, 1.0)));
    }

    #[test]
    fn test_shapes_at_point() {
        let mut doc = Document::new();
        let rect1 = Shape::rectangle(Point::new(0.0, 0.0), 100.0, 100.0);
        let rect2 = Shape::rectangle(Point::new(50.0, 50.0), 100.0, 100.0);
        let id1 = rect1.id();
        let id2 = rect2.id();

        doc.add_shape(rect1);
        doc.add_shape(rect2);

        // Front shape should be first
        assert_eq!(doc.shapes_at_point(Point::new(75.0, 75.0), 0.0), vec![id2, id1]);
        assert_eq!(doc.top_shape_at(Point::new(75.0, 75.0), 0.0), Some(id2));

        assert_eq!(doc.shapes_at_point(Point::new(25.0, 25.0), 0.0), vec![id1]);
        assert_eq!(doc.top_shape_at(Point::new(500.0, 500.0), 0.0), None);
    }

    #[test]
    fn test_bounds_of() {
        let mut doc = Document::new();
        let a = Shape::rectangle(Point::new(0.0, 0.0), 10.0, 10.0);
        let b = Shape::rectangle(Point::new(20.0, 30.0), 10.0, 10.0);
        let ids = [a.id(), b.id()];
        doc.add_shape(a);
        doc.add_shape(b);

        let bounds = doc.bounds_of(ids).unwrap();
        assert_eq!(bounds, Rect::new(0.0, 0.0, 30.0, 40.0));
        assert_eq!(doc.bounds(), Some(bounds));
    }
}
