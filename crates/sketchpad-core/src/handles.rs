//! Resize and rotate handles.

use crate::shapes::Shape;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Distance from the top edge to the rotate handle (in canvas units).
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Smallest width or height a resize may produce.
pub const MIN_SHAPE_SIZE: f64 = 1.0;

/// One of the eight resize anchors around a shape's box.
///
/// The discriminant order is the host-facing anchor index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Anchor {
    pub const ALL: [Anchor; 8] = [
        Anchor::TopLeft,
        Anchor::Top,
        Anchor::TopRight,
        Anchor::Right,
        Anchor::BottomRight,
        Anchor::Bottom,
        Anchor::BottomLeft,
        Anchor::Left,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The anchor across the box, which stays put while this one is dragged.
    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 4) % 8]
    }

    /// Direction from the box center, per axis: -1, 0 or 1.
    fn direction(self) -> (f64, f64) {
        match self {
            Anchor::TopLeft => (-1.0, -1.0),
            Anchor::Top => (0.0, -1.0),
            Anchor::TopRight => (1.0, -1.0),
            Anchor::Right => (1.0, 0.0),
            Anchor::BottomRight => (1.0, 1.0),
            Anchor::Bottom => (0.0, 1.0),
            Anchor::BottomLeft => (-1.0, 1.0),
            Anchor::Left => (-1.0, 0.0),
        }
    }

    /// Position in the unrotated box, relative to its top-left corner.
    fn local_position(self, width: f64, height: f64) -> Point {
        let (dx, dy) = self.direction();
        Point::new((dx + 1.0) / 2.0 * width, (dy + 1.0) / 2.0 * height)
    }
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Anchor(Anchor),
    /// Rotation handle above the top edge.
    Rotate,
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a canvas point hits this handle.
    /// `tolerance` should already be adjusted for viewport zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.position.distance(point) <= tolerance
    }
}

/// Canvas position of an anchor on a shape, honoring rotation.
pub fn anchor_position(shape: &Shape, anchor: Anchor) -> Point {
    shape.to_canvas(anchor.local_position(shape.width, shape.height))
}

/// Canvas position of the anchor with the given index, if it exists.
pub fn anchor_at(shape: &Shape, index: usize) -> Option<Point> {
    Anchor::from_index(index).map(|anchor| anchor_position(shape, anchor))
}

/// Canvas position of the rotate handle, `offset` above the top-center.
pub fn rotate_handle_position(shape: &Shape, offset: f64) -> Point {
    shape.to_canvas(Point::new(shape.width / 2.0, -offset))
}

/// All handles of a shape: the eight anchors followed by the rotate handle.
pub fn handles(shape: &Shape, rotate_offset: f64) -> Vec<Handle> {
    Anchor::ALL
        .iter()
        .map(|&anchor| Handle::new(anchor_position(shape, anchor), HandleKind::Anchor(anchor)))
        .chain(std::iter::once(Handle::new(
            rotate_handle_position(shape, rotate_offset),
            HandleKind::Rotate,
        )))
        .collect()
}

/// The handle of `shape` nearest to `point` within `tolerance`, with its distance.
pub fn nearest_handle(
    shape: &Shape,
    point: Point,
    tolerance: f64,
    rotate_offset: f64,
) -> Option<(Handle, f64)> {
    handles(shape, rotate_offset)
        .into_iter()
        .filter(|handle| handle.hit_test(point, tolerance))
        .map(|handle| (handle, handle.position.distance(point)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Drag `anchor` of `shape` to the canvas point `new_point`.
///
/// The opposite anchor stays fixed in canvas space. Each dragged axis takes
/// the pointer's signed distance from the fixed anchor, measured in the
/// shape's rotated frame and clamped to `min_size`, so dragging past the
/// fixed anchor never flips the box. Edge anchors leave the other axis alone.
pub fn resize(shape: &mut Shape, anchor: Anchor, new_point: Point, min_size: f64) {
    let (dir_x, dir_y) = anchor.direction();
    let fixed = anchor.opposite().local_position(shape.width, shape.height);
    let pointer = shape.to_local(new_point);

    let span = |dir: f64, fixed: f64, pointer: f64, current: f64| -> (f64, f64) {
        if dir == 0.0 {
            return (0.0, current);
        }
        let extent = (dir * (pointer - fixed)).max(min_size);
        let start = if dir > 0.0 { fixed } else { fixed - extent };
        (start, extent)
    };
    let (x0, width) = span(dir_x, fixed.x, pointer.x, shape.width);
    let (y0, height) = span(dir_y, fixed.y, pointer.y, shape.height);

    // Old frame center of the new box; the new box keeps the rotation about it.
    let center = shape.to_canvas(Point::new(x0 + width / 2.0, y0 + height / 2.0));
    let position = Point::new(center.x - width / 2.0, center.y - height / 2.0);
    shape.set_box(position, width, height);
}

/// Angle of `point` around `center`, in degrees.
pub fn pointer_angle(center: Point, point: Point) -> f64 {
    (point.y - center.y).atan2(point.x - center.x).to_degrees()
}
