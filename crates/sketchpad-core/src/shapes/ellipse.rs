//! Ellipse inscribed in a shape's box.

use kurbo::{Point, Size};

/// Whether a local-frame point lies inside the ellipse inscribed in a box of
/// `size` at the origin, with both radii grown by `tolerance`.
///
/// A box with a zero side has no area; callers fall back to the box test.
pub fn contains(size: Size, local: Point, tolerance: f64) -> bool {
    let rx = size.width / 2.0 + tolerance;
    let ry = size.height / 2.0 + tolerance;
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let dx = (local.x - size.width / 2.0) / rx;
    let dy = (local.y - size.height / 2.0) / ry;
    dx * dx + dy * dy <= 1.0
}
