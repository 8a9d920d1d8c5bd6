//! Shape definitions for the sketch canvas.

pub mod ellipse;
pub mod freehand;
pub mod line;
pub mod text;

use kurbo::{Affine, BezPath, Ellipse, Point, Rect, Shape as KurboShape, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS color as written by the browser front-end:
    /// `transparent`, `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(color: &str) -> Option<Self> {
        let color = color.trim();
        if color.eq_ignore_ascii_case("transparent") {
            return Some(Self::transparent());
        }

        let hex = color.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = channel(0..1)? * 17;
                let g = channel(1..2)? * 17;
                let b = channel(2..3)? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    #[serde(default)]
    pub fill_color: Option<SerializableColor>,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl ShapeStyle {
    /// Get the stroke color with opacity applied.
    pub fn stroke_with_opacity(&self) -> Color {
        with_opacity(self.stroke_color, self.opacity)
    }

    /// Get the fill color with opacity applied.
    pub fn fill_with_opacity(&self) -> Option<Color> {
        self.fill_color.map(|c| with_opacity(c, self.opacity))
    }
}

fn with_opacity(color: SerializableColor, opacity: f64) -> Color {
    let alpha = (color.a as f64 * opacity.clamp(0.0, 1.0)) as u8;
    Color::from_rgba8(color.r, color.g, color.b, alpha)
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
            opacity: 1.0,
        }
    }
}

/// What a shape draws inside its box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    /// Fills the box.
    Ellipse,
    /// Endpoints relative to the shape's `position`, unrotated.
    Line { start: Point, end: Point },
    /// A line with a head at `end`.
    Arrow { start: Point, end: Point },
    /// Stroke samples relative to the shape's `position`, unrotated.
    Freehand { points: Vec<Point> },
    Text { content: String, font_size: f64 },
}

impl ShapeKind {
    /// Endpoints of a line or arrow, in the local frame.
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        match self {
            ShapeKind::Line { start, end } | ShapeKind::Arrow { start, end } => {
                Some((*start, *end))
            }
            _ => None,
        }
    }
}

/// A shape on the canvas.
///
/// Every kind lives in a box: `position` is the top-left corner before
/// rotation, and `rotation` turns the box about its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub(crate) id: ShapeId,
    pub kind: ShapeKind,
    /// Top-left corner of the unrotated box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation about the box center, in degrees within `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Shape {
    fn new(kind: ShapeKind, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            width,
            height,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Create a rectangle.
    pub fn rectangle(position: Point, width: f64, height: f64) -> Self {
        Self::new(ShapeKind::Rectangle, position, width, height)
    }

    /// Create a rectangle from two opposite corner points.
    pub fn rectangle_from_corners(p1: Point, p2: Point) -> Self {
        let rect = Rect::from_points(p1, p2);
        Self::rectangle(rect.origin(), rect.width(), rect.height())
    }

    /// Create an ellipse inscribed in the box spanned by two corner points.
    pub fn ellipse_from_corners(p1: Point, p2: Point) -> Self {
        let rect = Rect::from_points(p1, p2);
        Self::new(ShapeKind::Ellipse, rect.origin(), rect.width(), rect.height())
    }

    /// Create a line between two canvas points.
    pub fn line(start: Point, end: Point) -> Self {
        Self::segment(start, end, |start, end| ShapeKind::Line { start, end })
    }

    /// Create an arrow from `start` with its head at `end`.
    pub fn arrow(start: Point, end: Point) -> Self {
        Self::segment(start, end, |start, end| ShapeKind::Arrow { start, end })
    }

    fn segment(start: Point, end: Point, kind: impl FnOnce(Point, Point) -> ShapeKind) -> Self {
        let rect = Rect::from_points(start, end);
        let origin = rect.origin().to_vec2();
        Self::new(kind(start - origin, end - origin), rect.origin(), rect.width(), rect.height())
    }

    /// Create a freehand stroke from canvas-space samples.
    ///
    /// Returns `None` for an empty stroke.
    pub fn freehand(points: &[Point]) -> Option<Self> {
        let bounds = freehand::points_bounds(points)?;
        let origin = bounds.origin();
        let local = points.iter().map(|p| *p - origin.to_vec2()).collect();
        Some(Self::new(
            ShapeKind::Freehand { points: local },
            origin,
            bounds.width(),
            bounds.height(),
        ))
    }

    /// Create a text shape sized to its content.
    pub fn text(position: Point, content: impl Into<String>) -> Self {
        let content = content.into();
        let font_size = text::DEFAULT_FONT_SIZE;
        let size = text::measure(&content, font_size);
        Self::new(
            ShapeKind::Text { content, font_size },
            position,
            size.width,
            size.height,
        )
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Give the shape a fresh identity, as when pasting a copy.
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Center of the box in canvas space. Rotation does not move it.
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }

    pub fn rotation_radians(&self) -> f64 {
        self.rotation.to_radians()
    }

    /// Maps unrotated canvas coordinates to rotated canvas coordinates.
    pub fn rotation_transform(&self) -> Affine {
        Affine::rotate_about(self.rotation_radians(), self.center())
    }

    /// Express a canvas point relative to the unrotated box's top-left corner.
    pub fn to_local(&self, point: Point) -> Point {
        let unrotated = self.rotation_transform().inverse() * point;
        unrotated - self.position.to_vec2()
    }

    /// Inverse of [`Shape::to_local`].
    pub fn to_canvas(&self, local: Point) -> Point {
        self.rotation_transform() * (local + self.position.to_vec2())
    }

    /// The four box corners in canvas space, clockwise from top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(0.0, 0.0),
            Point::new(self.width, 0.0),
            Point::new(self.width, self.height),
            Point::new(0.0, self.height),
        ]
        .map(|local| self.to_canvas(local))
    }

    /// Axis-aligned bounding box of the rotated shape.
    pub fn bounds(&self) -> Rect {
        let [first, rest @ ..] = self.corners();
        rest.iter()
            .fold(Rect::from_points(first, first), |rect, p| rect.union_pt(*p))
    }

    /// Check if a canvas point hits the shape, allowing `tolerance`.
    ///
    /// Rectangles, text and freehand strokes use the rotated box, edges
    /// included. Ellipses use the inscribed ellipse. Lines and arrows use the
    /// distance to the segment, padded by half the stroke width.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = self.to_local(point);
        match &self.kind {
            ShapeKind::Ellipse if self.width > 0.0 && self.height > 0.0 => {
                ellipse::contains(self.size(), local, tolerance)
            }
            ShapeKind::Line { start, end } | ShapeKind::Arrow { start, end } => {
                line::distance_to_segment(local, *start, *end)
                    <= tolerance + self.style.stroke_width / 2.0
            }
            _ => self.box_contains(local, tolerance),
        }
    }

    /// Like [`Shape::hit_test`], but a freehand stroke only counts when
    /// `point` is within `radius` of the stroke itself. Used by the eraser.
    pub fn touches(&self, point: Point, radius: f64) -> bool {
        match &self.kind {
            ShapeKind::Freehand { points } => {
                let local = self.to_local(point);
                line::distance_to_polyline(local, points)
                    .is_some_and(|dist| dist <= radius + self.style.stroke_width / 2.0)
            }
            _ => self.hit_test(point, radius),
        }
    }

    fn box_contains(&self, local: Point, tolerance: f64) -> bool {
        local.x >= -tolerance
            && local.x <= self.width + tolerance
            && local.y >= -tolerance
            && local.y <= self.height + tolerance
    }

    /// Move the shape by a canvas-space offset.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Rotate about the center by `delta_degrees`.
    pub fn rotate(&mut self, delta_degrees: f64) {
        self.set_rotation(self.rotation + delta_degrees);
    }

    /// Set the absolute rotation, normalized into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f64) {
        let normalized = degrees.rem_euclid(360.0);
        // rem_euclid rounds tiny negative angles up to exactly 360
        self.rotation = if normalized >= 360.0 { 0.0 } else { normalized };
    }

    /// Replace the unrotated box, scaling the content with it.
    pub fn set_box(&mut self, position: Point, width: f64, height: f64) {
        let scale_x = if self.width > 0.0 { width / self.width } else { 1.0 };
        let scale_y = if self.height > 0.0 { height / self.height } else { 1.0 };

        let scale = |point: &mut Point| *point = Point::new(point.x * scale_x, point.y * scale_y);
        match &mut self.kind {
            ShapeKind::Rectangle | ShapeKind::Ellipse => {}
            ShapeKind::Line { start, end } | ShapeKind::Arrow { start, end } => {
                scale(start);
                scale(end);
            }
            ShapeKind::Freehand { points } => points.iter_mut().for_each(scale),
            ShapeKind::Text { font_size, .. } => {
                *font_size *= scale_y;
            }
        }

        self.position = position;
        self.width = width;
        self.height = height;
    }

    /// True if position, size, rotation or content differ from `other`.
    pub fn geometry_differs(&self, other: &Shape) -> bool {
        self.position != other.position
            || self.width != other.width
            || self.height != other.height
            || self.rotation != other.rotation
            || self.kind != other.kind
    }

    /// Line or arrow endpoints in canvas space.
    pub fn canvas_endpoints(&self) -> Option<(Point, Point)> {
        let (start, end) = self.kind.endpoints()?;
        Some((self.to_canvas(start), self.to_canvas(end)))
    }

    /// Freehand samples in canvas space (empty for other kinds).
    pub fn canvas_points(&self) -> Vec<Point> {
        match &self.kind {
            ShapeKind::Freehand { points } => points.iter().map(|p| self.to_canvas(*p)).collect(),
            _ => Vec::new(),
        }
    }

    /// Path for the renderer, in canvas space.
    ///
    /// Text yields its box outline; glyph layout is up to the renderer.
    pub fn to_path(&self) -> BezPath {
        let local_path = match &self.kind {
            ShapeKind::Rectangle | ShapeKind::Text { .. } => {
                Rect::from_origin_size(Point::ZERO, self.size()).to_path(0.1)
            }
            ShapeKind::Ellipse => {
                Ellipse::from_rect(Rect::from_origin_size(Point::ZERO, self.size())).to_path(0.1)
            }
            ShapeKind::Line { start, end } => line::segment_path(*start, *end, false),
            ShapeKind::Arrow { start, end } => line::segment_path(*start, *end, true),
            ShapeKind::Freehand { points } => freehand::smoothed_path(points),
        };
        self.rotation_transform() * Affine::translate(self.position.to_vec2()) * local_path
    }
}
