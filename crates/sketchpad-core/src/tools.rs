//! Tool system for the sketch canvas.

use crate::config::FreehandConfig;
use crate::handles::MIN_SHAPE_SIZE;
use crate::shapes::{freehand, Shape, ShapeStyle};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Rectangle,
    Ellipse,
    Line,
    Arrow,
    Freehand,
    Eraser,
    Laser,
}

impl ToolKind {
    /// Single-key tool shortcuts (no modifiers).
    pub fn from_shortcut(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "v" | "1" => Some(ToolKind::Select),
            "h" => Some(ToolKind::Pan),
            "r" | "2" => Some(ToolKind::Rectangle),
            "o" | "3" => Some(ToolKind::Ellipse),
            "a" | "4" => Some(ToolKind::Arrow),
            "l" | "5" => Some(ToolKind::Line),
            "p" | "6" => Some(ToolKind::Freehand),
            "e" | "7" => Some(ToolKind::Eraser),
            "k" | "8" => Some(ToolKind::Laser),
            _ => None,
        }
    }

    /// Tools that draw a new shape on release.
    pub fn creates_shapes(&self) -> bool {
        matches!(
            self,
            ToolKind::Rectangle
                | ToolKind::Ellipse
                | ToolKind::Line
                | ToolKind::Arrow
                | ToolKind::Freehand
        )
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// Tool is actively being used (e.g., drawing a shape).
    Active {
        /// Starting point of the interaction.
        start: Point,
        /// Current point of the interaction.
        current: Point,
    },
}

/// Manages the current tool and its in-progress drawing.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
    /// Accumulated points for freehand drawing.
    freehand_points: Vec<Point>,
    /// Current style to apply to new shapes.
    pub current_style: ShapeStyle,
    pub freehand: FreehandConfig,
    /// Drags smaller than this on both axes do not create a rectangle.
    pub min_shape_size: f64,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new(FreehandConfig::default(), MIN_SHAPE_SIZE)
    }
}

impl ToolManager {
    pub fn new(freehand: FreehandConfig, min_shape_size: f64) -> Self {
        Self {
            current_tool: ToolKind::default(),
            state: ToolState::default(),
            freehand_points: Vec::new(),
            current_style: ShapeStyle::default(),
            freehand,
            min_shape_size,
        }
    }

    /// Set the current tool, dropping any drawing in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.cancel();
        self.current_tool = tool;
    }

    /// Begin a tool interaction at a canvas point.
    pub fn begin(&mut self, point: Point) {
        self.freehand_points.clear();
        if self.current_tool == ToolKind::Freehand {
            self.freehand_points.push(point);
        }
        self.state = ToolState::Active {
            start: point,
            current: point,
        };
    }

    /// Update the current interaction.
    pub fn update(&mut self, point: Point) {
        let ToolState::Active { current, .. } = &mut self.state else {
            return;
        };
        *current = point;

        if self.current_tool == ToolKind::Freehand {
            let far_enough = self
                .freehand_points
                .last()
                .is_none_or(|last| last.distance(point) >= self.freehand.min_point_distance);
            if far_enough {
                self.freehand_points.push(point);
            }
        }
    }

    /// End the current interaction and return any created shape.
    pub fn end(&mut self, point: Point) -> Option<Shape> {
        if !self.is_active() {
            return None;
        }
        self.update(point);
        let shape = self.build_shape();
        self.cancel();
        shape
    }

    /// Cancel the current interaction.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
        self.freehand_points.clear();
    }

    /// Check if a tool interaction is active.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// Get the accumulated freehand points.
    pub fn freehand_points(&self) -> &[Point] {
        &self.freehand_points
    }

    /// The shape that releasing now would create, for live drawing.
    pub fn preview_shape(&self) -> Option<Shape> {
        self.build_shape()
    }

    fn build_shape(&self) -> Option<Shape> {
        let ToolState::Active { start, current } = self.state else {
            return None;
        };

        let mut shape = match self.current_tool {
            ToolKind::Rectangle | ToolKind::Ellipse => {
                if !self.exceeds_min_size(start, current) {
                    return None;
                }
                let mut boxed = if self.current_tool == ToolKind::Ellipse {
                    Shape::ellipse_from_corners(start, current)
                } else {
                    Shape::rectangle_from_corners(start, current)
                };
                boxed.width = boxed.width.max(self.min_shape_size);
                boxed.height = boxed.height.max(self.min_shape_size);
                boxed
            }
            // A horizontal or vertical segment keeps its zero-size axis.
            ToolKind::Line if self.exceeds_min_size(start, current) => {
                Shape::line(start, current)
            }
            ToolKind::Arrow if self.exceeds_min_size(start, current) => {
                Shape::arrow(start, current)
            }
            ToolKind::Line | ToolKind::Arrow => return None,
            ToolKind::Freehand => {
                if self.freehand_points.len() < 2 {
                    return None;
                }
                let tolerance = self.freehand.simplify_tolerance;
                let points = freehand::simplify(&self.freehand_points, tolerance);
                Shape::freehand(&points)?
            }
            ToolKind::Select | ToolKind::Pan | ToolKind::Eraser | ToolKind::Laser => return None,
        };

        shape.style = self.current_style.clone();
        Some(shape)
    }

    /// Drags no larger than `min_shape_size` on both axes are clicks.
    fn exceeds_min_size(&self, start: Point, current: Point) -> bool {
        (current.x - start.x).abs() > self.min_shape_size
            || (current.y - start.y).abs() > self.min_shape_size
    }
}
