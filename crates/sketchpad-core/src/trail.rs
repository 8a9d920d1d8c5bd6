//! Fading pointer trails for the eraser and the laser pointer.

use crate::config::TrailConfig;
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Laser stroke opacity while drawing.
const LASER_OPACITY: f64 = 0.8;
/// Laser stroke width while drawing.
const LASER_WIDTH: f64 = 5.0;

/// Which tool the trail follows. They smooth and fade differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailKind {
    /// Short trail that shrinks one point per tick once released.
    Eraser,
    /// Longer trail that eases out over the fade duration once released.
    Laser,
}

#[derive(Debug, Clone, PartialEq)]
enum FadeState {
    Drawing,
    Fading {
        elapsed: Duration,
        /// Points present when the pointer was released.
        initial: Vec<Point>,
    },
}

/// A bounded list of recent pointer positions in canvas space.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    kind: TrailKind,
    config: TrailConfig,
    points: Vec<Point>,
    fade: FadeState,
}

impl Trail {
    pub fn new(kind: TrailKind, config: TrailConfig) -> Self {
        Self {
            kind,
            config,
            points: Vec::new(),
            fade: FadeState::Drawing,
        }
    }

    pub fn eraser() -> Self {
        Self::new(TrailKind::Eraser, TrailConfig::eraser())
    }

    pub fn laser() -> Self {
        Self::new(TrailKind::Laser, TrailConfig::laser())
    }

    pub fn kind(&self) -> TrailKind {
        self.kind
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_fading(&self) -> bool {
        matches!(self.fade, FadeState::Fading { .. })
    }

    /// Start a new trail at `point`, discarding any previous one.
    pub fn begin(&mut self, point: Point) {
        self.points.clear();
        self.points.push(point);
        self.fade = FadeState::Drawing;
    }

    /// Record a pointer position. Returns true if it was kept.
    ///
    /// Points too close to the previous one are skipped, and the oldest
    /// point is dropped once the trail is full.
    pub fn push(&mut self, point: Point) -> bool {
        if self.is_fading() {
            return false;
        }
        let far_enough = match self.points.last() {
            None => true,
            Some(last) => {
                let distance = last.distance(point);
                match self.kind {
                    TrailKind::Eraser => distance > self.config.min_distance,
                    TrailKind::Laser => distance >= self.config.min_distance,
                }
            }
        };
        if !far_enough {
            return false;
        }

        self.points.push(point);
        if self.points.len() > self.config.max_points {
            let excess = self.points.len() - self.config.max_points;
            self.points.drain(..excess);
        }
        true
    }

    /// The pointer was released: begin fading out.
    pub fn release(&mut self) {
        if !self.is_fading() {
            self.fade = FadeState::Fading {
                elapsed: Duration::ZERO,
                initial: self.points.clone(),
            };
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.fade = FadeState::Drawing;
    }

    /// Advance the fade-out by `elapsed`. Returns true while anything is
    /// left to draw.
    pub fn advance_fade(&mut self, elapsed: Duration) -> bool {
        let fade_duration = self.config.fade_duration();
        let max_points = self.config.max_points.max(1) as u32;
        let kind = self.kind;

        let FadeState::Fading { elapsed: total, initial } = &mut self.fade else {
            return !self.points.is_empty();
        };
        *total += elapsed;

        match kind {
            TrailKind::Eraser => {
                // One point per tick of fade_duration / max_points
                let tick = fade_duration / max_points;
                let ticks = if tick.is_zero() {
                    initial.len()
                } else {
                    (total.as_nanos() / tick.as_nanos()) as usize
                };
                let keep = initial.len().saturating_sub(ticks);
                self.points = initial[initial.len() - keep..].to_vec();
            }
            TrailKind::Laser => {
                let eased = eased_progress(*total, fade_duration);
                let keep = (initial.len() as f64 * (1.0 - eased)).round() as usize;
                self.points = if keep < 2 {
                    Vec::new()
                } else {
                    initial[initial.len() - keep..].to_vec()
                };
            }
        }

        if self.points.is_empty() {
            self.fade = FadeState::Drawing;
            return false;
        }
        true
    }

    fn fade_progress(&self) -> f64 {
        match &self.fade {
            FadeState::Drawing => 0.0,
            FadeState::Fading { elapsed, .. } => {
                linear_progress(*elapsed, self.config.fade_duration())
            }
        }
    }

    /// Stroke opacity in `[0, 1]`.
    pub fn opacity(&self) -> f64 {
        match self.kind {
            TrailKind::Eraser => {
                let fill = self.points.len() as f64 / self.config.max_points.max(1) as f64;
                fill.max(0.2)
            }
            TrailKind::Laser => LASER_OPACITY * (1.0 - self.fade_progress()),
        }
    }

    /// Stroke width in canvas units.
    pub fn stroke_width(&self) -> f64 {
        match self.kind {
            TrailKind::Eraser => (10.0 * self.opacity()).max(2.0),
            TrailKind::Laser => {
                let progress = self.fade_progress();
                (LASER_WIDTH * (1.0 - progress * progress)).max(0.1)
            }
        }
    }

    /// Catmull-Rom spline through the points, as cubic Béziers.
    ///
    /// The eraser needs at least three points. The laser adds quadratic
    /// lead-in and lead-out segments so the ends reach the first and last
    /// points.
    pub fn smoothed_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let points = &self.points;

        match self.kind {
            TrailKind::Eraser => {
                if points.len() < 3 {
                    return path;
                }
                path.move_to(points[0]);
                push_catmull_rom(&mut path, points);
            }
            TrailKind::Laser => {
                if points.len() < 2 {
                    return path;
                }
                path.move_to(points[0]);
                if points.len() == 2 {
                    path.line_to(points[1]);
                    return path;
                }

                let lead_in = points[0] + (points[1] - points[0]) / 3.0;
                path.quad_to(lead_in, points[1]);
                push_catmull_rom(&mut path, points);
                let last = points[points.len() - 1];
                let second_last = points[points.len() - 2];
                path.quad_to(last - (last - second_last) / 3.0, last);
            }
        }
        path
    }
}

/// Append one cubic per interior span, ending at each `p2`.
fn push_catmull_rom(path: &mut BezPath, points: &[Point]) {
    for window in points.windows(4) {
        let [p0, p1, p2, p3] = [window[0], window[1], window[2], window[3]];
        let cp1 = p1 + (p2 - p0) / 6.0;
        let cp2 = p2 - (p3 - p1) / 6.0;
        path.curve_to(cp1, cp2, p2);
    }
}

fn linear_progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
}

/// Quadratic ease-in of the fade progress.
fn eased_progress(elapsed: Duration, duration: Duration) -> f64 {
    let progress = linear_progress(elapsed, duration);
    progress * progress
}
