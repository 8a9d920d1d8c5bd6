//! Viewport module for pan/zoom transforms.

use crate::config::ViewportConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// A rectangular window into the infinite canvas.
///
/// The window's top-left corner sits at `origin` in canvas space and spans
/// `screen_size / zoom` canvas units, so a screen pixel `p` maps to the canvas
/// point `origin + p / zoom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Canvas-space point shown at the screen's top-left corner.
    pub origin: Point,
    /// Size of the host window in screen pixels.
    pub screen_size: Size,
    /// Current zoom factor (1.0 = one canvas unit per pixel).
    zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
    /// Multiplicative step used by `zoom_in` / `zoom_out`.
    pub button_step: f64,
    /// Additive step used per wheel notch.
    pub wheel_step: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0))
    }
}

impl Viewport {
    /// Create a viewport at zoom 1.0 with its origin at the canvas origin.
    pub fn new(screen_size: Size) -> Self {
        Self::with_config(screen_size, &ViewportConfig::default())
    }

    /// Create a viewport using the limits and steps from `config`.
    pub fn with_config(screen_size: Size, config: &ViewportConfig) -> Self {
        Self {
            origin: Point::ZERO,
            screen_size,
            zoom: clamp_zoom(1.0, config.min_zoom, config.max_zoom),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            button_step: config.button_step,
            wheel_step: config.wheel_step,
        }
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom as a rounded percentage for display.
    pub fn zoom_percent(&self) -> i64 {
        (self.zoom * 100.0).round() as i64
    }

    /// Visible width in canvas units.
    pub fn width(&self) -> f64 {
        self.screen_size.width / self.zoom
    }

    /// Visible height in canvas units.
    pub fn height(&self) -> f64 {
        self.screen_size.height / self.zoom
    }

    /// The visible region of canvas space.
    pub fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, Size::new(self.width(), self.height()))
    }

    /// Canvas-to-screen transform for rendering.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.zoom) * Affine::translate(-self.origin.to_vec2())
    }

    /// Screen-to-canvas transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::translate(self.origin.to_vec2()) * Affine::scale(1.0 / self.zoom)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        Point::new(
            self.origin.x + screen_point.x / self.zoom,
            self.origin.y + screen_point.y / self.zoom,
        )
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        Point::new(
            (canvas_point.x - self.origin.x) * self.zoom,
            (canvas_point.y - self.origin.y) * self.zoom,
        )
    }

    /// Pan by a pointer delta in screen pixels.
    ///
    /// The content follows the pointer, so the origin moves the opposite way.
    pub fn pan(&mut self, screen_delta: Vec2) {
        self.origin -= screen_delta / self.zoom;
    }

    /// Zoom by `factor`, keeping the canvas point under `screen_anchor` fixed.
    pub fn zoom_at(&mut self, screen_anchor: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            log::warn!("Ignoring zoom factor {factor}");
            return;
        }
        let old_zoom = self.zoom;
        let new_zoom = clamp_zoom(old_zoom * factor, self.min_zoom, self.max_zoom);
        if new_zoom == old_zoom {
            return;
        }

        let anchor = self.screen_to_canvas(screen_anchor);
        let ratio = old_zoom / new_zoom;
        self.origin = Point::new(
            anchor.x - (anchor.x - self.origin.x) * ratio,
            anchor.y - (anchor.y - self.origin.y) * ratio,
        );
        self.zoom = new_zoom;
        log::trace!("Zoom {old_zoom} -> {new_zoom} at {screen_anchor:?}");
    }

    /// Zoom in one button step around the screen center.
    pub fn zoom_in(&mut self) {
        self.zoom_at(self.screen_center(), self.button_step);
    }

    /// Zoom out one button step around the screen center.
    pub fn zoom_out(&mut self) {
        self.zoom_at(self.screen_center(), 1.0 / self.button_step);
    }

    /// Zoom one wheel notch at `screen_anchor`.
    ///
    /// Scrolling down (positive `delta_y`) zooms out. The step is additive.
    pub fn wheel_zoom(&mut self, screen_anchor: Point, delta_y: f64) {
        if delta_y == 0.0 {
            return;
        }
        let step = if delta_y > 0.0 { -self.wheel_step } else { self.wheel_step };
        let target = clamp_zoom(self.zoom + step, self.min_zoom, self.max_zoom);
        self.zoom_at(screen_anchor, target / self.zoom);
    }

    /// Follow a host window resize, keeping the canvas point at the window
    /// center fixed.
    pub fn resize(&mut self, screen_size: Size) {
        let center = self.visible_rect().center();
        self.screen_size = screen_size;
        self.origin = Point::new(
            center.x - self.width() / 2.0,
            center.y - self.height() / 2.0,
        );
    }

    /// Reset to zoom 1.0 at the canvas origin.
    pub fn reset(&mut self) {
        self.origin = Point::ZERO;
        self.zoom = clamp_zoom(1.0, self.min_zoom, self.max_zoom);
    }

    /// Fit the viewport to show the given bounding box.
    pub fn fit_to_bounds(&mut self, bounds: Rect, padding: f64) {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            self.reset();
            return;
        }

        let padded = Size::new(
            (self.screen_size.width - padding * 2.0).max(1.0),
            (self.screen_size.height - padding * 2.0).max(1.0),
        );

        let scale_x = padded.width / bounds.width();
        let scale_y = padded.height / bounds.height();
        self.zoom = clamp_zoom(scale_x.min(scale_y), self.min_zoom, self.max_zoom);

        let center = bounds.center();
        self.origin = Point::new(
            center.x - self.width() / 2.0,
            center.y - self.height() / 2.0,
        );
    }

    fn screen_center(&self) -> Point {
        Point::new(self.screen_size.width / 2.0, self.screen_size.height / 2.0)
    }
}

/// Clamp into `[min, max]` without panicking on inverted or NaN limits.
/// Unvalidated configs land on `max` when the limits are inverted.
fn clamp_zoom(zoom: f64, min: f64, max: f64) -> f64 {
    zoom.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9, "{a:?} != {b:?}");
        assert!((a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.origin, Point::ZERO);
        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
        assert!((viewport.width() - 800.0).abs() < f64::EPSILON);
        assert!((viewport.height() - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_canvas_with_origin_and_zoom() {
        let mut viewport = Viewport::default();
        viewport.origin = Point::new(50.0, 100.0);
        viewport.zoom_at(Point::ZERO, 2.0);
        // Anchored at the screen origin, so the origin is unchanged.
        assert_point_eq(viewport.origin, Point::new(50.0, 100.0));

        let canvas = viewport.screen_to_canvas(Point::new(100.0, 200.0));
        assert_point_eq(canvas, Point::new(100.0, 200.0));
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut viewport = Viewport::default();
        viewport.origin = Point::new(30.0, -20.0);
        viewport.zoom_at(Point::new(10.0, 10.0), 1.5);

        let original = Point::new(123.0, 456.0);
        let canvas = viewport.screen_to_canvas(original);
        assert_point_eq(viewport.canvas_to_screen(canvas), original);
        assert_point_eq(viewport.transform() * canvas, original);
        assert_point_eq(viewport.inverse_transform() * original, canvas);
    }

    #[test]
    fn test_zoom_anchor_is_fixed() {
        let mut viewport = Viewport::default();
        viewport.origin = Point::new(-40.0, 75.0);
        let anchor = Point::new(321.0, 123.0);

        for factor in [2.0, 0.5, 1.3, 0.77, 4.0] {
            let before = viewport.screen_to_canvas(anchor);
            viewport.zoom_at(anchor, factor);
            assert_point_eq(viewport.screen_to_canvas(anchor), before);
        }
    }

    #[test]
    fn test_zoom_in_then_out_restores_state() {
        let mut viewport = Viewport::default();
        viewport.zoom_at(Point::new(100.0, 100.0), 2.0);
        assert!((viewport.zoom() - 2.0).abs() < f64::EPSILON);
        assert_point_eq(viewport.origin, Point::new(50.0, 50.0));

        viewport.zoom_at(Point::new(100.0, 100.0), 0.5);
        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
        assert_point_eq(viewport.origin, Point::ZERO);
    }

    #[test]
    fn test_inverted_limits_do_not_panic() {
        let config = ViewportConfig {
            min_zoom: 4.0,
            max_zoom: 0.5,
            ..ViewportConfig::default()
        };
        let mut viewport = Viewport::with_config(Size::new(800.0, 600.0), &config);
        assert!((viewport.zoom() - 0.5).abs() < f64::EPSILON);
        viewport.zoom_in();
        viewport.wheel_zoom(Point::new(10.0, 10.0), -1.0);
        viewport.reset();
        assert!((viewport.zoom() - 0.5).abs() < f64::EPSILON);

        let nan = ViewportConfig {
            max_zoom: f64::NAN,
            ..ViewportConfig::default()
        };
        let viewport = Viewport::with_config(Size::new(800.0, 600.0), &nan);
        assert!(viewport.zoom().is_finite());
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::default();
        viewport.zoom_at(Point::ZERO, 0.001);
        assert!((viewport.zoom() - viewport.min_zoom).abs() < f64::EPSILON);

        viewport.zoom_at(Point::ZERO, 1e6);
        assert!((viewport.zoom() - viewport.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamped_zoom_keeps_anchor() {
        let mut viewport = Viewport::default();
        let anchor = Point::new(200.0, 150.0);
        let before = viewport.screen_to_canvas(anchor);
        viewport.zoom_at(anchor, 1000.0);
        assert_point_eq(viewport.screen_to_canvas(anchor), before);
    }

    #[test]
    fn test_invalid_factor_is_ignored() {
        let mut viewport = Viewport::default();
        viewport.zoom_at(Point::ZERO, 0.0);
        viewport.zoom_at(Point::ZERO, f64::NAN);
        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan() {
        let mut viewport = Viewport::default();
        viewport.pan(Vec2::new(10.0, 20.0));
        assert_point_eq(viewport.origin, Point::new(-10.0, -20.0));

        viewport.zoom_at(Point::ZERO, 2.0);
        viewport.pan(Vec2::new(10.0, 20.0));
        assert_point_eq(viewport.origin, Point::new(-15.0, -30.0));
    }

    #[test]
    fn test_pan_moves_content_with_pointer() {
        let mut viewport = Viewport::default();
        viewport.zoom_at(Point::ZERO, 3.0);
        let canvas_point = Point::new(40.0, 40.0);
        let before = viewport.canvas_to_screen(canvas_point);
        viewport.pan(Vec2::new(25.0, -5.0));
        let after = viewport.canvas_to_screen(canvas_point);
        assert_point_eq(after, Point::new(before.x + 25.0, before.y - 5.0));
    }

    #[test]
    fn test_button_zoom_is_centered() {
        let mut viewport = Viewport::default();
        let center = viewport.visible_rect().center();
        viewport.zoom_in();
        assert!((viewport.zoom() - 1.1).abs() < 1e-12);
        assert_point_eq(viewport.visible_rect().center(), center);

        viewport.zoom_out();
        assert!((viewport.zoom() - 1.0).abs() < 1e-12);
        assert_point_eq(viewport.visible_rect().center(), center);
    }

    #[test]
    fn test_wheel_zoom_steps() {
        let mut viewport = Viewport::default();
        let anchor = Point::new(300.0, 200.0);
        let before = viewport.screen_to_canvas(anchor);

        viewport.wheel_zoom(anchor, -120.0);
        assert!((viewport.zoom() - 1.1).abs() < 1e-12);
        viewport.wheel_zoom(anchor, 120.0);
        viewport.wheel_zoom(anchor, 120.0);
        assert!((viewport.zoom() - 0.9).abs() < 1e-12);
        assert_point_eq(viewport.screen_to_canvas(anchor), before);

        viewport.wheel_zoom(anchor, 0.0);
        assert!((viewport.zoom() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_resize_keeps_center() {
        let mut viewport = Viewport::default();
        viewport.origin = Point::new(100.0, 100.0);
        viewport.zoom_at(Point::ZERO, 2.0);
        let center = viewport.visible_rect().center();

        viewport.resize(Size::new(1024.0, 768.0));
        assert!((viewport.width() - 512.0).abs() < 1e-9);
        assert!((viewport.height() - 384.0).abs() < 1e-9);
        assert_point_eq(viewport.visible_rect().center(), center);
    }

    #[test]
    fn test_fit_to_bounds() {
        let mut viewport = Viewport::new(Size::new(400.0, 400.0));
        viewport.fit_to_bounds(Rect::new(0.0, 0.0, 200.0, 100.0), 0.0);
        assert!((viewport.zoom() - 2.0).abs() < 1e-12);
        assert_point_eq(viewport.visible_rect().center(), Point::new(100.0, 50.0));
    }
}
