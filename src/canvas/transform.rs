//! Viewport Transform
//!
//! The world -> screen map is `screen = world * zoom + pan`. Pan is kept in
//! screen units, so a board drag adds the raw pointer delta to it.
//!
//! Every mutation goes through a method that clamps zoom to
//! [`MIN_ZOOM`, `MAX_ZOOM`]; the fields are private so nothing can bypass it.

use super::geometry::{Point, Vector};
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom level
pub const MIN_ZOOM: f64 = 0.3;

/// Largest allowed zoom level
pub const MAX_ZOOM: f64 = 2.5;

/// Mouse wheel step towards the user
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Mouse wheel step away from the user
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Toolbar "-" button
pub const BUTTON_ZOOM_OUT: f64 = 0.8;

/// Toolbar "+" button
pub const BUTTON_ZOOM_IN: f64 = 1.2;

/// Clamp a zoom level into the allowed range
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Pan offset + zoom level of the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredViewport")]
pub struct Viewport {
    pan: Vector,
    zoom: f64,
}

/// Unchecked serialized form; converted through [`Viewport::new`]
#[derive(Deserialize)]
struct StoredViewport {
    pan: Vector,
    zoom: f64,
}

impl From<StoredViewport> for Viewport {
    fn from(stored: StoredViewport) -> Self {
        Viewport::new(stored.pan, stored.zoom)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vector::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Build a viewport; `zoom` is clamped
    pub fn new(pan: Vector, zoom: f64) -> Self {
        Self {
            pan,
            zoom: clamp_zoom(zoom),
        }
    }

    pub fn pan(&self) -> Vector {
        self.pan
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Screen position -> world position
    pub fn to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    /// World position -> screen position
    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.zoom + self.pan.x,
            world.y * self.zoom + self.pan.y,
        )
    }

    /// Translate the board by a screen-space delta
    pub fn pan_by(&mut self, delta: Vector) {
        self.pan += delta;
    }

    /// Change zoom while keeping the world point under `anchor` fixed.
    ///
    /// The target is clamped before the pan is solved, so the anchor holds
    /// at the range limits too.
    pub fn zoom_at(&mut self, anchor: Point, new_zoom: f64) {
        let new_zoom = clamp_zoom(new_zoom);
        let world = self.to_world(anchor);
        self.pan = Vector::new(anchor.x - world.x * new_zoom, anchor.y - world.y * new_zoom);
        self.zoom = new_zoom;
    }

    /// Multiply zoom by `factor` around `anchor`
    pub fn zoom_by(&mut self, anchor: Point, factor: f64) {
        self.zoom_at(anchor, self.zoom * factor);
    }

    /// Viewport that shows world point `world` at screen point `screen`
    pub fn centered(world: Point, screen: Point, zoom: f64) -> Self {
        let zoom = clamp_zoom(zoom);
        Self {
            pan: Vector::new(screen.x - world.x * zoom, screen.y - world.y * zoom),
            zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_round_trip() {
        let vp = Viewport::new(Vector::new(-120.0, 35.5), 1.7);
        let world = Point::new(321.0, -44.0);
        assert!(vp.to_world(vp.to_screen(world)).approx_eq(world, EPS));
    }

    #[test]
    fn test_new_clamps() {
        assert_eq!(Viewport::new(Vector::ZERO, 10.0).zoom(), MAX_ZOOM);
        assert_eq!(Viewport::new(Vector::ZERO, 0.0).zoom(), MIN_ZOOM);
        assert_eq!(Viewport::new(Vector::ZERO, f64::NAN).zoom(), 1.0);
    }

    #[test]
    fn test_deserialize_clamps_zoom() {
        let low: Viewport = serde_json::from_str(r#"{"pan":{"x":0,"y":0},"zoom":0.0}"#).unwrap();
        assert_eq!(low.zoom(), MIN_ZOOM);
        let world = low.to_world(Point::new(30.0, 60.0));
        assert!(world.x.is_finite() && world.y.is_finite());

        let high: Viewport = serde_json::from_str(r#"{"pan":{"x":5,"y":-5},"zoom":40.0}"#).unwrap();
        assert_eq!(high.zoom(), MAX_ZOOM);
        assert_eq!(high.pan(), Vector::new(5.0, -5.0));

        let kept: Viewport = serde_json::from_str(&serde_json::to_string(&high).unwrap()).unwrap();
        assert_eq!(kept, high);
    }

    #[test]
    fn test_wheel_out_at_cursor() {
        let mut vp = Viewport::default();
        vp.zoom_by(Point::new(500.0, 300.0), WHEEL_ZOOM_OUT);
        assert!((vp.zoom() - 0.9).abs() < EPS);
        assert!(vp.pan().approx_eq(Vector::new(50.0, 30.0), EPS));
    }

    #[test]
    fn test_anchor_is_fixed() {
        let anchors = [Point::new(0.0, 0.0), Point::new(640.0, 360.0), Point::new(-15.0, 999.0)];
        let factors = [WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT, BUTTON_ZOOM_IN, BUTTON_ZOOM_OUT, 7.0, 0.01];

        for &anchor in &anchors {
            for &factor in &factors {
                let mut vp = Viewport::new(Vector::new(73.0, -12.0), 1.3);
                let before = vp.to_world(anchor);
                vp.zoom_by(anchor, factor);
                assert!(
                    vp.to_world(anchor).approx_eq(before, EPS),
                    "anchor {:?} drifted for factor {}",
                    anchor,
                    factor
                );
            }
        }
    }

    #[test]
    fn test_clamp_after_many_steps() {
        let mut vp = Viewport::default();
        for _ in 0..100 {
            vp.zoom_by(Point::new(10.0, 10.0), WHEEL_ZOOM_IN);
        }
        assert_eq!(vp.zoom(), MAX_ZOOM);

        let mut vp = Viewport::default();
        for _ in 0..100 {
            vp.zoom_by(Point::new(10.0, 10.0), WHEEL_ZOOM_OUT);
        }
        assert_eq!(vp.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_pan_moves_screen_projection() {
        let mut vp = Viewport::new(Vector::ZERO, 2.0);
        let world = Point::new(10.0, 20.0);
        let before = vp.to_screen(world);
        vp.pan_by(Vector::new(5.0, -7.0));
        assert!((vp.to_screen(world) - before).approx_eq(Vector::new(5.0, -7.0), EPS));
    }

    #[test]
    fn test_centered() {
        let vp = Viewport::centered(Point::new(100.0, 50.0), Point::new(400.0, 300.0), 0.5);
        assert!(vp.to_screen(Point::new(100.0, 50.0)).approx_eq(Point::new(400.0, 300.0), EPS));
    }
}
