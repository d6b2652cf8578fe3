//! Canvas Geometry
//!
//! Double-precision point, vector and rectangle types used by the engine.
//! egui works in `f32`; the engine keeps `f64` so repeated zoom/pan
//! round-trips stay exact enough to compare, and converts at the paint
//! boundary.

use eframe::egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// A position, either in screen or in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A displacement between two points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise equality within `eps`
    pub fn approx_eq(self, other: Point, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl Vector {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn approx_eq(self, other: Vector, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl Rect {
    pub fn from_min_size(min: Point, size: Vector) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Inclusive on all edges
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Smallest rectangle covering both
    pub fn union(self, other: Rect) -> Rect {
        Rect {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

impl Add<Vector> for Point {
    type Output = Point;
    fn add(self, rhs: Vector) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign<Vector> for Point {
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub<Vector> for Point {
    type Output = Point;
    fn sub(self, rhs: Vector) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub for Point {
    type Output = Vector;
    fn sub(self, rhs: Point) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vector {
    type Output = Vector;
    fn div(self, rhs: f64) -> Vector {
        Vector::new(self.x / rhs, self.y / rhs)
    }
}

// egui conversions (f32 at the paint boundary)

impl From<Point> for Pos2 {
    fn from(p: Point) -> Pos2 {
        Pos2::new(p.x as f32, p.y as f32)
    }
}

impl From<Pos2> for Point {
    fn from(p: Pos2) -> Point {
        Point::new(p.x as f64, p.y as f64)
    }
}

impl From<Vector> for Vec2 {
    fn from(v: Vector) -> Vec2 {
        Vec2::new(v.x as f32, v.y as f32)
    }
}

impl From<Vec2> for Vector {
    fn from(v: Vec2) -> Vector {
        Vector::new(v.x as f64, v.y as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_edges() {
        let r = Rect::from_min_size(Point::new(10.0, 10.0), Vector::new(100.0, 50.0));
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(110.0, 60.0)));
        assert!(!r.contains(Point::new(110.1, 30.0)));
        assert_eq!(r.center(), Point::new(60.0, 35.0));
    }

    #[test]
    fn test_union() {
        let a = Rect::from_min_size(Point::new(0.0, 0.0), Vector::new(10.0, 10.0));
        let b = Rect::from_min_size(Point::new(20.0, -5.0), Vector::new(10.0, 10.0));
        let u = a.union(b);
        assert_eq!(u.min, Point::new(0.0, -5.0));
        assert_eq!(u.max, Point::new(30.0, 10.0));
    }

    #[test]
    fn test_point_vector_ops() {
        let p = Point::new(3.0, 4.0);
        let q = Point::new(1.0, 1.0);
        assert_eq!(p - q, Vector::new(2.0, 3.0));
        assert_eq!(q + Vector::new(2.0, 3.0), p);
        assert_eq!((Vector::new(2.0, 4.0) / 2.0) * 3.0, Vector::new(3.0, 6.0));
    }
}
