//! Connector Curves
//!
//! Consecutive steps are joined by a cubic S-curve from the right edge of
//! one node to the left edge of the next. Both control points sit on the
//! horizontal midpoint, so the curve leaves and enters horizontally no
//! matter how far apart the nodes are vertically.

use super::geometry::Point;
use super::node::Node;
use serde::Serialize;

/// A cubic Bézier connector in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Connector {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl Connector {
    /// S-curve between two anchors
    pub fn between(start: Point, end: Point) -> Self {
        let mid_x = (start.x + end.x) / 2.0;
        Self {
            start,
            control1: Point::new(mid_x, start.y),
            control2: Point::new(mid_x, end.y),
            end,
        }
    }

    pub fn points(&self) -> [Point; 4] {
        [self.start, self.control1, self.control2, self.end]
    }

    /// Evaluate the curve at `t` in `[0, 1]`
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Point::new(
            a * self.start.x + b * self.control1.x + c * self.control2.x + d * self.end.x,
            a * self.start.y + b * self.control1.y + c * self.control2.y + d * self.end.y,
        )
    }
}

/// Connectors for every adjacent pair of nodes, in step order
pub fn connectors(nodes: &[Node]) -> Vec<Connector> {
    nodes
        .windows(2)
        .map(|pair| Connector::between(pair[0].right_anchor(), pair[1].left_anchor()))
        .collect()
}
