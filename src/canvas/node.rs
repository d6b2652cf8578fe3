//! Flow Data Structures
//!
//! Steps are what the host hands us; nodes are what the canvas lays out,
//! drags and paints. There is exactly one node per step.

use super::geometry::{Point, Rect, Vector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Screen id -> display name
pub type ScreenLookup = HashMap<String, String>;

/// A process step supplied by the host (read-only to the canvas)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Unique identifier
    pub id: String,

    /// What happens in this step
    pub description: String,

    /// Screen this step happens on, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_ref: Option<String>,
}

impl Step {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            screen_ref: None,
        }
    }

    pub fn with_screen(mut self, screen_ref: impl Into<String>) -> Self {
        self.screen_ref = Some(screen_ref.into());
        self
    }
}

/// A laid-out step on the canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Same as the step id
    pub id: String,

    /// Copied from the step for painting
    pub description: String,

    /// Top-left corner in world coordinates
    pub position: Point,

    /// Box size in world units
    #[serde(skip)]
    pub size: Vector,

    /// First step of the flow
    pub is_first: bool,

    /// Last step of the flow
    pub is_last: bool,

    /// Resolved screen name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
}

impl Node {
    /// Create a node from a step; position is filled in by layout
    pub fn from_step(step: &Step, screens: &ScreenLookup, size: Vector) -> Self {
        Self {
            id: step.id.clone(),
            description: step.description.clone(),
            position: Point::ZERO,
            size,
            is_first: false,
            is_last: false,
            screen_name: step
                .screen_ref
                .as_ref()
                .and_then(|screen| screens.get(screen).cloned()),
        }
    }

    /// Bounding rectangle in world coordinates
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    /// Check if a world point is inside this node
    pub fn contains(&self, point: Point) -> bool {
        self.rect().contains(point)
    }

    /// Where an outgoing connector leaves the node
    pub fn right_anchor(&self) -> Point {
        Point::new(self.position.x + self.size.x, self.position.y + self.size.y / 2.0)
    }

    /// Where an incoming connector enters the node
    pub fn left_anchor(&self) -> Point {
        Point::new(self.position.x, self.position.y + self.size.y / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_name_resolution() {
        let mut screens = ScreenLookup::new();
        screens.insert("scr-1".to_string(), "Checkout".to_string());

        let known = Node::from_step(
            &Step::new("a", "Pay").with_screen("scr-1"),
            &screens,
            Vector::new(300.0, 120.0),
        );
        assert_eq!(known.screen_name.as_deref(), Some("Checkout"));

        let dangling = Node::from_step(
            &Step::new("b", "Pay").with_screen("missing"),
            &screens,
            Vector::new(300.0, 120.0),
        );
        assert_eq!(dangling.screen_name, None);
    }

    #[test]
    fn test_anchors() {
        let mut node = Node::from_step(&Step::new("a", "A"), &ScreenLookup::new(), Vector::new(300.0, 120.0));
        node.position = Point::new(50.0, 150.0);

        assert_eq!(node.right_anchor(), Point::new(350.0, 210.0));
        assert_eq!(node.left_anchor(), Point::new(50.0, 210.0));
        assert!(node.contains(Point::new(200.0, 200.0)));
        assert!(!node.contains(Point::new(40.0, 200.0)));
    }

    #[test]
    fn test_step_json_uses_camel_case() {
        let step: Step =
            serde_json::from_str(r#"{"id":"s1","description":"Open app","screenRef":"home"}"#)
                .unwrap();
        assert_eq!(step.screen_ref.as_deref(), Some("home"));

        let bare = serde_json::to_string(&Step::new("s2", "Tap")).unwrap();
        assert!(!bare.contains("screenRef"));
    }
}
