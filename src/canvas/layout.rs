//! Flow Layout
//!
//! Steps are laid out left to right on a single baseline, centred in the
//! viewport when they fit. There is no incremental re-flow: any change to
//! the step list produces a brand new set of nodes, discarding positions
//! the user dragged to.

use super::geometry::{Point, Rect, Vector};
use super::node::{Node, ScreenLookup, Step};
use super::transform::{clamp_zoom, Viewport};
use serde::{Deserialize, Serialize};

/// Layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance between the left edges of consecutive nodes
    pub h_spacing: f64,
    /// Y coordinate of every node's top edge
    pub baseline_y: f64,
    /// Smallest allowed left margin before the first node
    pub min_margin: f64,
    /// Rendered node width
    pub node_width: f64,
    /// Rendered node height
    pub node_height: f64,
    /// Total padding (both sides) kept free when fitting to content
    pub fit_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            h_spacing: 400.0,
            baseline_y: 150.0,
            min_margin: 50.0,
            node_width: 300.0,
            node_height: 120.0,
            fit_padding: 100.0,
        }
    }
}

impl LayoutConfig {
    /// Size of one node box
    pub fn node_size(&self) -> Vector {
        Vector::new(self.node_width, self.node_height)
    }
}

/// Compute fresh node positions for `steps`
pub fn compute_layout(
    steps: &[Step],
    screens: &ScreenLookup,
    viewport_width: f64,
    config: &LayoutConfig,
) -> Vec<Node> {
    if steps.is_empty() {
        return Vec::new();
    }

    let total_width = steps.len() as f64 * config.h_spacing;
    let start_x = ((viewport_width - total_width) / 2.0).max(config.min_margin);
    let last = steps.len() - 1;

    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let mut node = Node::from_step(step, screens, config.node_size());
            node.position = Point::new(start_x + i as f64 * config.h_spacing, config.baseline_y);
            node.is_first = i == 0;
            node.is_last = i == last;
            node
        })
        .collect()
}

/// Bounding box of all node footprints, `None` when there are no nodes
pub fn content_bounds(nodes: &[Node], config: &LayoutConfig) -> Option<Rect> {
    let footprint = config.node_size();
    nodes
        .iter()
        .map(|n| Rect::from_min_size(n.position, footprint))
        .reduce(Rect::union)
}

/// Viewport that frames every node inside `viewport`.
///
/// Never zooms in past 1.0. Returns `None` while the viewport has no area.
pub fn fit_to_content(nodes: &[Node], viewport: Rect, config: &LayoutConfig) -> Option<Viewport> {
    if viewport.width() <= 0.0 || viewport.height() <= 0.0 {
        return None;
    }

    let Some(bounds) = content_bounds(nodes, config) else {
        return Some(Viewport::default());
    };

    let zoom_x = (viewport.width() - config.fit_padding) / bounds.width();
    let zoom_y = (viewport.height() - config.fit_padding) / bounds.height();
    let zoom = clamp_zoom(zoom_x.min(zoom_y).min(1.0));

    Some(Viewport::centered(bounds.center(), viewport.center(), zoom))
}
