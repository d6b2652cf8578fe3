//! Canvas Colors
//!
//! Dark and light palettes for the flow canvas, with an optional accent
//! override from the config file.

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

/// Which built-in palette to start from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

/// Colors used when painting the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTheme {
    /// Background color for the canvas
    pub canvas_bg: Color32,

    /// Grid line color
    pub grid_color: Color32,

    /// Default node fill
    pub node_fill: Color32,

    /// Default node stroke
    pub node_stroke: Color32,

    /// Node text color
    pub node_text: Color32,

    /// Secondary node text (description, screen badge)
    pub node_text_dim: Color32,

    /// Hovered node highlight
    pub node_hover: Color32,

    /// Node being dragged
    pub node_dragging: Color32,

    /// Connector curve color
    pub edge_color: Color32,

    /// First-step marker
    pub marker_start: Color32,

    /// Last-step marker
    pub marker_end: Color32,

    /// Screen badge background
    pub badge_bg: Color32,

    /// Popup menus and toolbar background
    pub panel_bg: Color32,

    /// Destructive actions
    pub danger: Color32,
}

impl CanvasTheme {
    pub fn dark() -> Self {
        Self {
            canvas_bg: Color32::from_rgb(24, 24, 27),
            grid_color: Color32::from_rgba_unmultiplied(255, 255, 255, 15),
            node_fill: Color32::from_rgb(39, 39, 46),
            node_stroke: Color32::from_rgb(70, 70, 82),
            node_text: Color32::from_rgb(230, 230, 235),
            node_text_dim: Color32::from_rgb(150, 150, 160),
            node_hover: Color32::from_rgb(76, 160, 224),
            node_dragging: Color32::from_rgb(0, 120, 212),
            edge_color: Color32::from_rgb(110, 110, 125),
            marker_start: Color32::from_rgb(80, 200, 120),
            marker_end: Color32::from_rgb(230, 120, 80),
            badge_bg: Color32::from_rgb(0, 60, 106),
            panel_bg: Color32::from_rgb(45, 45, 52),
            danger: Color32::from_rgb(240, 80, 80),
        }
    }

    pub fn light() -> Self {
        Self {
            canvas_bg: Color32::from_rgb(248, 248, 250),
            grid_color: Color32::from_rgba_unmultiplied(0, 0, 0, 15),
            node_fill: Color32::WHITE,
            node_stroke: Color32::from_rgb(200, 200, 210),
            node_text: Color32::from_rgb(30, 30, 35),
            node_text_dim: Color32::from_rgb(100, 100, 110),
            node_hover: Color32::from_rgb(51, 131, 203),
            node_dragging: Color32::from_rgb(0, 100, 190),
            edge_color: Color32::from_rgb(150, 150, 165),
            marker_start: Color32::from_rgb(40, 160, 90),
            marker_end: Color32::from_rgb(210, 100, 60),
            badge_bg: Color32::from_rgb(204, 224, 242),
            panel_bg: Color32::from_rgb(236, 236, 240),
            danger: Color32::from_rgb(200, 40, 40),
        }
    }

    pub fn from_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Self::dark(),
            ThemeKind::Light => Self::light(),
        }
    }

    /// Replace the highlight colors with `accent` (hex like "#1a1a2e").
    /// Unparseable values are logged and ignored.
    pub fn with_accent(mut self, accent: &str) -> Self {
        match parse_hex_color(accent) {
            Some(color) => {
                self.node_dragging = color;
                self.node_hover = color.gamma_multiply(0.7);
            }
            None => log::warn!("Ignoring invalid accent color {:?}", accent),
        }
        self
    }
}

impl Default for CanvasTheme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Parse a hex color string to Color32
pub fn parse_hex_color(color_str: &str) -> Option<Color32> {
    let hex = color_str.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        6 => Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            channel(0)?,
            channel(2)?,
            channel(4)?,
            channel(6)?,
        )),
        _ => None,
    }
}
