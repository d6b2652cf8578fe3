//! Flow Canvas Module
//!
//! Interactive step-flow diagram for product documentation:
//! - Left-to-right layout of an ordered step list
//! - Cursor-anchored zoom and board panning
//! - Node dragging
//! - Curved connectors between consecutive steps
//! - Per-node menu with add/delete callbacks to the host
//!
//! The engine (`transform`, `layout`, `interaction`, `path`, `view`) is pure
//! and egui-free apart from conversions; `renderer` is the egui widget.

pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod node;
pub mod path;
pub mod renderer;
pub mod theme;
pub mod transform;
pub mod view;

pub use geometry::{Point, Rect, Vector};
pub use interaction::{DragEffect, Interaction, PointerTarget};
pub use layout::{compute_layout, content_bounds, fit_to_content, LayoutConfig};
pub use node::{Node, ScreenLookup, Step};
pub use path::{connectors, Connector};
pub use renderer::FlowViewer;
pub use theme::{CanvasTheme, ThemeKind};
pub use transform::{clamp_zoom, Viewport, MAX_ZOOM, MIN_ZOOM};
pub use view::{CanvasEvent, FlowCanvas, MenuState, NodeHit, Scene, StepActions};
