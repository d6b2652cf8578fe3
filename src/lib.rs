//! Flow Studio - interactive step-flow canvas
//!
//! Lays out the steps of a user flow, lets the user pan, zoom and drag
//! them, and reports add/delete requests back to the host.

pub mod canvas;
pub mod config;
pub mod document;
pub mod error;

// Re-export commonly used types
pub use canvas::{FlowCanvas, FlowViewer, LayoutConfig, ScreenLookup, Step, StepActions, Viewport};
pub use config::StudioConfig;
pub use document::{FlowDocument, Screen, StepStore};
pub use error::{Result, StudioError};
