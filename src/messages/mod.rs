//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI, App, and Backend layers.

pub mod ui_events;
pub mod backend;
pub mod render;

pub use ui_events::UiEvent;
pub use backend::{BackendCommand, BackendOp, BackendResponse};
pub use render::RenderState;
