//! App layer - central state management and command processing
//!
//! The App actor receives UI events and backend responses,
//! updates state, and emits backend commands and render state.

pub mod state;
pub mod actor;
pub mod commands;

pub use state::{AppState, Notice, NoticeLevel};
pub use actor::AppActor;
