//! # My Mission
//!
//! A terminal list manager: categories (tasks, reminders, shopping, books)
//! each holding completable items.
//!
//! ## Features
//! - Home / work / admin screens
//! - Categories and the selected category persisted locally
//! - Items stored locally or in a hosted PostgREST table (Supabase)
//! - Deleting a category purges its items
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Backend Layer (Tokio runtime)

pub mod constants;
pub mod error;
pub mod models;
pub mod config;
pub mod storage;
pub mod catalog;
pub mod backend;
pub mod messages;
pub mod app;
pub mod ui;

// Re-export commonly used types
pub use models::{Category, Item, ItemId};
pub use error::{MissionError, MissionResult};
pub use catalog::Catalog;
pub use backend::{ItemBackend, LocalBackend, RemoteBackend};
pub use messages::{UiEvent, BackendCommand, BackendResponse, RenderState};
pub use app::{AppState, AppActor};
