//! Backend messages - communication between App and Backend layers

use crate::error::MissionError;
use crate::models::{Item, ItemId};

/// Commands sent from App layer to Backend layer
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    /// Fetch the items of a category, newest first
    LoadItems { category_key: String },
    /// Create an item; the backend assigns id and timestamp
    AddItem { category_key: String, title: String },
    /// Store a new completion flag
    SetCompleted { id: ItemId, completed: bool },
    /// Remove one item
    DeleteItem { id: ItemId },
    /// Remove every item of a deleted category
    PurgeCategory { category_key: String },
    /// Shutdown the backend actor
    Shutdown,
}

impl BackendCommand {
    pub fn op(&self) -> Option<BackendOp> {
        match self {
            BackendCommand::LoadItems { .. } => Some(BackendOp::Load),
            BackendCommand::AddItem { .. } => Some(BackendOp::Add),
            BackendCommand::SetCompleted { .. } => Some(BackendOp::Toggle),
            BackendCommand::DeleteItem { .. } => Some(BackendOp::Delete),
            BackendCommand::PurgeCategory { .. } => Some(BackendOp::Purge),
            BackendCommand::Shutdown => None,
        }
    }
}

/// Which operation a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOp {
    Load,
    Add,
    Toggle,
    Delete,
    Purge,
}

impl BackendOp {
    /// Short user-facing description used in notices
    pub fn describe(&self) -> &'static str {
        match self {
            BackendOp::Load => "loading items",
            BackendOp::Add => "adding item",
            BackendOp::Toggle => "updating item",
            BackendOp::Delete => "deleting item",
            BackendOp::Purge => "removing category items",
        }
    }
}

/// Responses sent from Backend layer to App layer
#[derive(Debug, Clone, PartialEq)]
pub enum BackendResponse {
    ItemsLoaded { category_key: String, items: Vec<Item> },
    ItemAdded(Item),
    ItemUpdated(Item),
    ItemDeleted(ItemId),
    CategoryPurged { category_key: String, removed: usize },
    /// The operation failed; nothing was applied
    Failed { op: BackendOp, category_key: Option<String>, error: MissionError },
}
