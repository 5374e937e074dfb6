//! Domain errors for category and item operations

use thiserror::Error;

use crate::models::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissionError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("A category with key '{0}' already exists")]
    DuplicateKey(String),

    #[error("Category '{0}' is in use. Leave it before deleting it")]
    CategoryInUse(String),

    #[error("Category '{0}' does not exist")]
    InvalidSelection(String),

    #[error("No category is active")]
    NoActiveCategory,

    #[error("Item {0} not found")]
    NotFound(ItemId),

    #[error("Backend is not configured (set SUPABASE_URL and SUPABASE_ANON_KEY)")]
    BackendUnconfigured,

    #[error("{0}")]
    Backend(String),
}

impl MissionError {
    /// Errors the user never sees; they are dropped at the point of the action
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            MissionError::EmptyInput
                | MissionError::InvalidSelection(_)
                | MissionError::NoActiveCategory
        )
    }
}

pub type MissionResult<T> = Result<T, MissionError>;
