//! Item backends - where items live
//!
//! `ItemBackend` is the seam between app state and item persistence. The
//! local backend keeps items in a JSON file, the remote backend talks to a
//! hosted REST table, and the unconfigured backend answers every call with
//! `BackendUnconfigured` so a missing config never crashes a screen.

pub mod actor;
pub mod local;
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{BackendConfig, BackendMode};
use crate::error::{MissionError, MissionResult};
use crate::models::{Item, ItemId};
use crate::storage::Storage;

pub use actor::BackendActor;
pub use local::LocalBackend;
pub use remote::RemoteBackend;

/// What the home screen reports about item storage
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendStatus {
    Local,
    Remote { url: String },
    Unconfigured,
}

impl BackendStatus {
    pub fn describe(&self) -> String {
        match self {
            BackendStatus::Local => String::from("Items: local storage"),
            BackendStatus::Remote { url } => format!("Items: cloud ({})", url),
            BackendStatus::Unconfigured => {
                String::from("Items: cloud not configured yet (missing SUPABASE_URL / SUPABASE_ANON_KEY)")
            }
        }
    }
}

/// Item persistence operations.
///
/// Returned records are authoritative: callers adopt them instead of
/// applying their own change locally.
#[async_trait]
pub trait ItemBackend: Send + Sync {
    fn status(&self) -> BackendStatus;

    /// Items of one category, newest first
    async fn list_items(&self, category_key: &str) -> MissionResult<Vec<Item>>;

    /// Insert an uncompleted item; `title` is already trimmed and non-empty
    async fn insert_item(&self, category_key: &str, title: &str) -> MissionResult<Item>;

    async fn set_completed(&self, id: &ItemId, completed: bool) -> MissionResult<Item>;

    async fn delete_item(&self, id: &ItemId) -> MissionResult<()>;

    /// Delete every item of a category, returning how many went away
    async fn purge_category(&self, category_key: &str) -> MissionResult<usize>;
}

/// Stand-in used when remote mode is requested without credentials
#[derive(Debug, Default)]
pub struct UnconfiguredBackend;

#[async_trait]
impl ItemBackend for UnconfiguredBackend {
    fn status(&self) -> BackendStatus {
        BackendStatus::Unconfigured
    }

    async fn list_items(&self, _category_key: &str) -> MissionResult<Vec<Item>> {
        Err(MissionError::BackendUnconfigured)
    }

    async fn insert_item(&self, _category_key: &str, _title: &str) -> MissionResult<Item> {
        Err(MissionError::BackendUnconfigured)
    }

    async fn set_completed(&self, _id: &ItemId, _completed: bool) -> MissionResult<Item> {
        Err(MissionError::BackendUnconfigured)
    }

    async fn delete_item(&self, _id: &ItemId) -> MissionResult<()> {
        Err(MissionError::BackendUnconfigured)
    }

    async fn purge_category(&self, _category_key: &str) -> MissionResult<usize> {
        Err(MissionError::BackendUnconfigured)
    }
}

/// Pick the backend the config asks for
pub fn build_backend(config: &BackendConfig, storage: &Storage) -> Arc<dyn ItemBackend> {
    match config.mode {
        BackendMode::Local => {
            tracing::info!(dir = %storage.data_dir().display(), "Using local item storage");
            Arc::new(LocalBackend::open(storage.clone()))
        }
        BackendMode::Remote => match config.remote() {
            Some(settings) => {
                tracing::info!(url = %settings.url, table = %settings.table, "Using remote item storage");
                Arc::new(RemoteBackend::new(settings))
            }
            None => {
                tracing::warn!("Remote item storage requested but not configured");
                Arc::new(UnconfiguredBackend)
            }
        },
    }
}
