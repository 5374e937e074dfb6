//! App state - pure data structure; persistence is an explicit call

use crate::backend::BackendStatus;
use crate::catalog::Catalog;
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::RenderState;
use crate::models::Item;
use crate::storage::Storage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A visible, dismissible message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Main application state
pub struct AppState {
    pub screen: Screen,

    // Categories and selection (persisted)
    pub catalog: Catalog,
    pub admin_cursor: usize,

    // Items of the active category, as last reported by the backend
    pub items: Vec<Item>,
    pub selected_item: usize,
    pub is_loading: bool,

    // Inputs
    pub input_mode: InputMode,
    pub label_input: String,
    pub title_input: String,

    // Popups
    pub notice: Option<Notice>,
    pub show_help: bool,

    pub backend_status: BackendStatus,

    storage: Storage,
}

impl AppState {
    /// Build state from persisted categories. The persisted selection is
    /// restored separately via `restore_selection`.
    pub fn new(storage: Storage, backend_status: BackendStatus) -> Self {
        let catalog = Catalog::new(storage.load_categories());
        AppState {
            screen: Screen::Home,
            catalog,
            admin_cursor: 0,
            items: Vec::new(),
            selected_item: 0,
            is_loading: false,
            input_mode: InputMode::Normal,
            label_input: String::new(),
            title_input: String::new(),
            notice: None,
            show_help: false,
            backend_status,
            storage,
        }
    }

    /// Write categories and selection to storage.
    ///
    /// Re-run after every catalog change; writing the same value twice is
    /// harmless. Failures are logged and never abort the action.
    pub fn persist_catalog(&self) {
        if let Err(e) = self.storage.save_categories(self.catalog.categories()) {
            tracing::warn!(error = %e, "Failed to persist categories");
        }
        let result = match self.catalog.active() {
            Some(key) => self.storage.save_selected(key),
            None => self.storage.clear_selected(),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist selected category");
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Item under the cursor in the detail view
    pub fn current_item(&self) -> Option<&Item> {
        self.items.get(self.selected_item)
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            screen: self.screen,
            categories: self.catalog.categories().to_vec(),
            active_category: self.catalog.active_category().cloned(),
            draft_index: self.catalog.draft_index(),
            admin_cursor: self.admin_cursor,
            items: self.items.clone(),
            selected_item: self.selected_item,
            is_loading: self.is_loading,
            input_mode: self.input_mode,
            label_input: self.label_input.clone(),
            title_input: self.title_input.clone(),
            notice: self.notice.clone(),
            show_help: self.show_help,
            backend_status: self.backend_status.clone(),
        }
    }
}
