//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::Notice;
use crate::backend::BackendStatus;
use crate::messages::ui_events::{InputMode, KeyContext, Screen};
use crate::models::{Category, Item};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub screen: Screen,

    // Categories
    pub categories: Vec<Category>,
    pub active_category: Option<Category>,
    pub draft_index: Option<usize>,
    pub admin_cursor: usize,

    // Items of the active category
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
}

impl RenderState {
    /// Context the key mapper needs from this snapshot
    pub fn key_context(&self) -> KeyContext {
        KeyContext {
            screen: self.screen,
            in_category: self.active_category.is_some(),
            input_mode: self.input_mode,
            show_help: self.show_help,
            has_notice: self.notice.is_some(),
        }
    }
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            screen: Screen::Home,
            categories: Category::defaults(),
            active_category: None,
            draft_index: Some(0),
            admin_cursor: 0,
            items: Vec::new(),
            selected_item: 0,
            is_loading: false,
            input_mode: InputMode::Normal,
            label_input: String::new(),
            title_input: String::new(),
            notice: None,
            show_help: false,
            backend_status: BackendStatus::Local,
        }
    }
}
