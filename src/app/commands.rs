//! Command handlers - category/item operations and UI event handling

use crate::app::state::Notice;
use crate::app::AppState;
use crate::error::{MissionError, MissionResult};
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::{BackendCommand, BackendOp, BackendResponse};
use crate::models::{normalize_input, Category, ItemId};

impl AppState {
    // ========================
    // Category operations
    // ========================

    pub fn list_categories(&self) -> &[Category] {
        self.catalog.categories()
    }

    pub fn add_category(&mut self, label: &str) -> MissionResult<Category> {
        let category = self.catalog.add_category(label)?;
        self.persist_catalog();
        self.admin_cursor = self.catalog.categories().len().saturating_sub(1);
        Ok(category)
    }

    /// Delete a category and hand back the command that purges its items
    pub fn delete_category(&mut self, key: &str) -> MissionResult<BackendCommand> {
        let removed = self.catalog.delete_category(key)?;
        self.persist_catalog();
        self.clamp_admin_cursor();
        Ok(BackendCommand::PurgeCategory {
            category_key: removed.key,
        })
    }

    /// Activate a category and hand back the item reload for it.
    ///
    /// An unknown key clears the stored selection along with the item cache.
    pub fn select_category(&mut self, key: &str) -> MissionResult<BackendCommand> {
        self.items.clear();
        self.selected_item = 0;

        if let Err(e) = self.catalog.select_category(key) {
            self.is_loading = false;
            self.persist_catalog();
            return Err(e);
        }

        self.persist_catalog();
        self.is_loading = true;
        Ok(BackendCommand::LoadItems {
            category_key: key.to_string(),
        })
    }

    pub fn deselect_category(&mut self) {
        self.catalog.deselect_category();
        self.persist_catalog();
        self.items.clear();
        self.selected_item = 0;
        self.is_loading = false;
        self.title_input.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Re-apply the persisted selection at startup
    pub fn restore_selection(&mut self) -> Option<BackendCommand> {
        let saved = self.storage().load_selected()?;
        let result = self.select_category(&saved);
        if let Err(e) = &result {
            tracing::info!(key = %saved, error = %e, "Dropped stale persisted selection");
        }
        result.ok()
    }

    // ========================
    // Item operations
    // ========================

    pub fn reload_items(&mut self) -> MissionResult<BackendCommand> {
        let category_key = self
            .catalog
            .active()
            .ok_or(MissionError::NoActiveCategory)?
            .to_string();
        self.is_loading = true;
        Ok(BackendCommand::LoadItems { category_key })
    }

    pub fn add_item(&mut self, title: &str) -> MissionResult<BackendCommand> {
        let title = normalize_input(title)?;
        let category_key = self
            .catalog
            .active()
            .ok_or(MissionError::NoActiveCategory)?
            .to_string();
        Ok(BackendCommand::AddItem { category_key, title })
    }

    /// Ask the backend to flip an item; the cache changes only on its reply
    pub fn toggle_item(&mut self, id: &ItemId) -> MissionResult<BackendCommand> {
        let item = self
            .items
            .iter()
            .find(|item| &item.id == id)
            .ok_or_else(|| MissionError::NotFound(id.clone()))?;
        Ok(BackendCommand::SetCompleted {
            id: item.id.clone(),
            completed: !item.completed,
        })
    }

    /// Ask the backend to delete an item; the cache changes only on its reply
    pub fn delete_item(&mut self, id: &ItemId) -> MissionResult<BackendCommand> {
        Ok(BackendCommand::DeleteItem { id: id.clone() })
    }

    // ========================
    // Backend responses
    // ========================

    pub fn handle_response(&mut self, response: BackendResponse) {
        match response {
            BackendResponse::ItemsLoaded { category_key, items } => {
                if self.catalog.active() != Some(category_key.as_str()) {
                    tracing::debug!(category = %category_key, "Ignoring items for inactive category");
                    return;
                }
                self.items = items;
                self.is_loading = false;
                self.clamp_selected_item();
            }
            BackendResponse::ItemAdded(item) => {
                if self.catalog.active() == Some(item.category_key.as_str()) {
                    self.items.insert(0, item);
                    self.selected_item = 0;
                    self.title_input.clear();
                }
            }
            BackendResponse::ItemUpdated(updated) => {
                if let Some(item) = self.items.iter_mut().find(|item| item.id == updated.id) {
                    *item = updated;
                }
            }
            BackendResponse::ItemDeleted(id) => {
                self.items.retain(|item| item.id != id);
                self.clamp_selected_item();
            }
            BackendResponse::CategoryPurged { category_key, removed } => {
                tracing::info!(category = %category_key, removed, "Category items purged");
                if removed > 0 {
                    self.notice = Some(Notice::info(format!(
                        "Removed {} item(s) of deleted category '{}'",
                        removed, category_key
                    )));
                }
            }
            BackendResponse::Failed { op, category_key, error } => {
                tracing::error!(?op, category = ?category_key, error = %error, "Backend operation failed");
                if op == BackendOp::Load && self.catalog.active() == category_key.as_deref() {
                    self.is_loading = false;
                    self.items.clear();
                    self.selected_item = 0;
                }
                self.notice = Some(Notice::error(format!("Error {}: {}", op.describe(), error)));
            }
        }
    }

    // ========================
    // Error reporting
    // ========================

    /// Show a failed action to the user unless it is one that stays silent
    pub fn report(&mut self, error: &MissionError) {
        if error.is_silent() {
            tracing::debug!(error = %error, "Action ignored");
            return;
        }
        tracing::warn!(error = %error, "Action rejected");
        self.notice = Some(Notice::error(error.to_string()));
    }

    fn settle<T>(&mut self, result: MissionResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ========================
    // Navigation
    // ========================

    pub fn open_work(&mut self) {
        self.screen = Screen::Work;
        self.input_mode = InputMode::Normal;
    }

    pub fn open_admin(&mut self) {
        self.screen = Screen::Admin;
        self.input_mode = InputMode::Normal;
        self.clamp_admin_cursor();
    }

    pub fn go_home(&mut self) {
        self.screen = Screen::Home;
        self.input_mode = InputMode::Normal;
        self.title_input.clear();
        self.label_input.clear();
    }

    pub fn in_category(&self) -> bool {
        self.screen == Screen::Work && self.catalog.active().is_some()
    }

    pub fn move_up(&mut self) {
        match self.screen {
            Screen::Admin => self.admin_cursor = self.admin_cursor.saturating_sub(1),
            Screen::Work if self.in_category() => {
                self.selected_item = self.selected_item.saturating_sub(1)
            }
            Screen::Work => self.catalog.prev_draft(),
            Screen::Home => {}
        }
    }

    pub fn move_down(&mut self) {
        match self.screen {
            Screen::Admin => {
                self.admin_cursor += 1;
                self.clamp_admin_cursor();
            }
            Screen::Work if self.in_category() => {
                self.selected_item += 1;
                self.clamp_selected_item();
            }
            Screen::Work => self.catalog.next_draft(),
            Screen::Home => {}
        }
    }

    fn clamp_admin_cursor(&mut self) {
        let len = self.catalog.categories().len();
        self.admin_cursor = self.admin_cursor.min(len.saturating_sub(1));
    }

    fn clamp_selected_item(&mut self) {
        self.selected_item = self.selected_item.min(self.items.len().saturating_sub(1));
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.screen == Screen::Admin || self.in_category() {
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    fn current_input_mut(&mut self) -> Option<&mut String> {
        match self.screen {
            Screen::Admin => Some(&mut self.label_input),
            Screen::Work if self.in_category() => Some(&mut self.title_input),
            _ => None,
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some(input) = self.current_input_mut() {
            input.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(input) = self.current_input_mut() {
            input.pop();
        }
    }

    /// Enter in an input: add the typed category or item
    pub fn submit(&mut self) -> Option<BackendCommand> {
        match self.screen {
            Screen::Admin => {
                let label = self.label_input.clone();
                let result = self.add_category(&label);
                if self.settle(result).is_some() {
                    self.label_input.clear();
                    self.input_mode = InputMode::Normal;
                }
                None
            }
            Screen::Work => {
                let title = self.title_input.clone();
                let result = self.add_item(&title);
                self.settle(result)
            }
            Screen::Home => None,
        }
    }

    // ========================
    // Selection-driven actions
    // ========================

    /// Enter the category highlighted in the picker
    pub fn enter_category(&mut self) -> Option<BackendCommand> {
        let draft = self.catalog.draft()?.to_string();
        let result = self.select_category(&draft);
        self.settle(result)
    }

    pub fn leave_category(&mut self) {
        self.deselect_category();
    }

    /// Delete the category under the admin cursor
    pub fn delete_selected_category(&mut self) -> Option<BackendCommand> {
        let key = self.catalog.categories().get(self.admin_cursor)?.key.clone();
        let result = self.delete_category(&key);
        self.settle(result)
    }

    pub fn toggle_selected_item(&mut self) -> Option<BackendCommand> {
        let id = self.current_item()?.id.clone();
        let result = self.toggle_item(&id);
        self.settle(result)
    }

    pub fn delete_selected_item(&mut self) -> Option<BackendCommand> {
        let id = self.current_item()?.id.clone();
        let result = self.delete_item(&id);
        self.settle(result)
    }

    pub fn request_reload(&mut self) -> Option<BackendCommand> {
        let result = self.reload_items();
        self.settle(result)
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}
