//! Category catalog: the category list plus the active and draft selections.
//!
//! Pure state. Callers persist after each successful transition and decide
//! which item commands follow (the item cascade on delete, the reload after
//! a selection).

use chrono::{DateTime, Utc};

use crate::error::{MissionError, MissionResult};
use crate::models::{fallback_key, key_from_label, normalize_input, Category};

#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    categories: Vec<Category>,
    active: Option<String>,
    draft: Option<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::new(Category::defaults())
    }
}

impl Catalog {
    /// Build from loaded categories; the draft starts at the first one
    pub fn new(categories: Vec<Category>) -> Self {
        let draft = categories.first().map(|c| c.key.clone());
        Catalog {
            categories,
            active: None,
            draft,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn contains(&self, key: &str) -> bool {
        self.categories.iter().any(|c| c.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_category(&self) -> Option<&Category> {
        self.active.as_deref().and_then(|key| self.get(key))
    }

    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    pub fn draft_index(&self) -> Option<usize> {
        let draft = self.draft.as_deref()?;
        self.categories.iter().position(|c| c.key == draft)
    }

    pub fn add_category(&mut self, label: &str) -> MissionResult<Category> {
        self.add_category_at(label, Utc::now())
    }

    /// Add a category whose key is derived from `label`.
    ///
    /// Labels that derive to an empty key get a time-based fallback key.
    /// The new category becomes the draft.
    pub fn add_category_at(&mut self, label: &str, now: DateTime<Utc>) -> MissionResult<Category> {
        let label = normalize_input(label)?;

        let mut key = key_from_label(&label);
        if key.is_empty() {
            key = fallback_key(now, |k| self.contains(k));
        }

        if self.contains(&key) {
            return Err(MissionError::DuplicateKey(key));
        }

        let category = Category::new(key, label);
        self.categories.push(category.clone());
        self.draft = Some(category.key.clone());
        tracing::info!(key = %category.key, "Category added");
        Ok(category)
    }

    /// Remove a category that is not active.
    ///
    /// Returns the removed category so the caller can purge its items. A
    /// draft pointing at it moves to the first remaining category.
    pub fn delete_category(&mut self, key: &str) -> MissionResult<Category> {
        if self.active.as_deref() == Some(key) {
            return Err(MissionError::CategoryInUse(key.to_string()));
        }

        let index = self
            .categories
            .iter()
            .position(|c| c.key == key)
            .ok_or_else(|| MissionError::InvalidSelection(key.to_string()))?;
        let removed = self.categories.remove(index);

        if self.draft.as_deref() == Some(key) {
            self.draft = self.categories.first().map(|c| c.key.clone());
        }

        tracing::info!(key = %removed.key, "Category deleted");
        Ok(removed)
    }

    /// Make `key` the active category.
    ///
    /// An unknown key (a stale persisted selection, say) clears the active
    /// category and fails.
    pub fn select_category(&mut self, key: &str) -> MissionResult<()> {
        if !self.contains(key) {
            self.active = None;
            return Err(MissionError::InvalidSelection(key.to_string()));
        }
        self.active = Some(key.to_string());
        Ok(())
    }

    pub fn deselect_category(&mut self) {
        self.active = None;
    }

    /// Move the draft to the category at `index`, clamped to the list
    pub fn set_draft_index(&mut self, index: usize) {
        if self.categories.is_empty() {
            self.draft = None;
            return;
        }
        let index = index.min(self.categories.len() - 1);
        self.draft = Some(self.categories[index].key.clone());
    }

    pub fn next_draft(&mut self) {
        if self.categories.is_empty() {
            return;
        }
        let next = match self.draft_index() {
            Some(i) => (i + 1) % self.categories.len(),
            None => 0,
        };
        self.set_draft_index(next);
    }

    pub fn prev_draft(&mut self) {
        if self.categories.is_empty() {
            return;
        }
        let prev = match self.draft_index() {
            Some(0) | None => self.categories.len() - 1,
            Some(i) => i - 1,
        };
        self.set_draft_index(prev);
    }
}
