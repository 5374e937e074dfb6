//! Local item backend - items kept in memory and mirrored to a JSON file

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::backend::{BackendStatus, ItemBackend};
use crate::constants::ITEMS_KEY;
use crate::error::{MissionError, MissionResult};
use crate::models::{sort_newest_first, Item, ItemId};
use crate::storage::Storage;

pub struct LocalBackend {
    storage: Storage,
    items: Mutex<Vec<Item>>,
}

impl LocalBackend {
    /// Load persisted items; a missing or corrupt file starts empty
    pub fn open(storage: Storage) -> Self {
        let items: Vec<Item> = storage.load_json(ITEMS_KEY, Vec::new());
        tracing::debug!(count = items.len(), "Loaded local items");
        LocalBackend {
            storage,
            items: Mutex::new(items),
        }
    }

    fn lock(&self) -> MissionResult<MutexGuard<'_, Vec<Item>>> {
        self.items
            .lock()
            .map_err(|_| MissionError::Backend(String::from("Local item store is poisoned")))
    }

    /// Write the whole collection; failures are logged, the memory copy stays
    fn persist(&self, items: &[Item]) {
        if let Err(e) = self.storage.save_json(ITEMS_KEY, items) {
            tracing::warn!(error = %e, "Failed to persist local items");
        }
    }

    /// Timestamp-derived id, bumped past any id already handed out
    fn next_id(items: &[Item], now: DateTime<Utc>) -> ItemId {
        let newest = items
            .iter()
            .filter_map(|item| match item.id {
                ItemId::Number(n) => Some(n),
                ItemId::Text(_) => None,
            })
            .max();
        let stamp = now.timestamp_millis();
        ItemId::Number(match newest {
            Some(n) if n >= stamp => n + 1,
            _ => stamp,
        })
    }
}

#[async_trait]
impl ItemBackend for LocalBackend {
    fn status(&self) -> BackendStatus {
        BackendStatus::Local
    }

    async fn list_items(&self, category_key: &str) -> MissionResult<Vec<Item>> {
        let items = self.lock()?;
        let mut matching: Vec<Item> = items
            .iter()
            .filter(|item| item.category_key == category_key)
            .cloned()
            .collect();
        sort_newest_first(&mut matching);
        Ok(matching)
    }

    async fn insert_item(&self, category_key: &str, title: &str) -> MissionResult<Item> {
        let mut items = self.lock()?;
        let now = Utc::now();
        let item = Item {
            id: Self::next_id(&items, now),
            category_key: category_key.to_string(),
            title: title.to_string(),
            completed: false,
            created_at: now,
        };
        items.push(item.clone());
        self.persist(&items);
        Ok(item)
    }

    async fn set_completed(&self, id: &ItemId, completed: bool) -> MissionResult<Item> {
        let mut items = self.lock()?;
        let item = items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| MissionError::NotFound(id.clone()))?;
        item.completed = completed;
        let updated = item.clone();
        self.persist(&items);
        Ok(updated)
    }

    async fn delete_item(&self, id: &ItemId) -> MissionResult<()> {
        let mut items = self.lock()?;
        items.retain(|item| &item.id != id);
        self.persist(&items);
        Ok(())
    }

    async fn purge_category(&self, category_key: &str) -> MissionResult<usize> {
        let mut items = self.lock()?;
        let before = items.len();
        items.retain(|item| item.category_key != category_key);
        let removed = before - items.len();
        self.persist(&items);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_milk_scenario() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::open(Storage::at(dir.path()));

        let milk = backend.insert_item("reminders", "milk").await.unwrap();
        let listed = backend.list_items("reminders").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "milk");
        assert!(!listed[0].completed);
        assert!(backend.list_items("tasks").await.unwrap().is_empty());

        let toggled = backend.set_completed(&milk.id, true).await.unwrap();
        assert!(toggled.completed);
        assert!(backend.list_items("reminders").await.unwrap()[0].completed);

        backend.delete_item(&milk.id).await.unwrap();
        assert!(backend.list_items("reminders").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_items_listed_newest_first_with_unique_ids() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::open(Storage::at(dir.path()));

        let first = backend.insert_item("tasks", "one").await.unwrap();
        let second = backend.insert_item("tasks", "two").await.unwrap();
        let third = backend.insert_item("tasks", "three").await.unwrap();
        assert_ne!(first.id, second.id);
        assert_ne!(second.id, third.id);

        let titles: Vec<_> = backend
            .list_items("tasks")
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, ["three", "two", "one"]);
    }

    #[tokio::test]
    async fn test_purge_leaves_other_categories() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::open(Storage::at(dir.path()));
        backend.insert_item("shopping", "bread").await.unwrap();
        backend.insert_item("shopping", "eggs").await.unwrap();
        backend.insert_item("books", "dune").await.unwrap();

        assert_eq!(backend.purge_category("shopping").await.unwrap(), 2);
        assert!(backend.list_items("shopping").await.unwrap().is_empty());
        assert_eq!(backend.list_items("books").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_items_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let backend = LocalBackend::open(Storage::at(dir.path()));
            backend.insert_item("books", "dune").await.unwrap();
        }
        let reopened = LocalBackend::open(Storage::at(dir.path()));
        let books = reopened.list_items("books").await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "dune");
    }

    #[tokio::test]
    async fn test_toggle_unknown_item() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::open(Storage::at(dir.path()));
        let missing = ItemId::Number(99);
        assert_eq!(
            backend.set_completed(&missing, true).await,
            Err(MissionError::NotFound(missing))
        );
    }

    #[tokio::test]
    async fn test_corrupt_item_file_starts_empty() {
        let dir = tempdir().unwrap();
        let storage = Storage::at(dir.path());
        storage.set(ITEMS_KEY, "not json").unwrap();
        let backend = LocalBackend::open(storage);
        assert!(backend.list_items("tasks").await.unwrap().is_empty());
    }
}
