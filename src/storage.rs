use crate::constants::{CATEGORIES_KEY, DATA_DIR_NAME, SELECTED_KEY};
use crate::models::Category;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Parse persisted JSON, treating missing, null or malformed data as `fallback`
pub fn parse_or_default<T: DeserializeOwned>(raw: Option<&str>, fallback: T) -> T {
    let Some(raw) = raw else {
        return fallback;
    };
    match serde_json::from_str::<Option<T>>(raw) {
        Ok(Some(value)) => value,
        Ok(None) => fallback,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding malformed persisted data");
            fallback
        }
    }
}

/// Durable key/value store: one file per key inside the data directory
#[derive(Clone, Debug)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Storage rooted at `~/.my-mission`
    pub fn new() -> Self {
        Storage::at(default_data_dir())
    }

    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Storage {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Ensure data directory exists
    fn ensure_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir)?;
        }
        Ok(())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(key)
    }

    /// Raw value for a key, None if never written or unreadable
    pub fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Read a JSON value, falling back on absence or corruption
    pub fn load_json<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        parse_or_default(self.get(key).as_deref(), fallback)
    }

    pub fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let content = serde_json::to_string(value)?;
        self.set(key, &content)
    }

    /// Load categories in stored order.
    ///
    /// Empty or unusable data yields the defaults. Repeated keys keep their
    /// first occurrence.
    pub fn load_categories(&self) -> Vec<Category> {
        let loaded: Vec<Category> = self.load_json(CATEGORIES_KEY, Vec::new());
        if loaded.is_empty() {
            return Category::defaults();
        }

        let mut seen = HashSet::new();
        let total = loaded.len();
        let categories: Vec<Category> = loaded
            .into_iter()
            .filter(|c| seen.insert(c.key.clone()))
            .collect();
        if categories.len() != total {
            tracing::warn!(dropped = total - categories.len(), "Dropped duplicate category keys");
        }
        categories
    }

    pub fn save_categories(&self, categories: &[Category]) -> Result<()> {
        self.save_json(CATEGORIES_KEY, categories)
    }

    /// Persisted active category key, if any
    pub fn load_selected(&self) -> Option<String> {
        self.get(SELECTED_KEY)
            .map(|raw| raw.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    pub fn save_selected(&self, key: &str) -> Result<()> {
        self.set(SELECTED_KEY, key)
    }

    pub fn clear_selected(&self) -> Result<()> {
        self.remove(SELECTED_KEY)
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

/// `~/.my-mission`, or `./.my-mission` when there is no home directory
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_or_default() {
        assert_eq!(parse_or_default::<Vec<u32>>(None, vec![7]), vec![7]);
        assert_eq!(parse_or_default::<Vec<u32>>(Some("null"), vec![7]), vec![7]);
        assert_eq!(parse_or_default::<Vec<u32>>(Some("{oops"), vec![7]), vec![7]);
        assert_eq!(parse_or_default::<Vec<u32>>(Some("{\"a\":1}"), vec![7]), vec![7]);
        assert_eq!(parse_or_default::<Vec<u32>>(Some("[1,2]"), vec![7]), vec![1, 2]);
    }

    #[test]
    fn test_categories_round_trip() {
        let dir = tempdir().unwrap();
        let storage = Storage::at(dir.path());
        let categories = vec![
            Category::new("books", "Books"),
            Category::new("cat-1700000000000", "חובות"),
            Category::new("tasks", "Tasks"),
        ];
        storage.save_categories(&categories).unwrap();

        let reloaded = Storage::at(dir.path()).load_categories();
        assert_eq!(reloaded, categories);
    }

    #[test]
    fn test_missing_or_malformed_categories_use_defaults() {
        let dir = tempdir().unwrap();
        let storage = Storage::at(dir.path());
        assert_eq!(storage.load_categories(), Category::defaults());

        storage.set(CATEGORIES_KEY, "[{\"key\": ").unwrap();
        assert_eq!(storage.load_categories(), Category::defaults());

        storage.set(CATEGORIES_KEY, "[]").unwrap();
        assert_eq!(storage.load_categories(), Category::defaults());
    }

    #[test]
    fn test_duplicate_keys_keep_first() {
        let dir = tempdir().unwrap();
        let storage = Storage::at(dir.path());
        storage
            .set(
                CATEGORIES_KEY,
                r#"[{"key":"tasks","label":"A"},{"key":"tasks","label":"B"},{"key":"books","label":"C"}]"#,
            )
            .unwrap();

        let loaded = storage.load_categories();
        assert_eq!(
            loaded,
            vec![Category::new("tasks", "A"), Category::new("books", "C")]
        );
    }

    #[test]
    fn test_selected_key_lifecycle() {
        let dir = tempdir().unwrap();
        let storage = Storage::at(dir.path().join("nested"));
        assert_eq!(storage.load_selected(), None);

        storage.save_selected("reminders").unwrap();
        assert_eq!(storage.load_selected().as_deref(), Some("reminders"));

        storage.clear_selected().unwrap();
        assert_eq!(storage.load_selected(), None);
        storage.clear_selected().unwrap();
    }
}
