use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{DEFAULT_CATEGORIES, FALLBACK_KEY_PREFIX};
use crate::error::{MissionError, MissionResult};

/// A named bucket that scopes a set of items
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
}

impl Category {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Category {
            key: key.into(),
            label: label.into(),
        }
    }

    /// The categories a fresh install starts with
    pub fn defaults() -> Vec<Category> {
        DEFAULT_CATEGORIES
            .iter()
            .map(|(key, label)| Category::new(*key, *label))
            .collect()
    }
}

/// Item identifier.
///
/// Local items get epoch-millisecond numbers; the hosted table may hand out
/// either numbers or strings (uuid), so both are accepted. Numbers order
/// numerically and sort before text ids.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

/// A completable record belonging to exactly one category.
///
/// Field names on the wire follow the hosted `items` table columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "system_key", alias = "category_key")]
    pub category_key: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the backend assigns `id` and `created_at`
#[derive(Clone, Debug, Serialize)]
pub struct NewItem<'a> {
    #[serde(rename = "system_key")]
    pub category_key: &'a str,
    pub title: &'a str,
    pub completed: bool,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Sort newest first; ids break ties so the order is stable
pub fn sort_newest_first(items: &mut [Item]) {
    items.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

fn disallowed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9-]").expect("static regex"))
}

/// Derive a storage-safe key from a display label.
///
/// Lowercases, collapses whitespace runs into `-` and strips anything
/// outside `[a-z0-9-]`. Non-Latin labels come out empty.
pub fn key_from_label(label: &str) -> String {
    let lowered = label.trim().to_lowercase();
    let hyphenated = whitespace_re().replace_all(&lowered, "-");
    disallowed_re().replace_all(&hyphenated, "").into_owned()
}

/// Time-derived key for labels whose derived key is empty.
///
/// Starts at `cat-<millis>` and bumps the number until it is not taken.
pub fn fallback_key(now: DateTime<Utc>, is_taken: impl Fn(&str) -> bool) -> String {
    let mut stamp = now.timestamp_millis();
    loop {
        let key = format!("{}{}", FALLBACK_KEY_PREFIX, stamp);
        if !is_taken(&key) {
            return key;
        }
        stamp += 1;
    }
}

/// Trim user input and reject it if nothing is left
pub fn normalize_input(raw: &str) -> MissionResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MissionError::EmptyInput);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_label() {
        assert_eq!(key_from_label("Tasks"), "tasks");
        assert_eq!(key_from_label("  Shopping   List "), "shopping-list");
        assert_eq!(key_from_label("C++ Books!"), "c-books");
        assert_eq!(key_from_label("2024 Goals"), "2024-goals");
    }

    #[test]
    fn test_key_from_non_latin_label_is_empty() {
        assert_eq!(key_from_label("חובות"), "");
        assert_eq!(key_from_label("   "), "");
    }

    #[test]
    fn test_fallback_key_skips_taken() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let key = fallback_key(now, |k| k == "cat-1700000000000");
        assert_eq!(key, "cat-1700000000001");
    }

    #[test]
    fn test_normalize_input() {
        assert_eq!(normalize_input("  milk ").unwrap(), "milk");
        assert_eq!(normalize_input(" \t "), Err(MissionError::EmptyInput));
    }

    #[test]
    fn test_item_reads_backend_row() {
        let json = r#"{
            "id": 42,
            "system_key": "reminders",
            "title": "milk",
            "completed": null,
            "created_at": "2024-05-01T10:00:00.123456+00:00",
            "owner": "ignored"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, ItemId::Number(42));
        assert_eq!(item.category_key, "reminders");
        assert!(!item.completed);
    }

    #[test]
    fn test_item_accepts_uuid_ids() {
        let json = r#"{"id":"5f0c","system_key":"tasks","title":"x","completed":true,"created_at":"2024-05-01T10:00:00Z"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id.to_string(), "5f0c");
        assert!(item.completed);
    }

    #[test]
    fn test_sort_newest_first() {
        let at = |ms| DateTime::from_timestamp_millis(ms).unwrap();
        let mk = |id, ms| Item {
            id: ItemId::Number(id),
            category_key: "tasks".into(),
            title: "t".into(),
            completed: false,
            created_at: at(ms),
        };
        let mut items = vec![mk(1, 100), mk(3, 300), mk(2, 200)];
        sort_newest_first(&mut items);
        let ids: Vec<_> = items.iter().map(|i| i.id.to_string()).collect();
        assert_eq!(ids, ["3", "2", "1"]);

        let mut tied = vec![mk(9, 100), mk(10, 100), mk(2, 100)];
        sort_newest_first(&mut tied);
        let ids: Vec<_> = tied.iter().map(|i| i.id.to_string()).collect();
        assert_eq!(ids, ["10", "9", "2"]);
    }
}
