//! Application constants
//!
//! Centralized location for storage keys, defaults and environment names.

/// Application name
pub const APP_NAME: &str = "My Mission";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory under $HOME holding all persisted data
pub const DATA_DIR_NAME: &str = ".my-mission";

/// Log file written inside the data directory
pub const LOG_FILE_NAME: &str = "my-mission.log";

/// Config file read from the data directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

// Storage keys
pub const CATEGORIES_KEY: &str = "systemsList";
pub const SELECTED_KEY: &str = "selectedSystem";
pub const ITEMS_KEY: &str = "itemsList";

/// Categories seeded when nothing usable is persisted, as (key, label)
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("tasks", "Tasks"),
    ("reminders", "Reminders"),
    ("shopping", "Shopping"),
    ("books", "Books"),
];

/// Prefix of keys generated for labels that normalize to nothing
pub const FALLBACK_KEY_PREFIX: &str = "cat-";

// Backend configuration
pub const DEFAULT_ITEMS_TABLE: &str = "items";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BACKEND_MODE: &str = "MY_MISSION_BACKEND";
pub const ENV_BACKEND_URL: &str = "SUPABASE_URL";
pub const ENV_BACKEND_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_ITEMS_TABLE: &str = "MY_MISSION_TABLE";
