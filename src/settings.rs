use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_store_path() -> String {
    "newtab.json".into()
}

fn default_suggest_endpoint() -> String {
    "https://suggestqueries.google.com/complete/search".into()
}

fn default_image_endpoint() -> String {
    "https://api.unsplash.com".into()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_max_suggestions() -> usize {
    8
}

fn default_http_timeout() -> u64 {
    10
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// JSON file backing the key/value store.
    #[serde(default = "default_store_path")]
    pub store_path: String,
    /// When enabled the logger starts at debug level and honours `RUST_LOG`.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving log output in addition to stdout.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Autocomplete endpoint queried by the search box.
    #[serde(default = "default_suggest_endpoint")]
    pub suggest_endpoint: String,
    /// Base url of the image search API.
    #[serde(default = "default_image_endpoint")]
    pub image_endpoint: String,
    /// Quiet period after the last keystroke before suggestions are fetched.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            debug_logging: false,
            log_file: None,
            suggest_endpoint: default_suggest_endpoint(),
            image_endpoint: default_image_endpoint(),
            debounce_ms: default_debounce_ms(),
            max_suggestions: default_max_suggestions(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
