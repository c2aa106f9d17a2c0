use crate::store::{Entries, KeyValueStore};
use serde_json::Value;

pub const UNSPLASH_KEY: &str = "unsplashKey";
pub const SEARCH_QUERY_KEY: &str = "searchQuery";
pub const IPIFY_KEY: &str = "ipifyKey";

/// Image query used when none has been configured.
pub const DEFAULT_BACKGROUND_QUERY: &str = "nature";

/// User preferences kept as plain strings next to the dashboard data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub unsplash_key: Option<String>,
    pub search_query: Option<String>,
    pub ipify_key: Option<String>,
}

impl Preferences {
    pub fn load(store: &impl KeyValueStore) -> anyhow::Result<Self> {
        let mut entries = store.get(&[UNSPLASH_KEY, SEARCH_QUERY_KEY, IPIFY_KEY])?;
        let mut take = |key: &str| match entries.remove(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        };
        Ok(Self {
            unsplash_key: take(UNSPLASH_KEY),
            search_query: take(SEARCH_QUERY_KEY),
            ipify_key: take(IPIFY_KEY),
        })
    }

    /// Write every preference in one call. Unset or blank values remove
    /// their key.
    pub fn save(&self, store: &mut impl KeyValueStore) -> anyhow::Result<()> {
        let mut set = Entries::new();
        let mut unset = Vec::new();
        for (key, value) in [
            (UNSPLASH_KEY, &self.unsplash_key),
            (SEARCH_QUERY_KEY, &self.search_query),
            (IPIFY_KEY, &self.ipify_key),
        ] {
            match value.as_deref().map(str::trim) {
                Some(v) if !v.is_empty() => {
                    set.insert(key.to_string(), Value::String(v.to_string()));
                }
                _ => unset.push(key),
            }
        }
        if !set.is_empty() {
            store.set(set)?;
        }
        if !unset.is_empty() {
            store.remove(&unset)?;
        }
        Ok(())
    }

    /// Query for the background image search.
    pub fn background_query(&self) -> &str {
        self.search_query
            .as_deref()
            .unwrap_or(DEFAULT_BACKGROUND_QUERY)
    }
}
