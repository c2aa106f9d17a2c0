use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// A partial key/value map as returned by [`KeyValueStore::get`].
pub type Entries = Map<String, Value>;

pub const SHORTCUTS_KEY: &str = "shortcuts";
pub const TABS_KEY: &str = "tabs";
pub const ACTIVE_TAB_KEY: &str = "activeTab";

/// Flat persistent key/value namespace. Writes are last-write-wins and
/// there are no transactions across keys.
pub trait KeyValueStore {
    /// Return the subset of `keys` that currently hold a value.
    fn get(&self, keys: &[&str]) -> anyhow::Result<Entries>;
    /// Write every entry of `entries`, replacing existing values.
    fn set(&mut self, entries: Entries) -> anyhow::Result<()>;
    /// Remove `keys`. Missing keys are ignored.
    fn remove(&mut self, keys: &[&str]) -> anyhow::Result<()>;
}

/// Read a single key and decode it.
pub fn get_json<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> anyhow::Result<Option<T>> {
    let mut entries = store.get(&[key])?;
    match entries.remove(key) {
        Some(Value::Null) | None => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

/// Encode and write a single key.
pub fn set_json<T: Serialize + ?Sized>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> anyhow::Result<()> {
    let mut entries = Entries::new();
    entries.insert(key.to_string(), serde_json::to_value(value)?);
    store.set(entries)
}

/// Store kept entirely in memory. Counts writes so callers can observe
/// whether an operation persisted anything.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    data: Entries,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(data: Entries) -> Self {
        Self { data, writes: 0 }
    }

    /// Raw stored value for `key`.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Number of `set`/`remove` calls seen so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, keys: &[&str]) -> anyhow::Result<Entries> {
        Ok(keys
            .iter()
            .filter_map(|k| self.data.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    fn set(&mut self, entries: Entries) -> anyhow::Result<()> {
        self.writes += 1;
        self.data.extend(entries);
        Ok(())
    }

    fn remove(&mut self, keys: &[&str]) -> anyhow::Result<()> {
        self.writes += 1;
        for k in keys {
            self.data.remove(*k);
        }
        Ok(())
    }
}

/// Store backed by a single pretty-printed JSON object on disk. The whole
/// file is read on every `get` and rewritten on every mutation.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> anyhow::Result<Entries> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("read {}", self.path.display()));
            }
        };
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&content).with_context(|| format!("parse {}", self.path.display()))
    }

    fn save(&self, data: &Entries) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, keys: &[&str]) -> anyhow::Result<Entries> {
        let mut data = self.load()?;
        Ok(keys
            .iter()
            .filter_map(|k| data.remove(*k).map(|v| (k.to_string(), v)))
            .collect())
    }

    fn set(&mut self, entries: Entries) -> anyhow::Result<()> {
        let mut data = self.load()?;
        data.extend(entries);
        self.save(&data)
    }

    fn remove(&mut self, keys: &[&str]) -> anyhow::Result<()> {
        let mut data = self.load()?;
        let before = data.len();
        for k in keys {
            data.remove(*k);
        }
        if data.len() != before {
            self.save(&data)?;
        }
        Ok(())
    }
}
