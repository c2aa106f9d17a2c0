use crate::error::{BoardError, Result};
use crate::model::{generate_id, normalize_url, required, Shortcut};
use crate::store::{get_json, set_json, KeyValueStore, SHORTCUTS_KEY};

pub fn load_shortcuts(store: &impl KeyValueStore) -> anyhow::Result<Vec<Shortcut>> {
    Ok(get_json(store, SHORTCUTS_KEY)?.unwrap_or_default())
}

/// Replace the whole stored list.
pub fn save_shortcuts(store: &mut impl KeyValueStore, list: &[Shortcut]) -> anyhow::Result<()> {
    set_json(store, SHORTCUTS_KEY, list)
}

/// Owns the flat, ordered list of shortcut records. Mutations only touch
/// memory; callers persist with [`ShortcutRepository::save`]. The
/// repository knows nothing about tabs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutRepository {
    items: Vec<Shortcut>,
}

impl ShortcutRepository {
    pub fn new(items: Vec<Shortcut>) -> Self {
        Self { items }
    }

    pub fn load(store: &impl KeyValueStore) -> Result<Self> {
        let items = load_shortcuts(store)?;
        tracing::debug!(count = items.len(), "loaded shortcuts");
        Ok(Self { items })
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<()> {
        save_shortcuts(store, &self.items)?;
        Ok(())
    }

    pub fn all(&self) -> &[Shortcut] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Shortcut> {
        self.items.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|s| s.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|s| s.id.clone()).collect()
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Shortcut> {
        &mut self.items
    }

    pub fn add(&mut self, name: &str, url: &str) -> Result<Shortcut> {
        let name = required("name", name)?;
        let url = normalize_url(url)?;
        let shortcut = Shortcut {
            id: generate_id(),
            name,
            url,
        };
        self.items.push(shortcut.clone());
        Ok(shortcut)
    }

    pub fn update(&mut self, id: &str, name: &str, url: &str) -> Result<&Shortcut> {
        let pos = self
            .position(id)
            .ok_or_else(|| BoardError::shortcut_not_found(id))?;
        let name = required("name", name)?;
        let url = normalize_url(url)?;
        let entry = &mut self.items[pos];
        entry.name = name;
        entry.url = url;
        Ok(&self.items[pos])
    }

    pub fn delete(&mut self, id: &str) -> Result<Shortcut> {
        let pos = self
            .position(id)
            .ok_or_else(|| BoardError::shortcut_not_found(id))?;
        Ok(self.items.remove(pos))
    }
}
