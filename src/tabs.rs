use crate::error::{BoardError, Result};
use crate::model::{required, Tab, DEFAULT_TAB_NAME};
use crate::store::{get_json, Entries, KeyValueStore, ACTIVE_TAB_KEY, TABS_KEY};

/// Ordered tab records plus the active-tab pointer.
///
/// After [`TabRepository::load`] exactly one tab carries `is_default` and it
/// sits at index 0. Every mutation below keeps it there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRepository {
    tabs: Vec<Tab>,
    active: Option<String>,
}

impl TabRepository {
    /// Read tabs and the active pointer, repairing the default-tab invariant
    /// and persisting the repair when anything had to change.
    pub fn load(store: &mut impl KeyValueStore) -> Result<Self> {
        let tabs: Vec<Tab> = get_json(&*store, TABS_KEY)?.unwrap_or_default();
        let active: Option<String> = get_json(&*store, ACTIVE_TAB_KEY)?;
        let (repo, repaired) = Self::repaired(tabs, active);
        if repaired {
            tracing::info!(tabs = repo.tabs.len(), "repaired default tab");
            repo.save(store)?;
        }
        tracing::debug!(tabs = repo.tabs.len(), active = ?repo.active, "loaded tabs");
        Ok(repo)
    }

    fn repaired(mut tabs: Vec<Tab>, mut active: Option<String>) -> (Self, bool) {
        let mut repaired = false;

        let mut seen = false;
        for tab in &mut tabs {
            if tab.is_default {
                if seen {
                    tracing::warn!(tab = %tab.id, "clearing duplicate default marker");
                    tab.is_default = false;
                    repaired = true;
                }
                seen = true;
            }
        }

        if !seen {
            // Records written before the marker existed identify the default by name.
            if let Some(tab) = tabs.iter_mut().find(|t| t.name == DEFAULT_TAB_NAME) {
                tab.is_default = true;
            } else {
                let tab = Tab::new_default();
                if active.is_none() {
                    active = Some(tab.id.clone());
                }
                tabs.insert(0, tab);
            }
            repaired = true;
        }

        if let Some(pos) = tabs.iter().position(|t| t.is_default) {
            if pos != 0 {
                let tab = tabs.remove(pos);
                tabs.insert(0, tab);
                repaired = true;
            }
        }

        (Self { tabs, active }, repaired)
    }

    /// Write tabs and the active pointer. Both land before this returns.
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<()> {
        let mut entries = Entries::new();
        let tabs = serde_json::to_value(&self.tabs).map_err(anyhow::Error::from)?;
        entries.insert(TABS_KEY.into(), tabs);
        match &self.active {
            Some(id) => {
                entries.insert(ACTIVE_TAB_KEY.into(), id.clone().into());
                store.set(entries)?;
            }
            None => {
                store.set(entries)?;
                store.remove(&[ACTIVE_TAB_KEY])?;
            }
        }
        Ok(())
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub(crate) fn tabs_mut(&mut self) -> &mut Vec<Tab> {
        &mut self.tabs
    }

    pub fn get(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn default_tab(&self) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.is_default)
    }

    pub fn default_id(&self) -> Option<&str> {
        self.default_tab().map(|t| t.id.as_str())
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Tab owning `shortcut_id`, if any.
    pub fn owner_of(&self, shortcut_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.contains(shortcut_id))
    }

    pub fn create(&mut self, name: &str) -> Result<&Tab> {
        let name = required("name", name)?;
        let tab = Tab::new(name);
        let becomes_active = self
            .active
            .as_deref()
            .map_or(true, |id| self.get(id).is_none());
        if becomes_active {
            self.active = Some(tab.id.clone());
        }
        self.tabs.push(tab);
        Ok(&self.tabs[self.tabs.len() - 1])
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<()> {
        if self.get(id).is_none() {
            return Err(BoardError::tab_not_found(id));
        }
        let name = required("name", name)?;
        if let Some(tab) = self.get_mut(id) {
            tab.name = name;
        }
        Ok(())
    }

    /// Remove a tab. Its members become unassigned until the next
    /// reconciliation moves them to the default tab.
    pub fn delete(&mut self, id: &str) -> Result<Tab> {
        if self.default_id() == Some(id) {
            return Err(BoardError::Forbidden("deleted"));
        }
        let pos = self
            .tabs
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| BoardError::tab_not_found(id))?;
        let removed = self.tabs.remove(pos);
        if self.active.as_deref() == Some(id) {
            self.active = self.tabs.first().map(|t| t.id.clone());
        }
        Ok(removed)
    }

    pub fn select(&mut self, id: &str) -> Result<()> {
        if self.get(id).is_none() {
            return Err(BoardError::tab_not_found(id));
        }
        self.active = Some(id.to_string());
        Ok(())
    }
}
