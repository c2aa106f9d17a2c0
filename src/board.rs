use crate::error::{BoardError, Result};
use crate::model::{Shortcut, Tab};
use crate::reconcile::reconcile;
use crate::reorder::{DropHint, ShortcutReorder, TabReorder};
use crate::shortcuts::ShortcutRepository;
use crate::store::KeyValueStore;
use crate::tabs::TabRepository;
use crate::view::compute_visible;

/// Owns the dashboard state and the store it is persisted to.
///
/// Every mutating method reads, modifies and writes back in one call with no
/// intermediate yield, so two mutations of the same collection can never
/// interleave. Tabs are always written before shortcuts.
pub struct Board<S: KeyValueStore> {
    store: S,
    tabs: TabRepository,
    shortcuts: ShortcutRepository,
    tab_drag: TabReorder,
    shortcut_drag: ShortcutReorder,
}

impl<S: KeyValueStore> Board<S> {
    /// Load tabs, then shortcuts, then rebuild membership.
    pub fn load(mut store: S) -> Result<Self> {
        let mut tabs = TabRepository::load(&mut store)?;
        let shortcuts = ShortcutRepository::load(&store)?;
        if reconcile(tabs.tabs_mut(), shortcuts.all()) {
            tabs.save(&mut store)?;
        }
        Ok(Self {
            store,
            tabs,
            shortcuts,
            tab_drag: TabReorder::default(),
            shortcut_drag: ShortcutReorder::default(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn tabs(&self) -> &[Tab] {
        self.tabs.tabs()
    }

    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.tabs.get(id)
    }

    pub fn default_tab(&self) -> Option<&Tab> {
        self.tabs.default_tab()
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        self.shortcuts.all()
    }

    pub fn shortcut(&self, id: &str) -> Option<&Shortcut> {
        self.shortcuts.get(id)
    }

    pub fn active_tab_id(&self) -> Option<&str> {
        self.tabs.active_id()
    }

    pub fn owner_of(&self, shortcut_id: &str) -> Option<&Tab> {
        self.tabs.owner_of(shortcut_id)
    }

    pub fn visible_ids(&self) -> Vec<String> {
        compute_visible(self.tabs.tabs(), self.tabs.active_id(), &self.shortcuts.ids())
    }

    pub fn visible_shortcuts(&self) -> Vec<&Shortcut> {
        self.visible_ids()
            .iter()
            .filter_map(|id| self.shortcuts.get(id))
            .collect()
    }

    fn persist(&mut self) -> Result<()> {
        self.tabs.save(&mut self.store)?;
        self.shortcuts.save(&mut self.store)
    }

    fn resolve_tab(&self, tab_id: Option<&str>) -> Result<Option<String>> {
        match tab_id {
            Some(id) => match self.tabs.get(id) {
                Some(tab) => Ok(Some(tab.id.clone())),
                None => Err(BoardError::tab_not_found(id)),
            },
            None => Ok(None),
        }
    }

    fn assign(&mut self, shortcut_id: &str, tab_id: &str) {
        for tab in self.tabs.tabs_mut() {
            tab.shortcuts.retain(|s| s != shortcut_id);
        }
        if let Some(tab) = self.tabs.get_mut(tab_id) {
            tab.shortcuts.push(shortcut_id.to_string());
        }
    }

    /// Add a shortcut to `tab_id`, or to the default tab when `None`.
    pub fn add_shortcut(&mut self, name: &str, url: &str, tab_id: Option<&str>) -> Result<Shortcut> {
        let target = match self.resolve_tab(tab_id)? {
            Some(id) => Some(id),
            None => self.tabs.default_id().map(str::to_string),
        };
        let shortcut = self.shortcuts.add(name, url)?;
        if let Some(target) = target {
            self.assign(&shortcut.id, &target);
        }
        reconcile(self.tabs.tabs_mut(), self.shortcuts.all());
        self.persist()?;
        tracing::info!(id = %shortcut.id, url = %shortcut.url, "added shortcut");
        Ok(shortcut)
    }

    /// Edit a shortcut in place. When `tab_id` names another tab the
    /// shortcut moves there.
    pub fn update_shortcut(
        &mut self,
        id: &str,
        name: &str,
        url: &str,
        tab_id: Option<&str>,
    ) -> Result<Shortcut> {
        let target = self.resolve_tab(tab_id)?;
        let updated = self.shortcuts.update(id, name, url)?.clone();
        if let Some(target) = target {
            if self.tabs.owner_of(id).map(|t| t.id.as_str()) != Some(target.as_str()) {
                self.assign(id, &target);
                tracing::debug!(shortcut = %id, tab = %target, "moved shortcut");
            }
        }
        reconcile(self.tabs.tabs_mut(), self.shortcuts.all());
        self.persist()?;
        tracing::info!(id = %updated.id, "updated shortcut");
        Ok(updated)
    }

    pub fn delete_shortcut(&mut self, id: &str) -> Result<Shortcut> {
        let removed = self.shortcuts.delete(id)?;
        for tab in self.tabs.tabs_mut() {
            tab.shortcuts.retain(|s| s != id);
        }
        self.persist()?;
        tracing::info!(id = %removed.id, "deleted shortcut");
        Ok(removed)
    }

    pub fn create_tab(&mut self, name: &str) -> Result<Tab> {
        let tab = self.tabs.create(name)?.clone();
        self.tabs.save(&mut self.store)?;
        tracing::info!(id = %tab.id, name = %tab.name, "created tab");
        Ok(tab)
    }

    pub fn rename_tab(&mut self, id: &str, name: &str) -> Result<()> {
        self.tabs.rename(id, name)?;
        self.tabs.save(&mut self.store)?;
        tracing::info!(id = %id, "renamed tab");
        Ok(())
    }

    /// Delete a tab. Its shortcuts are kept and move to the default tab.
    pub fn delete_tab(&mut self, id: &str) -> Result<Tab> {
        let removed = self.tabs.delete(id)?;
        reconcile(self.tabs.tabs_mut(), self.shortcuts.all());
        self.tabs.save(&mut self.store)?;
        tracing::info!(id = %removed.id, orphaned = removed.shortcuts.len(), "deleted tab");
        Ok(removed)
    }

    pub fn select_tab(&mut self, id: &str) -> Result<()> {
        self.tabs.select(id)?;
        self.tabs.save(&mut self.store)?;
        tracing::debug!(id = %id, "selected tab");
        Ok(())
    }

    pub fn tab_drag(&self) -> &TabReorder {
        &self.tab_drag
    }

    pub fn begin_tab_drag(&mut self, id: &str) -> bool {
        self.tab_drag.begin(self.tabs.tabs(), id)
    }

    pub fn tab_drag_over(&self, target: &str) -> DropHint {
        self.tab_drag.hover(self.tabs.tabs(), target)
    }

    /// Drop the dragged tab on `target`, persisting a changed order.
    pub fn drop_tab(&mut self, target: &str) -> Result<bool> {
        let moved = self.tab_drag.drop_on(self.tabs.tabs_mut(), target);
        if moved {
            self.tabs.save(&mut self.store)?;
            tracing::info!(target = %target, "reordered tabs");
        }
        Ok(moved)
    }

    pub fn end_tab_drag(&mut self) {
        self.tab_drag.cancel();
    }

    pub fn shortcut_drag(&self) -> &ShortcutReorder {
        &self.shortcut_drag
    }

    pub fn begin_shortcut_drag(&mut self, id: &str) -> bool {
        let visible = self.visible_ids();
        self.shortcut_drag.begin(&visible, id)
    }

    pub fn shortcut_drag_over(&self, target: &str) -> DropHint {
        self.shortcut_drag.hover(&self.visible_ids(), target)
    }

    /// Drop the dragged shortcut on `target`. The full shortcut list is
    /// reordered and persisted and tab membership follows the new order.
    pub fn drop_shortcut(&mut self, target: &str) -> Result<bool> {
        let visible = self.visible_ids();
        let moved = self
            .shortcut_drag
            .drop_on(self.shortcuts.items_mut(), &visible, target);
        if moved {
            reconcile(self.tabs.tabs_mut(), self.shortcuts.all());
            self.persist()?;
            tracing::info!(target = %target, "reordered shortcuts");
        }
        Ok(moved)
    }

    pub fn end_shortcut_drag(&mut self) {
        self.shortcut_drag.cancel();
    }

    /// Move `source` onto `target` in one step, as a completed drag gesture.
    pub fn move_tab(&mut self, source: &str, target: &str) -> Result<bool> {
        if !self.begin_tab_drag(source) {
            return Ok(false);
        }
        self.drop_tab(target)
    }

    pub fn move_shortcut(&mut self, source: &str, target: &str) -> Result<bool> {
        if !self.begin_shortcut_drag(source) {
            return Ok(false);
        }
        self.drop_shortcut(target)
    }
}
