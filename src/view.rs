use crate::model::Tab;

/// Shortcut ids to render for `active_tab_id`.
///
/// Falls back to the default tab when the pointer is unset or dangling, and
/// to every shortcut when no default tab exists.
pub fn compute_visible(tabs: &[Tab], active_tab_id: Option<&str>, all_shortcut_ids: &[String]) -> Vec<String> {
    if let Some(tab) = active_tab_id.and_then(|id| tabs.iter().find(|t| t.id == id)) {
        return tab.shortcuts.clone();
    }
    if let Some(tab) = tabs.iter().find(|t| t.is_default) {
        return tab.shortcuts.clone();
    }
    tracing::warn!("no default tab, showing every shortcut");
    all_shortcut_ids.to_vec()
}
