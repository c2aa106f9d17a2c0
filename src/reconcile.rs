use crate::model::{Shortcut, Tab};
use std::collections::HashMap;

/// Rebuild every tab's membership from the shortcut list so that each
/// shortcut id belongs to exactly one tab.
///
/// A shortcut stays in the tab that previously listed it; shortcuts with no
/// surviving owner go to the default tab. Membership order follows the
/// shortcut list order. If an id was listed by several tabs the first one
/// wins. Ids that no longer name a shortcut are dropped.
///
/// Returns `true` when any membership list changed.
pub fn reconcile(tabs: &mut [Tab], shortcuts: &[Shortcut]) -> bool {
    let mut owners: HashMap<&str, usize> = HashMap::new();
    for (idx, tab) in tabs.iter().enumerate() {
        for id in &tab.shortcuts {
            if owners.contains_key(id.as_str()) {
                tracing::warn!(shortcut = %id, tab = %tab.id, "shortcut listed by more than one tab");
                continue;
            }
            owners.insert(id.as_str(), idx);
        }
    }

    let default_idx = tabs
        .iter()
        .position(|t| t.is_default)
        .or(if tabs.is_empty() { None } else { Some(0) });

    let mut rebuilt: Vec<Vec<String>> = vec![Vec::new(); tabs.len()];
    for shortcut in shortcuts {
        match owners.get(shortcut.id.as_str()).copied().or(default_idx) {
            Some(idx) => rebuilt[idx].push(shortcut.id.clone()),
            None => tracing::warn!(shortcut = %shortcut.id, "no tab available for shortcut"),
        }
    }

    let mut changed = false;
    for (tab, members) in tabs.iter_mut().zip(rebuilt) {
        if tab.shortcuts != members {
            tracing::debug!(tab = %tab.id, before = tab.shortcuts.len(), after = members.len(), "membership rebuilt");
            tab.shortcuts = members;
            changed = true;
        }
    }
    changed
}
