//! Drag-and-drop reordering for tabs and shortcuts.
//!
//! Both engines run the same gesture state machine, `Idle -> Dragging(id) ->
//! Idle`, and leave persistence to the caller.

use crate::model::{Shortcut, Tab};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(String),
}

impl DragState {
    pub fn source(&self) -> Option<&str> {
        match self {
            DragState::Idle => None,
            DragState::Dragging(id) => Some(id),
        }
    }
}

/// Feedback for the element currently under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropHint {
    /// Nothing is being dragged, or the pointer is over the dragged item.
    None,
    Valid,
    Invalid,
}

/// Move `items[from]` so that it ends up next to the item that was at `to`:
/// after it when moving forward, before it when moving backward.
fn move_relative<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}

/// Reorder the non-default tabs by dropping `source` onto `target`, then put
/// the default tab back in front. Returns `false` when nothing moved.
pub fn move_tab(tabs: &mut Vec<Tab>, source: &str, target: &str) -> bool {
    if source == target {
        return false;
    }
    let (defaults, mut others): (Vec<Tab>, Vec<Tab>) =
        std::mem::take(tabs).into_iter().partition(|t| t.is_default);
    let from = others.iter().position(|t| t.id == source);
    let to = others.iter().position(|t| t.id == target);
    let moved = match (from, to) {
        (Some(from), Some(to)) => {
            move_relative(&mut others, from, to);
            true
        }
        _ => false,
    };
    tabs.extend(defaults);
    tabs.extend(others);
    moved
}

/// Move shortcut `source` next to `target` within the flat list.
pub fn move_shortcut(shortcuts: &mut Vec<Shortcut>, source: &str, target: &str) -> bool {
    if source == target {
        return false;
    }
    let from = shortcuts.iter().position(|s| s.id == source);
    let to = shortcuts.iter().position(|s| s.id == target);
    match (from, to) {
        (Some(from), Some(to)) => {
            move_relative(shortcuts, from, to);
            true
        }
        _ => false,
    }
}

fn tab_drop_hint(tabs: &[Tab], source: &str, target: &str) -> DropHint {
    if source == target {
        return DropHint::None;
    }
    match tabs.iter().find(|t| t.id == target) {
        Some(tab) if !tab.is_default => DropHint::Valid,
        _ => DropHint::Invalid,
    }
}

#[derive(Debug, Default, Clone)]
pub struct TabReorder {
    state: DragState,
}

impl TabReorder {
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Start dragging `id`. The default tab and unknown ids never start a drag.
    pub fn begin(&mut self, tabs: &[Tab], id: &str) -> bool {
        match tabs.iter().find(|t| t.id == id) {
            Some(tab) if !tab.is_default => {
                self.state = DragState::Dragging(id.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn hover(&self, tabs: &[Tab], target: &str) -> DropHint {
        match self.state.source() {
            Some(source) => tab_drop_hint(tabs, source, target),
            None => DropHint::None,
        }
    }

    /// Finish the gesture on `target`. Returns `true` when the order changed;
    /// the engine is idle again either way.
    pub fn drop_on(&mut self, tabs: &mut Vec<Tab>, target: &str) -> bool {
        let state = std::mem::take(&mut self.state);
        match state.source() {
            Some(source) if tab_drop_hint(tabs, source, target) == DropHint::Valid => {
                move_tab(tabs, source, target)
            }
            _ => false,
        }
    }

    /// Drag ended without a drop.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Drag state over the currently visible shortcuts.
#[derive(Debug, Default, Clone)]
pub struct ShortcutReorder {
    state: DragState,
}

impl ShortcutReorder {
    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn begin(&mut self, visible: &[String], id: &str) -> bool {
        if visible.iter().any(|v| v == id) {
            self.state = DragState::Dragging(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn hover(&self, visible: &[String], target: &str) -> DropHint {
        match self.state.source() {
            None => DropHint::None,
            Some(source) if source == target => DropHint::None,
            Some(_) if visible.iter().any(|v| v == target) => DropHint::Valid,
            Some(_) => DropHint::Invalid,
        }
    }

    /// Reorder the full shortcut list for a drop on a visible `target`.
    pub fn drop_on(
        &mut self,
        shortcuts: &mut Vec<Shortcut>,
        visible: &[String],
        target: &str,
    ) -> bool {
        let valid = self.hover(visible, target) == DropHint::Valid;
        let state = std::mem::take(&mut self.state);
        match state.source() {
            Some(source) if valid => move_shortcut(shortcuts, source, target),
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
