use std::collections::HashSet;

use tracing::debug;

use crate::category::CategoryKey;
use crate::view::ViewId;

/// Collapsed category groups of a single list view.
///
/// Starts empty, so every group is expanded until the user folds it.
#[derive(Debug, Clone)]
pub struct CollapseRegistry {
    view: ViewId,
    collapsed: HashSet<CategoryKey>,
}

impl CollapseRegistry {
    pub fn new(view: ViewId) -> Self {
        Self {
            view,
            collapsed: HashSet::new(),
        }
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn is_collapsed(&self, key: &CategoryKey) -> bool {
        self.collapsed.contains(key)
    }

    /// Flips the group and returns whether it is now collapsed.
    pub fn toggle(&mut self, key: CategoryKey) -> bool {
        let collapsed = if self.collapsed.remove(&key) {
            false
        } else {
            self.collapsed.insert(key.clone());
            true
        };
        debug!(view = %self.view, category = %key, collapsed, "toggled group");
        collapsed
    }

    pub fn set_collapsed(&mut self, key: CategoryKey, collapsed: bool) {
        let changed = if collapsed {
            self.collapsed.insert(key.clone())
        } else {
            self.collapsed.remove(&key)
        };
        if changed {
            debug!(view = %self.view, category = %key, collapsed, "set group state");
        }
    }

    pub fn collapse_all<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = CategoryKey>,
    {
        for key in keys {
            self.set_collapsed(key, true);
        }
    }

    pub fn expand_all(&mut self) {
        self.reset();
    }

    pub fn reset(&mut self) {
        if !self.collapsed.is_empty() {
            debug!(view = %self.view, cleared = self.collapsed.len(), "reset collapse state");
        }
        self.collapsed.clear();
    }

    /// Sorted snapshot of the collapsed keys.
    pub fn collapsed_keys(&self) -> Vec<CategoryKey> {
        let mut keys: Vec<CategoryKey> = self.collapsed.iter().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.collapsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collapsed.is_empty()
    }
}
