//! src/model/selection.rs
//! ============================================================================
//! # SelectionTracker: Stable Selection Across List Mutations
//!
//! Selection is a logical key, not an index, so the highlighted row does not
//! shift when the list above it changes. The key → index map is rebuilt on
//! every list identity change; list sizes are bounded by what a terminal
//! viewport can show, so the rebuild is cheap.

use std::collections::HashMap;

use crate::model::list_items::ListItem;

#[derive(Debug, Default)]
pub struct SelectionTracker {
    index_by_key: HashMap<String, usize>,
    first_selectable: Option<usize>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the key → index map for a new list identity.
    pub fn rebuild(&mut self, items: &[ListItem]) {
        self.index_by_key.clear();
        self.first_selectable = None;
        for (index, item) in items.iter().enumerate() {
            if let Some(key) = item.selection_key() {
                self.index_by_key.insert(key.to_string(), index);
                if self.first_selectable.is_none() {
                    self.first_selectable = Some(index);
                }
            }
        }
    }

    /// Resolve a selection key to a current index: the mapped index if the
    /// key still exists, otherwise the first selectable item, otherwise 0.
    pub fn resolve(&self, key: Option<&str>) -> usize {
        key.and_then(|k: &str| self.index_by_key.get(k).copied())
            .or(self.first_selectable)
            .unwrap_or(0)
    }

    /// The mapped index for `key`, without any fallback.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index_by_key.get(key).copied()
    }
}
