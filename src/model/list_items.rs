//! src/model/list_items.rs
//! ============================================================================
//! # List Builder & Filter: Sectioned Display List
//!
//! Merges favorites/shortcuts and recent-history metadata with the current
//! navigation level's entries into one flat, sectioned list, then applies the
//! live substring search. Rows carry opaque selection keys, unique within the
//! unfiltered list, so selection survives list mutations; the same path shown
//! in two sections gets two distinct keys.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::fs::project_node::ProjectNode;
use crate::model::nav_stack::NavLevel;

/// A favorite/shortcut read from the external persistence layer: a trigger
/// plus the stored command sequence it runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub trigger: String,
    pub command: Vec<String>,
}

impl FavoriteEntry {
    /// The path this favorite jumps to, when its entire stored action is a
    /// single `cd <path>` instruction. Multi-step commands, or a first
    /// command that merely starts by visiting a path, yield `None` — their
    /// semantics are not simply "go here". Best-effort decoration only.
    pub fn exact_target(&self) -> Option<PathBuf> {
        if self.command.len() != 1 {
            return None;
        }
        let rest: &str = self.command[0].trim().strip_prefix("cd ")?.trim();
        if rest.is_empty() {
            None
        } else {
            Some(PathBuf::from(rest))
        }
    }
}

/// A recent-history entry read from the external persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentEntry {
    pub path: PathBuf,
    pub display_name: String,
}

/// One row of the display list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Header {
        label: String,
    },
    Entry {
        label: String,
        path: PathBuf,
        selection_key: String,
        /// Index into the level's `projects` when this row is a project.
        project: Option<usize>,
        is_favorite: bool,
        is_recent: bool,
    },
    Back {
        selection_key: String,
    },
}

impl ListItem {
    pub fn selection_key(&self) -> Option<&str> {
        match self {
            ListItem::Header { .. } => None,
            ListItem::Entry { selection_key, .. } | ListItem::Back { selection_key } => {
                Some(selection_key)
            }
        }
    }

    pub fn is_selectable(&self) -> bool {
        !matches!(self, ListItem::Header { .. })
    }
}

pub const BACK_KEY: &str = "back";

/// Build the sectioned display list for one level.
///
/// Unfiltered ordering: favorites (only with an empty search term and the
/// feature enabled), recents (minus exact-favorite duplicates), the current
/// level's own entries under a header, and a trailing Back row below root.
/// With a non-empty term, entries are filtered by case-insensitive substring
/// on the label, headers survive only with at least one surviving entry, and
/// Back is always kept at the end. Relative order is never scrambled.
pub fn build(
    level: &NavLevel,
    favorites: &[FavoriteEntry],
    recents: &[RecentEntry],
    search_term: &str,
    favorites_enabled: bool,
) -> Vec<ListItem> {
    let at_root: bool = level.parent_path.is_none();
    let mut items: Vec<ListItem> = Vec::new();
    let mut shown_paths: HashSet<PathBuf> = HashSet::new();

    if favorites_enabled && search_term.is_empty() && !favorites.is_empty() {
        items.push(ListItem::Header {
            label: "Favorites".to_string(),
        });
        for favorite in favorites {
            let target: Option<PathBuf> = favorite.exact_target();
            if let Some(path) = target.clone() {
                shown_paths.insert(path);
            }
            items.push(ListItem::Entry {
                label: favorite.trigger.clone(),
                path: target.unwrap_or_default(),
                selection_key: format!("fav:{}", favorite.trigger),
                project: None,
                is_favorite: true,
                is_recent: false,
            });
        }
    }

    // A recent row is suppressed only by an *exact* favorite match; a recent
    // that overlaps a multi-step favorite is still shown.
    let exact_favorite_paths: HashSet<PathBuf> = if favorites_enabled {
        favorites.iter().filter_map(FavoriteEntry::exact_target).collect()
    } else {
        HashSet::new()
    };
    let visible_recents: Vec<&RecentEntry> = recents
        .iter()
        .filter(|recent: &&RecentEntry| !exact_favorite_paths.contains(&recent.path))
        .collect();
    if !visible_recents.is_empty() {
        items.push(ListItem::Header {
            label: "Recent".to_string(),
        });
        for recent in visible_recents {
            shown_paths.insert(recent.path.clone());
            items.push(ListItem::Entry {
                label: recent.display_name.clone(),
                path: recent.path.clone(),
                selection_key: format!("recent:{}", recent.path.display()),
                project: None,
                is_favorite: false,
                is_recent: true,
            });
        }
    }

    items.push(ListItem::Header {
        label: level_header_label(level),
    });
    for (index, node) in level.projects.iter().enumerate() {
        if at_root && shown_paths.contains(&node.path) {
            continue;
        }
        items.push(ListItem::Entry {
            label: entry_label(node, level.parent_path.as_deref()),
            path: node.path.clone(),
            selection_key: format!("proj:{}", node.path.display()),
            project: Some(index),
            is_favorite: false,
            is_recent: false,
        });
    }

    if !at_root {
        items.push(ListItem::Back {
            selection_key: BACK_KEY.to_string(),
        });
    }

    if search_term.is_empty() {
        items
    } else {
        apply_filter(items, search_term)
    }
}

/// The current-level header: the drilled container's display name, "All" at
/// root.
fn level_header_label(level: &NavLevel) -> String {
    level
        .parent_path
        .as_deref()
        .map(|path: &Path| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        })
        .unwrap_or_else(|| "All".to_string())
}

/// Root rows show the node name; drilled rows show the flattened display
/// name, the `/`-joined segments below the drilled container.
fn entry_label(node: &ProjectNode, parent_path: Option<&Path>) -> String {
    match parent_path {
        Some(parent) => node
            .path
            .strip_prefix(parent)
            .map(|rel: &Path| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<String>>()
                    .join("/")
            })
            .unwrap_or_else(|_| node.name.clone()),
        None => node.name.clone(),
    }
}

/// Case-insensitive substring filter over entry labels. Headers are retained
/// only when at least one entry beneath them survives; Back always survives
/// and stays at the end.
fn apply_filter(items: Vec<ListItem>, search_term: &str) -> Vec<ListItem> {
    let needle: String = search_term.to_lowercase();
    let mut out: Vec<ListItem> = Vec::new();
    let mut pending_header: Option<ListItem> = None;
    let mut back: Option<ListItem> = None;

    for item in items {
        match item {
            ListItem::Header { .. } => pending_header = Some(item),
            ListItem::Entry { ref label, .. } => {
                if label.to_lowercase().contains(&needle) {
                    if let Some(header) = pending_header.take() {
                        out.push(header);
                    }
                    out.push(item);
                }
            }
            ListItem::Back { .. } => back = Some(item),
        }
    }

    if let Some(back) = back {
        out.push(back);
    }
    out
}
