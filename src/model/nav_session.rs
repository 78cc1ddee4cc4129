//! src/model/nav_session.rs
//! ============================================================================
//! # NavSession: Navigation Model Façade
//!
//! Composes the navigation stack, the flatten cache, the list builder, and
//! the selection tracker into the single mutable state the host event loop
//! drives. All mutation happens synchronously here, in response to completed
//! scan updates or user actions; the session owns no I/O.

use std::path::Path;
use tracing::info;

use crate::controller::actions::Action;
use crate::controller::coordinator::ScanUpdate;
use crate::fs::flatten::FlattenCache;
use crate::fs::project_node::ProjectNode;
use crate::model::list_items::{self, FavoriteEntry, ListItem, RecentEntry};
use crate::model::nav_stack::NavStack;
use crate::model::selection::SelectionTracker;

pub struct NavSession {
    stack: NavStack,
    flatten_cache: FlattenCache,
    favorites: Vec<FavoriteEntry>,
    recents: Vec<RecentEntry>,
    search_term: String,
    favorites_enabled: bool,
    selection_key: Option<String>,
    scroll_offset: usize,
    tracker: SelectionTracker,
    items: Vec<ListItem>,
    /// Set after every model mutation; the host clears it after rendering.
    pub redraw: bool,
}

impl NavSession {
    pub fn new(
        favorites: Vec<FavoriteEntry>,
        recents: Vec<RecentEntry>,
        favorites_enabled: bool,
    ) -> Self {
        let mut session = Self {
            stack: NavStack::new(Vec::new()),
            flatten_cache: FlattenCache::new(),
            favorites,
            recents,
            search_term: String::new(),
            favorites_enabled,
            selection_key: None,
            scroll_offset: 0,
            tracker: SelectionTracker::new(),
            items: Vec::new(),
            redraw: true,
        };
        session.rebuild();
        session
    }

    /// Dispatch one command into the model.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::MoveSelectionUp => self.select_up(),
            Action::MoveSelectionDown => self.select_down(),
            Action::DrillDown => self.drill_down(),
            Action::GoBack => self.go_back(),
            Action::SetSearch(term) => self.set_search(term),
            Action::ClearSearch => self.set_search(String::new()),
            Action::Update(update) => self.apply_update(update),
            Action::SetMetadata { favorites, recents } => self.set_metadata(favorites, recents),
        }
    }

    /// Install a replacement tree from the coordinator. The stack collapses
    /// to a fresh root level and every flatten result is invalidated.
    pub fn apply_update(&mut self, update: ScanUpdate) {
        let projects: Vec<ProjectNode> = match update {
            ScanUpdate::Cached(projects) | ScanUpdate::Scanned(projects) => projects,
        };
        info!("installing replacement tree with {} root entries", projects.len());
        self.flatten_cache.invalidate_all();
        self.stack.replace_root(projects);
        self.selection_key = None;
        self.scroll_offset = 0;
        self.rebuild();
    }

    /// Drill into the selected container: the new level holds the flattened
    /// repository descendants, so deep nests are one jump away. Leaf
    /// repositories and favorite/recent rows are the host's jump targets,
    /// not drill targets. On the Back row this pops instead.
    pub fn drill_down(&mut self) {
        let Some(item) = self.selected_item().cloned() else {
            return;
        };
        match item {
            ListItem::Back { .. } => self.go_back(),
            ListItem::Entry {
                project: Some(index),
                ..
            } => {
                let Some(node) = self.stack.current().projects.get(index).cloned() else {
                    return;
                };
                if node.is_leaf() {
                    return;
                }
                let flat = self.flatten_cache.flatten(&node);
                let projects: Vec<ProjectNode> = flat
                    .iter()
                    .filter_map(|f| node.find(&f.path).cloned())
                    .collect();

                self.stack
                    .save_viewport(self.scroll_offset, self.selection_key.clone());
                self.stack.push(projects, node.path.clone());
                self.scroll_offset = 0;
                self.selection_key = None;
                self.search_term.clear();
                self.rebuild();
            }
            _ => {}
        }
    }

    /// Pop one level and restore the viewport saved before the drill.
    pub fn go_back(&mut self) {
        if !self.stack.pop() {
            return;
        }
        self.scroll_offset = self.stack.current().saved_scroll_offset;
        self.selection_key = self.stack.current().saved_selection_key.clone();
        self.search_term.clear();
        self.rebuild();
    }

    /// Replace the live search term and re-filter.
    pub fn set_search(&mut self, term: String) {
        if self.search_term == term {
            return;
        }
        self.search_term = term;
        self.rebuild();
    }

    /// Replace the favorites/recents decoration snapshots.
    pub fn set_metadata(&mut self, favorites: Vec<FavoriteEntry>, recents: Vec<RecentEntry>) {
        self.favorites = favorites;
        self.recents = recents;
        self.rebuild();
    }

    pub fn select_up(&mut self) {
        self.step_selection(-1);
    }

    pub fn select_down(&mut self) {
        self.step_selection(1);
    }

    fn step_selection(&mut self, direction: isize) {
        let current: usize = self.selected_index();
        let mut index: isize = current as isize;
        loop {
            index += direction;
            if index < 0 || index as usize >= self.items.len() {
                return;
            }
            if self.items[index as usize].is_selectable() {
                break;
            }
        }
        self.selection_key = self.items[index as usize]
            .selection_key()
            .map(str::to_string);
        self.redraw = true;
    }

    pub fn selected_index(&self) -> usize {
        self.tracker.resolve(self.selection_key.as_deref())
    }

    pub fn selected_item(&self) -> Option<&ListItem> {
        self.items.get(self.selected_index())
    }

    /// The path the host should jump to for the selected row, if any.
    pub fn selected_path(&self) -> Option<&Path> {
        match self.selected_item()? {
            ListItem::Entry { path, .. } if path.as_os_str().is_empty() => None,
            ListItem::Entry { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn at_root(&self) -> bool {
        self.stack.at_root()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// The renderer reports its viewport position here so a later drill can
    /// save it.
    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset;
    }

    /// Rebuild the display list and re-anchor the selection. A key that
    /// survived keeps its row; a removed key snaps to the nearest remaining
    /// selectable neighbor; no key at all means the first selectable item.
    fn rebuild(&mut self) {
        let previous_index: usize = self.tracker.resolve(self.selection_key.as_deref());

        self.items = list_items::build(
            self.stack.current(),
            &self.favorites,
            &self.recents,
            &self.search_term,
            self.favorites_enabled,
        );
        self.tracker.rebuild(&self.items);

        let resolved: usize = match self.selection_key.as_deref() {
            None => self.tracker.resolve(None),
            Some(key) => self
                .tracker
                .index_of(key)
                .unwrap_or_else(|| nearest_selectable(&self.items, previous_index)),
        };
        self.selection_key = self
            .items
            .get(resolved)
            .and_then(|item: &ListItem| item.selection_key())
            .map(str::to_string);
        self.redraw = true;
    }
}

/// The selectable row closest to `around`, preferring the row that moved up
/// into the removed row's place.
fn nearest_selectable(items: &[ListItem], around: usize) -> usize {
    if items.is_empty() {
        return 0;
    }
    let start: usize = around.min(items.len() - 1);
    for offset in 0..items.len() {
        let forward: usize = start + offset;
        if forward < items.len() && items[forward].is_selectable() {
            return forward;
        }
        if let Some(backward) = start.checked_sub(offset)
            && items[backward].is_selectable()
        {
            return backward;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::project_node::build_tree;
    use std::path::PathBuf;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    fn session_with(repos: &[&str]) -> NavSession {
        let paths: Vec<PathBuf> = repos.iter().map(|r| p(&format!("/r/{r}"))).collect();
        let mut session = NavSession::new(Vec::new(), Vec::new(), true);
        session.apply_update(ScanUpdate::Scanned(build_tree(&p("/r"), &paths)));
        session
    }

    fn entry_labels(session: &NavSession) -> Vec<String> {
        session
            .items()
            .iter()
            .filter_map(|item| match item {
                ListItem::Entry { label, .. } => Some(label.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn update_installs_root_level() {
        let session = session_with(&["alpha", "beta/gamma"]);
        assert!(session.at_root());
        assert_eq!(entry_labels(&session), vec!["alpha", "beta"]);
        // First selectable row is selected by default.
        assert_eq!(session.selected_path(), Some(p("/r/alpha").as_path()));
    }

    #[test]
    fn drill_shows_flattened_descendants() {
        let mut session = session_with(&["alpha", "beta/sub/gamma"]);
        session.apply(Action::MoveSelectionDown); // beta
        session.apply(Action::DrillDown);

        assert!(!session.at_root());
        assert_eq!(entry_labels(&session), vec!["sub/gamma"]);
        assert_eq!(
            session.selected_path(),
            Some(p("/r/beta/sub/gamma").as_path())
        );
    }

    #[test]
    fn drill_on_leaf_is_a_noop() {
        let mut session = session_with(&["alpha"]);
        session.apply(Action::DrillDown);
        assert!(session.at_root());
    }

    #[test]
    fn back_restores_selection_and_scroll() {
        let mut session = session_with(&["alpha", "beta/gamma"]);
        session.apply(Action::MoveSelectionDown); // beta
        session.set_scroll_offset(4);
        session.apply(Action::DrillDown);
        assert!(!session.at_root());

        session.apply(Action::GoBack);
        assert!(session.at_root());
        assert_eq!(session.scroll_offset(), 4);
        assert_eq!(session.selected_path(), Some(p("/r/beta").as_path()));
    }

    #[test]
    fn back_row_pops_too() {
        let mut session = session_with(&["beta/gamma"]);
        session.apply(Action::DrillDown);
        assert!(!session.at_root());

        // Move past the single entry onto the Back row.
        session.apply(Action::MoveSelectionDown);
        session.apply(Action::DrillDown);
        assert!(session.at_root());
    }

    #[test]
    fn search_filters_and_clearing_restores() {
        let mut session = session_with(&["alpha", "gamma", "beta"]);
        session.apply(Action::SetSearch("ga".to_string()));
        assert_eq!(entry_labels(&session), vec!["gamma"]);

        session.apply(Action::ClearSearch);
        assert_eq!(entry_labels(&session), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn selection_survives_filtering_when_row_remains() {
        let mut session = session_with(&["alpha", "gamma"]);
        session.apply(Action::MoveSelectionDown); // gamma
        session.apply(Action::SetSearch("gam".to_string()));
        assert_eq!(session.selected_path(), Some(p("/r/gamma").as_path()));
    }

    #[test]
    fn removed_selection_snaps_to_neighbor() {
        let mut session = session_with(&["alpha", "beta", "gamma"]);
        session.apply(Action::MoveSelectionDown); // beta
        session.apply(Action::SetSearch("a".to_string())); // alpha, beta, gamma all contain 'a'
        session.apply(Action::SetSearch("al".to_string())); // only alpha
        assert_eq!(session.selected_path(), Some(p("/r/alpha").as_path()));
    }

    #[test]
    fn scan_update_mid_drill_resets_to_root() {
        let mut session = session_with(&["beta/gamma"]);
        session.apply(Action::DrillDown);
        assert!(!session.at_root());

        let fresh = build_tree(&p("/r"), &[p("/r/new")]);
        session.apply(Action::Update(ScanUpdate::Scanned(fresh)));
        assert!(session.at_root());
        assert_eq!(entry_labels(&session), vec!["new"]);
    }

    #[test]
    fn metadata_refresh_redecorates_list() {
        let mut session = session_with(&["alpha"]);
        session.apply(Action::SetMetadata {
            favorites: vec![FavoriteEntry {
                trigger: "a".to_string(),
                command: vec!["cd /r/alpha".to_string()],
            }],
            recents: Vec::new(),
        });

        // The favorite row absorbs the project row at root.
        assert_eq!(entry_labels(&session), vec!["a"]);
    }

    #[test]
    fn selection_skips_headers() {
        let mut session = session_with(&["alpha", "beta"]);
        session.apply(Action::SetMetadata {
            favorites: Vec::new(),
            recents: vec![RecentEntry {
                path: p("/r/old"),
                display_name: "old".to_string(),
            }],
        });

        // Selection stayed on alpha; moving up crosses the "All" header
        // onto the recent row in one step, and back down again.
        assert_eq!(session.selected_path(), Some(p("/r/alpha").as_path()));
        session.apply(Action::MoveSelectionUp);
        assert_eq!(session.selected_path(), Some(p("/r/old").as_path()));
        session.apply(Action::MoveSelectionDown);
        assert_eq!(session.selected_path(), Some(p("/r/alpha").as_path()));
    }
}
