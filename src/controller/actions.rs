//! src/controller/actions.rs
//! ============================================================================
//! # Actions: Navigation Model Commands
//!
//! Defines the `Action` enum fed into the navigation session by the host
//! event loop. Raw input handling (keys, CLI dispatch) lives outside this
//! crate; these are the meaningful commands the model responds to.

use crate::controller::coordinator::ScanUpdate;
use crate::model::list_items::{FavoriteEntry, RecentEntry};

/// A high-level command applied to the navigation session.
#[derive(Debug, Clone)]
pub enum Action {
    /// Move selection to the previous selectable item.
    MoveSelectionUp,
    /// Move selection to the next selectable item.
    MoveSelectionDown,
    /// Drill into the selected container (or go back on the Back row).
    DrillDown,
    /// Pop the current level, restoring the saved viewport.
    GoBack,
    /// Replace the live search term.
    SetSearch(String),
    /// Clear the live search term.
    ClearSearch,
    /// A project-list update from the scan coordinator.
    Update(ScanUpdate),
    /// Replace the favorites/recents decoration snapshots (the external
    /// store changed, e.g. a favorite was toggled).
    SetMetadata {
        favorites: Vec<FavoriteEntry>,
        recents: Vec<RecentEntry>,
    },
}
