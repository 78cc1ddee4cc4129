//! lib.rs — Project Navigation Engine
//! -----------------------------------------------
//! Scan & cache coordination engine and hierarchical navigation model for
//! jumping to project directories: repository discovery under depth/skip
//! constraints, a persisted scan cache for instant startup, concurrent
//! cache-load/fresh-scan coordination with cooperative cancellation, and a
//! searchable drill-down list model decorated with favorites and recents.
//! Rendering, CLI dispatch, and favorites persistence live in the host.

/// --- Error handling (unified error type) ---
pub mod error;

/// --- Cache (persisted last-scan result) ---
pub mod cache {
    pub mod scan_cache;
}

/// --- Configuration: user settings mapped to scan parameters ---
pub mod config {
    pub mod config;
}

/// --- Controller: scan orchestration and model commands ---
pub mod controller {
    pub mod actions;
    pub mod coordinator;
}

/// --- State/data models (navigation stack, list, selection) ---
pub mod model {
    pub mod list_items;
    pub mod nav_session;
    pub mod nav_stack;
    pub mod selection;
}

/// --- Filesystem abstraction (scanner, tree, flattener) ---
pub mod fs {
    pub mod flatten;
    pub mod project_node;
    pub mod repo_scanner;
}

/// --- Background/async tasks ---
pub mod tasks {
    pub mod scan_task;
}

pub mod logging;
pub use logging::Logger;

/// --- Crate-level re-exports for the most important types ---
pub use cache::scan_cache::ScanCache;
pub use config::config::Settings;
pub use controller::coordinator::{ScanCoordinator, ScanUpdate};
pub use error::AppError;
pub use fs::project_node::ProjectNode;
pub use fs::repo_scanner::ScanParams;
pub use model::nav_session::NavSession;
