//! src/tasks/scan_task.rs
//! ============================================================================
//! # Scan Tasks: Background Cache-Load and Fresh-Scan
//!
//! Thin spawn helpers around the scanner and the cache store. Each returns a
//! `JoinHandle` so the coordinator can race them with `tokio::select!` and
//! abort the loser when the fresh scan wins outright.

use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::scan_cache::ScanCache;
use crate::fs::project_node::ProjectNode;
use crate::fs::repo_scanner::{self, ScanParams};

/// Spawn a fresh filesystem scan.
pub fn spawn_scan(params: ScanParams) -> JoinHandle<Vec<ProjectNode>> {
    info!("spawning scan of {}", params.root_dir.display());
    tokio::spawn(async move { repo_scanner::scan(&params).await })
}

/// Spawn a cache load for the same params.
pub fn spawn_cache_load(
    cache: ScanCache,
    params: ScanParams,
) -> JoinHandle<Option<Vec<ProjectNode>>> {
    tokio::spawn(async move { cache.load(&params).await })
}
