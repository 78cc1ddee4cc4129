//! src/controller/coordinator.rs
//! ============================================================================
//! # ScanCoordinator: Concurrent Cache-Load and Fresh-Scan Orchestration
//!
//! On initial load the coordinator races a cache read against a fresh scan:
//! whichever usable result lands first is emitted, but a cached tree is only
//! shown while the scan is still running, and once the scan delivers, its
//! result replaces the display and is persisted. Cancellation is cooperative:
//! a single shared flag, set once, checked only at the moment a task would
//! otherwise apply its result. At most one scan is in flight per coordinator;
//! `refresh()` while already scanning is a no-op.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::cache::scan_cache::ScanCache;
use crate::fs::project_node::ProjectNode;
use crate::fs::repo_scanner::ScanParams;
use crate::tasks::scan_task;

/// One project-list update emitted to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanUpdate {
    /// Loaded from the persisted cache; superseded by the next `Scanned`.
    Cached(Vec<ProjectNode>),
    /// Result of a completed fresh scan; always replaces the display.
    Scanned(Vec<ProjectNode>),
}

/// Orchestrates cache-load and scan tasks for one session.
pub struct ScanCoordinator {
    cache: ScanCache,
    cancelled: Arc<AtomicBool>,
    scanning: Arc<AtomicBool>,
}

impl ScanCoordinator {
    pub fn new(cache: ScanCache) -> Self {
        Self {
            cache,
            cancelled: Arc::new(AtomicBool::new(false)),
            scanning: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the session: cache load and fresh scan race as independent
    /// tasks. Updates arrive on the returned channel; it closes when the
    /// scan settles (or its result is discarded after `cancel()`).
    pub fn run_initial_load(&self, params: ScanParams) -> UnboundedReceiver<ScanUpdate> {
        let (tx, rx) = mpsc::unbounded_channel::<ScanUpdate>();
        if self.scanning.swap(true, Ordering::SeqCst) {
            warn!("initial load requested while a scan is already in flight");
            return rx;
        }
        self.cancelled.store(false, Ordering::SeqCst);

        let cache: ScanCache = self.cache.clone();
        let cancelled: Arc<AtomicBool> = self.cancelled.clone();
        let scanning: Arc<AtomicBool> = self.scanning.clone();

        tokio::spawn(async move {
            let mut cache_handle = scan_task::spawn_cache_load(cache.clone(), params.clone());
            let mut scan_handle = scan_task::spawn_scan(params.clone());

            tokio::select! {
                cache_res = &mut cache_handle => {
                    // First usable result wins: show the cache only while
                    // the scan is still pending and the session is live.
                    if !cancelled.load(Ordering::SeqCst)
                        && let Ok(Some(projects)) = cache_res
                        && !projects.is_empty()
                    {
                        info!("showing {} cached root entries", projects.len());
                        let _ = tx.send(ScanUpdate::Cached(projects));
                    }
                    finish_scan(scan_handle.await, &cache, &params, &cancelled, &tx).await;
                }
                scan_res = &mut scan_handle => {
                    // Scan beat the cache; the cache result would never be
                    // shown, so don't wait for it.
                    cache_handle.abort();
                    finish_scan(scan_res, &cache, &params, &cancelled, &tx).await;
                }
            }

            scanning.store(false, Ordering::SeqCst);
        });

        rx
    }

    /// Re-scan without touching the cache on the read side; the displayed
    /// tree and the cache record are replaced unconditionally on completion.
    /// Returns `None` when a scan is already in flight.
    pub fn refresh(&self, params: ScanParams) -> Option<UnboundedReceiver<ScanUpdate>> {
        if self.scanning.swap(true, Ordering::SeqCst) {
            debug!("refresh requested while already refreshing, ignoring");
            return None;
        }
        self.cancelled.store(false, Ordering::SeqCst);

        let (tx, rx) = mpsc::unbounded_channel::<ScanUpdate>();
        let cache: ScanCache = self.cache.clone();
        let cancelled: Arc<AtomicBool> = self.cancelled.clone();
        let scanning: Arc<AtomicBool> = self.scanning.clone();

        tokio::spawn(async move {
            let scan_handle = scan_task::spawn_scan(params.clone());
            finish_scan(scan_handle.await, &cache, &params, &cancelled, &tx).await;
            scanning.store(false, Ordering::SeqCst);
        });

        Some(rx)
    }

    /// Advisory cancellation: in-flight results are discarded at their
    /// completion points; nothing is interrupted mid-I/O.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::SeqCst)
    }
}

/// Apply a completed scan: discard after cancellation, otherwise emit the
/// replacement tree and persist it.
async fn finish_scan(
    scan_res: Result<Vec<ProjectNode>, JoinError>,
    cache: &ScanCache,
    params: &ScanParams,
    cancelled: &AtomicBool,
    tx: &UnboundedSender<ScanUpdate>,
) {
    match scan_res {
        Ok(projects) => {
            if cancelled.load(Ordering::SeqCst) {
                debug!("scan completed after cancellation, discarding result");
                return;
            }
            cache.save(&projects, params).await;
            let _ = tx.send(ScanUpdate::Scanned(projects));
        }
        Err(e) => warn!("scan task failed: {e}"),
    }
}
