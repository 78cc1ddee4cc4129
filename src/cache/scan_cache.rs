//! src/cache/scan_cache.rs
//! ============================================================================
//! # ScanCache: Persisted Last-Scan Result
//!
//! Persists the last successful scan as a single JSON record keyed by the
//! scan parameters, so the tool can show a project list instantly while a
//! fresh scan runs in the background. The record is replaced wholesale on
//! every save; absence, parse failure, or a parameter mismatch is a cache
//! miss, never an error. Write failures are logged and swallowed — the
//! in-memory tree stays authoritative for the session.

use chrono::Utc;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::fs::project_node::ProjectNode;
use crate::fs::repo_scanner::ScanParams;

/// On-disk cache record. Field names match the historical JSON format.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    projects: Vec<ProjectNode>,
    #[serde(rename = "projectsDir")]
    projects_dir: String,
    #[serde(rename = "maxDepth")]
    max_depth: u32,
    #[serde(rename = "skipDirs")]
    skip_dirs: String,
    timestamp: i64,
}

impl CacheRecord {
    fn matches(&self, params: &ScanParams) -> bool {
        self.projects_dir == params.root_dir.to_string_lossy()
            && self.max_depth == params.max_depth
            && self.skip_dirs == params.skip_dirs_string()
    }
}

/// Handle to the single scan-cache file.
#[derive(Debug, Clone)]
pub struct ScanCache {
    path: PathBuf,
}

impl ScanCache {
    /// Cache at an explicit file path (tests, or caller-chosen locations).
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Cache at the XDG-compliant cache dir (`.../projnav/projects.json`).
    pub fn at_default_location() -> Result<Self, AppError> {
        let proj_dirs: ProjectDirs = ProjectDirs::from("org", "projnav", "projnav")
            .ok_or_else(|| AppError::Cache("Could not determine cache directory.".into()))?;
        Ok(Self::new(proj_dirs.cache_dir().join("projects.json")))
    }

    /// Load the cached project list, or `None` on any miss: no file, a
    /// record that fails to parse, or stored params that differ from
    /// `params` in any field.
    pub async fn load(&self, params: &ScanParams) -> Option<Vec<ProjectNode>> {
        let text: String = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) => {
                debug!("no scan cache at {}: {e}", self.path.display());
                return None;
            }
        };

        let record: CacheRecord = match serde_json::from_str(&text) {
            Ok(record) => record,
            Err(e) => {
                warn!("scan cache at {} is corrupt: {e}", self.path.display());
                return None;
            }
        };

        if !record.matches(params) {
            debug!("scan cache params differ from current settings, ignoring");
            return None;
        }

        Some(record.projects)
    }

    /// Overwrite the cache record with a completed scan. Best-effort: every
    /// failure is logged and ignored.
    pub async fn save(&self, projects: &[ProjectNode], params: &ScanParams) {
        let record = CacheRecord {
            projects: projects.to_vec(),
            projects_dir: params.root_dir.to_string_lossy().into_owned(),
            max_depth: params.max_depth,
            skip_dirs: params.skip_dirs_string(),
            timestamp: Utc::now().timestamp(),
        };

        let text: String = match serde_json::to_string(&record) {
            Ok(text) => text,
            Err(e) => {
                warn!("failed to serialize scan cache: {e}");
                return;
            }
        };

        if let Some(parent) = self.path.parent()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            warn!("failed to create cache dir {}: {e}", parent.display());
            return;
        }
        if let Err(e) = tokio::fs::write(&self.path, text).await {
            warn!("failed to write scan cache {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::project_node::build_tree;
    use tempfile::TempDir;

    fn params(dir: &str, depth: u32, skip: &str) -> ScanParams {
        ScanParams::new(PathBuf::from(dir), depth, skip)
    }

    fn sample_projects() -> Vec<ProjectNode> {
        build_tree(
            &PathBuf::from("/projects"),
            &[
                PathBuf::from("/projects/alpha"),
                PathBuf::from("/projects/beta/gamma"),
            ],
        )
    }

    fn cache_in(tmp: &TempDir) -> ScanCache {
        ScanCache::new(tmp.path().join("projects.json"))
    }

    #[tokio::test]
    async fn round_trip_preserves_tree() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);
        let p = params("/projects", 2, "node_modules");
        let projects = sample_projects();

        cache.save(&projects, &p).await;
        let loaded = cache.load(&p).await.unwrap();
        assert_eq!(loaded, projects);
    }

    #[tokio::test]
    async fn missing_file_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);
        assert!(cache.load(&params("/projects", 2, "")).await.is_none());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);
        tokio::fs::write(tmp.path().join("projects.json"), "{not json")
            .await
            .unwrap();
        assert!(cache.load(&params("/projects", 2, "")).await.is_none());
    }

    #[tokio::test]
    async fn any_changed_param_invalidates() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);
        let saved = params("/old", 2, "node_modules");
        cache.save(&sample_projects(), &saved).await;

        assert!(cache.load(&params("/new", 2, "node_modules")).await.is_none());
        assert!(cache.load(&params("/old", 3, "node_modules")).await.is_none());
        assert!(cache.load(&params("/old", 2, "target")).await.is_none());
        assert!(cache.load(&saved).await.is_some());
    }

    #[tokio::test]
    async fn save_overwrites_previous_record() {
        let tmp = TempDir::new().unwrap();
        let cache = cache_in(&tmp);
        let old = params("/old", 2, "");
        let new = params("/new", 2, "");

        cache.save(&sample_projects(), &old).await;
        cache.save(&[], &new).await;

        assert!(cache.load(&old).await.is_none());
        assert_eq!(cache.load(&new).await.unwrap(), Vec::<ProjectNode>::new());
    }

    #[tokio::test]
    async fn save_failure_is_swallowed() {
        // Path under a file, so create_dir_all/write must fail.
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        tokio::fs::write(&blocker, "x").await.unwrap();
        let cache = ScanCache::new(blocker.join("sub").join("projects.json"));
        cache.save(&sample_projects(), &params("/p", 2, "")).await;
    }
}
