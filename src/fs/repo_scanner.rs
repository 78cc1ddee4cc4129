//! src/fs/repo_scanner.rs
//! ============================================================================
//! # Repository Scanner: Bounded-Depth Marker Discovery
//!
//! Walks the projects root looking for version-control marker directories
//! (`.git`, `.hg`, `.svn`) up to the configured depth, pruning skip-pattern
//! matches, and builds the [`ProjectNode`] tree from the hits. The walk runs
//! under `spawn_blocking` so the caller's event loop never blocks on
//! filesystem I/O. A missing root directory yields an empty result, and any
//! I/O error on an individual subdirectory is logged and skipped.

use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::fs::project_node::{self, ProjectNode};

/// Marker directories that identify a repository root.
pub const REPO_MARKERS: [&str; 3] = [".git", ".hg", ".svn"];

/// The `(root_dir, max_depth, skip_patterns)` triple that both drives a scan
/// and keys cache validity. Equality is field-exact, string-for-string, with
/// no normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanParams {
    pub root_dir: PathBuf,
    pub max_depth: u32,
    pub skip_patterns: Vec<String>,
}

impl ScanParams {
    /// Build params from settings fields; `skip_dirs` is the comma-separated
    /// pattern string, split on commas with empty segments dropped.
    pub fn new(root_dir: PathBuf, max_depth: u32, skip_dirs: &str) -> Self {
        let skip_patterns: Vec<String> = skip_dirs
            .split(',')
            .map(str::trim)
            .filter(|s: &&str| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            root_dir,
            max_depth: max_depth.max(1),
            skip_patterns,
        }
    }

    /// The comma-separated form stored in the on-disk cache record.
    pub fn skip_dirs_string(&self) -> String {
        self.skip_patterns.join(",")
    }
}

/// Scan for repositories under `params.root_dir`.
///
/// Pure read: no side effects beyond logging. Returns the sorted tree of
/// discovered repositories; empty when the root does not exist.
pub async fn scan(params: &ScanParams) -> Vec<ProjectNode> {
    let params: ScanParams = params.clone();
    match tokio::task::spawn_blocking(move || scan_blocking(&params)).await {
        Ok(projects) => projects,
        Err(e) => {
            warn!("scan task panicked or was aborted: {e}");
            Vec::new()
        }
    }
}

fn scan_blocking(params: &ScanParams) -> Vec<ProjectNode> {
    if !params.root_dir.is_dir() {
        info!(
            "projects root {} does not exist, returning empty scan",
            params.root_dir.display()
        );
        return Vec::new();
    }

    let matchers: Vec<Option<Pattern>> = params
        .skip_patterns
        .iter()
        .map(|p: &String| Pattern::new(p).ok())
        .collect();

    let mut repos: Vec<PathBuf> = Vec::new();

    // Marker directories sit one level below the repositories they mark, so
    // the walk goes one level deeper than max_depth.
    let mut walker = WalkDir::new(&params.root_dir)
        .min_depth(1)
        .max_depth(params.max_depth as usize + 1)
        .follow_links(false)
        .into_iter();

    loop {
        let entry: walkdir::DirEntry = match walker.next() {
            None => break,
            Some(Ok(entry)) => entry,
            Some(Err(e)) => {
                warn!("skipping unreadable entry during scan: {e}");
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }
        let name: String = entry.file_name().to_string_lossy().into_owned();

        if is_skipped(&name, &params.skip_patterns, &matchers) {
            walker.skip_current_dir();
            continue;
        }

        if REPO_MARKERS.contains(&name.as_str()) {
            if let Some(repo_dir) = entry.path().parent() {
                repos.push(repo_dir.to_path_buf());
            }
            // Never descend into the marker itself.
            walker.skip_current_dir();
        }
    }

    repos.sort();
    repos.dedup();
    info!(
        "scan of {} found {} repositories",
        params.root_dir.display(),
        repos.len()
    );

    project_node::build_tree(&params.root_dir, &repos)
}

/// A segment is skipped on exact name match or glob match. Patterns that
/// fail to compile as globs fall back to exact comparison only.
fn is_skipped(name: &str, patterns: &[String], matchers: &[Option<Pattern>]) -> bool {
    patterns
        .iter()
        .zip(matchers)
        .any(|(raw, compiled): (&String, &Option<Pattern>)| {
            raw == name
                || compiled
                    .as_ref()
                    .is_some_and(|p: &Pattern| p.matches(name))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn mkrepo(root: &Path, rel: &str) {
        fs::create_dir_all(root.join(rel).join(".git")).unwrap();
    }

    #[tokio::test]
    async fn missing_root_returns_empty() {
        let params = ScanParams::new(PathBuf::from("/definitely/not/here"), 3, "");
        assert!(scan(&params).await.is_empty());
    }

    #[tokio::test]
    async fn finds_repos_with_depth_and_skip() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        mkrepo(root, "alpha");
        mkrepo(root, "beta/gamma");
        mkrepo(root, "node_modules/hidden");
        mkrepo(root, "too/deep/for/this/limit");

        let params = ScanParams::new(root.to_path_buf(), 2, "node_modules");
        let tree: Vec<ProjectNode> = scan(&params).await;

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "alpha");
        assert!(tree[0].is_repo);
        assert!(tree[0].children.is_none());
        assert_eq!(tree[1].name, "beta");
        assert!(!tree[1].is_repo);
        let gamma = &tree[1].children.as_deref().unwrap()[0];
        assert_eq!(gamma.name, "gamma");
        assert!(gamma.is_repo);
    }

    #[tokio::test]
    async fn repo_at_exactly_max_depth_is_found() {
        let tmp = TempDir::new().unwrap();
        mkrepo(tmp.path(), "a/b/c");

        let params = ScanParams::new(tmp.path().to_path_buf(), 3, "");
        let tree = scan(&params).await;
        assert_eq!(tree.len(), 1);
        assert!(
            tree[0].children.as_deref().unwrap()[0].children.as_deref().unwrap()[0].is_repo
        );

        let shallow = ScanParams::new(tmp.path().to_path_buf(), 2, "");
        assert!(scan(&shallow).await.is_empty());
    }

    #[tokio::test]
    async fn glob_skip_patterns_prune_subtrees() {
        let tmp = TempDir::new().unwrap();
        mkrepo(tmp.path(), "kept");
        mkrepo(tmp.path(), "build-cache/skipped");

        let params = ScanParams::new(tmp.path().to_path_buf(), 3, "build-*");
        let tree = scan(&params).await;
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "kept");
    }

    #[tokio::test]
    async fn nested_repo_inside_repo_is_discovered() {
        let tmp = TempDir::new().unwrap();
        mkrepo(tmp.path(), "outer");
        mkrepo(tmp.path(), "outer/sub");

        let params = ScanParams::new(tmp.path().to_path_buf(), 2, "");
        let tree = scan(&params).await;
        assert_eq!(tree.len(), 1);
        assert!(tree[0].is_repo);
        let sub = &tree[0].children.as_deref().unwrap()[0];
        assert!(sub.is_repo);
    }

    #[test]
    fn params_equality_is_exact() {
        let a = ScanParams::new(PathBuf::from("/p"), 2, "node_modules");
        let b = ScanParams::new(PathBuf::from("/p"), 2, "node_modules");
        let c = ScanParams::new(PathBuf::from("/p"), 3, "node_modules");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
