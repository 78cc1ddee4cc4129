//! src/fs/flatten.rs
//! ============================================================================
//! # Tree Flattener: Repository Leaves Below a Subtree
//!
//! Flattening converts a nested subtree into the flat list of its repository
//! descendants, with display names relative to the flattened node. Used when
//! drilling into a container so the user sees every repository beneath it at
//! once. Results are cached per node path for the lifetime of the current
//! scan result; the cache is invalidated wholesale whenever a fresh scan
//! replaces the tree.

use moka::sync::Cache;
use std::path::PathBuf;
use std::sync::Arc;

use crate::fs::project_node::ProjectNode;

/// One repository leaf produced by flattening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatProject {
    pub path: PathBuf,
    /// `/`-joined name segments from the flattened node (exclusive) down to
    /// this repository.
    pub display_name: String,
}

/// Flatten-result cache keyed by the flattened node's absolute path.
#[derive(Clone)]
pub struct FlattenCache {
    inner: Cache<PathBuf, Arc<Vec<FlatProject>>>,
}

impl FlattenCache {
    pub fn new() -> Self {
        // Bounded by how many distinct containers a session can drill into.
        Self {
            inner: Cache::new(1024),
        }
    }

    /// Flatten `node`, reusing a cached result for the same path.
    pub fn flatten(&self, node: &ProjectNode) -> Arc<Vec<FlatProject>> {
        self.inner
            .get_with(node.path.clone(), || Arc::new(flatten_subtree(node)))
    }

    /// Drop every cached result; called whenever the tree is replaced.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

impl Default for FlattenCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect all `is_repo` descendants strictly below `node`, depth-first in
/// child-sorted order.
pub fn flatten_subtree(node: &ProjectNode) -> Vec<FlatProject> {
    let mut out: Vec<FlatProject> = Vec::new();
    if let Some(children) = node.children.as_deref() {
        for child in children {
            collect(child, child.name.clone(), &mut out);
        }
    }
    out
}

fn collect(node: &ProjectNode, display_name: String, out: &mut Vec<FlatProject>) {
    if node.is_repo {
        out.push(FlatProject {
            path: node.path.clone(),
            display_name: display_name.clone(),
        });
    }
    if let Some(children) = node.children.as_deref() {
        for child in children {
            collect(child, format!("{display_name}/{}", child.name), out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::project_node::build_tree;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn flatten_yields_repo_descendants_only() {
        let tree = build_tree(&p("/r"), &[p("/r/beta/gamma")]);
        let beta = &tree[0];

        let flat: Vec<FlatProject> = flatten_subtree(beta);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].path, p("/r/beta/gamma"));
        assert_eq!(flat[0].display_name, "gamma");
    }

    #[test]
    fn display_names_join_segments_below_the_node() {
        let tree = build_tree(&p("/r"), &[p("/r/group/a/deep"), p("/r/group/b")]);
        let group = &tree[0];

        let flat = flatten_subtree(group);
        let names: Vec<&str> = flat.iter().map(|f| f.display_name.as_str()).collect();
        assert_eq!(names, vec!["a/deep", "b"]);
    }

    #[test]
    fn order_is_alphabetical_depth_first() {
        let tree = build_tree(
            &p("/r"),
            &[p("/r/top/z"), p("/r/top/a/inner"), p("/r/top/a"), p("/r/top/m")],
        );
        let top = &tree[0];
        let flat = flatten_subtree(top);
        let names: Vec<&str> = flat.iter().map(|f| f.display_name.as_str()).collect();
        assert_eq!(names, vec!["a", "a/inner", "m", "z"]);
    }

    #[test]
    fn node_itself_is_never_included() {
        let tree = build_tree(&p("/r"), &[p("/r/solo")]);
        let solo = &tree[0];
        assert!(solo.is_repo);
        assert!(flatten_subtree(solo).is_empty());
    }

    #[test]
    fn cache_reuses_and_invalidates() {
        let tree = build_tree(&p("/r"), &[p("/r/beta/gamma")]);
        let beta = &tree[0];

        let cache = FlattenCache::new();
        let first = cache.flatten(beta);
        let second = cache.flatten(beta);
        assert!(Arc::ptr_eq(&first, &second));

        cache.invalidate_all();
        let third = cache.flatten(beta);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }
}
