//! src/fs/project_node.rs
//! ============================================================================
//! # ProjectNode: Discovered Repository Tree
//!
//! Value-owned tree of discovered repositories and the plain directories that
//! contain them. The tree is built from a flat list of found-repository paths
//! through an absolute-path → node table rather than a linked object graph,
//! so there are no parent back-references and no ownership cycles.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Component, Path, PathBuf};

/// One directory in the discovered tree.
///
/// `is_repo` is true iff a repository marker was found exactly at `path`;
/// a node may be both a repository and a container of nested repositories.
/// `children`, when present, are sorted by `name` (case-sensitive lexical).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectNode {
    pub name: String,
    pub path: PathBuf,
    #[serde(rename = "isRepo")]
    pub is_repo: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub children: Option<Vec<ProjectNode>>,
}

impl ProjectNode {
    /// True when the node has no nested repositories beneath it.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Depth-first lookup of a descendant (or `self`) by absolute path.
    pub fn find(&self, path: &Path) -> Option<&ProjectNode> {
        if self.path == path {
            return Some(self);
        }
        self.children
            .as_deref()?
            .iter()
            .find_map(|child: &ProjectNode| child.find(path))
    }
}

/// Intermediate slot in the path → node table.
struct Slot {
    name: String,
    is_repo: bool,
    children: BTreeSet<PathBuf>,
}

/// Build the project tree from the set of found-repository paths.
///
/// For every repository path, one node is materialized per directory segment
/// relative to `root_dir`, reusing nodes already created for the same path.
/// Only the node at the exact repository path is marked `is_repo`; the
/// intermediate segments stay plain containers. Root-level nodes are those
/// whose parent equals `root_dir`.
pub fn build_tree(root_dir: &Path, repo_paths: &[PathBuf]) -> Vec<ProjectNode> {
    let mut slots: HashMap<PathBuf, Slot> = HashMap::new();
    let mut roots: BTreeSet<PathBuf> = BTreeSet::new();

    for repo in repo_paths {
        let Ok(rel) = repo.strip_prefix(root_dir) else {
            tracing::warn!(
                "repository {} outside root {}, skipping",
                repo.display(),
                root_dir.display()
            );
            continue;
        };

        let mut cur: PathBuf = root_dir.to_path_buf();
        let mut parent: Option<PathBuf> = None;
        for component in rel.components() {
            let Component::Normal(segment) = component else {
                continue;
            };
            cur.push(segment);
            slots.entry(cur.clone()).or_insert_with(|| Slot {
                name: segment.to_string_lossy().into_owned(),
                is_repo: false,
                children: BTreeSet::new(),
            });
            match parent {
                Some(ref parent_path) => {
                    if let Some(slot) = slots.get_mut(parent_path) {
                        slot.children.insert(cur.clone());
                    }
                }
                None => {
                    roots.insert(cur.clone());
                }
            }
            parent = Some(cur.clone());
        }

        if let Some(slot) = slots.get_mut(repo.as_path()) {
            slot.is_repo = true;
        }
    }

    roots
        .iter()
        .filter_map(|path: &PathBuf| materialize(path, &slots))
        .collect()
}

fn materialize(path: &Path, slots: &HashMap<PathBuf, Slot>) -> Option<ProjectNode> {
    let slot: &Slot = slots.get(path)?;
    let mut children: Vec<ProjectNode> = slot
        .children
        .iter()
        .filter_map(|child: &PathBuf| materialize(child, slots))
        .collect();
    children.sort_by(|a: &ProjectNode, b: &ProjectNode| a.name.cmp(&b.name));

    Some(ProjectNode {
        name: slot.name.clone(),
        path: path.to_path_buf(),
        is_repo: slot.is_repo,
        children: if children.is_empty() {
            None
        } else {
            Some(children)
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn builds_nested_tree_with_repo_flags() {
        let root = p("/r");
        let repos = vec![p("/r/alpha"), p("/r/beta/gamma")];
        let tree: Vec<ProjectNode> = build_tree(&root, &repos);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "alpha");
        assert!(tree[0].is_repo);
        assert!(tree[0].children.is_none());

        assert_eq!(tree[1].name, "beta");
        assert!(!tree[1].is_repo);
        let beta_children = tree[1].children.as_deref().unwrap();
        assert_eq!(beta_children.len(), 1);
        assert_eq!(beta_children[0].name, "gamma");
        assert!(beta_children[0].is_repo);
    }

    #[test]
    fn repo_can_also_be_container() {
        let root = p("/r");
        let repos = vec![p("/r/outer"), p("/r/outer/vendor/inner")];
        let tree = build_tree(&root, &repos);

        assert_eq!(tree.len(), 1);
        assert!(tree[0].is_repo);
        let vendor = &tree[0].children.as_deref().unwrap()[0];
        assert!(!vendor.is_repo);
        assert!(vendor.children.as_deref().unwrap()[0].is_repo);
    }

    #[test]
    fn children_sorted_case_sensitively() {
        let root = p("/r");
        let repos = vec![p("/r/zed"), p("/r/Apple"), p("/r/apple")];
        let tree = build_tree(&root, &repos);
        let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "apple", "zed"]);
    }

    #[test]
    fn paths_outside_root_are_skipped() {
        let tree = build_tree(&p("/r"), &[p("/elsewhere/repo")]);
        assert!(tree.is_empty());
    }

    #[test]
    fn find_locates_descendants() {
        let tree = build_tree(&p("/r"), &[p("/r/beta/gamma")]);
        let beta = &tree[0];
        assert!(beta.find(&p("/r/beta/gamma")).is_some());
        assert!(beta.find(&p("/r/beta/delta")).is_none());
    }
}
