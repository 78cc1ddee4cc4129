//! src/model/nav_stack.rs
//! ============================================================================
//! # NavStack: Drill-Down Navigation Levels
//!
//! A stack of value-semantic frames, one per drill-down level. Each frame is
//! an independent snapshot: popping just truncates the sequence, nothing is
//! shared or undone. The root frame is never popped.

use std::path::PathBuf;

use crate::fs::project_node::ProjectNode;

/// One navigation level: a project list plus the viewport state saved when
/// the user drilled further down.
#[derive(Debug, Clone)]
pub struct NavLevel {
    pub projects: Vec<ProjectNode>,
    /// Path of the container that was drilled into; `None` at root.
    pub parent_path: Option<PathBuf>,
    pub saved_scroll_offset: usize,
    pub saved_selection_key: Option<String>,
}

impl NavLevel {
    fn new(projects: Vec<ProjectNode>, parent_path: Option<PathBuf>) -> Self {
        Self {
            projects,
            parent_path,
            saved_scroll_offset: 0,
            saved_selection_key: None,
        }
    }
}

/// Ordered stack of [`NavLevel`] frames; always holds at least the root.
#[derive(Debug)]
pub struct NavStack {
    levels: Vec<NavLevel>,
}

impl NavStack {
    pub fn new(root_projects: Vec<ProjectNode>) -> Self {
        Self {
            levels: vec![NavLevel::new(root_projects, None)],
        }
    }

    /// Append a new frame with a zeroed viewport. The caller saves the
    /// previous top's viewport via [`save_viewport`](Self::save_viewport)
    /// immediately before pushing, so `pop` can restore it exactly.
    pub fn push(&mut self, projects: Vec<ProjectNode>, parent_path: PathBuf) {
        self.levels.push(NavLevel::new(projects, Some(parent_path)));
    }

    /// Remove the top frame. No-op when only the root remains; returns
    /// whether a frame was actually removed.
    pub fn pop(&mut self) -> bool {
        if self.levels.len() > 1 {
            self.levels.pop();
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> &NavLevel {
        self.levels.last().expect("nav stack always has a root level")
    }

    /// Record the viewport on the top frame only.
    pub fn save_viewport(&mut self, scroll_offset: usize, selection_key: Option<String>) {
        let top: &mut NavLevel = self
            .levels
            .last_mut()
            .expect("nav stack always has a root level");
        top.saved_scroll_offset = scroll_offset;
        top.saved_selection_key = selection_key;
    }

    /// Drop every drilled level and install a new root project list; used
    /// when a scan update replaces the tree mid-session.
    pub fn replace_root(&mut self, projects: Vec<ProjectNode>) {
        self.levels.clear();
        self.levels.push(NavLevel::new(projects, None));
    }

    pub fn at_root(&self) -> bool {
        self.levels.len() == 1
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }
}
