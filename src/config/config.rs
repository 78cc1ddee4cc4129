//! src/config/config.rs
//! ============================================================================
//! # Settings: User Configuration Loader and Saver
//!
//! The external collaborator surface for user-editable settings: the projects
//! root directory, the maximum scan depth, the comma-separated skip-directory
//! patterns, and the favorites-section toggle. Loaded and saved as TOML from
//! the cross-platform config path via the
//! [`directories`](https://docs.rs/directories) crate.
//!
//! A change to `projects_dir`, `max_depth`, or `skip_dirs` changes the
//! [`ScanParams`](crate::fs::repo_scanner::ScanParams) derived here, which
//! invalidates the scan cache and should be followed by a coordinator
//! `refresh()`.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::AppError;
use crate::fs::repo_scanner::ScanParams;

/// Main configuration struct for the navigation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root directory scanned for repositories.
    pub projects_dir: PathBuf,

    /// Maximum directory depth below `projects_dir` at which a repository
    /// may live. Always at least 1.
    pub max_depth: u32,

    /// Comma-separated directory name patterns excluded from the scan
    /// (exact names or globs, e.g. `node_modules,target,.cache*`).
    pub skip_dirs: String,

    /// Whether the favorites/shortcuts section is shown in the list.
    pub favorites_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            projects_dir: PathBuf::from("."),
            max_depth: 3,
            skip_dirs: String::from("node_modules"),
            favorites_enabled: true,
        }
    }
}

impl Settings {
    /// Loads settings from the TOML file at the XDG-compliant app config dir,
    /// or returns defaults if no file exists yet.
    pub async fn load() -> Result<Self, AppError> {
        let path: PathBuf = Self::config_path()?;
        if path.exists() {
            let text: String = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source: std::io::Error| AppError::ConfigIo {
                    path: path.clone(),
                    source,
                })?;
            let settings: Settings = toml::from_str(&text)?;
            Ok(settings.sanitized())
        } else {
            Ok(Settings::default())
        }
    }

    /// Saves settings to the TOML file at the XDG-compliant app config dir.
    pub async fn save(&self) -> Result<(), AppError> {
        let path: PathBuf = Self::config_path()?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let toml_str: String = toml::to_string_pretty(self)
            .map_err(|e: toml::ser::Error| AppError::Other(e.to_string()))?;
        tokio::fs::write(&path, toml_str).await?;
        Ok(())
    }

    /// Derive the scan parameters that key both the scanner and the cache.
    pub fn scan_params(&self) -> ScanParams {
        ScanParams::new(self.projects_dir.clone(), self.max_depth, &self.skip_dirs)
    }

    /// Clamp out-of-range fields instead of failing the load.
    fn sanitized(mut self) -> Self {
        if self.max_depth < 1 {
            self.max_depth = 1;
        }
        self
    }

    /// Returns the canonical settings file path using `directories::ProjectDirs`.
    pub fn config_path() -> Result<PathBuf, AppError> {
        let proj_dirs: ProjectDirs = ProjectDirs::from("org", "projnav", "projnav")
            .ok_or_else(|| AppError::Other("Could not determine config directory.".into()))?;
        Ok(proj_dirs.config_dir().join("settings.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_params_splits_skip_dirs() {
        let settings = Settings {
            projects_dir: PathBuf::from("/projects"),
            max_depth: 2,
            skip_dirs: "node_modules, target,".to_string(),
            favorites_enabled: true,
        };
        let params: ScanParams = settings.scan_params();
        assert_eq!(params.root_dir, PathBuf::from("/projects"));
        assert_eq!(params.max_depth, 2);
        assert_eq!(params.skip_patterns, vec!["node_modules", "target"]);
    }

    #[test]
    fn sanitize_clamps_zero_depth() {
        let settings = Settings {
            max_depth: 0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.max_depth, 1);
    }
}
