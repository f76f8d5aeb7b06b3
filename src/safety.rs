use std::path::{Path, PathBuf};
use thiserror::Error;

/// Build output directories that are never rewritten.
const BUILD_OUTPUT_DIRS: &[&str] = &["bin", "obj"];

/// Keeps fix writes inside one root directory and out of build output.
#[derive(Debug, Clone)]
pub struct WorkspaceGuard {
    /// Canonical root
    root: PathBuf,
    /// Canonical build output directories under the root
    forbidden_paths: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("path is outside workspace: {path} (workspace: {workspace})")]
    OutsideWorkspace { path: PathBuf, workspace: PathBuf },

    #[error("path is in forbidden directory: {path} (forbidden: {forbidden})")]
    ForbiddenPath { path: PathBuf, forbidden: PathBuf },

    #[error("failed to canonicalize path: {0}")]
    Canonicalize(#[from] std::io::Error),
}

impl WorkspaceGuard {
    /// Create a guard rooted at `root`, which must exist.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SafetyError> {
        let root = root.as_ref().canonicalize()?;
        let forbidden_paths = BUILD_OUTPUT_DIRS
            .iter()
            .filter_map(|dir| root.join(dir).canonicalize().ok())
            .collect();

        Ok(Self {
            root,
            forbidden_paths,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if a path is safe to edit.
    ///
    /// Relative paths resolve against the root. Returns the canonical path.
    pub fn validate_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, SafetyError> {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        let canonical = absolute.canonicalize()?;

        if !canonical.starts_with(&self.root) {
            return Err(SafetyError::OutsideWorkspace {
                path: canonical,
                workspace: self.root.clone(),
            });
        }

        if let Some(forbidden) = self
            .forbidden_paths
            .iter()
            .find(|forbidden| canonical.starts_with(forbidden))
        {
            return Err(SafetyError::ForbiddenPath {
                path: canonical,
                forbidden: forbidden.clone(),
            });
        }

        Ok(canonical)
    }
}
