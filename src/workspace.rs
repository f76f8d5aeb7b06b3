//! File-level scanning and fixing on top of the document API.

use crate::config::SweepConfig;
use crate::edit::{Edit, EditError, EditResult};
use crate::fix::{deletion_edits, fix_all, resolve_at, rewrite, FixError, FixMode};
use crate::rules::{scan_with, Finding};
use crate::safety::{SafetyError, WorkspaceGuard};
use crate::ts::{SourceDocument, TreeSitterError};
use serde::Serialize;
use similar::TextDiff;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error(transparent)]
    Parse(#[from] TreeSitterError),

    #[error(transparent)]
    Fix(#[from] FixError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Safety(#[from] SafetyError),

    #[error("failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("no marker comment starts at byte {offset} in {path}")]
    MarkerNotFound { path: PathBuf, offset: usize },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Findings for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub findings: Vec<Finding>,
}

/// Findings for every file that has any.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub files: Vec<FileReport>,
}

impl Report {
    pub fn total_findings(&self) -> usize {
        self.files.iter().map(|f| f.findings.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.files.is_empty()
    }

    pub fn to_json(&self) -> Result<String, WorkspaceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Scan one file.
pub fn scan_file(path: &Path, config: &SweepConfig) -> Result<FileReport, WorkspaceError> {
    let doc = SourceDocument::from_path(path)?;
    let findings = scan_with(&doc, &config.rule_settings());
    tracing::debug!(path = %path.display(), findings = findings.len(), "file scanned");
    Ok(FileReport {
        path: path.to_path_buf(),
        findings,
    })
}

/// Source files under `root` (or `root` itself if it is a file), sorted.
pub fn discover_files(root: &Path, config: &SweepConfig) -> Result<Vec<PathBuf>, WorkspaceError> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let excluded = entry.depth() > 0
                && entry.file_type().is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| config.excludes_dir(name));
            !excluded
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| WorkspaceError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        let scanned = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| config.scans_extension(ext));
        if entry.file_type().is_file() && scanned {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Scan every source file under `root`.
///
/// Files that cannot be read as UTF-8 are skipped with a warning.
pub fn scan_path(root: &Path, config: &SweepConfig) -> Result<Report, WorkspaceError> {
    let mut report = Report::default();
    for path in discover_files(root, config)? {
        match scan_file(&path, config) {
            Ok(file) if file.findings.is_empty() => {}
            Ok(file) => report.files.push(file),
            Err(WorkspaceError::Parse(TreeSitterError::Io { path, source })) => {
                tracing::warn!(path = %path.display(), error = %source, "skipping unreadable file");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}

/// Which findings of a file to fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixTarget {
    /// Every finding in the file
    All,
    /// The finding anchored at this byte offset
    At(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixOptions {
    pub mode: FixMode,
    pub target: FixTarget,
    /// Compute the outcome without writing
    pub dry_run: bool,
}

impl FixOptions {
    pub fn from_config(config: &SweepConfig) -> Self {
        Self {
            mode: config.fix.mode,
            target: FixTarget::All,
            dry_run: false,
        }
    }
}

/// What a fix did (or would do) to one file.
#[derive(Debug, Clone)]
pub struct FixOutcome {
    pub path: PathBuf,
    pub removed_lines: usize,
    pub before: String,
    pub after: String,
    pub written: bool,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }

    /// Unified diff between the original and the fixed text.
    pub fn diff(&self) -> String {
        let name = self.path.display().to_string();
        TextDiff::from_lines(&self.before, &self.after)
            .unified_diff()
            .context_radius(3)
            .header(&name, &format!("{name} (fixed)"))
            .to_string()
    }
}

/// Remove marker lines from one file inside the guarded root.
pub fn fix_file(
    guard: &WorkspaceGuard,
    path: &Path,
    options: FixOptions,
) -> Result<FixOutcome, WorkspaceError> {
    let path = guard.validate_path(path)?;
    let doc = SourceDocument::from_path(&path)?;

    let lines = match options.target {
        FixTarget::All => fix_all(&doc, options.mode)?,
        FixTarget::At(offset) => {
            resolve_at(&doc, offset, options.mode).map_err(|error| match error {
                FixError::MarkerNotFound { offset } => WorkspaceError::MarkerNotFound {
                    path: path.clone(),
                    offset,
                },
                other => WorkspaceError::Fix(other),
            })?
        }
    };
    let after = rewrite(&doc, &lines);

    let mut written = false;
    if !options.dry_run && !lines.is_empty() {
        let edits = deletion_edits(&doc, &path, &lines);
        written = matches!(Edit::apply_batch(&edits)?, EditResult::Applied { .. });
    }

    tracing::debug!(
        path = %path.display(),
        mode = ?options.mode,
        removed = lines.len(),
        written,
        "fix resolved"
    );

    Ok(FixOutcome {
        removed_lines: lines.len(),
        before: doc.source().to_string(),
        after,
        written,
        path,
    })
}

/// Fix every file with findings under the guard's root.
pub fn fix_path(
    guard: &WorkspaceGuard,
    config: &SweepConfig,
    options: FixOptions,
) -> Result<Vec<FixOutcome>, WorkspaceError> {
    let report = scan_path(guard.root(), config)?;
    let options = FixOptions {
        target: FixTarget::All,
        ..options
    };
    report
        .files
        .iter()
        .map(|file| fix_file(guard, &file.path, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MARKED: &str = "class C\n{\n    void M()\n    {\n        //2015-01-01 EDIT START\n        //old();\n        New();\n    }\n}\n";

    #[test]
    fn discovery_skips_excluded_dirs_and_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("obj")).unwrap();
        fs::write(dir.path().join("src/A.cs"), MARKED).unwrap();
        fs::write(dir.path().join("obj/B.cs"), MARKED).unwrap();
        fs::write(dir.path().join("src/notes.txt"), MARKED).unwrap();

        let files = discover_files(dir.path(), &SweepConfig::default()).unwrap();
        assert_eq!(files, vec![dir.path().join("src/A.cs")]);
    }

    #[test]
    fn report_serializes_to_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.cs"), MARKED).unwrap();

        let report = scan_path(dir.path(), &SweepConfig::default()).unwrap();
        assert_eq!(report.total_findings(), 1);

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        let finding = &json["files"][0]["findings"][0];
        assert_eq!(finding["rule_id"], "EditMarker");
        assert_eq!(finding["severity"], "error");
        assert_eq!(finding["scope"], "function_body");
        assert_eq!(finding["location"]["line"], 5);
        assert_eq!(finding["location"]["column"], 9);
    }

    #[test]
    fn dry_run_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("A.cs");
        fs::write(&file, MARKED).unwrap();

        let guard = WorkspaceGuard::new(dir.path()).unwrap();
        let options = FixOptions {
            mode: FixMode::Range,
            target: FixTarget::All,
            dry_run: true,
        };
        let outcome = fix_file(&guard, &file, options).unwrap();

        assert!(outcome.changed());
        assert!(!outcome.written);
        assert_eq!(outcome.removed_lines, 2);
        assert!(outcome.diff().contains("-        //2015-01-01 EDIT START"));
        assert_eq!(fs::read_to_string(&file).unwrap(), MARKED);
    }

    #[test]
    fn stale_anchor_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("A.cs");
        fs::write(&file, MARKED).unwrap();

        let guard = WorkspaceGuard::new(dir.path()).unwrap();
        let options = FixOptions {
            mode: FixMode::Line,
            target: FixTarget::At(0),
            dry_run: false,
        };
        let err = fix_file(&guard, &file, options).unwrap_err();
        assert!(matches!(err, WorkspaceError::MarkerNotFound { offset: 0, .. }));
    }
}
