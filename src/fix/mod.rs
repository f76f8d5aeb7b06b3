//! Marker removal: resolving which lines go, then deleting them.
//!
//! Two fixes hang off every finding. [`FixMode::Line`] removes the marker
//! line only. [`FixMode::Range`] removes every comment-only line from the
//! marker through the matching END comment, or to the end of the block.

pub mod resolver;
pub mod rewrite;

use crate::rules::scan;
use crate::ts::{Line, SourceDocument};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use resolver::{find_marker_line, resolve_remove_one, resolve_remove_range, MarkerLine};
pub use rewrite::{deletion_edits, deletion_spans, rewrite};

#[derive(Error, Debug)]
pub enum FixError {
    #[error("could not build end-marker pattern: {0}")]
    EndPattern(#[from] regex::Error),

    #[error("no marker comment starts at byte {offset}")]
    MarkerNotFound { offset: usize },
}

/// Which of the two removal fixes to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixMode {
    /// Remove the marker comment line.
    Line,
    /// Remove comment lines from the marker to its END comment or block end.
    #[default]
    Range,
}

/// Resolve the lines a fix removes for `marker`.
pub fn resolve<'a>(
    doc: &'a SourceDocument,
    marker: &MarkerLine<'a>,
    mode: FixMode,
) -> Result<Vec<Line<'a>>, FixError> {
    match mode {
        FixMode::Line => Ok(vec![resolve_remove_one(marker)]),
        FixMode::Range => resolve_remove_range(doc, marker),
    }
}

/// Resolve the fix for the finding anchored at `offset`.
pub fn resolve_at(
    doc: &SourceDocument,
    offset: usize,
    mode: FixMode,
) -> Result<Vec<Line<'_>>, FixError> {
    let marker = find_marker_line(doc, offset).ok_or(FixError::MarkerNotFound { offset })?;
    resolve(doc, &marker, mode)
}

/// Union of the fixes for every finding in `doc`, against one snapshot.
///
/// Lines are returned in source order without duplicates.
pub fn fix_all(doc: &SourceDocument, mode: FixMode) -> Result<Vec<Line<'_>>, FixError> {
    let mut lines = Vec::new();
    for finding in scan(doc) {
        lines.extend(resolve_at(doc, finding.location.offset, mode)?);
    }
    lines.sort_by_key(Line::start);
    lines.dedup();
    Ok(lines)
}
