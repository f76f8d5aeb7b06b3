//! The edit-marker rule: finding types, severity and the scope reporter.

pub mod reporter;

use crate::ts::ScopeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use reporter::{scan, scan_scope, scan_with, scan_with_cancel};

/// Rule identifier attached to every finding.
pub const RULE_ID: &str = "EditMarker";

/// Default message format; `{0}` receives the marker keyword.
pub const DEFAULT_MESSAGE: &str = "Detect '{0}' comment.";

const MARKER_KEYWORD: &str = "START";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Info,
    Hidden,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Hidden => "hidden",
        };
        f.write_str(name)
    }
}

/// Severity and message used when reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSettings {
    pub severity: Severity,
    pub message_format: String,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            severity: Severity::Error,
            message_format: DEFAULT_MESSAGE.to_string(),
        }
    }
}

impl RuleSettings {
    pub fn message(&self) -> String {
        self.message_format.replace("{0}", MARKER_KEYWORD)
    }
}

/// Where a marker comment starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Byte offset of the comment's first character.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based character column.
    pub column: usize,
}

/// One reported marker comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub rule_id: String,
    pub message: String,
    pub severity: Severity,
    pub scope: ScopeKind,
    pub location: Location,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} {}: {}",
            self.location.line, self.location.column, self.severity, self.rule_id, self.message
        )
    }
}
