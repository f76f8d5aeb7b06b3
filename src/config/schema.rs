use crate::fix::FixMode;
use crate::rules::{RuleSettings, Severity, DEFAULT_MESSAGE};
use serde::Deserialize;
use std::fmt;

/// Contents of `marker-sweep.toml`. Every section is optional.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    #[serde(default)]
    pub scan: ScanSection,
    #[serde(default)]
    pub rule: RuleSection,
    #[serde(default)]
    pub fix: FixSection,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScanSection {
    /// File extensions (without dot) that are scanned
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Directory names skipped during discovery
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude: default_exclude(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuleSection {
    #[serde(default)]
    pub severity: Severity,
    /// Message format; `{0}` is replaced by the marker keyword
    #[serde(default = "default_message")]
    pub message: String,
}

impl Default for RuleSection {
    fn default() -> Self {
        Self {
            severity: Severity::default(),
            message: default_message(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FixSection {
    #[serde(default)]
    pub mode: FixMode,
}

fn default_extensions() -> Vec<String> {
    vec!["cs".to_string()]
}

fn default_exclude() -> Vec<String> {
    ["bin", "obj", ".git", ".vs"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.scan.extensions.is_empty() {
            issues.push(ValidationIssue::EmptyList {
                field: "scan.extensions",
            });
        }
        for ext in &self.scan.extensions {
            if ext.trim().is_empty() || ext.starts_with('.') {
                issues.push(ValidationIssue::InvalidValue {
                    field: "scan.extensions",
                    message: format!("'{ext}' must be a bare extension such as 'cs'"),
                });
            }
        }
        if self.scan.exclude.iter().any(|dir| dir.trim().is_empty()) {
            issues.push(ValidationIssue::InvalidValue {
                field: "scan.exclude",
                message: "directory names cannot be blank".to_string(),
            });
        }
        if self.rule.message.trim().is_empty() {
            issues.push(ValidationIssue::InvalidValue {
                field: "rule.message",
                message: "message cannot be blank".to_string(),
            });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Reporting settings for the rule.
    pub fn rule_settings(&self) -> RuleSettings {
        RuleSettings {
            severity: self.rule.severity,
            message_format: self.rule.message.clone(),
        }
    }

    /// True if a file with this extension is scanned.
    pub fn scans_extension(&self, ext: &str) -> bool {
        self.scan
            .extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// True if a directory with this name is skipped.
    pub fn excludes_dir(&self, name: &str) -> bool {
        self.scan.exclude.iter().any(|d| d == name)
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    EmptyList {
        field: &'static str,
    },
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyList { field } => write!(f, "'{field}' cannot be empty"),
            ValidationIssue::InvalidValue { field, message } => {
                write!(f, "invalid '{field}': {message}")
            }
        }
    }
}
