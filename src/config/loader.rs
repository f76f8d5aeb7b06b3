use crate::config::schema::{SweepConfig, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up at the scan root.
pub const CONFIG_FILE_NAME: &str = "marker-sweep.toml";

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ConfigError::Toml { path: None, source } => ConfigError::Toml {
                path: Some(path),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config from {}: {}", path.display(), source)
            }
            ConfigError::Toml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse config TOML ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse config TOML: {}", source),
            },
            ConfigError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid config ({}): {}", path.display(), source),
                None => write!(f, "invalid config: {}", source),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<SweepConfig, ConfigError> {
    let config: SweepConfig = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(config)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<SweepConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}

/// Load `marker-sweep.toml` from `root`, or defaults when the file is absent.
pub fn load_or_default(root: impl AsRef<Path>) -> Result<SweepConfig, ConfigError> {
    let path = root.as_ref().join(CONFIG_FILE_NAME);
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(SweepConfig::default());
    }
    load_from_path(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fix::FixMode;
    use crate::rules::Severity;

    #[test]
    fn empty_input_gives_defaults() {
        let config = load_from_str("").unwrap();
        assert_eq!(config, SweepConfig::default());
        assert_eq!(config.scan.extensions, vec!["cs"]);
        assert_eq!(config.fix.mode, FixMode::Range);
        assert_eq!(config.rule.severity, Severity::Error);
    }

    #[test]
    fn full_config_parses() {
        let config = load_from_str(
            r#"
[scan]
extensions = ["cs", "csx"]
exclude = ["bin", "obj", "Generated"]

[rule]
severity = "warning"
message = "Leftover '{0}' marker."

[fix]
mode = "line"
"#,
        )
        .unwrap();

        assert!(config.scans_extension("CSX"));
        assert!(config.excludes_dir("Generated"));
        assert_eq!(config.fix.mode, FixMode::Line);
        let settings = config.rule_settings();
        assert_eq!(settings.severity, Severity::Warning);
        assert_eq!(settings.message(), "Leftover 'START' marker.");
    }

    #[test]
    fn validation_collects_every_issue() {
        let err = load_from_str(
            r#"
[scan]
extensions = [".cs", ""]

[rule]
message = "  "
"#,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation { path: None, source } => assert_eq!(source.issues.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = load_from_str("[fix]\nmodes = \"line\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn errors_from_files_carry_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[fix]\nmode = \"everything\"\n").unwrap();

        let err = load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_or_default(dir.path()).unwrap(), SweepConfig::default());
    }
}
