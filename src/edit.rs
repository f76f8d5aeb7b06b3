use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// Byte-span replacement with verification of the text being replaced.
///
/// Marker removal compiles down to edits with an empty `new_text`; the
/// expected text guards against writing into a file that changed since it
/// was scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Edit does nothing until applied"]
pub struct Edit {
    /// File the edit targets
    pub file: PathBuf,
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
    /// Replacement for [byte_start, byte_end)
    pub new_text: String,
    /// What must currently be at the span
    pub expected_before: EditVerification,
}

/// Verification strategy for edit safety.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditVerification {
    /// Exact text match required
    ExactMatch(String),
    /// xxh3 hash of expected text (used for spans over 1KB)
    Hash(u64),
}

impl EditVerification {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            EditVerification::ExactMatch(expected) => text == expected,
            EditVerification::Hash(expected_hash) => xxh3_64(text.as_bytes()) == *expected_hash,
        }
    }

    /// Create verification from text, using a hash for text over 1KB.
    pub fn from_text(text: &str) -> Self {
        if text.len() > 1024 {
            EditVerification::Hash(xxh3_64(text.as_bytes()))
        } else {
            EditVerification::ExactMatch(text.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("before-text verification failed at {file}:{byte_start}")]
    BeforeTextMismatch {
        file: PathBuf,
        byte_start: usize,
        byte_end: usize,
        found: String,
    },

    #[error("invalid byte range: [{byte_start}, {byte_end}) in file of length {file_len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        file_len: usize,
    },

    #[error("overlapping edits at byte {byte_start} in {file}")]
    Overlap { file: PathBuf, byte_start: usize },

    #[error("edits target more than one file: {first} and {other}")]
    MixedFiles { first: PathBuf, other: PathBuf },

    #[error("no edits to apply")]
    Empty,

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 validation error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("edit would split a UTF-8 character")]
    InvalidUtf8Edit,
}

/// Result of applying edits to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "EditResult should be checked for success/already-applied"]
pub enum EditResult {
    /// Edits were written; `bytes_removed` counts bytes dropped from the file
    Applied { file: PathBuf, bytes_removed: usize },
    /// Every span already held its replacement text
    AlreadyApplied { file: PathBuf },
}

impl Edit {
    /// Create a new edit with automatic verification generation.
    pub fn new(
        file: impl Into<PathBuf>,
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        expected_before: impl Into<String>,
    ) -> Self {
        let expected = expected_before.into();
        Self {
            file: file.into(),
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: EditVerification::from_text(&expected),
        }
    }

    /// Check the edit against `content`.
    ///
    /// Returns `true` when the span already holds `new_text`.
    fn validate(&self, content: &str) -> Result<bool, EditError> {
        if self.byte_start > self.byte_end || self.byte_end > content.len() {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                file_len: content.len(),
            });
        }
        let current = content
            .get(self.byte_start..self.byte_end)
            .ok_or(EditError::InvalidUtf8Edit)?;

        if current == self.new_text {
            return Ok(true);
        }
        if !self.expected_before.matches(current) {
            return Err(EditError::BeforeTextMismatch {
                file: self.file.clone(),
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                found: current.to_string(),
            });
        }
        Ok(false)
    }

    /// Apply non-overlapping edits to in-memory content.
    ///
    /// Edits are verified first and then spliced bottom-to-top, so offsets
    /// always refer to the original content.
    pub fn apply_to_str(content: &str, edits: &[Edit]) -> Result<String, EditError> {
        let mut ordered: Vec<&Edit> = edits.iter().collect();
        ordered.sort_by(|a, b| b.byte_start.cmp(&a.byte_start));

        for pair in ordered.windows(2) {
            let (later, earlier) = (pair[0], pair[1]);
            if earlier.byte_end > later.byte_start {
                return Err(EditError::Overlap {
                    file: later.file.clone(),
                    byte_start: later.byte_start,
                });
            }
        }

        let mut out = content.to_string();
        for edit in ordered {
            if edit.validate(content)? {
                continue;
            }
            out.replace_range(edit.byte_start..edit.byte_end, &edit.new_text);
        }
        Ok(out)
    }

    /// Apply edits that all target one file in a single atomic write.
    pub fn apply_batch(edits: &[Edit]) -> Result<EditResult, EditError> {
        let Some(first) = edits.first() else {
            return Err(EditError::Empty);
        };
        let file = &first.file;
        if let Some(other) = edits.iter().find(|e| &e.file != file) {
            return Err(EditError::MixedFiles {
                first: file.clone(),
                other: other.file.clone(),
            });
        }

        let original = fs::read(file)?;
        let original = std::str::from_utf8(&original)?;
        let updated = Edit::apply_to_str(original, edits)?;

        if updated == original {
            return Ok(EditResult::AlreadyApplied { file: file.clone() });
        }

        atomic_write(file, updated.as_bytes())?;

        // Touch mtime so build tools notice the change
        filetime::set_file_mtime(file, filetime::FileTime::now())?;

        tracing::debug!(
            file = %file.display(),
            edits = edits.len(),
            "edits written"
        );

        Ok(EditResult::Applied {
            file: file.clone(),
            bytes_removed: original.len().saturating_sub(updated.len()),
        })
    }
}

/// Atomic file write: tempfile + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), EditError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => {
            return Err(EditError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path has no parent directory",
            )))
        }
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
