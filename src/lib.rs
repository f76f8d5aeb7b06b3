//! marker-sweep: find and remove dated edit-marker comments in C# code.
//!
//! Hand edits are often bracketed by comments such as
//! `//2015-01-01 EDIT START` ... `//2015-01-01 EDIT END` that outlive the
//! change they describe. This crate reports those markers and removes them.
//!
//! # Architecture
//!
//! - [`ts`] parses C# with tree-sitter and rebuilds compiler-style trivia:
//!   each token owns the comment and whitespace lines in front of it, and
//!   lines are grouped by the innermost block or type body.
//! - [`marker`] decides whether a comment-only line is a marker: the whole
//!   word `start` plus a date-shaped token.
//! - [`rules`] walks every scope and emits one [`Finding`] per marker.
//! - [`fix`] resolves the lines a fix removes (the marker line, or the
//!   marker through its END comment or the end of the block) and rewrites
//!   the text. File writes go through the verified [`Edit`] primitive.
//!
//! # Example
//!
//! ```no_run
//! use marker_sweep::{fix, rules, SourceDocument};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = SourceDocument::parse(
//!     "class A {\n  void M() {\n    //2015-01-01 EDIT START\n    Run();\n  }\n}\n",
//! )?;
//! for finding in rules::scan(&doc) {
//!     let lines = fix::resolve_at(&doc, finding.location.offset, fix::FixMode::Range)?;
//!     println!("{}", fix::rewrite(&doc, &lines));
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod edit;
pub mod fix;
pub mod marker;
pub mod pool;
pub mod rules;
pub mod safety;
pub mod ts;
pub mod workspace;

// Re-exports
pub use config::{load_from_path, load_from_str, ConfigError, SweepConfig};
pub use edit::{Edit, EditError, EditResult, EditVerification};
pub use fix::{
    find_marker_line, fix_all, resolve_remove_one, resolve_remove_range, rewrite, FixError,
    FixMode, MarkerLine,
};
pub use marker::LineClass;
pub use rules::{scan, Finding, Location, RuleSettings, Severity, RULE_ID};
pub use safety::{SafetyError, WorkspaceGuard};
pub use ts::{Line, ScopeKind, Segment, SegmentKind, SourceDocument, TreeSitterError};
pub use workspace::{
    fix_file, fix_path, scan_file, scan_path, FileReport, FixOptions, FixOutcome, FixTarget,
    Report, WorkspaceError,
};
