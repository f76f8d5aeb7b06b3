//! Tree-sitter integration for C# sources.
//!
//! Parses C# with the grammar bundled in ast-grep-language and rebuilds the
//! token/trivia view that marker scanning works on: tokens owning their
//! leading comment and whitespace text, split into lines, grouped by scope.

pub mod document;
pub mod errors;
pub mod parser;
pub mod scope;
pub mod trivia;

pub use document::SourceDocument;
pub use errors::TreeSitterError;
pub use parser::CSharpParser;
pub use scope::{enclosing_scope, scope_lines, scope_nodes, Scope, ScopeKind};
pub use trivia::{split_lines, Line, Segment, SegmentKind, Token};
