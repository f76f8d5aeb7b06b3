//! Edit-marker recognition on trivia lines.
//!
//! A marker is a comment-only `//` line holding the whole word `start` and a
//! date-shaped token, e.g. `//2015-01-01 EDIT START`.

pub mod classify;
pub mod pattern;

pub use classify::{classify, comment_segment, marker_comment, LineClass};
pub use pattern::{end_comment_text, has_date, has_start_word, is_marker, EndPattern};
