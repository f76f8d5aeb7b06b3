use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

static START_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bstart\b").expect("start pattern is valid"));

// Shape filter only: 2015-13-45 is accepted on purpose.
static DATE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{2,4}/\d{1,2}/\d{2,4}|\d{2,4}-\d{1,2}-\d{2,4})\b")
        .expect("date pattern is valid")
});

/// Whole-word, case-insensitive `start`.
pub fn has_start_word(text: &str) -> bool {
    START_WORD.is_match(text)
}

/// A date-shaped token such as `2015-01-01` or `01/02/15`.
pub fn has_date(text: &str) -> bool {
    DATE_SHAPE.is_match(text)
}

/// True if `comment` is an edit marker: both the word and the date are required.
pub fn is_marker(comment: &str) -> bool {
    has_start_word(comment) && has_date(comment)
}

/// Pattern for the comment that closes the region a marker opens.
///
/// Derived from the start comment's own words with the first `start`
/// replaced by `end`. Words match literally and in order, separated by any
/// whitespace, ignoring case.
#[derive(Debug, Clone)]
pub struct EndPattern {
    regex: Regex,
}

impl EndPattern {
    /// Derive the end pattern from a full start comment, `//` included.
    pub fn derive(start_comment: &str) -> Result<Self, regex::Error> {
        let text = end_comment_text(start_comment);
        let pattern = text
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        let regex = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, comment: &str) -> bool {
        self.regex.is_match(comment)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Comment body without `//`, trimmed, with its first `start` turned into `end`.
pub fn end_comment_text(start_comment: &str) -> String {
    let body = start_comment.strip_prefix("//").unwrap_or(start_comment).trim();
    START_WORD.replacen(body, 1, "end").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn marker_requires_word_and_date() {
        assert!(is_marker("//2015-01-01 EDIT START"));
        assert!(is_marker("// start of change 01/02/2015"));
        assert!(!is_marker("// start the server"));
        assert!(!is_marker("// 2015-01-01 edited"));
        assert!(!is_marker("// 2015-01-01 restart"));
        assert!(!is_marker("// 2015-01-01 started"));
    }

    #[test]
    fn date_shape_is_permissive() {
        assert!(has_date("2015-13-45"));
        assert!(has_date("15/1/15"));
        assert!(has_date("9999/99/9999"));
        assert!(!has_date("2015.01.01"));
        assert!(!has_date("1-1-1"));
        assert!(!has_date("12345-1-1"));
    }

    #[test]
    fn end_text_replaces_first_start_only() {
        assert_eq!(
            end_comment_text("//2015-01-01 EDIT START"),
            "2015-01-01 EDIT end"
        );
        assert_eq!(
            end_comment_text("//  start 2015/01/01 start  "),
            "end 2015/01/01 start"
        );
    }

    #[test]
    fn end_pattern_matches_flexible_whitespace_and_case() {
        let end = EndPattern::derive("//2015-01-01 EDIT START").unwrap();
        assert!(end.is_match("//2015-01-01 EDIT END"));
        assert!(end.is_match("//   2015-01-01\tedit   end"));
        assert!(!end.is_match("//2015-01-02 EDIT END"));
        assert!(!end.is_match("//2015-01-01 EDIT START"));
    }

    #[test]
    fn end_pattern_escapes_punctuation() {
        let end = EndPattern::derive("// [2015/01/01] fix (start)").unwrap();
        assert!(end.is_match("// [2015/01/01] fix (end)"));
        assert!(!end.is_match("// x2015/01/01] fix (end)"));
    }

    proptest! {
        #[test]
        fn comments_without_start_word_never_match(body in "[a-z ]{0,40}", date in "[0-9]{4}-[0-9]{2}-[0-9]{2}") {
            let comment = format!("// {date} {body}");
            prop_assume!(!body.split(' ').any(|w| w == "start"));
            prop_assert!(!is_marker(&comment));
        }

        #[test]
        fn comments_without_digits_never_match(body in "[a-zA-Z /-]{0,40}") {
            let comment = format!("// start {body}");
            prop_assert!(!is_marker(&comment));
        }
    }
}
