use crate::marker::pattern::is_marker;
use crate::ts::trivia::{Line, Segment, SegmentKind};

/// How a trivia line relates to comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Optional indentation, one `//` comment, then only the terminator.
    CommentOnly,
    Mixed,
}

/// The `//` comment of a comment-only line.
pub fn comment_segment<'a>(line: &Line<'a>) -> Option<&'a Segment> {
    let mut rest = line.segments().iter().skip_while(|s| s.is_whitespace());
    let comment = rest.next()?;
    if comment.kind != SegmentKind::SingleLineComment {
        return None;
    }
    rest.all(Segment::is_terminator).then_some(comment)
}

pub fn classify(line: &Line<'_>) -> LineClass {
    match comment_segment(line) {
        Some(_) => LineClass::CommentOnly,
        None => LineClass::Mixed,
    }
}

/// The marker comment of `line`, if the line is a comment-only edit marker.
pub fn marker_comment<'a>(line: &Line<'a>, source: &str) -> Option<&'a Segment> {
    comment_segment(line).filter(|comment| is_marker(comment.text(source)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts::trivia::split_lines;

    fn line(segments: &[Segment]) -> Line<'_> {
        split_lines(segments).next().unwrap()
    }

    #[test]
    fn indented_comment_line_is_comment_only() {
        use SegmentKind::*;
        let segments = [
            Segment::new(Whitespace, 0, 4),
            Segment::new(SingleLineComment, 4, 10),
            Segment::new(LineTerminator, 10, 11),
        ];
        assert_eq!(classify(&line(&segments)), LineClass::CommentOnly);
        assert_eq!(comment_segment(&line(&segments)), Some(&segments[1]));
    }

    #[test]
    fn unterminated_comment_line_is_comment_only() {
        let segments = [Segment::new(SegmentKind::SingleLineComment, 0, 6)];
        assert_eq!(classify(&line(&segments)), LineClass::CommentOnly);
    }

    #[test]
    fn block_comment_first_is_mixed() {
        use SegmentKind::*;
        let segments = [
            Segment::new(Other, 0, 7),
            Segment::new(Whitespace, 7, 8),
            Segment::new(SingleLineComment, 8, 14),
            Segment::new(LineTerminator, 14, 15),
        ];
        assert_eq!(classify(&line(&segments)), LineClass::Mixed);
    }

    #[test]
    fn blank_and_indent_lines_are_mixed() {
        use SegmentKind::*;
        let blank = [Segment::new(LineTerminator, 0, 1)];
        let indent = [Segment::new(Whitespace, 0, 4)];
        assert_eq!(classify(&line(&blank)), LineClass::Mixed);
        assert_eq!(classify(&line(&indent)), LineClass::Mixed);
    }

    #[test]
    fn marker_comment_checks_text() {
        use SegmentKind::*;
        let source = "  //2015-01-01 EDIT START\n  //var a = 100;\n";
        let marker = [
            Segment::new(Whitespace, 0, 2),
            Segment::new(SingleLineComment, 2, 25),
            Segment::new(LineTerminator, 25, 26),
        ];
        let plain = [
            Segment::new(Whitespace, 26, 28),
            Segment::new(SingleLineComment, 28, 42),
            Segment::new(LineTerminator, 42, 43),
        ];
        assert!(marker_comment(&line(&marker), source).is_some());
        assert!(marker_comment(&line(&plain), source).is_none());
    }
}
