use crate::fix::FixError;
use crate::marker::{comment_segment, EndPattern};
use crate::ts::trivia::{Line, Segment, Token};
use crate::ts::{enclosing_scope, scope_lines, SourceDocument};

/// A comment-only line located from a finding anchor.
#[derive(Debug, Clone, Copy)]
pub struct MarkerLine<'a> {
    pub line: Line<'a>,
    pub comment: &'a Segment,
    pub token: &'a Token,
}

/// Locate the comment-only line whose `//` comment starts at `offset`.
///
/// Returns `None` when the offset does not name such a comment, for example
/// when the anchor comes from an older version of the document.
pub fn find_marker_line(doc: &SourceDocument, offset: usize) -> Option<MarkerLine<'_>> {
    let token = doc.token_owning_trivia_at(offset)?;
    token.leading_lines().find_map(|line| {
        comment_segment(&line)
            .filter(|comment| comment.start == offset)
            .map(|comment| MarkerLine {
                line,
                comment,
                token,
            })
    })
}

/// Remove-one: exactly the matched line.
pub fn resolve_remove_one<'a>(marker: &MarkerLine<'a>) -> Line<'a> {
    marker.line
}

/// Remove-range: comment-only lines from the marker through its END line.
///
/// Lines are taken from the innermost scope holding the marker. Mixed lines
/// in between are kept. Without a matching END comment the range runs to the
/// last trivia line of the scope.
pub fn resolve_remove_range<'a>(
    doc: &'a SourceDocument,
    marker: &MarkerLine<'a>,
) -> Result<Vec<Line<'a>>, FixError> {
    let source = doc.source();
    let end = EndPattern::derive(marker.comment.text(source))?;

    let Some(scope) = enclosing_scope(doc, marker.token, marker.line.start()) else {
        tracing::debug!(offset = marker.comment.start, "marker outside any scope");
        return Ok(Vec::new());
    };

    let candidates: Vec<(Line<'a>, &'a Segment)> = scope_lines(doc, &scope)
        .into_iter()
        .skip_while(|line| *line != marker.line)
        .filter_map(|line| comment_segment(&line).map(|comment| (line, comment)))
        .collect();

    let Some((_seed, rest)) = candidates.split_first() else {
        return Ok(Vec::new());
    };
    // The seed itself is never tested against the end pattern.
    let end_at = rest
        .iter()
        .position(|(_, comment)| end.is_match(comment.text(source)));
    let keep = end_at.map_or(candidates.len(), |idx| idx + 2);

    tracing::debug!(
        offset = marker.comment.start,
        end_pattern = end.as_str(),
        found_end = end_at.is_some(),
        lines = keep,
        scope = ?scope.kind,
        "resolved removal range"
    );

    Ok(candidates
        .into_iter()
        .take(keep)
        .map(|(line, _)| line)
        .collect())
}
