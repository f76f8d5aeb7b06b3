use crate::edit::Edit;
use crate::ts::{Line, SourceDocument};
use std::ops::Range;
use std::path::Path;

/// Byte ranges covered by `lines`, sorted, with overlaps and neighbours merged.
pub fn deletion_spans(lines: &[Line<'_>]) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = lines.iter().map(|l| l.start()..l.end()).collect();
    spans.sort_by_key(|span| span.start);

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Delete every byte of `lines` from the document text.
///
/// All other bytes are preserved. An empty range returns the source as is.
pub fn rewrite(doc: &SourceDocument, lines: &[Line<'_>]) -> String {
    let source = doc.source();
    let mut out = String::with_capacity(source.len());
    let mut pos = 0;
    for span in deletion_spans(lines) {
        out.push_str(&source[pos..span.start]);
        pos = span.end;
    }
    out.push_str(&source[pos..]);
    out
}

/// The same deletions as verified byte-span edits against `file`.
pub fn deletion_edits(doc: &SourceDocument, file: &Path, lines: &[Line<'_>]) -> Vec<Edit> {
    let source = doc.source();
    deletion_spans(lines)
        .into_iter()
        .map(|span| Edit::new(file, span.start, span.end, "", &source[span]))
        .collect()
}
