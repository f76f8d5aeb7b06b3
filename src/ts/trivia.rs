//! Token and trivia model reconstructed from a tree-sitter CST.
//!
//! Tree-sitter keeps comments as `extra` nodes and drops whitespace entirely.
//! This module rebuilds the compiler-style view instead: every token owns the
//! comment and whitespace text in front of it as ordered [`Segment`]s, and a
//! run of segments can be cut into terminator-delimited [`Line`]s.
//!
//! Trivia ownership follows the Roslyn convention. After a token, text up to
//! and including the first line terminator is that token's trailing trivia;
//! whatever follows is leading trivia of the next token.

use tree_sitter::Node;

/// Kind tag of one trivia segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Run of spaces, tabs or other non-newline whitespace.
    Whitespace,
    /// `\r\n`, `\n` or `\r`.
    LineTerminator,
    /// `// ...` up to, not including, the line terminator.
    SingleLineComment,
    /// Block comments, `///` documentation comments and uncovered text.
    Other,
}

/// One atomic piece of trivia with its byte span in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub kind: SegmentKind,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(kind: SegmentKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    /// Source text covered by this segment.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == SegmentKind::Whitespace
    }

    pub fn is_terminator(&self) -> bool {
        self.kind == SegmentKind::LineTerminator
    }
}

/// A leaf token together with the trivia around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub leading: Vec<Segment>,
    pub trailing: Vec<Segment>,
}

impl Token {
    pub fn has_leading_trivia(&self) -> bool {
        !self.leading.is_empty()
    }

    /// Lines of this token's leading trivia.
    pub fn leading_lines(&self) -> Lines<'_> {
        split_lines(&self.leading)
    }
}

/// A terminator-delimited run of trivia segments. Never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    segments: &'a [Segment],
}

impl<'a> Line<'a> {
    pub fn segments(&self) -> &'a [Segment] {
        self.segments
    }

    /// Start of the first segment.
    pub fn start(&self) -> usize {
        self.segments[0].start
    }

    /// End of the last segment, terminator included.
    pub fn end(&self) -> usize {
        self.segments[self.segments.len() - 1].end
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start()..self.end()]
    }
}

/// Iterator returned by [`split_lines`].
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a [Segment],
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let len = self
            .rest
            .iter()
            .position(Segment::is_terminator)
            .map_or(self.rest.len(), |idx| idx + 1);
        let (line, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(Line { segments: line })
    }
}

/// Split a trivia run into lines, each ending with its line terminator.
///
/// A trailing run without terminator becomes a final partial line.
pub fn split_lines(segments: &[Segment]) -> Lines<'_> {
    Lines { rest: segments }
}

/// All tokens of a document in source order, plus the trivia after the last one.
#[derive(Debug, Clone, Default)]
pub struct TokenIndex {
    pub tokens: Vec<Token>,
    pub end_of_file: Vec<Segment>,
}

enum Piece {
    Token { start: usize, end: usize },
    Comment { start: usize, end: usize },
}

impl TokenIndex {
    /// Build the index for `source` from the tree rooted at `root`.
    pub fn build(root: Node<'_>, source: &str) -> Self {
        let pieces = collect_pieces(root);

        let mut tokens: Vec<Token> = Vec::new();
        let mut gap: Vec<Segment> = Vec::new();
        let mut pos = 0;

        for piece in pieces {
            match piece {
                Piece::Comment { start, end } => {
                    if start < pos {
                        continue;
                    }
                    lex_plain(source, pos, start, &mut gap);
                    lex_comment(source, start, end, &mut gap);
                    pos = end;
                }
                Piece::Token { start, end } => {
                    if start < pos {
                        continue;
                    }
                    lex_plain(source, pos, start, &mut gap);
                    let leading = assign_trailing(&mut tokens, std::mem::take(&mut gap));
                    tokens.push(Token {
                        start,
                        end,
                        leading,
                        trailing: Vec::new(),
                    });
                    pos = end;
                }
            }
        }

        lex_plain(source, pos, source.len(), &mut gap);
        let end_of_file = assign_trailing(&mut tokens, gap);

        Self {
            tokens,
            end_of_file,
        }
    }
}

/// Move the trailing part of `gap` onto the last token; return the rest.
fn assign_trailing(tokens: &mut [Token], mut gap: Vec<Segment>) -> Vec<Segment> {
    let Some(previous) = tokens.last_mut() else {
        return gap;
    };
    let cut = gap
        .iter()
        .position(Segment::is_terminator)
        .map_or(gap.len(), |idx| idx + 1);
    let leading = gap.split_off(cut);
    previous.trailing = gap;
    leading
}

/// Leaves and comment nodes in document order. Zero-width leaves are skipped.
fn collect_pieces(root: Node<'_>) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut cursor = root.walk();

    loop {
        let node = cursor.node();
        let is_comment = node.kind() == "comment";

        if is_comment {
            pieces.push(Piece::Comment {
                start: node.start_byte(),
                end: node.end_byte(),
            });
        } else if node.child_count() == 0 && node.start_byte() < node.end_byte() {
            pieces.push(Piece::Token {
                start: node.start_byte(),
                end: node.end_byte(),
            });
        }

        if !is_comment && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return pieces;
            }
        }
    }
}

/// Lex whitespace, terminators and stray text in `source[start..end]`.
fn lex_plain(source: &str, start: usize, end: usize, out: &mut Vec<Segment>) {
    if start >= end {
        return;
    }
    let text = &source[start..end];
    let bytes = text.as_bytes();
    let mut run: Option<(SegmentKind, usize)> = None;
    let mut chars = text.char_indices().peekable();

    let flush = |run: &mut Option<(SegmentKind, usize)>, at: usize, out: &mut Vec<Segment>| {
        if let Some((kind, from)) = run.take() {
            out.push(Segment::new(kind, start + from, start + at));
        }
    };

    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\r' | '\n' => {
                flush(&mut run, idx, out);
                let mut len = 1;
                if ch == '\r' && bytes.get(idx + 1) == Some(&b'\n') {
                    chars.next();
                    len = 2;
                }
                out.push(Segment::new(
                    SegmentKind::LineTerminator,
                    start + idx,
                    start + idx + len,
                ));
            }
            _ => {
                let kind = if ch.is_whitespace() {
                    SegmentKind::Whitespace
                } else {
                    SegmentKind::Other
                };
                match run {
                    Some((current, _)) if current == kind => {}
                    _ => {
                        flush(&mut run, idx, out);
                        run = Some((kind, idx));
                    }
                }
            }
        }
    }
    flush(&mut run, text.len(), out);
}

/// Classify a comment node. Line comments are cut at their first terminator.
fn lex_comment(source: &str, start: usize, end: usize, out: &mut Vec<Segment>) {
    let text = &source[start..end];

    if !text.starts_with("//") {
        out.push(Segment::new(SegmentKind::Other, start, end));
        return;
    }

    let body_len = text.find(['\r', '\n']).unwrap_or(text.len());
    let body = &text[..body_len];
    let is_doc = body.starts_with("///") && !body.starts_with("////");
    let kind = if is_doc {
        SegmentKind::Other
    } else {
        SegmentKind::SingleLineComment
    };
    out.push(Segment::new(kind, start, start + body_len));
    lex_plain(source, start + body_len, end, out);
}
