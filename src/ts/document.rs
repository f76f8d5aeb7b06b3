use crate::pool::with_parser;
use crate::ts::errors::TreeSitterError;
use crate::ts::trivia::{Token, TokenIndex};
use std::path::Path;
use tree_sitter::{Node, Tree};

/// Immutable C# source text, its parse tree and its token/trivia index.
///
/// Edits never mutate a document; they produce new text which is parsed
/// into a fresh document with [`SourceDocument::reparse`].
pub struct SourceDocument {
    source: String,
    tree: Tree,
    index: TokenIndex,
}

impl SourceDocument {
    /// Parse `source` using the thread-local parser pool.
    pub fn parse(source: impl Into<String>) -> Result<Self, TreeSitterError> {
        let source = source.into();
        let tree = with_parser(|parser| parser.parse(&source))??;
        let index = TokenIndex::build(tree.root_node(), &source);
        tracing::trace!(
            bytes = source.len(),
            tokens = index.tokens.len(),
            "parsed document"
        );
        Ok(Self {
            source,
            tree,
            index,
        })
    }

    /// Read and parse a file.
    pub fn from_path(path: &Path) -> Result<Self, TreeSitterError> {
        let source = std::fs::read_to_string(path).map_err(|e| TreeSitterError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(source)
    }

    /// Parse replacement text produced by a rewrite of this document.
    pub fn reparse(&self, new_source: impl Into<String>) -> Result<Self, TreeSitterError> {
        Self::parse(new_source)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.index.tokens
    }

    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// First token inside `node`, if the node covers any token.
    pub fn first_token_in(&self, node: Node<'_>) -> Option<&Token> {
        let tokens = &self.index.tokens;
        let idx = tokens.partition_point(|t| t.start < node.start_byte());
        tokens.get(idx).filter(|t| t.start < node.end_byte())
    }

    /// Token whose leading trivia covers `offset`.
    pub fn token_owning_trivia_at(&self, offset: usize) -> Option<&Token> {
        let tokens = &self.index.tokens;
        let idx = tokens.partition_point(|t| t.start <= offset);
        tokens
            .get(idx)
            .filter(|t| t.leading.iter().any(|s| s.start <= offset && offset < s.end))
    }

    /// Smallest tree node spanning `token`.
    pub fn node_for_token(&self, token: &Token) -> Option<Node<'_>> {
        self.root_node()
            .descendant_for_byte_range(token.start, token.end)
    }

    /// 1-based line and character column of a byte offset.
    ///
    /// `\r\n`, `\n` and a lone `\r` each end one line.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let before = &self.source[..offset];
        let bytes = before.as_bytes();
        let mut line = 1;
        let mut line_start = 0;
        for (idx, &byte) in bytes.iter().enumerate() {
            let breaks = match byte {
                b'\n' => true,
                b'\r' => bytes.get(idx + 1) != Some(&b'\n'),
                _ => false,
            };
            if breaks {
                line += 1;
                line_start = idx + 1;
            }
        }
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_one_based_in_characters() {
        let doc = SourceDocument::parse("class A\n{\n   //é x\n}\n").unwrap();
        let offset = doc.source().find("//").unwrap();
        assert_eq!(doc.position(offset), (3, 4));
        assert_eq!(doc.position(0), (1, 1));
    }

    #[test]
    fn position_counts_every_terminator_style() {
        let cr = SourceDocument::parse("class C\r{\r    void M()\r    {\r        //x\r    }\r}\r").unwrap();
        let offset = cr.source().find("//x").unwrap();
        assert_eq!(cr.position(offset), (5, 9));

        let mixed = SourceDocument::parse("class C\r\n{\n\r  //x\r\n}\r\n").unwrap();
        let offset = mixed.source().find("//x").unwrap();
        assert_eq!(mixed.position(offset), (4, 3));
    }

    #[test]
    fn first_token_in_node() {
        let source = "class A { void M() { } }";
        let doc = SourceDocument::parse(source).unwrap();
        let root = doc.root_node();
        let token = doc.first_token_in(root).unwrap();
        assert_eq!(&source[token.start..token.end], "class");
    }

    #[test]
    fn token_owning_trivia_at_finds_comment_owner() {
        let source = "class A {\n  void M() {\n    // note\n    return;\n  }\n}\n";
        let doc = SourceDocument::parse(source).unwrap();
        let offset = source.find("// note").unwrap();

        let token = doc.token_owning_trivia_at(offset).unwrap();
        assert_eq!(&source[token.start..token.end], "return");
        assert!(doc.token_owning_trivia_at(source.find("void").unwrap()).is_none());
    }

    #[test]
    fn reparse_builds_fresh_index() {
        let doc = SourceDocument::parse("class A { }").unwrap();
        let next = doc.reparse("class A { int x; }").unwrap();
        assert!(next.tokens().len() > doc.tokens().len());
        assert!(!next.has_errors());
    }
}
