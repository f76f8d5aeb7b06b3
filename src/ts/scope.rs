//! Scope nodes and the trivia lines that belong to them.
//!
//! A scope is a method-style `block` or the member list of a class, struct,
//! interface or enum. Lines are collected from the leading trivia of the
//! first token of each direct child, so a nested block's interior belongs to
//! the nested block only.
//!
//! A type body's span starts at its declaration, so comments between the
//! type header and the opening brace belong to the body.

use crate::ts::document::SourceDocument;
use crate::ts::trivia::{Line, Token};
use serde::Serialize;
use tree_sitter::Node;

/// The closed set of node kinds that bound marker search and removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// Any `block`: method, accessor, lambda and nested statement bodies.
    FunctionBody,
    ClassBody,
    StructBody,
    InterfaceBody,
    EnumBody,
}

impl ScopeKind {
    /// Scope kind of `node`, or `None` if it does not open a scope.
    pub fn of(node: Node<'_>) -> Option<Self> {
        match node.kind() {
            "block" => Some(ScopeKind::FunctionBody),
            "declaration_list" => match node.parent()?.kind() {
                "class_declaration" => Some(ScopeKind::ClassBody),
                "struct_declaration" => Some(ScopeKind::StructBody),
                "interface_declaration" => Some(ScopeKind::InterfaceBody),
                _ => None,
            },
            "enum_member_declaration_list" => Some(ScopeKind::EnumBody),
            _ => None,
        }
    }
}

/// A scope node paired with its kind.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'tree> {
    pub node: Node<'tree>,
    pub kind: ScopeKind,
}

impl<'tree> Scope<'tree> {
    pub fn new(node: Node<'tree>) -> Option<Self> {
        ScopeKind::of(node).map(|kind| Self { node, kind })
    }

    /// Byte offset where the scope starts.
    ///
    /// Blocks start at their `{`. Type bodies start at the owning
    /// declaration.
    pub fn start(&self) -> usize {
        match self.kind {
            ScopeKind::FunctionBody => self.node.start_byte(),
            _ => self
                .node
                .parent()
                .map_or(self.node.start_byte(), |decl| decl.start_byte()),
        }
    }

    /// Inclusive containment check on the scope span.
    pub fn contains(&self, offset: usize) -> bool {
        (self.start()..=self.node.end_byte()).contains(&offset)
    }
}

/// Every scope in the tree, in pre-order.
pub fn scope_nodes(root: Node<'_>) -> Vec<Scope<'_>> {
    let mut scopes = Vec::new();
    let mut cursor = root.walk();

    loop {
        if let Some(scope) = Scope::new(cursor.node()) {
            scopes.push(scope);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return scopes;
            }
        }
    }
}

/// Trivia lines local to `scope`, in source order.
///
/// Lines starting outside the scope span are dropped. For a block this keeps
/// the leading trivia of its opening brace, which precedes the node, out.
pub fn scope_lines<'d>(doc: &'d SourceDocument, scope: &Scope<'_>) -> Vec<Line<'d>> {
    let mut cursor = scope.node.walk();
    scope
        .node
        .children(&mut cursor)
        .filter_map(|child| doc.first_token_in(child))
        .filter(|token| token.has_leading_trivia())
        .flat_map(Token::leading_lines)
        .filter(|line| scope.contains(line.start()))
        .collect()
}

/// Innermost scope around `token` whose span contains `line_start`.
pub fn enclosing_scope<'d>(
    doc: &'d SourceDocument,
    token: &Token,
    line_start: usize,
) -> Option<Scope<'d>> {
    let mut node = doc.node_for_token(token);
    while let Some(current) = node {
        if let Some(scope) = Scope::new(current).filter(|s| s.contains(line_start)) {
            return Some(scope);
        }
        node = current.parent();
    }
    None
}
