//! Parsed source model: text, lines, tokens, comments, and syntax nodes.
//!
//! [`SourceCode`] is the read-only view every rule works against. Token
//! navigation is offset based: `token_before(offset)` is the last token that
//! ends at or before `offset`, `token_after(offset)` the first token that
//! starts at or after it. Comments live in a separate sequence and are only
//! returned by the `*_or_comment_*` accessors.

mod node;
mod parser;
mod token;

pub use node::{Node, NodeId, NodeKind};
pub use parser::ParseError;
pub use token::{Position, SourceLocation, Token, TokenKind};

use std::ops::Range;

/// A parsed source file.
#[derive(Debug)]
pub struct SourceCode {
    text: String,
    line_starts: Vec<usize>,
    tokens: Vec<Token>,
    comments: Vec<Token>,
    nodes: Vec<Node>,
}

impl SourceCode {
    /// Parses JavaScript or TypeScript source text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the grammar cannot be loaded or the text
    /// contains a syntax error.
    pub fn parse(text: impl Into<String>) -> Result<Self, ParseError> {
        parser::parse(text.into())
    }

    pub(crate) fn line_starts_of(text: &str) -> Vec<usize> {
        std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect()
    }

    /// Returns the full source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the text covered by a byte range.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> &str {
        self.text.get(range).unwrap_or("")
    }

    /// Returns the source text of a node.
    #[must_use]
    pub fn node_text(&self, node: &Node) -> &str {
        self.slice(node.range.clone())
    }

    /// Returns the number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the byte offset at which a line (1-indexed) begins.
    #[must_use]
    pub fn line_start(&self, line: usize) -> usize {
        line.checked_sub(1)
            .and_then(|i| self.line_starts.get(i))
            .copied()
            .unwrap_or(self.text.len())
    }

    /// Returns the text of a line (1-indexed) without its terminator.
    #[must_use]
    pub fn line(&self, line: usize) -> &str {
        let start = self.line_start(line);
        let end = self.line_start(line + 1);
        let text = self.slice(start..end);
        let text = text.strip_suffix('\n').unwrap_or(text);
        text.strip_suffix('\r').unwrap_or(text)
    }

    /// Converts a byte offset to a line/column position.
    #[must_use]
    pub fn position_at(&self, offset: usize) -> Position {
        position_in(&self.line_starts, offset)
    }

    /// Converts a line/column position back to a byte offset.
    #[must_use]
    pub fn offset_at(&self, pos: Position) -> usize {
        (self.line_start(pos.line) + pos.column).min(self.text.len())
    }

    /// Returns all non-comment tokens in source order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns all comments in source order.
    #[must_use]
    pub fn comments(&self) -> &[Token] {
        &self.comments
    }

    /// Last token ending at or before `offset`.
    #[must_use]
    pub fn token_before(&self, offset: usize) -> Option<&Token> {
        last_ending_by(&self.tokens, offset)
    }

    /// First token starting at or after `offset`.
    #[must_use]
    pub fn token_after(&self, offset: usize) -> Option<&Token> {
        first_starting_from(&self.tokens, offset)
    }

    /// Last token or comment ending at or before `offset`.
    #[must_use]
    pub fn token_or_comment_before(&self, offset: usize) -> Option<&Token> {
        match (
            last_ending_by(&self.tokens, offset),
            last_ending_by(&self.comments, offset),
        ) {
            (Some(t), Some(c)) => Some(if c.range.start > t.range.start { c } else { t }),
            (t, c) => t.or(c),
        }
    }

    /// First token or comment starting at or after `offset`.
    #[must_use]
    pub fn token_or_comment_after(&self, offset: usize) -> Option<&Token> {
        match (
            first_starting_from(&self.tokens, offset),
            first_starting_from(&self.comments, offset),
        ) {
            (Some(t), Some(c)) => Some(if c.range.start < t.range.start { c } else { t }),
            (t, c) => t.or(c),
        }
    }

    /// Comments between the previous token and `offset`.
    #[must_use]
    pub fn comments_before(&self, offset: usize) -> &[Token] {
        let from = self.token_before(offset).map_or(0, |t| t.range.end);
        let lo = self.comments.partition_point(|c| c.range.start < from);
        let hi = self.comments.partition_point(|c| c.range.end <= offset);
        self.comments.get(lo..hi.max(lo)).unwrap_or(&[])
    }

    /// Tokens lying entirely within a byte range.
    #[must_use]
    pub fn tokens_in(&self, range: Range<usize>) -> &[Token] {
        let lo = self.tokens.partition_point(|t| t.range.start < range.start);
        let hi = self.tokens.partition_point(|t| t.range.end <= range.end);
        self.tokens.get(lo..hi.max(lo)).unwrap_or(&[])
    }

    /// First token of a node.
    #[must_use]
    pub fn first_token(&self, node: &Node) -> Option<&Token> {
        self.tokens_in(node.range.clone()).first()
    }

    /// Last token of a node.
    #[must_use]
    pub fn last_token(&self, node: &Node) -> Option<&Token> {
        self.tokens_in(node.range.clone()).last()
    }

    /// Returns the root (`program`) node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Returns a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns all nodes in pre-order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, node: &Node) -> Option<&Node> {
        node.parent.map(|id| self.node(id))
    }

    /// Iterates the named children of a node.
    pub fn children<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        node.children.iter().map(move |&id| self.node(id))
    }

    /// Returns the child stored under a grammar field name.
    #[must_use]
    pub fn child_by_field(&self, node: &Node, field: &str) -> Option<&Node> {
        node.children()
            .iter()
            .map(|&id| self.node(id))
            .find(|c| c.field == Some(field))
    }

    /// Innermost node whose range contains `offset`.
    ///
    /// Falls back to the root when no child contains the offset.
    #[must_use]
    pub fn node_at_offset(&self, offset: usize) -> &Node {
        let mut current = self.root();
        loop {
            let children = &current.children;
            let idx = children.partition_point(|&c| self.node(c).range.start <= offset);
            let next = idx
                .checked_sub(1)
                .map(|i| self.node(children[i]))
                .filter(|n| offset < n.range.end);
            match next {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// Returns true if the innermost node at the token's start has the given kind.
    #[must_use]
    pub fn is_in_node_of_kind(&self, token: &Token, kind: NodeKind) -> bool {
        self.node_at_offset(token.range.start).kind == kind
    }
}

fn position_in(line_starts: &[usize], offset: usize) -> Position {
    let line = line_starts.partition_point(|&s| s <= offset).max(1);
    Position::new(line, offset - line_starts[line - 1])
}

fn last_ending_by(items: &[Token], offset: usize) -> Option<&Token> {
    let idx = items.partition_point(|t| t.range.end <= offset);
    idx.checked_sub(1).and_then(|i| items.get(i))
}

fn first_starting_from(items: &[Token], offset: usize) -> Option<&Token> {
    let idx = items.partition_point(|t| t.range.start < offset);
    items.get(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> SourceCode {
        SourceCode::parse(text).expect("valid source")
    }

    fn values(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.value.as_str()).collect()
    }

    #[test]
    fn test_splits_lines_and_strips_carriage_returns() {
        let source = parse("a;\r\nb;\n");
        assert_eq!(source.line_count(), 3);
        assert_eq!(source.line(1), "a;");
        assert_eq!(source.line(2), "b;");
        assert_eq!(source.line(3), "");
    }

    #[test]
    fn test_converts_offsets_and_positions() {
        let source = parse("foo(\n  bar)");
        assert_eq!(source.position_at(0), Position::new(1, 0));
        assert_eq!(source.position_at(7), Position::new(2, 2));
        assert_eq!(source.offset_at(Position::new(2, 2)), 7);
    }

    #[test]
    fn test_navigates_tokens_around_comments() {
        let source = parse("a /* c */ + b;");
        let plus = &source.tokens()[1];
        assert_eq!(plus.value, "+");
        assert_eq!(source.token_before(plus.range.start).map(|t| t.value.as_str()), Some("a"));
        assert_eq!(
            source
                .token_or_comment_before(plus.range.start)
                .map(|t| t.value.as_str()),
            Some("/* c */")
        );
        assert_eq!(values(source.comments_before(plus.range.start)), vec!["/* c */"]);
        assert_eq!(source.token_after(plus.range.end).map(|t| t.value.as_str()), Some("b"));
    }

    #[test]
    fn test_finds_innermost_node_at_offset() {
        let source = parse("async () => foo;");
        assert_eq!(source.node_at_offset(0).kind, NodeKind::ArrowFunction);
        assert_eq!(source.node_at_offset(12).kind, NodeKind::Identifier);
    }

    #[test]
    fn test_exposes_fields_of_call_expressions() {
        let source = parse("f(a);");
        let call = source
            .nodes()
            .iter()
            .find(|n| n.kind == NodeKind::CallExpression)
            .expect("call node");
        let callee = source.child_by_field(call, "function").expect("callee");
        assert_eq!(source.node_text(callee), "f");
        let args = source.child_by_field(call, "arguments").expect("arguments");
        assert_eq!(args.kind, NodeKind::Arguments);
        assert_eq!(source.first_token(args).map(|t| t.value.as_str()), Some("("));
        assert_eq!(source.last_token(args).map(|t| t.value.as_str()), Some(")"));
    }

    fn callee_of(source: &SourceCode) -> Option<&Node> {
        let call = source
            .nodes()
            .iter()
            .find(|n| n.kind == NodeKind::CallExpression)?
            .clone();
        source.child_by_field(&call, "function")
    }

    #[test]
    fn test_field_lookup_outlives_the_queried_node() {
        let source = parse("outer(inner);");
        let callee = callee_of(&source).expect("callee");
        assert_eq!(source.node_text(callee), "outer");
        assert!(source.child_by_field(source.root(), "function").is_none());
    }
}
