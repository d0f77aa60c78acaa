//! Tree-sitter front end that builds a [`SourceCode`].

use super::node::{Node, NodeId, NodeKind};
use super::token::{classify_word, SourceLocation, Token, TokenKind};
use super::{position_in, SourceCode};
use thiserror::Error;
use tree_sitter::{Language, Parser, TreeCursor};

/// Errors produced while parsing source text.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The grammar could not be loaded.
    #[error("Failed to load grammar: {0}")]
    Language(String),

    /// Tree-sitter returned no tree.
    #[error("Parser produced no syntax tree")]
    NoTree,

    /// The text contains a syntax error.
    #[error("Syntax error at {line}:{column}")]
    Syntax {
        /// Line of the first error (1-indexed).
        line: usize,
        /// Column of the first error (1-indexed).
        column: usize,
    },
}

/// Leaves that are lexed as a single token even though the grammar gives them children.
const ATOMIC_KINDS: &[&str] = &["string", "regex", "number", "comment", "html_comment"];

/// Nodes collected as comments. A leading `#!` line is one.
const COMMENT_KINDS: &[&str] = &["comment", "html_comment", "hash_bang_line"];

pub(super) fn parse(text: String) -> Result<SourceCode, ParseError> {
    let language: Language = tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ParseError::Language(e.to_string()))?;

    let tree = parser.parse(&text, None).ok_or(ParseError::NoTree)?;
    let root = tree.root_node();
    if root.has_error() {
        let (line, column) = first_error(&mut root.walk()).unwrap_or((1, 1));
        return Err(ParseError::Syntax { line, column });
    }

    let line_starts = SourceCode::line_starts_of(&text);
    let mut builder = Builder {
        text: &text,
        line_starts: &line_starts,
        tokens: Vec::new(),
        comments: Vec::new(),
        nodes: Vec::new(),
    };
    builder.build(&mut root.walk());

    let Builder {
        tokens,
        comments,
        nodes,
        ..
    } = builder;

    Ok(SourceCode {
        text,
        line_starts,
        tokens,
        comments,
        nodes,
    })
}

fn first_error(cursor: &mut TreeCursor<'_>) -> Option<(usize, usize)> {
    let node = cursor.node();
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        return Some((pos.row + 1, pos.column + 1));
    }
    if !node.has_error() || !cursor.goto_first_child() {
        return None;
    }
    let found = loop {
        if let Some(pos) = first_error(cursor) {
            break Some(pos);
        }
        if !cursor.goto_next_sibling() {
            break None;
        }
    };
    cursor.goto_parent();
    found
}

struct Builder<'t> {
    text: &'t str,
    line_starts: &'t [usize],
    tokens: Vec<Token>,
    comments: Vec<Token>,
    nodes: Vec<Node>,
}

impl Builder<'_> {
    fn build(&mut self, cursor: &mut TreeCursor<'_>) {
        let root = cursor.node();
        let id = self.push_node(root.kind(), 0..self.text.len(), None, None);
        self.visit_children(cursor, id);
    }

    fn visit_children(&mut self, cursor: &mut TreeCursor<'_>, parent: NodeId) {
        if !cursor.goto_first_child() {
            return;
        }
        loop {
            self.visit(cursor, parent);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }

    fn visit(&mut self, cursor: &mut TreeCursor<'_>, parent: NodeId) {
        let node = cursor.node();
        let range = node.start_byte()..node.end_byte();
        if node.is_missing() || range.is_empty() {
            return;
        }

        let kind = node.kind();
        if COMMENT_KINDS.contains(&kind) {
            let comment_kind = if self.text[range.clone()].starts_with("/*") {
                TokenKind::BlockComment
            } else {
                TokenKind::LineComment
            };
            let token = self.token(comment_kind, range);
            self.comments.push(token);
            return;
        }

        let owner = if node.is_named() {
            self.push_node(kind, range.clone(), Some(parent), cursor.field_name())
        } else {
            parent
        };

        if kind == "template_string" || kind == "template_literal_type" {
            self.template(cursor, owner);
        } else if ATOMIC_KINDS.contains(&kind) || node.child_count() == 0 {
            let token_kind = match kind {
                "string" => TokenKind::String,
                "number" => TokenKind::Numeric,
                "regex" => TokenKind::RegularExpression,
                _ => classify_word(&self.text[range.clone()]),
            };
            let token = self.token(token_kind, range);
            self.tokens.push(token);
        } else {
            self.visit_children(cursor, owner);
        }
    }

    /// Splits a template literal into `Template` tokens around its substitutions.
    fn template(&mut self, cursor: &mut TreeCursor<'_>, owner: NodeId) {
        let literal = cursor.node();
        let mut chunk_start = literal.start_byte();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                match child.kind() {
                    "template_substitution" | "template_type" => {
                        let range = child.start_byte()..child.end_byte();
                        let sub = self.push_node(child.kind(), range, Some(owner), None);
                        chunk_start = self.substitution(cursor, sub, chunk_start);
                    }
                    _ => {}
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
            cursor.goto_parent();
        }
        let token = self.token(TokenKind::Template, chunk_start..literal.end_byte());
        self.tokens.push(token);
    }

    /// Emits the chunk ending in `${` and the substitution's own tokens.
    ///
    /// Returns the offset of the closing `}`, where the next chunk starts.
    fn substitution(
        &mut self,
        cursor: &mut TreeCursor<'_>,
        sub: NodeId,
        chunk_start: usize,
    ) -> usize {
        let mut next_chunk = cursor.node().end_byte();
        if !cursor.goto_first_child() {
            return next_chunk;
        }
        loop {
            let child = cursor.node();
            match child.kind() {
                "${" if !child.is_named() => {
                    let token = self.token(TokenKind::Template, chunk_start..child.end_byte());
                    self.tokens.push(token);
                }
                "}" if !child.is_named() => next_chunk = child.start_byte(),
                _ => self.visit(cursor, sub),
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
        next_chunk
    }

    fn push_node(
        &mut self,
        kind: &'static str,
        range: std::ops::Range<usize>,
        parent: Option<NodeId>,
        field: Option<&'static str>,
    ) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        let loc = self.loc(&range);
        self.nodes.push(Node {
            id,
            kind: NodeKind::from_grammar_name(kind),
            range,
            loc,
            field,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    fn token(&self, kind: TokenKind, range: std::ops::Range<usize>) -> Token {
        Token {
            kind,
            value: self.text[range.clone()].to_string(),
            loc: self.loc(&range),
            range,
        }
    }

    fn loc(&self, range: &std::ops::Range<usize>) -> SourceLocation {
        SourceLocation::new(
            position_in(self.line_starts, range.start),
            position_in(self.line_starts, range.end),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_values(source: &SourceCode) -> Vec<(TokenKind, &str)> {
        source
            .tokens()
            .iter()
            .map(|t| (t.kind, t.value.as_str()))
            .collect()
    }

    #[test]
    fn test_splits_template_literals_around_substitutions() {
        let source = SourceCode::parse("`a${b}c${d}e`").expect("valid source");
        assert_eq!(
            kinds_and_values(&source),
            vec![
                (TokenKind::Template, "`a${"),
                (TokenKind::Identifier, "b"),
                (TokenKind::Template, "}c${"),
                (TokenKind::Identifier, "d"),
                (TokenKind::Template, "}e`"),
            ]
        );
    }

    #[test]
    fn test_keeps_literals_atomic() {
        let source = SourceCode::parse("x = 'a b' + /[(]/g;").expect("valid source");
        assert_eq!(
            kinds_and_values(&source),
            vec![
                (TokenKind::Identifier, "x"),
                (TokenKind::Punctuator, "="),
                (TokenKind::String, "'a b'"),
                (TokenKind::Punctuator, "+"),
                (TokenKind::RegularExpression, "/[(]/g"),
                (TokenKind::Punctuator, ";"),
            ]
        );
    }

    #[test]
    fn test_collects_comments_separately() {
        let source = SourceCode::parse("// one\nfoo(/* two */);").expect("valid source");
        let comments: Vec<_> = source.comments().iter().map(|c| c.kind).collect();
        assert_eq!(comments, vec![TokenKind::LineComment, TokenKind::BlockComment]);
        assert!(source.tokens().iter().all(|t| !t.is_comment()));
    }

    #[test]
    fn test_shebang_is_a_line_comment() {
        let source = SourceCode::parse("#!/usr/bin/env node\nfoo();").expect("valid source");
        let shebang = &source.comments()[0];
        assert_eq!(shebang.kind, TokenKind::LineComment);
        assert_eq!(shebang.value, "#!/usr/bin/env node");
        assert_eq!(source.tokens()[0].value, "foo");
        assert!(source
            .tokens()
            .iter()
            .all(|t| t.kind != TokenKind::PrivateIdentifier));
    }

    #[test]
    fn test_classifies_keywords_and_contextual_words() {
        let source = SourceCode::parse("async function f() { return x as any; }")
            .expect("valid source");
        let kind_of = |value: &str| {
            source
                .tokens()
                .iter()
                .find(|t| t.value == value)
                .map(|t| t.kind)
        };
        assert_eq!(kind_of("async"), Some(TokenKind::Identifier));
        assert_eq!(kind_of("function"), Some(TokenKind::Keyword));
        assert_eq!(kind_of("return"), Some(TokenKind::Keyword));
        assert_eq!(kind_of("as"), Some(TokenKind::Identifier));
    }

    #[test]
    fn test_reports_syntax_errors() {
        let err = SourceCode::parse("foo(;").expect_err("invalid source");
        assert!(matches!(err, ParseError::Syntax { line: 1, .. }));
    }
}
