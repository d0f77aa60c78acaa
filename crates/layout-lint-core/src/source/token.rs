//! Tokens and source positions.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column as a byte offset within the line (0-indexed).
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A start/end pair of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Start of the span (inclusive).
    pub start: Position,
    /// End of the span (exclusive).
    pub end: Position,
}

impl SourceLocation {
    /// Creates a new location.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width location at `pos`.
    #[must_use]
    pub const fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Operators and delimiters: `(`, `=>`, `?.`, `...`.
    Punctuator,
    /// Identifiers, including contextual keywords such as `async` or `as`.
    Identifier,
    /// Reserved words such as `return` or `function`.
    Keyword,
    /// Numeric literal.
    Numeric,
    /// String literal.
    String,
    /// A piece of a template literal between substitutions.
    Template,
    /// Regular expression literal.
    RegularExpression,
    /// `#name` class member.
    PrivateIdentifier,
    /// `// ...`
    LineComment,
    /// `/* ... */`
    BlockComment,
}

impl TokenKind {
    /// Returns true for comment kinds.
    #[must_use]
    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }
}

/// A lexical token or comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lexical category.
    pub kind: TokenKind,
    /// Source text of the token.
    pub value: String,
    /// Byte range in the source text.
    pub range: Range<usize>,
    /// Line/column span.
    pub loc: SourceLocation,
}

impl Token {
    /// Returns true if this is a punctuator with the given text.
    #[must_use]
    pub fn is_punctuator(&self, value: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.value == value
    }

    /// Returns true if this token is a comment.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }

    /// Returns true if both tokens cover the same source range.
    #[must_use]
    pub fn same_as(&self, other: &Token) -> bool {
        self.range == other.range
    }
}

/// Reserved words that lex as [`TokenKind::Keyword`].
pub(crate) const KEYWORDS: &[&str] = &[
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "let",
    "new",
    "null",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Classifies a leaf's text into a token kind.
pub(crate) fn classify_word(text: &str) -> TokenKind {
    let Some(first) = text.chars().next() else {
        return TokenKind::Punctuator;
    };
    if first == '#' && text.len() > 1 {
        TokenKind::PrivateIdentifier
    } else if first.is_alphabetic() || first == '_' || first == '$' || first == '\\' {
        if KEYWORDS.contains(&text) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        }
    } else if first.is_ascii_digit() {
        TokenKind::Numeric
    } else {
        TokenKind::Punctuator
    }
}
