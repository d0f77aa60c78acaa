//! Token predicates and line queries shared by the rules.

use crate::source::{SourceCode, Token, TokenKind};

/// Returns true if `left` ends on the line where `right` starts.
#[must_use]
pub fn is_token_on_same_line(left: &Token, right: &Token) -> bool {
    left.loc.end.line == right.loc.start.line
}

/// Returns true for `(`.
#[must_use]
pub fn is_opening_paren_token(token: &Token) -> bool {
    token.is_punctuator("(")
}

/// Returns true for `)`.
#[must_use]
pub fn is_closing_paren_token(token: &Token) -> bool {
    token.is_punctuator(")")
}

/// Returns true for `:`.
#[must_use]
pub fn is_colon_token(token: &Token) -> bool {
    token.is_punctuator(":")
}

/// Returns true for template chunks.
#[must_use]
pub fn is_template_token(token: &Token) -> bool {
    token.kind == TokenKind::Template
}

/// Returns true if nothing but whitespace precedes the token on its line.
#[must_use]
pub fn is_first_token_or_comment_in_line(source: &SourceCode, token: &Token) -> bool {
    source
        .token_or_comment_before(token.range.start)
        .map_or(true, |prev| !is_token_on_same_line(prev, token))
}

/// Returns true if nothing but whitespace follows the token on its line.
#[must_use]
pub fn is_last_token_or_comment_in_line(source: &SourceCode, token: &Token) -> bool {
    source
        .token_or_comment_after(token.range.end)
        .map_or(true, |next| !is_token_on_same_line(token, next))
}

/// Returns true if no other token follows the token on its line.
///
/// Comments are not considered.
#[must_use]
pub fn is_last_token_in_line(source: &SourceCode, token: &Token) -> bool {
    source
        .token_after(token.range.end)
        .map_or(true, |next| !is_token_on_same_line(token, next))
}

/// Returns true for characters matched by a `\s` regular-expression class.
#[must_use]
pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Returns true for line terminators (`\n`, `\r`, U+2028, U+2029).
#[must_use]
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Leading whitespace of a line as `(characters, bytes)`.
#[must_use]
pub fn leading_whitespace(line: &str) -> (usize, usize) {
    line.char_indices()
        .find(|&(_, c)| !is_whitespace(c))
        .map_or((line.chars().count(), line.len()), |(byte, _)| {
            (line[..byte].chars().count(), byte)
        })
}

/// Byte length of the first `count` characters of `text`.
#[must_use]
pub fn byte_len_of_chars(text: &str, count: usize) -> usize {
    text.char_indices().nth(count).map_or(text.len(), |(i, _)| i)
}

/// Byte length of the last `count` characters of `text`.
#[must_use]
pub fn byte_len_of_last_chars(text: &str, count: usize) -> usize {
    match count {
        0 => 0,
        _ => text
            .char_indices()
            .rev()
            .nth(count - 1)
            .map_or(text.len(), |(i, _)| text.len() - i),
    }
}

/// Length of a run of inline whitespace that ends the text or a line.
///
/// Returns the byte length of the leading run of non-terminator whitespace
/// when the rest of `separator` is empty or begins with a line terminator.
/// Any other shape (no leading whitespace, or other text after it) yields
/// `None`.
#[must_use]
pub fn trailing_inline_space(separator: &str) -> Option<usize> {
    let run = separator
        .char_indices()
        .find(|&(_, c)| !is_whitespace(c) || is_line_terminator(c))
        .map_or(separator.len(), |(i, _)| i);
    let rest = &separator[run..];
    let ends_line = rest.chars().next().map_or(true, is_line_terminator);
    (run > 0 && ends_line).then_some(run)
}
