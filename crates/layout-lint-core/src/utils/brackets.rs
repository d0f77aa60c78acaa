//! Matching of bracket pairs across a token stream.
//!
//! Round, square, and curly brackets are matched with a stack. Angle
//! brackets are ambiguous with comparison and shift operators, so `<` is never
//! pushed; a `>` forms a pair only when it closes a type parameter list or a
//! type argument list, in which case the opening token is the first token of
//! that list.

use crate::source::{NodeKind, SourceCode, Token, TokenKind};

/// Iterator over `(opening, closing)` bracket pairs in closing order.
pub struct BracketPairs<'a> {
    source: &'a SourceCode,
    tokens: std::slice::Iter<'a, Token>,
    stack: Vec<&'a Token>,
}

/// Returns all bracket pairs of a source, yielded in the order their closing
/// brackets appear.
#[must_use]
pub fn bracket_pairs_in(source: &SourceCode) -> BracketPairs<'_> {
    BracketPairs {
        source,
        tokens: source.tokens().iter(),
        stack: Vec::new(),
    }
}

impl<'a> Iterator for BracketPairs<'a> {
    type Item = (&'a Token, &'a Token);

    fn next(&mut self) -> Option<Self::Item> {
        for token in self.tokens.by_ref() {
            if token.kind != TokenKind::Punctuator {
                continue;
            }
            match token.value.as_str() {
                "(" | "[" | "{" => self.stack.push(token),
                ")" | "]" | "}" => {
                    if let Some(opening) = self.stack.pop() {
                        return Some((opening, token));
                    }
                }
                ">" => {
                    let node = self.source.node_at_offset(token.range.start);
                    if matches!(node.kind, NodeKind::TypeParameters | NodeKind::TypeArguments) {
                        if let Some(opening) = self.source.first_token(node) {
                            return Some((opening, token));
                        }
                    }
                }
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(text: &str) -> Vec<(String, String)> {
        let source = SourceCode::parse(text).expect("valid source");
        bracket_pairs_in(&source)
            .map(|(open, close)| (open.value.clone(), close.value.clone()))
            .collect()
    }

    fn pair(open: &str, close: &str) -> (String, String) {
        (open.to_string(), close.to_string())
    }

    #[test]
    fn test_yields_pairs_in_closing_order() {
        assert_eq!(
            pairs("f([a], {b});"),
            vec![pair("[", "]"), pair("{", "}"), pair("(", ")")]
        );
    }

    #[test]
    fn test_pairs_type_argument_lists() {
        assert_eq!(
            pairs("let x: Map<A, B> = y;"),
            vec![pair("<", ">")]
        );
    }

    #[test]
    fn test_ignores_comparison_operators() {
        assert_eq!(pairs("a < b > c;"), Vec::<(String, String)>::new());
    }

    #[test]
    fn test_skips_brackets_inside_literals_and_templates() {
        assert_eq!(
            pairs("x = '(' + `${(y)}]`;"),
            vec![pair("(", ")")]
        );
    }

    #[test]
    fn test_type_parameter_declarations_pair_with_their_first_token() {
        assert_eq!(
            pairs("function f<T>(a: T) {}"),
            vec![pair("<", ">"), pair("(", ")"), pair("{", "}")]
        );
    }
}
