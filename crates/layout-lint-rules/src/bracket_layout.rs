//! Rule to enforce a consistent layout of multiline bracket pairs.
//!
//! When a bracket pair spans several lines, the opening bracket starts a new
//! line and ends it, and the closing bracket sits on a line of its own:
//!
//! ```text
//! foo
//! (
//!     bar
//! )
//! ```
//!
//! Pairs whose brackets are on the same line are not checked.
//!
//! # Exceptions
//!
//! - An opening bracket stays attached to a preceding prefix operator
//!   (`!`, `+`, `-`, `^`, `~`, `++`, `--`, `...`, `?.`), to the `async` of an
//!   arrow function, and to the `return`, `throw` and `yield` keywords.
//! - `<` of a type argument list and `[` of an indexed access type stay
//!   attached to the preceding type.
//! - A closing bracket is only detached from a following `(`, `.`, `)`, `]`,
//!   `{`, `}`, `?.` or non-punctuator token, except for `[` of an array type
//!   and the type operators `as` and `satisfies`.
//! - The parentheses wrapping and invoking an immediately-invoked function
//!   may hug the function when they sit on its first and last line.
//!
//! # Suppression
//!
//! - `// layout-lint: allow(bracket-layout) reason="..."` comment

use layout_lint_core::utils::brackets::bracket_pairs_in;
use layout_lint_core::utils::tokens::{
    is_closing_paren_token, is_opening_paren_token, is_token_on_same_line,
};
use layout_lint_core::{
    Fix, FixKind, Node, NodeKind, Position, Report, Rule, RuleCategory, RuleContext,
    RuleListener, RuleMeta, Selector, Severity, SourceCode, SourceLocation, Token, TokenKind,
};
use std::collections::HashSet;

/// Rule code for bracket-layout.
pub const CODE: &str = "LL001";

/// Rule name for bracket-layout.
pub const NAME: &str = "bracket-layout";

/// Punctuators a closing bracket may be separated from by a line break.
const PRE_DETACHED_PUNCTUATORS: &[&str] = &["(", ".", ")", "]", "{", "}", "?."];

/// Punctuators that must stay attached to the following bracket.
const POST_ATTACHED_PUNCTUATORS: &[&str] = &["!", "+", "-", "^", "~", "++", "--", "...", "?."];

static META: RuleMeta = RuleMeta {
    category: RuleCategory::Layout,
    description: "Enforce consistent bracket layout",
    fixable: Some(FixKind::Whitespace),
    options: &[],
    messages: &[
        (
            "sameLineBeforeOpen",
            "Opening bracket \"{{bracket}}\" should be on next line.",
        ),
        (
            "sameLineAfterOpen",
            "Code after opening bracket \"{{bracket}}\" should be on next line.",
        ),
        (
            "sameLineBeforeClose",
            "Closing bracket \"{{bracket}}\" should be on the same line as opening bracket or \
             after the previous line of code.",
        ),
        (
            "sameLineAfterClose",
            "Code after closing bracket \"{{bracket}}\" should be on next line.",
        ),
    ],
};

/// Enforces a consistent layout of multiline bracket pairs.
#[derive(Debug, Clone)]
pub struct BracketLayout {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for BracketLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl BracketLayout {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for BracketLayout {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn create<'a>(&self, source: &'a SourceCode) -> Box<dyn RuleListener<'a> + 'a> {
        Box::new(BracketLayoutListener {
            source,
            valid_junctions: HashSet::new(),
        })
    }
}

struct BracketLayoutListener<'a> {
    source: &'a SourceCode,
    /// Offsets between two tokens where no line break is required.
    valid_junctions: HashSet<usize>,
}

impl<'a> RuleListener<'a> for BracketLayoutListener<'a> {
    fn selectors(&self) -> Vec<Selector> {
        vec![
            Selector::enter(NodeKind::CallExpression),
            Selector::program_exit(),
        ]
    }

    fn visit(&mut self, selector: Selector, node: &'a Node, cx: &mut RuleContext<'a>) {
        if selector == Selector::program_exit() {
            for (opening, closing) in bracket_pairs_in(self.source) {
                self.validate_bracket_pair(opening, closing, cx);
            }
        } else {
            self.validate_iife(node);
        }
    }
}

impl BracketLayoutListener<'_> {
    fn is_in(&self, token: &Token, kind: NodeKind) -> bool {
        self.source.is_in_node_of_kind(token, kind)
    }

    fn can_break_after_token(&self, token: &Token) -> bool {
        match (token.kind, token.value.as_str()) {
            (TokenKind::Punctuator, value) => !POST_ATTACHED_PUNCTUATORS.contains(&value),
            (TokenKind::Identifier, "async") => !self.is_in(token, NodeKind::ArrowFunction),
            (TokenKind::Keyword, "return") => !self.is_in(token, NodeKind::ReturnStatement),
            (TokenKind::Keyword, "throw") => !self.is_in(token, NodeKind::ThrowStatement),
            (TokenKind::Keyword, "yield") => !self.is_in(token, NodeKind::YieldExpression),
            _ => true,
        }
    }

    fn can_break_before_token(&self, token: &Token) -> bool {
        match (token.kind, token.value.as_str()) {
            (TokenKind::Punctuator, "[") => !self.is_in(token, NodeKind::ArrayType),
            (TokenKind::Punctuator, value) => PRE_DETACHED_PUNCTUATORS.contains(&value),
            (TokenKind::Identifier, "as") => !self.is_in(token, NodeKind::AsExpression),
            (TokenKind::Identifier, "satisfies") => {
                !self.is_in(token, NodeKind::SatisfiesExpression)
            }
            _ => true,
        }
    }

    fn can_break_before_bracket(&self, opening: &Token) -> bool {
        match opening.value.as_str() {
            "<" => !self.is_in(opening, NodeKind::TypeArguments),
            "[" => !self.is_in(opening, NodeKind::LookupType),
            _ => true,
        }
    }

    fn is_valid_junction(&self, offset: usize) -> bool {
        self.valid_junctions.contains(&offset)
    }

    fn validate_bracket_pair(&self, opening: &Token, closing: &Token, cx: &mut RuleContext<'_>) {
        if is_token_on_same_line(opening, closing) {
            return;
        }
        let source = self.source;

        if let Some(before) = source.token_before(opening.range.start) {
            if is_token_on_same_line(before, opening)
                && !self.is_valid_junction(opening.range.start)
                && self.can_break_after_token(before)
                && self.can_break_before_bracket(opening)
            {
                report(
                    cx,
                    opening,
                    "sameLineBeforeOpen",
                    opening.loc.start,
                    opening.range.start,
                );
            }
        }

        let after_opening = source.token_after(opening.range.end);
        if after_opening.is_some_and(|after| is_token_on_same_line(opening, after))
            && !self.is_valid_junction(opening.range.end)
        {
            report(
                cx,
                opening,
                "sameLineAfterOpen",
                opening.loc.end,
                opening.range.end,
            );
        }

        let before_closing = source.token_before(closing.range.start);
        if before_closing.is_some_and(|before| is_token_on_same_line(before, closing))
            && !self.is_valid_junction(closing.range.start)
        {
            report(
                cx,
                closing,
                "sameLineBeforeClose",
                closing.loc.start,
                closing.range.start,
            );
        }

        if let Some(after) = source.token_after(closing.range.end) {
            if is_token_on_same_line(closing, after)
                && !self.is_valid_junction(closing.range.end)
                && self.can_break_before_token(after)
            {
                report(
                    cx,
                    closing,
                    "sameLineAfterClose",
                    closing.loc.end,
                    closing.range.end,
                );
            }
        }
    }

    /// Records the junctions an immediately-invoked function may keep compact.
    fn validate_iife(&mut self, call: &Node) {
        let source = self.source;
        if source.child_by_field(call, "optional_chain").is_some() {
            return;
        }
        let invoked_with_arguments = source
            .child_by_field(call, "arguments")
            .is_some_and(|args| args.kind == NodeKind::Arguments);
        if !invoked_with_arguments {
            return;
        }
        let Some(mut function) = source.child_by_field(call, "function") else {
            return;
        };
        while function.kind == NodeKind::ParenthesizedExpression {
            match source.children(function).next() {
                Some(inner) => function = inner,
                None => return,
            }
        }
        if !matches!(
            function.kind,
            NodeKind::FunctionExpression | NodeKind::ArrowFunction | NodeKind::GeneratorFunction
        ) {
            return;
        }

        let first_line = function.loc.start.line;
        let Some(after_function) = source.token_after(function.range.end) else {
            return;
        };
        // End offset and end line of the token that precedes the arguments.
        let (callee_end, last_line) = if is_closing_paren_token(after_function) {
            let wrapper_closing = after_function;
            let invokes = source
                .token_after(wrapper_closing.range.end)
                .is_some_and(is_opening_paren_token);
            if !invokes {
                // Wrapped in more than one pair of parentheses.
                return;
            }
            let Some(wrapper_opening) = source.token_before(function.range.start) else {
                return;
            };
            if wrapper_opening.loc.end.line < first_line {
                return;
            }
            self.valid_junctions.extend([
                wrapper_opening.range.end,
                function.range.start,
                function.range.end,
                wrapper_closing.range.start,
            ]);
            (wrapper_closing.range.end, wrapper_closing.loc.end.line)
        } else {
            (function.range.end, function.loc.end.line)
        };

        if source
            .last_token(call)
            .is_some_and(|closing| closing.loc.end.line == last_line)
        {
            self.valid_junctions.insert(callee_end);
        }
        if let Some(body) = source.child_by_field(function, "body") {
            if body.kind == NodeKind::StatementBlock
                && body.loc.start.line == first_line
                && body.loc.end.line == last_line
            {
                self.valid_junctions.insert(body.range.start);
            }
        }

        let before_call = source.token_before(call.range.start);
        let after_call = source.token_after(call.range.end);
        if let (Some(before), Some(after)) = (before_call, after_call) {
            if is_opening_paren_token(before)
                && before.loc.end.line == call.loc.start.line
                && is_closing_paren_token(after)
                && call.loc.end.line == after.loc.start.line
            {
                self.valid_junctions.extend([
                    before.range.end,
                    call.range.start,
                    call.range.end,
                    after.range.start,
                ]);
            }
        }
    }
}

fn report(
    cx: &mut RuleContext<'_>,
    bracket: &Token,
    message_id: &'static str,
    pos: Position,
    offset: usize,
) {
    cx.report(
        Report::new(message_id, SourceLocation::point(pos))
            .with_data("bracket", &bracket.value)
            .with_fix(Fix::insert_at(offset, "\n")),
    );
}
