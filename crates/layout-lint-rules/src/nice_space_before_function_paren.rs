//! Rule to enforce consistent spacing before the parameter list of a function.
//!
//! Anonymous functions take a space after `function` (or `*`, or `async`),
//! named functions and methods do not:
//!
//! ```text
//! function foo() {}
//! var bar = function () {};
//! var baz = async () => 1;
//! class Foo { method() {} }
//! ```
//!
//! A function with type parameters is treated as named, so `function <T>()`
//! keeps the list attached to `>`. Line breaks before the parameter list
//! are left alone, as are arrow functions other than `async (...) =>`.
//!
//! # Suppression
//!
//! - `// layout-lint: allow(nice-space-before-function-paren) reason="..."` comment

use layout_lint_core::utils::tokens::{is_line_terminator, is_opening_paren_token, is_whitespace};
use layout_lint_core::{
    Fix, FixKind, Node, NodeKind, Report, Rule, RuleCategory, RuleContext, RuleListener,
    RuleMeta, Selector, Severity, SourceCode, SourceLocation, TokenKind,
};

/// Rule code for nice-space-before-function-paren.
pub const CODE: &str = "LL003";

/// Rule name for nice-space-before-function-paren.
pub const NAME: &str = "nice-space-before-function-paren";

static META: RuleMeta = RuleMeta {
    category: RuleCategory::Layout,
    description:
        "Enforce consistent spacing before the opening parenthesis in a function definition",
    fixable: Some(FixKind::Whitespace),
    options: &[],
    messages: &[
        ("missingSpace", "Missing space before function parentheses."),
        ("unexpectedSpace", "Unexpected space before function parentheses."),
    ],
};

/// Enforces consistent spacing before function parameter lists.
#[derive(Debug, Clone)]
pub struct NiceSpaceBeforeFunctionParen {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NiceSpaceBeforeFunctionParen {
    fn default() -> Self {
        Self::new()
    }
}

impl NiceSpaceBeforeFunctionParen {
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

impl Rule for NiceSpaceBeforeFunctionParen {
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
        Box::new(FunctionParenListener { source })
    }
}

/// Spacing expected before a parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spacing {
    Always,
    Never,
    Ignore,
}

struct FunctionParenListener<'a> {
    source: &'a SourceCode,
}

impl<'a> RuleListener<'a> for FunctionParenListener<'a> {
    fn selectors(&self) -> Vec<Selector> {
        [
            NodeKind::FunctionDeclaration,
            NodeKind::FunctionExpression,
            NodeKind::GeneratorFunction,
            NodeKind::GeneratorFunctionDeclaration,
            NodeKind::ArrowFunction,
            NodeKind::MethodDefinition,
        ]
        .into_iter()
        .map(Selector::enter)
        .collect()
    }

    fn visit(&mut self, _selector: Selector, node: &'a Node, cx: &mut RuleContext<'a>) {
        let spacing = self.spacing_for(node);
        if spacing != Spacing::Ignore {
            self.check_function(node, spacing, cx);
        }
    }
}

impl FunctionParenListener<'_> {
    fn spacing_for(&self, node: &Node) -> Spacing {
        let source = self.source;
        let named = matches!(
            node.kind,
            NodeKind::FunctionDeclaration
                | NodeKind::GeneratorFunctionDeclaration
                | NodeKind::MethodDefinition
        ) || source.child_by_field(node, "name").is_some();
        if named || source.child_by_field(node, "type_parameters").is_some() {
            return Spacing::Never;
        }
        if node.kind == NodeKind::ArrowFunction {
            // Only `async (...) =>` is checked.
            let tokens = source.tokens_in(node.range.clone());
            let is_async = tokens
                .first()
                .is_some_and(|t| t.kind == TokenKind::Identifier && t.value == "async");
            let has_parens = tokens.get(1).is_some_and(is_opening_paren_token);
            if !(is_async && has_parens) || source.child_by_field(node, "parameters").is_none() {
                return Spacing::Ignore;
            }
        }
        Spacing::Always
    }

    fn check_function(&self, node: &Node, spacing: Spacing, cx: &mut RuleContext<'_>) {
        let source = self.source;
        let Some(right) = source
            .child_by_field(node, "parameters")
            .and_then(|params| source.first_token(params))
            .filter(|t| is_opening_paren_token(t))
        else {
            return;
        };
        let Some(left) = source.token_before(right.range.start) else {
            return;
        };
        let comments = source.comments_before(right.range.start);
        let mut gap = String::new();
        let mut cursor = left.range.end;
        for comment in comments {
            gap.push_str(source.slice(cursor..comment.range.start));
            cursor = comment.range.end;
        }
        gap.push_str(source.slice(cursor..right.range.start));
        if gap.chars().any(is_line_terminator) {
            return;
        }

        let has_spacing = gap.chars().any(is_whitespace);
        let loc = SourceLocation::point(left.loc.end);
        match spacing {
            Spacing::Never if has_spacing => {
                // Comments in the gap would be lost by the removal.
                let fix = comments
                    .is_empty()
                    .then(|| Fix::remove(left.range.end..right.range.start));
                cx.report(Report::new("unexpectedSpace", loc).with_optional_fix(fix));
            }
            Spacing::Always if !has_spacing => {
                let fix = Fix::insert_at(left.range.end, " ");
                cx.report(Report::new("missingSpace", loc).with_fix(fix));
            }
            _ => {}
        }
    }
}
