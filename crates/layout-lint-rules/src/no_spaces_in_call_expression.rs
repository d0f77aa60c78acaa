//! Rule to disallow spaces between a callee and its argument list.
//!
//! ```text
//! f ();          // flagged
//! new Foo ();    // flagged
//! f\n();         // allowed, the line break is intentional
//! f /**/();      // allowed, comments are left alone
//! ```
//!
//! Only a run of spaces that ends the line or reaches the `(` is removed.
//! Tagged templates are covered by `no-spaces-in-tagged-template`.
//!
//! # Suppression
//!
//! - `// layout-lint: allow(no-spaces-in-call-expression) reason="..."` comment

use layout_lint_core::utils::tokens::{is_opening_paren_token, trailing_inline_space};
use layout_lint_core::{
    Fix, FixKind, Node, NodeKind, Report, Rule, RuleCategory, RuleContext, RuleListener,
    RuleMeta, Selector, Severity, SourceCode, SourceLocation, Token,
};

/// Rule code for no-spaces-in-call-expression.
pub const CODE: &str = "LL004";

/// Rule name for no-spaces-in-call-expression.
pub const NAME: &str = "no-spaces-in-call-expression";

static META: RuleMeta = RuleMeta {
    category: RuleCategory::Layout,
    description: "Disallow spaces after the left side of a call or new expression",
    fixable: Some(FixKind::Whitespace),
    options: &[],
    messages: &[(
        "unexpectedSpace",
        "Unexpected space after left side of {{exprTypeName}} expression.",
    )],
};

/// Disallows spaces between a callee and its argument list.
#[derive(Debug, Clone)]
pub struct NoSpacesInCallExpression {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoSpacesInCallExpression {
    fn default() -> Self {
        Self::new()
    }
}

impl NoSpacesInCallExpression {
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

impl Rule for NoSpacesInCallExpression {
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
        Box::new(CallSpacingListener { source })
    }
}

struct CallSpacingListener<'a> {
    source: &'a SourceCode,
}

impl<'a> RuleListener<'a> for CallSpacingListener<'a> {
    fn selectors(&self) -> Vec<Selector> {
        vec![
            Selector::enter(NodeKind::CallExpression),
            Selector::enter(NodeKind::NewExpression),
        ]
    }

    fn visit(&mut self, selector: Selector, node: &'a Node, cx: &mut RuleContext<'a>) {
        let source = self.source;
        if selector.kind == NodeKind::NewExpression {
            if let Some(callee) = source.child_by_field(node, "constructor") {
                self.check_spacing(node, callee, "new", cx);
            }
            return;
        }
        let has_argument_list = source
            .child_by_field(node, "arguments")
            .is_some_and(|args| args.kind == NodeKind::Arguments);
        if !has_argument_list {
            return;
        }
        if let Some(callee) = source.child_by_field(node, "function") {
            // `import (...)` is not a call of a callee.
            if callee.kind != NodeKind::Other("import") {
                self.check_spacing(node, callee, "call", cx);
            }
        }
    }
}

impl CallSpacingListener<'_> {
    /// Finds the `(` that opens the arguments and the token before it.
    fn invoking_paren(&self, node: &Node, callee: &Node) -> Option<(&Token, &Token)> {
        let source = self.source;
        let mut prev = source.last_token(callee)?;
        loop {
            let next = source
                .token_after(prev.range.end)
                .filter(|t| t.range.end < node.range.end)?;
            if is_opening_paren_token(next) {
                return Some((prev, next));
            }
            prev = next;
        }
    }

    fn check_spacing(
        &self,
        node: &Node,
        callee: &Node,
        expr_type_name: &'static str,
        cx: &mut RuleContext<'_>,
    ) {
        let Some((prev, paren)) = self.invoking_paren(node, callee) else {
            return;
        };
        let separator_start = prev.range.end;
        let separator = self.source.slice(separator_start..paren.range.start);
        if let Some(len) = trailing_inline_space(separator) {
            let removed = separator_start..separator_start + len;
            let loc = SourceLocation::new(prev.loc.end, self.source.position_at(removed.end));
            cx.report(
                Report::new("unexpectedSpace", loc)
                    .with_data("exprTypeName", expr_type_name)
                    .with_fix(Fix::remove(removed)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fix, lint};
    use layout_lint_core::Violation;

    fn check_code(code: &str) -> Vec<Violation> {
        lint(NoSpacesInCallExpression::new(), code)
    }

    fn fix_code(code: &str) -> String {
        fix(NoSpacesInCallExpression::new(), code)
    }

    #[test]
    fn test_accepts_attached_and_intentionally_separated_calls() {
        let valid = [
            "f();",
            "f?.();",
            "f(a, b);",
            "f.b().c();",
            "f()()",
            "(function() {}())",
            "var f = new Foo()",
            "var f = new Foo",
            "( f )( 0 )",
            "( (f) )( (0) )",
            "describe/**/(\"foo\", function () {});",
            "new (foo())",
            "f\n();",
            "f?.\n();",
            "var f = new Foo\n();",
            "f // comment\n ()",
            "f\n/*\n*/\n()",
            "f();\n t();",
            "f /**/()",
            "f?./**/ ()",
            "f\u{2028}()",
            "tag `x`",
        ];
        for code in valid {
            let violations = check_code(code);
            assert!(violations.is_empty(), "{code:?}: {violations:?}");
        }
    }

    #[test]
    fn test_removes_space_before_arguments() {
        let violations = check_code("f ();");
        assert_eq!(violations.len(), 1);
        insta::assert_snapshot!(violations[0].message, @"Unexpected space after left side of call expression.");
        assert_eq!(
            (violations[0].location.column, violations[0].location.end_column),
            (2, 3)
        );
        assert_eq!(fix_code("f ();"), "f();");
    }

    #[test]
    fn test_fixes_member_and_chained_calls() {
        let cases = [
            ("f?. ();", "f?.();"),
            ("f (a, b);", "f(a, b);"),
            ("f.b ();", "f.b();"),
            ("f.b ().c ();", "f.b().c();"),
            ("f () ()", "f()()"),
            ("(function() {} ())", "(function() {}())"),
            ("f ( (0) )", "f( (0) )"),
            ("f.b \n ();", "f.b\n ();"),
            ("f\t\u{a0}();", "f();"),
        ];
        for (code, output) in cases {
            assert_eq!(fix_code(code), output, "{code:?}");
        }
        assert_eq!(check_code("f.b ().c ();").len(), 2);
    }

    #[test]
    fn test_reports_new_expressions() {
        let violations = check_code("var f = new Foo ()");
        assert_eq!(
            violations[0].message,
            "Unexpected space after left side of new expression."
        );
        assert_eq!(violations[0].location.column, 16);
        assert_eq!(fix_code("var f = new Foo ()"), "var f = new Foo()");
    }
}
