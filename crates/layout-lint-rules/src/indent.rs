//! Rule to enforce consistent indentation.
//!
//! Every line is expected at `base_indent * 4` spaces, plus 4 for each
//! enclosing bracket pair whose opening bracket ends its line, plus 4 for
//! each enclosing non-block body of `if`, `else`, `while`, `do`, `for` and
//! `with`. Case labels of a `switch` whose opening brace ends its line sit
//! flush with the brace.
//!
//! Lines inside template literals and inside multiline comments are not
//! checked. A multiline block comment that starts a line is shifted as a
//! whole; one that trails code is shifted along with that code.
//!
//! # Configuration
//!
//! - `base_indent`: Indentation of top-level code, in units of 4 spaces
//!   (default: 0, may be negative)
//!
//! # Suppression
//!
//! - `// layout-lint: allow(indent) reason="..."` comment

use layout_lint_core::utils::brackets::bracket_pairs_in;
use layout_lint_core::utils::tokens::{
    byte_len_of_chars, is_colon_token, is_first_token_or_comment_in_line, is_last_token_in_line,
    is_template_token, leading_whitespace,
};
use layout_lint_core::{
    Edit, Fix, FixKind, Node, NodeKind, OptionKind, Position, Report, Rule, RuleCategory,
    RuleContext, RuleListener, RuleMeta, RuleOption, Selector, Severity, SourceCode,
    SourceLocation, Token,
};

/// Rule code for indent.
pub const CODE: &str = "LL002";

/// Rule name for indent.
pub const NAME: &str = "indent";

/// Width of one indentation level.
pub const INDENT_UNIT: i64 = 4;

static META: RuleMeta = RuleMeta {
    category: RuleCategory::Layout,
    description: "Enforce consistent indentation",
    fixable: Some(FixKind::Whitespace),
    options: &[RuleOption {
        name: "base_indent",
        kind: OptionKind::Integer,
        description: "Expected indentation of the first line of code, in units of 4 spaces",
        default: "0",
    }],
    messages: &[
        (
            "indent",
            "Expected indentation of {{expected}} character(s) but found {{actual}}.",
        ),
        (
            "indentBlockComment",
            "Add {{missing}} indentation space(s) to this block comment.",
        ),
        (
            "unindentBlockComment",
            "Remove {{extra}} indentation space(s) from this block comment.",
        ),
    ],
};

/// Enforces consistent indentation.
#[derive(Debug, Clone)]
pub struct Indent {
    /// Indentation of top-level code, in units of [`INDENT_UNIT`].
    pub base_indent: i64,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for Indent {
    fn default() -> Self {
        Self::new()
    }
}

impl Indent {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_indent: 0,
            severity: Severity::Error,
        }
    }

    /// Sets the indentation of top-level code, in units of 4 spaces.
    #[must_use]
    pub fn base_indent(mut self, units: i64) -> Self {
        self.base_indent = units;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for Indent {
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
        let base = self.base_indent.saturating_mul(INDENT_UNIT);
        Box::new(IndentListener {
            source,
            expected: vec![Some(base); source.line_count() + 1],
        })
    }
}

struct IndentListener<'a> {
    source: &'a SourceCode,
    /// Expected indentation by line number; `None` for unchecked lines.
    expected: Vec<Option<i64>>,
}

impl<'a> RuleListener<'a> for IndentListener<'a> {
    fn selectors(&self) -> Vec<Selector> {
        vec![
            Selector::enter(NodeKind::IfStatement),
            Selector::enter(NodeKind::ElseClause),
            Selector::enter(NodeKind::WhileStatement),
            Selector::enter(NodeKind::DoStatement),
            Selector::enter(NodeKind::ForStatement),
            Selector::enter(NodeKind::ForInStatement),
            Selector::enter(NodeKind::WithStatement),
            Selector::enter(NodeKind::SwitchStatement),
            Selector::program_exit(),
        ]
    }

    fn visit(&mut self, selector: Selector, node: &'a Node, cx: &mut RuleContext<'a>) {
        let source = self.source;
        match selector.kind {
            NodeKind::Program => self.validate_program_exit(cx),
            NodeKind::SwitchStatement => self.validate_switch_statement(node),
            NodeKind::IfStatement => {
                if let Some(consequence) = source.child_by_field(node, "consequence") {
                    self.validate_clause(consequence);
                }
            }
            NodeKind::ElseClause => {
                if let Some(alternative) = source.children(node).next() {
                    self.validate_clause(alternative);
                }
            }
            _ => {
                if let Some(body) = source.child_by_field(node, "body") {
                    self.validate_clause(body);
                }
            }
        }
    }
}

impl IndentListener<'_> {
    fn expect_indents(&mut self, first_line: usize, last_line: usize, indent: i64) {
        for line in first_line..=last_line {
            if let Some(Some(expected)) = self.expected.get_mut(line) {
                *expected += indent;
            }
        }
    }

    fn unexpect_indents(&mut self, first_line: usize, last_line: usize) {
        for line in first_line..=last_line {
            if let Some(expected) = self.expected.get_mut(line) {
                *expected = None;
            }
        }
    }

    /// Line of the first comment or token before `node` that starts a line.
    fn leading_line(&self, node: &Node) -> Option<usize> {
        let source = self.source;
        source
            .comments_before(node.range.start)
            .iter()
            .chain(source.first_token(node))
            .find(|token| is_first_token_or_comment_in_line(source, token))
            .map(|token| token.loc.start.line)
    }

    fn validate_clause(&mut self, body: &Node) {
        if body.kind == NodeKind::StatementBlock {
            return;
        }
        if let Some(first_line) = self.leading_line(body) {
            self.expect_indents(first_line, body.loc.end.line, INDENT_UNIT);
        }
    }

    fn validate_switch_statement(&mut self, node: &Node) {
        let source = self.source;
        let Some(body) = source.child_by_field(node, "body") else {
            return;
        };
        let brace_ends_line = source
            .first_token(body)
            .is_some_and(|brace| is_last_token_in_line(source, brace));
        if !brace_ends_line {
            return;
        }
        for switch_case in source.children(body) {
            if !matches!(
                switch_case.kind,
                NodeKind::SwitchCase | NodeKind::SwitchDefault
            ) {
                continue;
            }
            let Some(first_line) = self.leading_line(switch_case) else {
                continue;
            };
            let label_end = source
                .child_by_field(switch_case, "value")
                .map(|test| test.range.end)
                .or_else(|| source.first_token(switch_case).map(|t| t.range.end));
            let colon = label_end.and_then(|offset| {
                source
                    .tokens_in(offset..source.text().len())
                    .iter()
                    .find(|t| is_colon_token(t))
            });
            if let Some(colon) = colon {
                self.expect_indents(first_line, colon.loc.end.line, -INDENT_UNIT);
            }
        }
    }

    fn validate_program_exit(&mut self, cx: &mut RuleContext<'_>) {
        let source = self.source;
        for (opening, closing) in bracket_pairs_in(source) {
            if !is_last_token_in_line(source, opening) {
                continue;
            }
            if let Some(last) = source.token_or_comment_before(closing.range.start) {
                self.expect_indents(opening.loc.end.line + 1, last.loc.end.line, INDENT_UNIT);
            }
        }
        for template in source.tokens().iter().filter(|t| is_template_token(t)) {
            self.unexpect_indents(template.loc.start.line + 1, template.loc.end.line);
        }

        let line_count = source.line_count();
        let mut multiline_comments: Vec<Option<&Token>> = vec![None; line_count + 1];
        for comment in source.comments() {
            let start_line = comment.loc.start.line;
            let end_line = comment.loc.end.line;
            if start_line < end_line {
                multiline_comments[start_line] = Some(comment);
                self.unexpect_indents(start_line + 1, end_line);
            }
        }

        let mut shifts = vec![0_i64; line_count + 1];
        for line in 1..=line_count {
            let comment = multiline_comments[line];
            let is_leading_comment =
                comment.is_some_and(|c| is_first_token_or_comment_in_line(source, c));
            if let Some(expected) = self.expected[line] {
                let expected = expected.max(0);
                let text = source.line(line);
                let (actual, actual_bytes) = leading_whitespace(text);
                let shift = to_i64(actual) - expected;
                if shift != 0 && actual_bytes != text.len() {
                    match comment {
                        Some(comment) if is_leading_comment => {
                            report_block_comment(source, cx, &mut shifts, comment, shift, true);
                        }
                        _ => {
                            let start = source.line_start(line);
                            let loc = SourceLocation::new(
                                Position::new(line, 0),
                                Position::new(line, actual_bytes),
                            );
                            cx.report(
                                Report::new("indent", loc)
                                    .with_data("expected", expected)
                                    .with_data("actual", actual)
                                    .with_fix(Fix::replace(
                                        start..start + actual_bytes,
                                        spaces(expected),
                                    )),
                            );
                            shifts[line] = shift;
                        }
                    }
                }
            }
            if let Some(comment) = comment.filter(|_| !is_leading_comment) {
                let diff = shifts[line];
                if diff != 0 {
                    report_block_comment(source, cx, &mut shifts, comment, diff, false);
                }
            }
        }
    }
}

/// Shifts the lines of a block comment by `diff` characters to the left.
///
/// A leading comment is shifted from its first line, a trailing one from its
/// second line on. The applied shift of every line is recorded in `shifts`.
fn report_block_comment(
    source: &SourceCode,
    cx: &mut RuleContext<'_>,
    shifts: &mut [i64],
    comment: &Token,
    diff: i64,
    is_leading_comment: bool,
) {
    let start_line = comment.loc.start.line;
    let start = if is_leading_comment {
        Position::new(start_line, 0)
    } else {
        comment.loc.start
    };
    let loc = SourceLocation::new(start, comment.loc.end);
    let first_line = if is_leading_comment {
        start_line
    } else {
        start_line + 1
    };
    let lines = first_line..=comment.loc.end.line;

    if diff > 0 {
        let mut edits = Vec::new();
        for line in lines {
            let text = source.line(line);
            let (actual, _) = leading_whitespace(text);
            let shift = diff.min(to_i64(actual));
            let line_start = source.line_start(line);
            let bytes = byte_len_of_chars(text, usize::try_from(shift).unwrap_or(0));
            edits.push(Edit {
                range: line_start..line_start + bytes,
                text: String::new(),
            });
            shifts[line] = shift;
        }
        cx.report(
            Report::new("unindentBlockComment", loc)
                .with_data("extra", diff)
                .with_optional_fix(Fix::from_edits(edits)),
        );
    } else {
        let missing = -diff;
        let padding = spaces(missing);
        let mut edits = Vec::new();
        for line in lines {
            let line_start = source.line_start(line);
            edits.push(Edit {
                range: line_start..line_start,
                text: padding.clone(),
            });
            shifts[line] = diff;
        }
        cx.report(
            Report::new("indentBlockComment", loc)
                .with_data("missing", missing)
                .with_optional_fix(Fix::from_edits(edits)),
        );
    }
}

fn spaces(count: i64) -> String {
    " ".repeat(usize::try_from(count).unwrap_or(0))
}

fn to_i64(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fix, lint, message_ids};
    use layout_lint_core::Violation;

    fn check_code(code: &str) -> Vec<Violation> {
        lint(Indent::new(), code)
    }

    fn positions(violations: &[Violation]) -> Vec<(usize, usize, usize, usize)> {
        violations
            .iter()
            .map(|v| {
                (
                    v.location.line,
                    v.location.column,
                    v.location.end_line,
                    v.location.end_column,
                )
            })
            .collect()
    }

    #[test]
    fn test_accepts_consistent_indentation() {
        let valid = [
            "\"ok\"",
            "{\n    foo();\n}\nbar();",
            "{\n    foo();\n    /* comment */}\nbar();",
            "[1,\n2,\n3]",
            "{\n  \n}",
            "/**\n * FOO\n */",
            "if (foo)\n    foo();\nelse if (bar)\n    bar();\nelse\n    baz();",
            "while (foo)\n    foo\n    (\n        bar\n    );",
            "for (;;) /*\n FOO */ /*\n BAR */\n    /* BAZ */\n    // FOOBAR\n    bar();",
            "type Foo\n<\n    T\n> =\nBar<\n    T\n>;",
            "     ",
            "do\n    foo();\nwhile (bar);",
            "const s = `\n  free\n    form\n`;",
        ];
        for code in valid {
            let violations = check_code(code);
            assert!(violations.is_empty(), "{code:?}: {violations:?}");
        }
    }

    #[test]
    fn test_switch_cases_sit_flush_with_their_brace() {
        let code = "switch (foo)\n{\ncase 1:\n    bar();\ndefault:\n}";
        assert!(check_code(code).is_empty());

        let code = "switch (foo)\n{\n// BAR\ncase 1 +\n2:\n    bar();\ndefault:\n}";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_reports_misindented_line() {
        let violations = check_code(" \"not ok\"");
        assert_eq!(message_ids(&violations), vec!["indent"]);
        insta::assert_snapshot!(violations[0].message, @"Expected indentation of 0 character(s) but found 1.");
        assert_eq!(positions(&violations), vec![(1, 1, 1, 2)]);
        assert_eq!(fix(Indent::new(), " \"not ok\""), "\"not ok\"");
    }

    #[test]
    fn test_counts_unicode_whitespace_as_one_character() {
        let code = "(\n  \u{2000}\"not ok\"\n)";
        let violations = check_code(code);
        assert_eq!(
            violations[0].message,
            "Expected indentation of 4 character(s) but found 3."
        );
        assert_eq!(violations[0].location.line, 2);
        assert_eq!(fix(Indent::new(), code), "(\n    \"not ok\"\n)");
    }

    #[test]
    fn test_skips_lines_inside_template_literals() {
        let code = "(\n`\n(\n${\n(\nfoo\n)\n}\n)\n`\n)";
        let violations = check_code(code);
        assert_eq!(message_ids(&violations), vec!["indent"; 5]);
        assert_eq!(
            fix(Indent::new(), code),
            "(\n    `\n(\n${\n    (\n        foo\n    )\n    }\n)\n`\n)"
        );
    }

    #[test]
    fn test_unindents_leading_block_comment() {
        let code = "  /**\n   * FOO\n   */";
        let violations = check_code(code);
        assert_eq!(message_ids(&violations), vec!["unindentBlockComment"]);
        insta::assert_snapshot!(violations[0].message, @"Remove 2 indentation space(s) from this block comment.");
        assert_eq!(positions(&violations), vec![(1, 1, 3, 6)]);
        assert_eq!(fix(Indent::new(), code), "/**\n * FOO\n */");
    }

    #[test]
    fn test_unindent_never_removes_content() {
        let code = "  /**\n * FOO\n   \n* BAR\n   */";
        assert_eq!(fix(Indent::new(), code), "/**\n* FOO\n \n* BAR\n */");
    }

    #[test]
    fn test_indents_leading_block_comment() {
        let code = "{\n/* FOO\n   BAR */\n}";
        let violations = check_code(code);
        assert_eq!(message_ids(&violations), vec!["indentBlockComment"]);
        assert_eq!(positions(&violations), vec![(2, 1, 3, 10)]);
        assert_eq!(fix(Indent::new(), code), "{\n    /* FOO\n       BAR */\n}");
    }

    #[test]
    fn test_trailing_comments_follow_their_line() {
        let code = "   foo(); /* FOO\n             BAR */ /*\n             BAZ */";
        let violations = check_code(code);
        assert_eq!(
            message_ids(&violations),
            vec!["indent", "unindentBlockComment", "unindentBlockComment"]
        );
        assert_eq!(
            positions(&violations),
            vec![(1, 1, 1, 4), (1, 11, 2, 20), (2, 21, 3, 20)]
        );
        assert_eq!(
            fix(Indent::new(), code),
            "foo(); /* FOO\n          BAR */ /*\n          BAZ */"
        );
    }

    #[test]
    fn test_dedents_case_labels_only_under_a_line_ending_brace() {
        let code = "switch (foo) { case 1:\n  case 2: }";
        assert_eq!(fix(Indent::new(), code), "switch (foo) { case 1:\ncase 2: }");
    }

    #[test]
    fn test_base_indent_option() {
        let rule = || Indent::new().base_indent(1);
        assert_eq!(fix(rule(), "   foo();"), "    foo();");
        assert_eq!(fix(rule(), "     foo();"), "    foo();");

        let code = "/* FOO\n   BAR */\n     baz(); /*\n       FOO\n   BAR */";
        let violations = lint(rule(), code);
        assert_eq!(
            message_ids(&violations),
            vec!["indentBlockComment", "indent", "unindentBlockComment"]
        );
        assert_eq!(
            fix(rule(), code),
            "    /* FOO\n       BAR */\n    baz(); /*\n      FOO\n  BAR */"
        );
    }

    #[test]
    fn test_negative_base_indent_is_clamped() {
        let rule = || Indent::new().base_indent(-1);
        let violations = lint(rule(), " if (foo)\n bar();");
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|v| v.message == "Expected indentation of 0 character(s) but found 1."));
        assert_eq!(fix(rule(), " if (foo)\n bar();"), "if (foo)\nbar();");

        let code = "(function () {\nfor (;;) /*\n FOO */ /*\n BAR */\n    /* BAZ */\n    // FOOBAR\n    bar();\n}());";
        assert!(lint(rule(), code).is_empty());
    }

    #[test]
    fn test_nested_blocks_indent_by_depth() {
        let code = "{\n    {\n        {\n            foo();\n        }\n    }\n}";
        assert!(check_code(code).is_empty());
        let base = lint(Indent::new().base_indent(2), code);
        assert_eq!(base.len(), 7);
    }
}
