//! Rule to disallow operators at the beginning of a line unless they are the only token.
//!
//! ```text
//! a              a              a
//! + b            +              + b
//!                b
//! // flagged     // allowed     (also allowed when `a +` ends the line)
//! ```
//!
//! Covers binary, logical and assignment operators, the `?` and `:` of
//! conditional expressions and types, and the `=` of declarations, fields,
//! defaults, enum members, type aliases, `import x =` and `export =`.
//! The fix moves the operand to its own line with the operator's indentation.
//! No fix is offered when a comment shares the line with the operator.
//!
//! # Suppression
//!
//! - `// layout-lint: allow(no-leading-binary-operator) reason="..."` comment

use layout_lint_core::utils::tokens::is_token_on_same_line;
use layout_lint_core::{
    Fix, FixKind, Node, NodeKind, Report, Rule, RuleCategory, RuleContext, RuleListener,
    RuleMeta, Selector, Severity, SourceCode, Token,
};

/// Rule code for no-leading-binary-operator.
pub const CODE: &str = "LL008";

/// Rule name for no-leading-binary-operator.
pub const NAME: &str = "no-leading-binary-operator";

static META: RuleMeta = RuleMeta {
    category: RuleCategory::Layout,
    description: "Disallow operators at the beginning of the line unless they are the only token",
    fixable: Some(FixKind::Code),
    options: &[],
    messages: &[(
        "leadingOperator",
        "Unexpected operator {{operator}} at the beginning of the line.",
    )],
};

/// Nodes whose right-hand side follows an `=` in the `value` field.
const VALUE_DEFINITIONS: &[NodeKind] = &[
    NodeKind::VariableDeclarator,
    NodeKind::PublicFieldDefinition,
    NodeKind::EnumAssignment,
    NodeKind::TypeAliasDeclaration,
    NodeKind::Other("required_parameter"),
    NodeKind::Other("optional_parameter"),
];

/// Disallows operators at the beginning of a line.
#[derive(Debug, Clone)]
pub struct NoLeadingBinaryOperator {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoLeadingBinaryOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl NoLeadingBinaryOperator {
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

impl Rule for NoLeadingBinaryOperator {
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
        Box::new(LeadingOperatorListener { source })
    }
}

struct LeadingOperatorListener<'a> {
    source: &'a SourceCode,
}

impl<'a> RuleListener<'a> for LeadingOperatorListener<'a> {
    fn selectors(&self) -> Vec<Selector> {
        [
            NodeKind::BinaryExpression,
            NodeKind::AssignmentExpression,
            NodeKind::AugmentedAssignmentExpression,
            NodeKind::AssignmentPattern,
            NodeKind::ObjectAssignmentPattern,
            NodeKind::TernaryExpression,
            NodeKind::ConditionalType,
            NodeKind::DefaultType,
            NodeKind::ImportAlias,
            NodeKind::Other("import_require_clause"),
            NodeKind::ExportStatement,
        ]
        .into_iter()
        .chain(VALUE_DEFINITIONS.iter().copied())
        .map(Selector::enter)
        .collect()
    }

    fn visit(&mut self, _selector: Selector, node: &'a Node, cx: &mut RuleContext<'a>) {
        for operator in self.operator_tokens(node) {
            self.validate_operator(operator, cx);
        }
    }
}

impl<'a> LeadingOperatorListener<'a> {
    /// Operator tokens that separate the node's operands.
    fn operator_tokens(&self, node: &Node) -> Vec<&'a Token> {
        let source = self.source;
        let before_field = |field: &str| {
            source
                .child_by_field(node, field)
                .and_then(|operand| source.token_before(operand.range.start))
        };
        let first_equals = || {
            source
                .tokens_in(node.range.clone())
                .iter()
                .find(|t| t.is_punctuator("="))
        };
        let operators = match node.kind {
            NodeKind::BinaryExpression
            | NodeKind::AssignmentExpression
            | NodeKind::AugmentedAssignmentExpression
            | NodeKind::AssignmentPattern
            | NodeKind::ObjectAssignmentPattern => vec![before_field("right")],
            NodeKind::TernaryExpression | NodeKind::ConditionalType => vec![
                before_field("consequence").filter(|t| t.is_punctuator("?")),
                before_field("alternative").filter(|t| t.is_punctuator(":")),
            ],
            NodeKind::DefaultType => vec![source.first_token(node).filter(|t| t.is_punctuator("="))],
            NodeKind::ImportAlias | NodeKind::Other("import_require_clause") => vec![first_equals()],
            NodeKind::ExportStatement => {
                let tokens = source.tokens_in(node.range.clone());
                vec![tokens.get(1).filter(|t| t.is_punctuator("="))]
            }
            _ => vec![before_field("value").filter(|t| t.is_punctuator("="))],
        };
        operators.into_iter().flatten().collect()
    }

    fn validate_operator(&self, operator: &Token, cx: &mut RuleContext<'_>) {
        let source = self.source;
        let Some(left) = source.token_before(operator.range.start) else {
            return;
        };
        if is_token_on_same_line(left, operator) {
            return;
        }
        let Some(right) = source.token_after(operator.range.end) else {
            return;
        };
        if !is_token_on_same_line(operator, right) {
            return;
        }
        cx.report(
            Report::new("leadingOperator", operator.loc)
                .with_data("operator", &operator.value)
                .with_optional_fix(self.fix(operator, left, right)),
        );
    }

    /// Moves the right operand to a new line, unless a comment is in the way.
    fn fix(&self, operator: &Token, left: &Token, right: &Token) -> Option<Fix> {
        let source = self.source;
        let before = source.token_or_comment_before(operator.range.start)?;
        if !before.same_as(left) && is_token_on_same_line(before, operator) {
            return None;
        }
        let after = source.token_or_comment_after(operator.range.end)?;
        if !after.same_as(right) && is_token_on_same_line(operator, after) {
            return None;
        }
        let line_start = source.line_start(operator.loc.start.line);
        let indentation = source.slice(line_start..operator.range.start);
        Some(Fix::replace(
            operator.range.end..right.range.start,
            format!("\n{indentation}"),
        ))
    }
}
