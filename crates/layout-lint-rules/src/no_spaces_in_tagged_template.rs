//! Rule to disallow spaces between a tag and its template literal.
//!
//! ```text
//! tag `x`;       // flagged
//! tag`x`;        // allowed
//! tag\n`x`;      // allowed
//! ```
//!
//! # Suppression
//!
//! - `// layout-lint: allow(no-spaces-in-tagged-template) reason="..."` comment

use layout_lint_core::utils::tokens::trailing_inline_space;
use layout_lint_core::{
    Fix, FixKind, Node, NodeKind, Report, Rule, RuleCategory, RuleContext, RuleListener,
    RuleMeta, Selector, Severity, SourceCode, SourceLocation,
};

/// Rule code for no-spaces-in-tagged-template.
pub const CODE: &str = "LL005";

/// Rule name for no-spaces-in-tagged-template.
pub const NAME: &str = "no-spaces-in-tagged-template";

static META: RuleMeta = RuleMeta {
    category: RuleCategory::Layout,
    description: "Disallow spaces after the tag of a tagged template",
    fixable: Some(FixKind::Whitespace),
    options: &[],
    messages: &[(
        "unexpectedSpace",
        "Unexpected space after left side of tagged template expression.",
    )],
};

/// Disallows spaces between a tag and its template literal.
#[derive(Debug, Clone)]
pub struct NoSpacesInTaggedTemplate {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoSpacesInTaggedTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl NoSpacesInTaggedTemplate {
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

impl Rule for NoSpacesInTaggedTemplate {
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
        Box::new(TemplateSpacingListener { source })
    }
}

struct TemplateSpacingListener<'a> {
    source: &'a SourceCode,
}

impl<'a> RuleListener<'a> for TemplateSpacingListener<'a> {
    fn selectors(&self) -> Vec<Selector> {
        vec![Selector::enter(NodeKind::CallExpression)]
    }

    fn visit(&mut self, _selector: Selector, node: &'a Node, cx: &mut RuleContext<'a>) {
        let source = self.source;
        let Some(quasi) = source
            .child_by_field(node, "arguments")
            .filter(|args| args.kind == NodeKind::TemplateString)
        else {
            return;
        };
        let Some(template) = source.first_token(quasi) else {
            return;
        };
        let Some(prev) = source.token_before(template.range.start) else {
            return;
        };
        let separator_start = prev.range.end;
        let separator = source.slice(separator_start..template.range.start);
        if let Some(len) = trailing_inline_space(separator) {
            let removed = separator_start..separator_start + len;
            let loc = SourceLocation::new(prev.loc.end, source.position_at(removed.end));
            cx.report(Report::new("unexpectedSpace", loc).with_fix(Fix::remove(removed)));
        }
    }
}
