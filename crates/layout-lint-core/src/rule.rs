//! Rule traits for defining lint rules.
//!
//! A rule describes itself through [`RuleMeta`] and, for each source file,
//! creates a [`RuleListener`] that subscribes to node kinds. The
//! [`Linter`](crate::Linter) walks the tree once and dispatches every node to
//! the listeners that selected its kind, on entry or on exit.

use crate::context::RuleContext;
use crate::fix::Fix;
use crate::source::{Node, NodeKind, SourceCode, SourceLocation};
use crate::types::Severity;
use serde::Serialize;

/// Base URL of the rule documentation pages.
pub const DOCS_BASE_URL: &str = "https://github.com/origin-1/eslint-plugin/blob/main/rule-docs";

/// Kind of problem a rule reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Purely about the placement of whitespace and line breaks.
    Layout,
    /// A better way to write the same code.
    Suggestion,
}

/// What the automatic fixes of a rule may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FixKind {
    /// Only whitespace is inserted or removed.
    Whitespace,
    /// Code tokens may be rewritten.
    Code,
}

/// Value type of a rule option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Signed integer.
    Integer,
    /// `true` / `false`.
    Boolean,
}

/// Schema entry of a rule option.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RuleOption {
    /// Key under `[rules.<name>]`.
    pub name: &'static str,
    /// Value type.
    pub kind: OptionKind,
    /// What the option controls.
    pub description: &'static str,
    /// Default value, as written in TOML.
    pub default: &'static str,
}

/// Static description of a rule.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RuleMeta {
    /// Category of reported problems.
    pub category: RuleCategory,
    /// One-line description.
    pub description: &'static str,
    /// Fix capability, if the rule offers fixes.
    pub fixable: Option<FixKind>,
    /// Accepted options.
    pub options: &'static [RuleOption],
    /// Message templates keyed by message id.
    pub messages: &'static [(&'static str, &'static str)],
}

impl RuleMeta {
    /// Returns the template registered for a message id.
    #[must_use]
    pub fn message(&self, id: &str) -> Option<&'static str> {
        self.messages
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, template)| *template)
    }
}

/// A per-file lint rule.
///
/// # Example
///
/// ```ignore
/// use layout_lint_core::{Rule, RuleListener, RuleMeta, SourceCode};
///
/// pub struct NoDebugger;
///
/// impl Rule for NoDebugger {
///     fn name(&self) -> &'static str { "no-debugger" }
///     fn code(&self) -> &'static str { "LL100" }
///     fn meta(&self) -> &'static RuleMeta { &META }
///
///     fn create<'a>(&self, source: &'a SourceCode) -> Box<dyn RuleListener<'a> + 'a> {
///         Box::new(DebuggerListener { source })
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "bracket-layout").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "LL001").
    fn code(&self) -> &'static str;

    /// Returns the static description of this rule.
    fn meta(&self) -> &'static RuleMeta;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        self.meta().description
    }

    /// Returns the documentation URL of this rule.
    fn docs_url(&self) -> String {
        format!("{DOCS_BASE_URL}/{}.md", self.name())
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    /// Override this to customize the requirement.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Creates the listener that checks one source file.
    fn create<'a>(&self, source: &'a SourceCode) -> Box<dyn RuleListener<'a> + 'a>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// When a listener is called for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Before the node's children are visited.
    Enter,
    /// After the node's children are visited.
    Exit,
}

/// A node kind paired with a traversal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector {
    /// Node kind to match.
    pub kind: NodeKind,
    /// Phase to match.
    pub phase: Phase,
}

impl Selector {
    /// Matches nodes of `kind` on entry.
    #[must_use]
    pub const fn enter(kind: NodeKind) -> Self {
        Self {
            kind,
            phase: Phase::Enter,
        }
    }

    /// Matches nodes of `kind` on exit.
    #[must_use]
    pub const fn exit(kind: NodeKind) -> Self {
        Self {
            kind,
            phase: Phase::Exit,
        }
    }

    /// Matches the end of the traversal.
    #[must_use]
    pub const fn program_exit() -> Self {
        Self::exit(NodeKind::Program)
    }
}

/// Per-file state of a rule, called back during the tree walk.
pub trait RuleListener<'a> {
    /// Node kinds and phases this listener wants to see.
    fn selectors(&self) -> Vec<Selector>;

    /// Called for every node matching one of [`selectors`](Self::selectors).
    fn visit(&mut self, selector: Selector, node: &'a Node, cx: &mut RuleContext<'a>);
}

/// A problem reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Key into the rule's message table.
    pub message_id: &'static str,
    /// Values for the template placeholders.
    pub data: Vec<(&'static str, String)>,
    /// Where the problem is.
    pub loc: SourceLocation,
    /// Optional automatic fix.
    pub fix: Option<Fix>,
}

impl Report {
    /// Creates a report without data or fix.
    #[must_use]
    pub fn new(message_id: &'static str, loc: SourceLocation) -> Self {
        Self {
            message_id,
            data: Vec::new(),
            loc,
            fix: None,
        }
    }

    /// Adds a placeholder value.
    #[must_use]
    pub fn with_data(mut self, key: &'static str, value: impl ToString) -> Self {
        self.data.push((key, value.to_string()));
        self
    }

    /// Attaches a fix.
    #[must_use]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Attaches a fix if one is given.
    #[must_use]
    pub fn with_optional_fix(mut self, fix: Option<Fix>) -> Self {
        self.fix = fix;
        self
    }

    /// Renders the message template with this report's data.
    #[must_use]
    pub fn render(&self, template: &str) -> String {
        render_message(template, &self.data)
    }
}

/// Replaces `{{key}}` placeholders in a template.
///
/// Unknown placeholders are left as written.
#[must_use]
pub fn render_message(template: &str, data: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = after[..end].trim();
        match data.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}
