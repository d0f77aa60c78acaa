//! Rule to disallow `new` with built-in constructors that behave the same when called.
//!
//! ```text
//! new Error("boom");   // flagged, `Error("boom")` is equivalent
//! new Object();        // flagged
//! ```
//!
//! A name only refers to the built-in when nothing binds it in an enclosing
//! scope: a declaration, parameter, import or class of the same name makes the
//! expression a regular construction. Block scoping is not modelled, so a
//! binding anywhere in an enclosing function counts.
//!
//! A `/* global Name:off */` comment declares that the built-in is not
//! available, which also silences the rule for that name.
//!
//! # Suppression
//!
//! - `// layout-lint: allow(no-extra-new) reason="..."` comment

use layout_lint_core::{
    Node, NodeKind, Report, Rule, RuleCategory, RuleContext, RuleListener, RuleMeta, Selector,
    Severity, SourceCode, TokenKind,
};
use std::collections::HashSet;

/// Rule code for no-extra-new.
pub const CODE: &str = "LL009";

/// Rule name for no-extra-new.
pub const NAME: &str = "no-extra-new";

/// Built-in constructors that return the same object when called without `new`.
pub const CONSTRUCTOR_NAMES: &[&str] = &[
    "AggregateError",
    "Array",
    "Error",
    "EvalError",
    "Function",
    "Object",
    "RangeError",
    "ReferenceError",
    "RegExp",
    "SyntaxError",
    "TypeError",
    "URIError",
];

static META: RuleMeta = RuleMeta {
    category: RuleCategory::Suggestion,
    description: "Disallow unnecessary usages of the new syntax",
    fixable: None,
    options: &[],
    messages: &[("unexpected", "Unnecessary usage of the new syntax.")],
};

/// Disallows `new` with call-equivalent built-in constructors.
#[derive(Debug, Clone)]
pub struct NoExtraNew {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoExtraNew {
    fn default() -> Self {
        Self::new()
    }
}

impl NoExtraNew {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoExtraNew {
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
        Box::new(ExtraNewListener {
            source,
            disabled: disabled_globals(source),
        })
    }
}

struct ExtraNewListener<'a> {
    source: &'a SourceCode,
    disabled: HashSet<&'a str>,
}

impl<'a> RuleListener<'a> for ExtraNewListener<'a> {
    fn selectors(&self) -> Vec<Selector> {
        vec![Selector::enter(NodeKind::NewExpression)]
    }

    fn visit(&mut self, _selector: Selector, node: &'a Node, cx: &mut RuleContext<'a>) {
        let source = self.source;
        let Some(callee) = source
            .child_by_field(node, "constructor")
            .filter(|c| c.kind == NodeKind::Identifier)
        else {
            return;
        };
        let name = source.node_text(callee);
        if !CONSTRUCTOR_NAMES.contains(&name) || self.disabled.contains(name) {
            return;
        }
        if !self.is_bound(node, name) {
            cx.report(Report::new("unexpected", node.loc));
        }
    }
}

impl ExtraNewListener<'_> {
    /// Returns true if an enclosing scope binds `name`.
    fn is_bound(&self, node: &Node, name: &str) -> bool {
        let source = self.source;
        let mut current = source.parent(node);
        while let Some(scope) = current {
            if scope.kind == NodeKind::Program || is_function_scope(scope) {
                if self.scope_binds(scope, name) {
                    return true;
                }
            }
            current = source.parent(scope);
        }
        false
    }

    fn scope_binds(&self, scope: &Node, name: &str) -> bool {
        let source = self.source;
        if scope.kind != NodeKind::Program {
            // A function expression's own name is visible inside it.
            if source
                .child_by_field(scope, "name")
                .is_some_and(|n| source.node_text(n) == name)
            {
                return true;
            }
            let parameters = ["parameters", "parameter"]
                .into_iter()
                .filter_map(|field| source.child_by_field(scope, field));
            for params in parameters {
                if self.pattern_binds(params, name) {
                    return true;
                }
            }
        }
        let mut stack: Vec<&Node> = match source.child_by_field(scope, "body") {
            Some(body) if scope.kind != NodeKind::Program => vec![body],
            _ => source.children(scope).collect(),
        };
        while let Some(node) = stack.pop() {
            match node.kind {
                NodeKind::VariableDeclarator | NodeKind::CatchClause => {
                    let field = if node.kind == NodeKind::CatchClause {
                        "parameter"
                    } else {
                        "name"
                    };
                    if source
                        .child_by_field(node, field)
                        .is_some_and(|pattern| self.pattern_binds(pattern, name))
                    {
                        return true;
                    }
                    if let Some(body) = source.child_by_field(node, "body") {
                        stack.push(body);
                    }
                }
                NodeKind::FunctionDeclaration
                | NodeKind::GeneratorFunctionDeclaration
                | NodeKind::ClassDeclaration => {
                    if source
                        .child_by_field(node, "name")
                        .is_some_and(|n| source.node_text(n) == name)
                    {
                        return true;
                    }
                }
                NodeKind::ImportClause => {
                    if self.pattern_binds(node, name) {
                        return true;
                    }
                }
                NodeKind::ImportAlias => {
                    if source
                        .children(node)
                        .next()
                        .is_some_and(|alias| source.node_text(alias) == name)
                    {
                        return true;
                    }
                }
                _ if is_function_scope(node) || node.kind == NodeKind::Class => {}
                _ => stack.extend(source.children(node)),
            }
        }
        false
    }

    /// Returns true if a binding pattern introduces `name`.
    ///
    /// Default values and type annotations are not bindings.
    fn pattern_binds(&self, pattern: &Node, name: &str) -> bool {
        let source = self.source;
        let mut stack = vec![pattern];
        while let Some(node) = stack.pop() {
            match node.kind {
                NodeKind::Identifier | NodeKind::ShorthandPropertyIdentifierPattern => {
                    if source.node_text(node) == name {
                        return true;
                    }
                }
                _ if is_function_scope(node) => {}
                _ => stack.extend(source.children(node).filter(|child| {
                    !matches!(child.field, Some("right" | "type" | "decorator"))
                        && !(child.field == Some("value")
                            && node.kind != NodeKind::Other("pair_pattern"))
                })),
            }
        }
        false
    }
}

fn is_function_scope(node: &Node) -> bool {
    node.is_function() || node.kind == NodeKind::MethodDefinition
}

/// Names switched off by `/* global Name:off */` comments.
fn disabled_globals(source: &SourceCode) -> HashSet<&str> {
    let mut disabled = HashSet::new();
    for comment in source.comments() {
        if comment.kind != TokenKind::BlockComment {
            continue;
        }
        let text = source.slice(comment.range.clone());
        let body = text
            .strip_prefix("/*")
            .and_then(|t| t.strip_suffix("*/"))
            .unwrap_or(text)
            .trim_start();
        let Some(list) = body
            .strip_prefix("globals")
            .or_else(|| body.strip_prefix("global"))
            .filter(|rest| rest.starts_with(char::is_whitespace))
        else {
            continue;
        };
        for entry in list.split(',') {
            if let Some((name, value)) = entry.split_once(':') {
                if value.trim() == "off" {
                    disabled.insert(name.trim());
                }
            }
        }
    }
    disabled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{lint, message_ids};
    use layout_lint_core::Violation;

    fn check_code(code: &str) -> Vec<Violation> {
        lint(NoExtraNew::new(), code)
    }

    #[test]
    fn test_accepts_custom_and_shadowed_constructors() {
        let valid = [
            "var myObject = {};",
            "var myObject = new CustomObject();",
            "var foo = new foo.Object();",
            "var Object = function Object() {};\nnew Object();",
            "var x = something ? MyClass : Object;\nvar y = new x();",
            "class Object\n{\n    constructor() { }\n}\nnew Object();",
            "import { Object } from './';\nnew Object();",
            "import Error from './error';\nnew Error();",
            "var Error = CustomError;\nfunction foo()\n{\n    throw new Error();\n}",
            "function foo()\n{\n    throw new Error();\n}\nconst Error = CustomError;",
            "function foo({ Error })\n{\n    throw new Error();\n}",
            "try { } catch (Error) { new Error(); }",
            "/* global RegExp:off */\nnew RegExp(pattern, flags);",
        ];
        for code in valid {
            let violations = check_code(code);
            assert!(violations.is_empty(), "{code:?}: {violations:?}");
        }
    }

    #[test]
    fn test_reports_builtin_constructors() {
        let violations = check_code("var foo = new Object();");
        assert_eq!(violations.len(), 1);
        insta::assert_snapshot!(violations[0].message, @"Unnecessary usage of the new syntax.");
        assert_eq!(violations[0].location.column, 11);
        assert!(violations[0].fix.is_none());

        let code = "new Array;\nnew Error;\nnew EvalError;\nnew Function;\nnew Object;\nnew RangeError;\nnew ReferenceError;\nnew RegExp;\nnew SyntaxError;\nnew TypeError;\nnew URIError;\nthrow new AggregateError(errors);";
        assert_eq!(message_ids(&check_code(code)), ["unexpected"; 12]);
    }

    #[test]
    fn test_resolves_bindings_per_function() {
        let code = "function foo(Error)\n{\n    throw new Error;\n}\nthrow new Error;";
        let violations = check_code(code);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 5);
    }

    #[test]
    fn test_ignores_default_values_in_parameters() {
        let violations = check_code("function foo(a = Error)\n{\n    return new Error();\n}");
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_reads_global_comments() {
        let source = SourceCode::parse("/* globals Foo, RegExp: off, Array:readonly */").expect("valid source");
        let disabled = disabled_globals(&source);
        assert!(disabled.contains("RegExp"));
        assert!(!disabled.contains("Array"));
        assert!(!disabled.contains("Foo"));
    }
}
