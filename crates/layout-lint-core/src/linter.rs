//! Single-file lint engine: selector dispatch, reporting, and fix passes.

use crate::config::Config;
use crate::context::RuleContext;
use crate::fix::apply_fixes;
use crate::rule::{Phase, Report, RuleBox, RuleListener, Selector};
use crate::source::{NodeId, ParseError, SourceCode};
use crate::types::{Location, Severity, Violation};
use crate::utils::allowance::AllowIndex;

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, trace};

/// Upper bound on fix passes over one file.
pub const MAX_FIX_PASSES: usize = 10;

/// Result of [`Linter::fix_text`].
#[derive(Debug, Clone)]
pub struct FixOutput {
    /// Text after all fix passes.
    pub output: String,
    /// Number of passes that applied at least one fix.
    pub passes: usize,
    /// Violations remaining in `output`.
    pub violations: Vec<Violation>,
}

impl FixOutput {
    /// Returns true if any fix was applied.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.passes > 0
    }
}

/// Runs a set of rules over single source files.
pub struct Linter {
    rules: Vec<RuleBox>,
    config: Config,
}

struct RuleRun<'a, 'r> {
    rule: &'r RuleBox,
    listener: Box<dyn RuleListener<'a> + 'a>,
    cx: RuleContext<'a>,
}

impl Linter {
    /// Creates a linter for the given rules.
    #[must_use]
    pub fn new(rules: Vec<RuleBox>) -> Self {
        Self {
            rules,
            config: Config::default(),
        }
    }

    /// Sets the configuration used for enablement and severity overrides.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Returns the registered rules.
    #[must_use]
    pub fn rules(&self) -> &[RuleBox] {
        &self.rules
    }

    /// Parses and lints a source text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the text does not parse.
    pub fn lint_text(&self, path: &Path, text: &str) -> Result<Vec<Violation>, ParseError> {
        let source = SourceCode::parse(text)?;
        Ok(self.lint(path, &source))
    }

    /// Lints a parsed source.
    ///
    /// Every enabled rule's listener sees the nodes it selected during one
    /// pre/post-order walk of the tree. Violations are returned sorted by
    /// position.
    #[must_use]
    pub fn lint(&self, path: &Path, source: &SourceCode) -> Vec<Violation> {
        let mut runs: Vec<RuleRun<'_, '_>> = self
            .rules
            .iter()
            .filter(|rule| {
                let enabled = self.config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .map(|rule| RuleRun {
                rule,
                listener: rule.create(source),
                cx: RuleContext::new(source),
            })
            .collect();

        let mut dispatch: HashMap<Selector, Vec<usize>> = HashMap::new();
        for (i, run) in runs.iter().enumerate() {
            for selector in run.listener.selectors() {
                dispatch.entry(selector).or_default().push(i);
            }
        }

        let mut stack: Vec<(NodeId, Phase)> = vec![(source.root().id, Phase::Enter)];
        while let Some((id, phase)) = stack.pop() {
            let node = source.node(id);
            if phase == Phase::Enter {
                stack.push((id, Phase::Exit));
                stack.extend(node.children().iter().rev().map(|&c| (c, Phase::Enter)));
            }
            let selector = Selector {
                kind: node.kind,
                phase,
            };
            if let Some(indices) = dispatch.get(&selector) {
                for &i in indices {
                    let run = &mut runs[i];
                    run.listener.visit(selector, node, &mut run.cx);
                }
            }
        }

        let allow = AllowIndex::from_source(source);
        let mut violations = Vec::new();
        for run in runs {
            let rule = run.rule;
            let reports = run.cx.into_reports();
            trace!("{} reported {} problem(s)", rule.name(), reports.len());
            for report in reports {
                let violation = self.to_violation(path, source, rule, &report);
                if allow.is_empty() {
                    violations.push(violation);
                    continue;
                }
                let check = allow.check(violation.location.line, rule.name());
                if !check.is_allowed() {
                    violations.push(violation);
                } else if rule.requires_allow_reason() && check.reason().is_none() {
                    violations.push(
                        Violation::new(
                            rule.code(),
                            rule.name(),
                            Severity::Warning,
                            violation.location,
                            format!(
                                "Allow directive for '{}' is missing required reason",
                                rule.name()
                            ),
                        )
                        .with_help("Add reason=\"...\" to explain why this exception is necessary"),
                    );
                }
            }
        }

        violations.sort_by(|a, b| {
            (a.location.line, a.location.column)
                .cmp(&(b.location.line, b.location.column))
                .then_with(|| a.code.cmp(&b.code))
        });
        violations
    }

    /// Repeatedly lints and fixes a text until no fix applies.
    ///
    /// Stops after [`MAX_FIX_PASSES`] passes. Fixes that overlap within one
    /// pass are recomputed against the updated text in the next pass.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the input, or a fixed intermediate text,
    /// does not parse.
    pub fn fix_text(&self, path: &Path, text: &str) -> Result<FixOutput, ParseError> {
        let mut current = text.to_string();
        let mut passes = 0;
        loop {
            let violations = self.lint_text(path, &current)?;
            if passes >= MAX_FIX_PASSES {
                return Ok(FixOutput {
                    output: current,
                    passes,
                    violations,
                });
            }
            let outcome = apply_fixes(&current, violations.iter().filter_map(|v| v.fix.as_ref()));
            if outcome.applied == 0 {
                return Ok(FixOutput {
                    output: current,
                    passes,
                    violations,
                });
            }
            debug!(
                "Fix pass {} on {}: applied {}, deferred {}",
                passes + 1,
                path.display(),
                outcome.applied,
                outcome.skipped
            );
            current = outcome.output;
            passes += 1;
        }
    }

    fn to_violation(
        &self,
        path: &Path,
        source: &SourceCode,
        rule: &RuleBox,
        report: &Report,
    ) -> Violation {
        let meta = rule.meta();
        let message = meta.message(report.message_id).map_or_else(
            || report.message_id.to_string(),
            |template| report.render(template),
        );
        let start = source.offset_at(report.loc.start);
        let end = source.offset_at(report.loc.end).max(start);
        let location = Location::new(
            path.to_path_buf(),
            report.loc.start.line,
            report.loc.start.column + 1,
        )
        .with_end(report.loc.end.line, report.loc.end.column + 1)
        .with_span(start, end - start);
        let severity = self
            .config
            .rule_severity(rule.name())
            .unwrap_or_else(|| rule.default_severity());

        Violation::new(rule.code(), rule.name(), severity, location, message)
            .with_message_id(report.message_id)
            .with_docs_url(rule.docs_url())
            .with_fix(report.fix.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fix::Fix;
    use crate::rule::{Rule, RuleCategory, RuleMeta};
    use crate::source::{Node, NodeKind};

    static META: RuleMeta = RuleMeta {
        category: RuleCategory::Layout,
        description: "Flags calls and removes the space before their arguments",
        fixable: None,
        options: &[],
        messages: &[
            ("call", "Call of {{callee}}."),
            ("done", "Walk finished after {{order}}."),
        ],
    };

    struct CallRule(Severity);

    struct CallListener<'a> {
        source: &'a SourceCode,
        order: Vec<&'static str>,
    }

    impl<'a> RuleListener<'a> for CallListener<'a> {
        fn selectors(&self) -> Vec<Selector> {
            vec![
                Selector::enter(NodeKind::CallExpression),
                Selector::exit(NodeKind::CallExpression),
                Selector::program_exit(),
            ]
        }

        fn visit(&mut self, selector: Selector, node: &'a Node, cx: &mut RuleContext<'a>) {
            match (selector.kind, selector.phase) {
                (NodeKind::CallExpression, Phase::Enter) => {
                    self.order.push("enter");
                    let callee = self.source.child_by_field(node, "function");
                    let args = self.source.child_by_field(node, "arguments");
                    if let (Some(callee), Some(args)) = (callee, args) {
                        let mut report = Report::new("call", node.loc)
                            .with_data("callee", self.source.node_text(callee));
                        if callee.range.end < args.range.start {
                            report = report.with_fix(Fix::remove(callee.range.end..args.range.start));
                        }
                        cx.report(report);
                    }
                }
                (NodeKind::CallExpression, Phase::Exit) => self.order.push("exit"),
                _ => {
                    let order = self.order.join(" ");
                    cx.report(Report::new("done", node.loc).with_data("order", order));
                }
            }
        }
    }

    impl Rule for CallRule {
        fn name(&self) -> &'static str {
            "call-rule"
        }
        fn code(&self) -> &'static str {
            "LL900"
        }
        fn meta(&self) -> &'static RuleMeta {
            &META
        }
        fn default_severity(&self) -> Severity {
            self.0
        }
        fn create<'a>(&self, source: &'a SourceCode) -> Box<dyn RuleListener<'a> + 'a> {
            Box::new(CallListener {
                source,
                order: Vec::new(),
            })
        }
    }

    fn linter() -> Linter {
        Linter::new(vec![Box::new(CallRule(Severity::Warning))])
    }

    #[test]
    fn test_dispatches_enter_exit_and_program_exit() {
        let violations = linter()
            .lint_text(Path::new("a.js"), "f (g ());")
            .unwrap();
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Call of f.",
                "Walk finished after enter enter exit exit.",
                "Call of g."
            ]
        );
        assert_eq!(violations[0].location.column, 1);
        assert_eq!(violations[2].location.column, 4);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(violations[0].message_id.as_deref(), Some("call"));
    }

    #[test]
    fn test_fix_text_reaches_fixed_point() {
        let fixed = linter().fix_text(Path::new("a.js"), "f (g ());").unwrap();
        assert_eq!(fixed.output, "f(g());");
        assert!(fixed.changed());
        assert!(fixed.violations.iter().all(|v| v.fix.is_none()));
    }

    #[test]
    fn test_respects_config_enablement_and_severity() {
        let config = Config::parse("[rules.call-rule]\nseverity = \"error\"\n").unwrap();
        let violations = linter()
            .with_config(config)
            .lint_text(Path::new("a.js"), "f();")
            .unwrap();
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.severity == Severity::Error));
        assert_eq!(violations[0].message, "Call of f.");

        let config = Config::parse("[rules.call-rule]\nenabled = false\n").unwrap();
        let violations = linter()
            .with_config(config)
            .lint_text(Path::new("a.js"), "f();")
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn test_allow_directives_suppress_reports() {
        let violations = linter().lint_text(Path::new("a.js"), "f();").unwrap();
        assert_eq!(violations.len(), 2);

        let text = "// layout-lint: allow(call-rule)\nf();";
        let violations = linter().lint_text(Path::new("a.js"), text).unwrap();
        assert!(violations.is_empty(), "{violations:?}");

        let text = "f();\n\n/* layout-lint: allow(all) */\ng();";
        let violations = linter().lint_text(Path::new("a.js"), text).unwrap();
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, vec!["Call of f.", "Walk finished after enter exit enter exit."]);
    }

    #[test]
    fn test_error_rules_need_a_reason_to_be_allowed() {
        let strict = || Linter::new(vec![Box::new(CallRule(Severity::Error))]);

        let text = "// layout-lint: allow(call-rule)\nf();";
        let violations = strict().lint_text(Path::new("a.js"), text).unwrap();
        assert!(!violations.is_empty());
        assert!(violations.iter().all(|v| v.severity == Severity::Warning));
        assert!(violations
            .iter()
            .all(|v| v.message == "Allow directive for 'call-rule' is missing required reason"));

        let text = "// layout-lint: allow(call-rule) reason=\"generated\"\nf();";
        let violations = strict().lint_text(Path::new("a.js"), text).unwrap();
        assert!(violations.is_empty(), "{violations:?}");
    }
}
