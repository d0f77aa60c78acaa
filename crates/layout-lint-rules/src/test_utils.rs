//! Helpers shared by the rule tests.

use layout_lint_core::{Linter, Rule, Violation};
use std::path::Path;

/// Lints `code` with a single rule.
pub(crate) fn lint(rule: impl Rule + 'static, code: &str) -> Vec<Violation> {
    Linter::new(vec![Box::new(rule)])
        .lint_text(Path::new("test.ts"), code)
        .expect("test source should parse")
}

/// Applies a single rule's fixes until none is left.
///
/// Fails when linting the output again still finds something to fix.
pub(crate) fn fix(rule: impl Rule + 'static, code: &str) -> String {
    let linter = Linter::new(vec![Box::new(rule)]);
    let path = Path::new("test.ts");
    let fixed = linter.fix_text(path, code).expect("test source should parse");
    let leftover: Vec<_> = linter
        .lint_text(path, &fixed.output)
        .expect("fixed source should parse")
        .into_iter()
        .filter(Violation::is_fixable)
        .collect();
    assert!(
        leftover.is_empty(),
        "fixing {code:?} stopped at {:?} with fixable violations left: {leftover:#?}",
        fixed.output
    );
    fixed.output
}

/// Message ids of the violations, in report order.
pub(crate) fn message_ids(violations: &[Violation]) -> Vec<&str> {
    violations
        .iter()
        .filter_map(|v| v.message_id.as_deref())
        .collect()
}
