//! Integration test: the built-in rules end-to-end via Analyzer.
//!
//! Uses the fixture project under `tests/fixtures/project/`, which holds one
//! clean TypeScript file, one JavaScript file with two problems and an
//! excluded `node_modules` directory.

use layout_lint_core::{Analyzer, Config, LintResult, Linter, Severity, MAX_FIX_PASSES};
use layout_lint_rules::{all_rules, rules_from_config};
use std::path::{Path, PathBuf};

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project")
}

fn analyze(root: &Path, fix: bool) -> LintResult {
    let config = Config::from_file(&root.join("layout-lint.toml")).expect("fixture config should load");
    let mut builder = Analyzer::builder().root(root).fix(fix);
    for rule in rules_from_config(&config) {
        builder = builder.rule_box(rule);
    }
    builder
        .config(config)
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed")
}

fn copy_fixture(to: &Path) {
    let from = fixture_root();
    std::fs::create_dir_all(to.join("src")).unwrap();
    for file in ["layout-lint.toml", "src/good.ts", "src/bad.js"] {
        std::fs::copy(from.join(file), to.join(file)).unwrap();
    }
}

// ── Detection ──

#[test]
fn reports_problems_of_the_bad_file_only() {
    let result = analyze(&fixture_root(), false);

    assert_eq!(result.files_checked, 2, "node_modules and .txt files are skipped");
    let found: Vec<_> = result
        .violations
        .iter()
        .map(|v| {
            (
                v.code.as_str(),
                v.location.file.to_string_lossy().replace('\\', "/"),
                v.location.line,
                v.location.column,
            )
        })
        .collect();
    assert_eq!(
        found,
        vec![
            ("LL004", "src/bad.js".to_string(), 1, 23),
            ("LL007", "src/bad.js".to_string(), 2, 15),
        ]
    );
}

#[test]
fn violation_details_carry_docs_and_fix() {
    let result = analyze(&fixture_root(), false);

    let call = &result.violations[0];
    assert_eq!(call.rule, "no-spaces-in-call-expression");
    assert_eq!(call.severity, Severity::Error);
    assert_eq!(call.message_id.as_deref(), Some("unexpectedSpace"));
    assert!(call.is_fixable());
    assert!(call
        .docs_url
        .as_deref()
        .is_some_and(|url| url.ends_with("no-spaces-in-call-expression.md")));

    let shorthand = &result.violations[1];
    assert_eq!(shorthand.rule, "property-shorthand");
    assert_eq!(shorthand.severity, Severity::Warning);
    assert_eq!(result.count_by_severity(), (1, 1, 0));
    assert_eq!(result.fixable_count(), 2);
}

// ── Fixing ──

#[test]
fn fix_rewrites_the_bad_file_and_leaves_the_clean_one() {
    let tmp = tempfile::TempDir::new().unwrap();
    copy_fixture(tmp.path());
    let good_before = std::fs::read_to_string(tmp.path().join("src/good.ts")).unwrap();

    let result = analyze(tmp.path(), true);

    assert_eq!(result.files_fixed, 1);
    assert!(result.violations.is_empty(), "{:#?}", result.violations);
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("src/bad.js")).unwrap(),
        "const result = compute(1);\nconst obj = { value };\n"
    );
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("src/good.ts")).unwrap(),
        good_before
    );

    let again = analyze(tmp.path(), true);
    assert_eq!(again.files_fixed, 0);
}

#[test]
fn single_file_root_reports_paths_beside_it() {
    let root = fixture_root().join("src/bad.js");
    let mut builder = Analyzer::builder().root(&root);
    for rule in all_rules() {
        builder = builder.rule_box(rule);
    }
    let result = builder.build().unwrap().analyze().unwrap();

    assert_eq!(result.files_checked, 1);
    assert!(result
        .violations
        .iter()
        .all(|v| v.location.file == Path::new("bad.js")));
}

// ── Configuration ──

#[test]
fn config_disables_rules_and_overrides_severity() {
    let config = Config::parse(
        r#"
[rules.no-spaces-in-call-expression]
enabled = false

[rules.property-shorthand]
severity = "error"
"#,
    )
    .unwrap();
    let linter = Linter::new(rules_from_config(&config)).with_config(config);

    let violations = linter
        .lint_text(Path::new("bad.js"), "compute (1);\nconst obj = { value: value };\n")
        .unwrap();

    assert_eq!(violations.len(), 1, "{violations:#?}");
    assert_eq!(violations[0].rule, "property-shorthand");
    assert_eq!(violations[0].severity, Severity::Error);
}

#[test]
fn all_rules_converge_on_messy_code() {
    let code = "const config = {\n  name : name,\n  debug:true,\n};\nrun (config);\n";
    let linter = Linter::new(all_rules());

    let fixed = linter.fix_text(Path::new("messy.ts"), code).unwrap();
    assert!(fixed.changed());
    assert!(fixed.passes < MAX_FIX_PASSES, "fixes did not converge");
    assert!(fixed.output.contains("    name,\n"), "{}", fixed.output);
    assert!(fixed.output.contains("debug: true"), "{}", fixed.output);
    assert!(fixed.output.contains("run(config);"), "{}", fixed.output);

    let again = linter.fix_text(Path::new("messy.ts"), &fixed.output).unwrap();
    assert!(!again.changed(), "{:?}", again.violations);
}
