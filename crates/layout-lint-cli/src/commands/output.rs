//! Shared output formatting for lint results.

use anyhow::Result;
use layout_lint_core::{LintResult, ViolationDiagnostic};
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is the analyzed path; violation files are relative to it (or to
/// its parent when it is a single file).
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => print_pretty(result, root),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        println!("{}\n", violation.format());
    }
    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );
    let fixable = result.fixable_count();
    if fixable > 0 {
        println!("{fixable} violation(s) can be fixed with --fix");
    }
    if result.files_fixed > 0 {
        println!("Fixed {} file(s)", result.files_fixed);
    }
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

fn print_pretty(result: &LintResult, root: &Path) {
    let base = if root.is_file() {
        root.parent().unwrap_or(root)
    } else {
        root
    };
    for violation in &result.violations {
        let file = base.join(&violation.location.file);
        let mut diagnostic = ViolationDiagnostic::from(violation);
        match std::fs::read_to_string(&file) {
            Ok(content) => {
                let name = violation.location.file.display().to_string();
                diagnostic = diagnostic.with_source(name, content);
            }
            Err(e) => tracing::debug!("Cannot read {} for snippet: {}", file.display(), e),
        }
        eprintln!("{:?}", miette::Report::new(diagnostic));
    }
    print_summary(result);
}
