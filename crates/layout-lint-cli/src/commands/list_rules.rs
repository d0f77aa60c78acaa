//! List rules command implementation.

use layout_lint_core::RuleCategory;
use layout_lint_rules::{all_rules, Preset};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<8} {:<34} {:<11} {:<5} Description",
        "Code", "Name", "Category", "Fix"
    );
    println!("{}", "-".repeat(100));

    for rule in all_rules() {
        let meta = rule.meta();
        let category = match meta.category {
            RuleCategory::Layout => "layout",
            RuleCategory::Suggestion => "suggestion",
        };
        let fix = if meta.fixable.is_some() { "yes" } else { "-" };
        println!(
            "{:<8} {:<34} {:<11} {:<5} {}",
            rule.code(),
            rule.name(),
            category,
            fix,
            rule.description()
        );
        for option in meta.options {
            println!(
                "{:<8}   option `{}` (default {}): {}",
                "", option.name, option.default, option.description
            );
        }
    }

    println!("\nPresets:");
    for preset in [Preset::Recommended, Preset::Strict, Preset::Minimal] {
        let codes: Vec<&str> = preset.rules().iter().map(|r| r.code()).collect();
        println!("  {:<12} - {}", preset.as_str(), codes.join(", "));
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  layout-lint check --rules indent,bracket-layout");
    println!("  layout-lint check --rules LL001,LL002 --fix");
}
