//! Check command implementation.

use anyhow::{Context, Result};
use layout_lint_core::{Analyzer, Config, RuleBox};
use layout_lint_rules::{configure_rule, rule_by_name, rules_from_config};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Options of the check command.
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes to run instead of the preset.
    pub rules_filter: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Whether to write fixes back.
    pub fix: bool,
}

/// Runs the check command.
pub fn run(path: &Path, options: CheckOptions, source: &ConfigSource) -> Result<()> {
    let config = load_config(source)?;
    let fail_on = config.fail_on_severity();

    let rules = match &options.rules_filter {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            filter_rules(&names, &config)
        }
        None => rules_from_config(&config),
    };

    // Build analyzer
    let mut builder = Analyzer::builder()
        .root(path)
        .config(config)
        .fix(options.fix);

    for pattern in options.exclude {
        builder = builder.exclude(pattern);
    }

    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, options.format, analyzer.root())?;

    if result.has_violations_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

fn filter_rules(names: &[&str], config: &Config) -> Vec<RuleBox> {
    let mut rules: Vec<RuleBox> = Vec::new();

    for name in names.iter().filter(|n| !n.is_empty()) {
        match rule_by_name(name) {
            Some(rule) if rules.iter().all(|r| r.name() != rule.name()) => {
                rules.push(configure_rule(rule, config));
            }
            Some(_) => {}
            None => tracing::warn!("Unknown rule: {}", name),
        }
    }

    rules
}
