//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# layout-lint configuration
# See https://github.com/origin-1/layout-lint for documentation

# Rule preset: "recommended" (default), "strict" or "minimal"
preset = "recommended"

# Lowest severity that makes `layout-lint check` exit with status 1
# fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/dist/**",
]

# File extensions to analyze
extensions = ["js", "mjs", "cjs", "ts", "mts", "cts"]

# Respect .gitignore files
respect_gitignore = true

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.indent]
enabled = true
# severity = "warning"  # Override default severity
base_indent = 0

[rules.bracket-layout]
enabled = true

# [rules.no-leading-binary-operator]
# enabled = true

# [rules.no-extra-new]
# enabled = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("layout-lint.toml"), force)?;

    println!("Created layout-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit layout-lint.toml to configure rules");
    println!("  2. Run: layout-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_lint_core::Config;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert_eq!(config.rule("indent").unwrap().get_int("base_indent", 7), 0);
        assert!(config.is_rule_enabled("bracket-layout"));
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("layout-lint.toml");
        std::fs::write(&path, "# mine").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");

        write_config(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[rules.indent]"));
    }
}
