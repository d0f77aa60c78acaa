//! `layout-lint.toml` schema.
//!
//! ```toml
//! preset = "recommended"
//! fail_on = "warning"
//!
//! [analyzer]
//! exclude = ["**/generated/**"]
//!
//! [rules.indent]
//! severity = "warning"
//! base_indent = 1
//! ```

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rule preset: `recommended`, `strict` or `minimal`.
    pub preset: Option<String>,

    /// Lowest severity that fails a check (default: `error`).
    pub fail_on: Option<Severity>,

    /// File discovery settings.
    pub analyzer: AnalyzerConfig,

    /// `[rules.<name>]` sections.
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid config TOML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses config TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid config TOML.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// A rule runs unless its section says `enabled = false`.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rule(rule_name)
            .and_then(|rule| rule.enabled)
            .unwrap_or(true)
    }

    /// Severity configured for a rule, if overridden.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rule(rule_name).and_then(|rule| rule.severity)
    }

    /// The `[rules.<name>]` section of a rule.
    #[must_use]
    pub fn rule(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Lowest failing severity.
    #[must_use]
    pub fn fail_on_severity(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Error)
    }
}

/// `[analyzer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Directory analyzed when the CLI is not given a path.
    pub root: PathBuf,

    /// Glob patterns of skipped paths.
    pub exclude: Vec<String>,

    /// Extensions of analyzed files, without the dot.
    pub extensions: Vec<String>,

    /// Skip files ignored by `.gitignore`.
    pub respect_gitignore: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            exclude: default_excludes(),
            extensions: default_extensions(),
            respect_gitignore: true,
        }
    }
}

/// Exclude patterns used when none are configured.
#[must_use]
pub fn default_excludes() -> Vec<String> {
    vec!["**/node_modules/**".to_string(), "**/dist/**".to_string()]
}

/// Extensions analyzed when none are configured.
#[must_use]
pub fn default_extensions() -> Vec<String> {
    ["js", "mjs", "cjs", "ts", "mts", "cts"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// `[rules.<name>]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Turns the rule on (outside its preset) or off.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule options, such as `base_indent`.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Boolean option, or `default` when absent or not a boolean.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Integer option, or `default` when absent or not an integer.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config text is not valid.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
