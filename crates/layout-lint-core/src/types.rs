//! Violations, their locations, and analysis results.

use crate::fix::Fix;
use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How serious a violation is. Ordered from `Info` to `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported only.
    Info,
    /// Worth fixing.
    Warning,
    /// Fails a check by default.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File, relative to the analyzed directory.
    pub file: PathBuf,
    /// Start line, 1-based.
    pub line: usize,
    /// Start column, 1-based, in bytes.
    pub column: usize,
    /// End line number (1-indexed).
    pub end_line: usize,
    /// End column number (1-indexed, exclusive).
    pub end_column: usize,
    /// Byte offset of the start.
    pub offset: usize,
    /// Span length in bytes.
    pub length: usize,
}

impl Location {
    /// Zero-width location at a line and column.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            end_line: line,
            end_column: column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the end of this location.
    #[must_use]
    pub fn with_end(mut self, end_line: usize, end_column: usize) -> Self {
        self.end_line = end_line;
        self.end_column = end_column;
        self
    }

    /// Sets the byte span.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// One reported layout problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "LL001").
    pub code: String,
    /// Rule name (e.g., "bracket-layout").
    pub rule: String,
    /// Configured or default severity of the rule.
    pub severity: Severity,
    /// Reported range.
    pub location: Location,
    /// Rendered message.
    pub message: String,
    /// Message id within the rule's message table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Optional hint on how to resolve the violation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Optional automatic fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
    /// Link to the rule documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,
}

impl Violation {
    /// Violation without message id, fix or links.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            message_id: None,
            help: None,
            fix: None,
            docs_url: None,
        }
    }

    /// Sets the message id.
    #[must_use]
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Adds a documentation link to this violation.
    #[must_use]
    pub fn with_docs_url(mut self, docs_url: impl Into<String>) -> Self {
        self.docs_url = Some(docs_url.into());
        self
    }

    /// Adds a help message to this violation.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Attaches an automatic fix.
    #[must_use]
    pub fn with_fix(mut self, fix: Option<Fix>) -> Self {
        self.fix = fix;
        self
    }

    /// Returns true if the violation carries an automatic fix.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }

    /// Multi-line rendering used by the `text` output format.
    #[must_use]
    pub fn format(&self) -> String {
        let mut lines = vec![
            format!(
                "{}:{}:{}: {} [{}] {}",
                self.location.file.display(),
                self.location.line,
                self.location.column,
                self.severity,
                self.code,
                self.rule,
            ),
            format!("  {}", self.message),
        ];
        lines.extend(self.help.iter().map(|help| format!("  = help: {help}")));
        if self.is_fixable() {
            lines.push("  = fixable with --fix".to_string());
        }
        lines.extend(self.docs_url.iter().map(|url| format!("  = see: {url}")));
        lines.join("\n")
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A violation as a miette diagnostic, for the `pretty` output format.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
    #[source_code]
    source_code: Option<miette::NamedSource<String>>,
}

impl ViolationDiagnostic {
    /// Attaches the file contents so the span can be rendered.
    #[must_use]
    pub fn with_source(mut self, name: impl AsRef<str>, content: String) -> Self {
        self.source_code = Some(miette::NamedSource::new(name, content));
        self
    }
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("{} ({}): {}", v.code, v.rule, v.message),
            help: v.help.clone().or_else(|| v.docs_url.clone()),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v.message_id.clone().unwrap_or_else(|| v.rule.clone()),
            source_code: None,
        }
    }
}

/// Outcome of an [`Analyzer`](crate::Analyzer) run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Files parsed and linted.
    pub files_checked: usize,
    /// Number of files rewritten by fixes.
    #[serde(default)]
    pub files_fixed: usize,
}

impl LintResult {
    /// Empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts violations as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations
            .iter()
            .fold((0, 0, 0), |(errors, warnings, infos), v| match v.severity {
                Severity::Error => (errors + 1, warnings, infos),
                Severity::Warning => (errors, warnings + 1, infos),
                Severity::Info => (errors, warnings, infos + 1),
            })
    }

    /// Number of violations that carry an automatic fix.
    #[must_use]
    pub fn fixable_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_fixable()).count()
    }

    /// Returns true if a violation is at least as severe as `severity`.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }
}
