//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! // layout-lint: allow(indent) reason="generated table"
//! /* layout-lint: allow(bracket-layout, indent) */
//! ```
//!
//! A directive covers the line it is written on and the line after it.

use crate::source::SourceCode;
use std::collections::{HashMap, HashSet};

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

impl AllowDirective {
    fn covers(&self, rule_name: &str) -> bool {
        self.rules.contains(rule_name) || self.rules.contains("all")
    }
}

/// Directives of one source file, indexed by the line they are written on.
#[derive(Debug, Default)]
pub struct AllowIndex {
    by_line: HashMap<usize, Vec<AllowDirective>>,
}

impl AllowIndex {
    /// Collects the directives found in a source's comments.
    #[must_use]
    pub fn from_source(source: &SourceCode) -> Self {
        let mut by_line: HashMap<usize, Vec<AllowDirective>> = HashMap::new();
        for comment in source.comments() {
            if let Some(directive) = parse_allow_directive(&comment.value) {
                by_line
                    .entry(comment.loc.end.line)
                    .or_default()
                    .push(directive);
            }
        }
        Self { by_line }
    }

    /// Returns true if the file has no directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    /// Checks whether `rule_name` is allowed on `line` (1-indexed).
    #[must_use]
    pub fn check(&self, line: usize, rule_name: &str) -> AllowCheck {
        for check_line in [line.saturating_sub(1), line] {
            let Some(directives) = self.by_line.get(&check_line) else {
                continue;
            };
            if let Some(directive) = directives.iter().find(|d| d.covers(rule_name)) {
                return AllowCheck::Allowed {
                    reason: directive.reason.clone(),
                };
            }
        }
        AllowCheck::Denied
    }
}

/// Parses an allowance directive from the text of a comment.
#[must_use]
pub fn parse_allow_directive(comment: &str) -> Option<AllowDirective> {
    let comment_content = if let Some(rest) = comment.strip_prefix("//") {
        rest.trim()
    } else {
        let rest = comment.strip_prefix("/*")?;
        rest.strip_suffix("*/").unwrap_or(rest).trim()
    };

    let directive = comment_content.strip_prefix("layout-lint:")?.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest.strip_prefix("reason=").and_then(|reason_part| {
        let quoted = reason_part.trim().strip_prefix('"')?;
        let end = quoted.find('"')?;
        Some(quoted[..end].to_string())
    });

    Some(AllowDirective { rules, reason })
}
