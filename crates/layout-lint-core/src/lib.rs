//! # layout-lint-core
//!
//! Core framework for source-layout linting of JavaScript and TypeScript.
//!
//! This crate provides the foundational traits and types for building
//! layout rules. It includes:
//!
//! - [`SourceCode`], a parsed view of a file (tokens, comments, nodes)
//! - [`Rule`] and [`RuleListener`] for selector-based rules
//! - [`Linter`] for running rules over one file and applying their fixes
//! - [`Analyzer`] for orchestrating lint execution over a directory
//! - [`Violation`] for representing lint findings
//!
//! ## Example
//!
//! ```ignore
//! use layout_lint_core::{Analyzer, Severity};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! println!("{} violation(s)", result.violations.len());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod fix;
mod linter;
mod rule;
mod types;

/// Parsed source model.
pub mod source;
/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{FileContext, RuleContext};
pub use fix::{apply_fixes, Edit, Fix, FixOutcome};
pub use linter::{FixOutput, Linter, MAX_FIX_PASSES};
pub use rule::{
    render_message, FixKind, OptionKind, Phase, Report, Rule, RuleBox, RuleCategory,
    RuleListener, RuleMeta, RuleOption, Selector, DOCS_BASE_URL,
};
pub use source::{
    Node, NodeId, NodeKind, ParseError, Position, SourceCode, SourceLocation, Token, TokenKind,
};
pub use types::{Location, LintResult, Severity, Violation, ViolationDiagnostic};
pub use utils::allowance::{AllowCheck, AllowIndex};
