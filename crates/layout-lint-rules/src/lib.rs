//! # layout-lint-rules
//!
//! Built-in layout rules for layout-lint.
//!
//! This crate provides the rules that police the placement of brackets,
//! indentation and spaces in JavaScript and TypeScript sources, plus a few
//! companion suggestions.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | LL001 | `bracket-layout` | Brackets on a separate line from their content |
//! | LL002 | `indent` | Four-space indentation derived from brackets and statement bodies |
//! | LL003 | `nice-space-before-function-paren` | Space before anonymous function parameters only |
//! | LL004 | `no-spaces-in-call-expression` | No space between a callee and `(` |
//! | LL005 | `no-spaces-in-tagged-template` | No space between a tag and its template |
//! | LL006 | `property-colon-spacing` | No space before a property colon, aligned values after it |
//! | LL007 | `property-shorthand` | `{ foo }` instead of `{ foo: foo }` |
//! | LL008 | `no-leading-binary-operator` | No operator at the start of a line followed by code |
//! | LL009 | `no-extra-new` | No `new` with call-equivalent built-in constructors |
//!
//! ## Usage
//!
//! ```ignore
//! use layout_lint_core::Analyzer;
//! use layout_lint_rules::{BracketLayout, Indent};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(BracketLayout::new())
//!     .rule(Indent::new().base_indent(1))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bracket_layout;
mod indent;
mod nice_space_before_function_paren;
mod no_extra_new;
mod no_leading_binary_operator;
mod no_spaces_in_call_expression;
mod no_spaces_in_tagged_template;
mod presets;
mod property_colon_spacing;
mod property_shorthand;

#[cfg(test)]
mod test_utils;

pub use bracket_layout::BracketLayout;
pub use indent::{Indent, INDENT_UNIT};
pub use nice_space_before_function_paren::NiceSpaceBeforeFunctionParen;
pub use no_extra_new::{NoExtraNew, CONSTRUCTOR_NAMES};
pub use no_leading_binary_operator::NoLeadingBinaryOperator;
pub use no_spaces_in_call_expression::NoSpacesInCallExpression;
pub use no_spaces_in_tagged_template::NoSpacesInTaggedTemplate;
pub use presets::{
    all_rules, configure_rule, minimal_rules, recommended_rules, rule_by_name,
    rules_from_config, strict_rules, Preset,
};
pub use property_colon_spacing::PropertyColonSpacing;
pub use property_shorthand::PropertyShorthand;

/// Re-export core types for convenience.
pub use layout_lint_core::{Rule, Severity, Violation};
