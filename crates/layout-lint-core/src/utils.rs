//! Utility functions for rule implementations.

pub mod allowance;
pub mod brackets;
pub mod tokens;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use allowance::{AllowCheck, AllowIndex};
#[doc(inline)]
pub use brackets::bracket_pairs_in;
#[doc(inline)]
pub use tokens::{
    is_closing_paren_token, is_colon_token, is_first_token_or_comment_in_line,
    is_last_token_in_line, is_last_token_or_comment_in_line, is_opening_paren_token,
    is_template_token, is_token_on_same_line,
};
