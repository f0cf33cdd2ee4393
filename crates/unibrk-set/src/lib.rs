#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Code point sets for the break-rule compiler.
//!
//! Three pieces:
//! - [`UnicodeSet`] - an inversion-list set of code points with the usual
//!   boolean operations
//! - [`pattern`] - the character-class pattern grammar (`[a-z]`, `[^...]`,
//!   nested sets with `-` and `&`, `\p{...}`, `[:...:]`, `$variable`)
//! - [`escape`] - backslash escape decoding shared with the rule scanner

pub mod escape;
pub mod pattern;
mod property;
mod set;

#[cfg(test)]
mod set_tests;

pub use pattern::{PatternError, SetResolver, parse, parse_at};
pub use set::{CODE_POINT_MAX, UnicodeSet};
