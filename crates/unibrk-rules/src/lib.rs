#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Break-rule compiler front end.
//!
//! Compiles break-iteration rule text into parse trees ready for a
//! state-table builder:
//! - [`scanner`] - character-level reading: comments, escapes, quoted runs,
//!   line/column tracking
//! - a table-driven rule grammar with operator-precedence tree
//!   construction
//! - [`node`] - the arena-allocated parse tree
//! - [`symbols`] - `$variable` definitions and references
//!
//! The usual entry point is [`compile_rules`]:
//!
//! ```
//! use unibrk_rules::{RuleDirection, compile_rules};
//!
//! let compiled = compile_rules(r"[\p{L}]+;").unwrap();
//! assert!(compiled.root(RuleDirection::Forward).is_some());
//! ```

pub mod builder;
pub mod error;
pub mod node;
pub mod scanner;
pub mod symbols;

mod parser;
mod table;

#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod node_tests;
#[cfg(test)]
mod scanner_tests;

pub use builder::{CompiledRules, RuleDirection, RuleOptions, compile_rules};
pub use error::{RuleError, RuleErrorKind, Warning, WarningKind};
pub use node::{Node, NodeArena, NodeId, NodeType};
pub use scanner::strip_rules;
pub use symbols::SymbolTable;
