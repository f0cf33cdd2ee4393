//! Public compilation surface: feed rule text in, get the parse trees,
//! the referenced character classes, and the accumulated options out.

use unibrk_set::UnicodeSet;

use crate::error::{RuleError, Warning};
use crate::node::{NodeArena, NodeId};
use crate::parser::RuleParser;
use crate::symbols::SymbolTable;

/// The four rule groups collected while parsing. Each group ORs its rules
/// into one tree; `!!forward` and friends select which group subsequent
/// rules land in, and a leading `!` on a rule forces the reverse group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleDirection {
    Forward,
    Reverse,
    SafeForward,
    SafeReverse,
}

impl RuleDirection {
    pub(crate) fn index(self) -> usize {
        match self {
            RuleDirection::Forward => 0,
            RuleDirection::Reverse => 1,
            RuleDirection::SafeForward => 2,
            RuleDirection::SafeReverse => 3,
        }
    }
}

/// Global options set by `!!option;` statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleOptions {
    /// `!!chain`: allow rule chaining for longer matches.
    pub chain_rules: bool,
    /// `!!LBCMNoChain`: suppress chaining into line-break combining marks.
    pub lbcm_no_chain: bool,
    /// `!!lookAheadHardBreak`: look-ahead matches break immediately.
    pub look_ahead_hard_break: bool,
}

/// Result of a successful [`compile_rules`] run: the parse trees plus
/// everything the downstream state-table builder needs.
#[derive(Debug)]
pub struct CompiledRules {
    pub(crate) arena: NodeArena,
    pub(crate) roots: [Option<NodeId>; 4],
    pub(crate) set_nodes: Vec<NodeId>,
    pub(crate) symbols: SymbolTable,
    pub(crate) warnings: Vec<Warning>,
    pub(crate) options: RuleOptions,
    pub(crate) rule_count: u32,
}

impl CompiledRules {
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Root of the merged tree for one direction. Forward and reverse are
    /// always present after a successful compile; the safe groups only if
    /// the rules used them.
    pub fn root(&self, direction: RuleDirection) -> Option<NodeId> {
        self.roots[direction.index()]
    }

    /// Every distinct character class referenced by the rules, in first-use
    /// order. Nodes are of the set-holding kind; their `input_set` is the
    /// built [`UnicodeSet`].
    pub fn set_nodes(&self) -> &[NodeId] {
        &self.set_nodes
    }

    /// The set built for a given class source text, if it was referenced.
    pub fn set_for(&self, text: &str) -> Option<&UnicodeSet> {
        self.set_nodes
            .iter()
            .map(|&id| self.arena.node(id))
            .find(|n| n.text == text)
            .and_then(|n| n.input_set.as_ref())
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn options(&self) -> RuleOptions {
        self.options
    }

    /// Number of rules scanned, counting assignments and both directions.
    pub fn rule_count(&self) -> u32 {
        self.rule_count
    }

    /// Indented text rendering of one direction's tree, for diagnostics.
    pub fn dump_tree(&self, direction: RuleDirection) -> String {
        match self.root(direction) {
            Some(root) => self.arena.dump_tree(root),
            None => String::from("-- empty --\n"),
        }
    }
}

/// Compile a rule string into parse trees and character classes.
///
/// Errors carry the line and column of the offending character. Conditions
/// worth flagging that do not stop compilation, currently only
/// unrecognized `!!option` keywords, are collected as warnings on the
/// result.
pub fn compile_rules(rules: &str) -> Result<CompiledRules, RuleError> {
    let mut parser = RuleParser::new(rules)?;
    parser.parse()?;
    Ok(parser.into_compiled())
}
