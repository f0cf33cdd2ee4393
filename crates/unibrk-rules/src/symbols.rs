//! The `$variable` symbol table.
//!
//! Entries are created only when an assignment statement completes; every
//! later `$name` reference looks its definition up here. The table also
//! bridges into the set pattern grammar, so `[$vowels]` style references
//! inside class literals resolve against the same definitions.

use indexmap::IndexMap;
use unibrk_set::{SetResolver, UnicodeSet};

use crate::node::{NodeArena, NodeId, NodeType};

/// Maps `$name` to its defining variable-reference node.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: IndexMap<String, NodeId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The defining node for `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.entries.get(name).copied()
    }

    /// Bind `name` to its definition. Returns `false` when the name is
    /// already bound; redefinition is a rule error.
    pub fn insert(&mut self, name: String, node: NodeId) -> bool {
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(name, node);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Read-only view handed to the set pattern parser while scanning a class
/// literal. Only variables whose definition is a plain set resolve; a
/// variable bound to a larger expression is not usable inside a set.
pub struct SymbolSetResolver<'a> {
    pub arena: &'a NodeArena,
    pub symbols: &'a SymbolTable,
}

impl SetResolver for SymbolSetResolver<'_> {
    fn resolve_set(&self, name: &str) -> Option<UnicodeSet> {
        let var_ref = self.symbols.lookup(name)?;
        let def = self.arena.node(var_ref).left?;
        let def = self.arena.node(def);
        if def.node_type != NodeType::SetRef {
            return None;
        }
        let uset = self.arena.node(def.left?);
        uset.input_set.clone()
    }
}
