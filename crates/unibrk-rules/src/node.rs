//! Parse tree nodes.
//!
//! Nodes live in a [`NodeArena`] and point at each other by [`NodeId`].
//! During parsing the node stack holds partially assembled chunks of the
//! tree; by the end, each rule direction has a single root.

use unibrk_set::UnicodeSet;

/// Index of a node in its [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Reference to a character class; left child is the shared [`USet`] node.
    ///
    /// [`USet`]: NodeType::USet
    SetRef,
    /// Holds an actual [`UnicodeSet`]; shared between identically written
    /// class literals and never on the node stack.
    USet,
    /// `$name` reference; left child is the defining expression, once known.
    VarRef,
    /// `/` look-ahead break position, tagged with its rule number.
    LookAhead,
    /// `{nnn}` status tag.
    Tag,
    /// Synthetic end-of-match marker appended to look-ahead rules.
    EndMark,
    /// Start-of-expression marker, lowest precedence.
    OpStart,
    /// Implicit concatenation.
    OpCat,
    /// `|` alternation.
    OpOr,
    OpStar,
    OpPlus,
    OpQuestion,
    /// Open paren marker; precedence keeps inner operators from binding out.
    OpLParen,
}

pub const PREC_ZERO: u8 = 0;
pub const PREC_START: u8 = 1;
pub const PREC_LPAREN: u8 = 2;
pub const PREC_OP_OR: u8 = 3;
pub const PREC_OP_CAT: u8 = 4;

impl NodeType {
    /// Binary-operator precedence; zero for anything that is not an
    /// operator awaiting a right operand.
    pub fn precedence(self) -> u8 {
        match self {
            NodeType::OpStart => PREC_START,
            NodeType::OpLParen => PREC_LPAREN,
            NodeType::OpOr => PREC_OP_OR,
            NodeType::OpCat => PREC_OP_CAT,
            _ => PREC_ZERO,
        }
    }

    fn name(self) -> &'static str {
        match self {
            NodeType::SetRef => "setRef",
            NodeType::USet => "uset",
            NodeType::VarRef => "varRef",
            NodeType::LookAhead => "lookAhead",
            NodeType::Tag => "tag",
            NodeType::EndMark => "endMark",
            NodeType::OpStart => "opStart",
            NodeType::OpCat => "opCat",
            NodeType::OpOr => "opOr",
            NodeType::OpStar => "opStar",
            NodeType::OpPlus => "opPlus",
            NodeType::OpQuestion => "opQuestion",
            NodeType::OpLParen => "opLParen",
        }
    }
}

/// One parse tree node.
#[derive(Debug, Clone)]
pub struct Node {
    pub node_type: NodeType,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
    /// Byte offset in the source where this node's text begins.
    pub first_pos: usize,
    /// Byte offset just past this node's text.
    pub last_pos: usize,
    /// Source text: the class literal for set references, the name for
    /// variable references, the right-hand side for definitions.
    pub text: String,
    /// Tag value, or rule number for look-ahead and end-mark nodes.
    pub val: i32,
    /// The set itself, on `USet` nodes only.
    pub input_set: Option<UnicodeSet>,
    /// This node is the root of a complete rule expression.
    pub rule_root: bool,
    /// Rule chaining may enter this rule mid-match.
    pub chain_in: bool,
    /// End-mark for a look-ahead rule (forces a hard break on match).
    pub look_ahead_end: bool,
}

impl Node {
    fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            left: None,
            right: None,
            parent: None,
            first_pos: 0,
            last_pos: 0,
            text: String::new(),
            val: 0,
            input_set: None,
            rule_root: false,
            chain_in: false,
            look_ahead_end: false,
        }
    }

    pub fn precedence(&self) -> u8 {
        self.node_type.precedence()
    }
}

/// Owns every node created while compiling one rule set.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(node_type));
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Render the tree under `root` as indented text, one node per line.
    ///
    /// Set references print their source text rather than descending into
    /// the shared set node, and variable references print by name rather
    /// than expanding their definition, so the dump stays readable and
    /// acyclic.
    pub fn dump_tree(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.dump_node(root, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let n = self.node(id);
        for _ in 0..depth {
            out.push_str("    ");
        }
        out.push_str(n.node_type.name());
        match n.node_type {
            NodeType::SetRef => {
                if !n.text.is_empty() {
                    out.push(' ');
                    out.push_str(&n.text);
                }
            }
            NodeType::VarRef => {
                out.push_str(" $");
                out.push_str(&n.text);
            }
            NodeType::Tag => {
                out.push_str(&format!(" {}", n.val));
            }
            NodeType::LookAhead | NodeType::EndMark => {
                out.push_str(&format!(" rule={}", n.val));
            }
            _ => {}
        }
        if n.rule_root {
            out.push_str(" [root]");
        }
        if n.chain_in {
            out.push_str(" [chainIn]");
        }
        out.push('\n');

        let descend = !matches!(n.node_type, NodeType::SetRef | NodeType::VarRef);
        if descend {
            if let Some(left) = n.left {
                self.dump_node(left, depth + 1, out);
            }
            if let Some(right) = n.right {
                self.dump_node(right, depth + 1, out);
            }
        }
    }
}
