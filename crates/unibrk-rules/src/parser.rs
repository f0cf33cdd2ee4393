//! The table-driven rule parser.
//!
//! Runs the state machine in [`table`], one transition per input character.
//! Each transition may perform a grammar action against the node stack,
//! push a return state, and advance the scanner. Expressions are assembled
//! with an operator-precedence scheme: operand and operator nodes pile up
//! on the node stack, and [`RuleParser::fix_op_stack`] binds operands to
//! pending operators whenever a lower-precedence operator or a closing
//! delimiter arrives.

use indexmap::IndexMap;
use unibrk_set::pattern::{self, PatternError};
use unibrk_set::UnicodeSet;

use crate::builder::{CompiledRules, RuleDirection, RuleOptions};
use crate::error::{RuleError, RuleErrorKind, Warning, WarningKind};
use crate::node::{
    NodeArena, NodeId, NodeType, PREC_LPAREN, PREC_OP_CAT, PREC_START, PREC_ZERO,
};
use crate::scanner::{RuleChar, RuleScanner};
use crate::symbols::{SymbolSetResolver, SymbolTable};
use crate::table::{self, CharClass, Next, ParseAction, Row, State};

/// Capacity of the node and state stacks. Corresponds roughly to the
/// nesting depth allowed in the rules.
const STACK_SIZE: usize = 100;

/// Character sets used by the state table's class rows.
struct ScannerSets {
    rule_char: UnicodeSet,
    white_space: UnicodeSet,
    name_char: UnicodeSet,
    name_start_char: UnicodeSet,
    digit: UnicodeSet,
}

impl ScannerSets {
    fn build() -> Result<Self, PatternError> {
        Ok(Self {
            rule_char: pattern::parse(r"[^[\p{Z}\u0020-\u007F]-[\p{L}]-[\p{N}]]", &())?,
            // Pattern_White_Space
            white_space: pattern::parse(
                r"[\u0009-\u000D\u0020\u0085\u200E\u200F\u2028\u2029]",
                &(),
            )?,
            name_char: pattern::parse(r"[_\p{L}\p{N}]", &())?,
            name_start_char: pattern::parse(r"[_\p{L}]", &())?,
            digit: pattern::parse(r"[0-9]", &())?,
        })
    }

    fn for_class(&self, class: CharClass) -> Option<&UnicodeSet> {
        match class {
            CharClass::RuleChar => Some(&self.rule_char),
            CharClass::WhiteSpace => Some(&self.white_space),
            CharClass::NameChar => Some(&self.name_char),
            CharClass::NameStartChar => Some(&self.name_start_char),
            CharClass::Digit => Some(&self.digit),
            _ => None,
        }
    }
}

pub(crate) struct RuleParser<'a> {
    scanner: RuleScanner<'a>,
    /// Current character under the state machine.
    c: RuleChar,
    sets: ScannerSets,

    state_stack: Vec<State>,
    node_stack: Vec<NodeId>,
    arena: NodeArena,
    symbols: SymbolTable,
    /// Interned character classes, keyed by their source text.
    set_table: IndexMap<String, NodeId>,
    set_nodes: Vec<NodeId>,
    roots: [Option<NodeId>; 4],
    /// Which group a directionally unmarked rule lands in.
    default_tree: usize,

    rule_num: u32,
    /// Start offset of a `!!option` keyword being scanned.
    option_start: usize,
    /// Current rule started with `!`.
    reverse_rule: bool,
    /// Current rule contains a `/` look-ahead marker.
    look_ahead_rule: bool,
    /// Current rule started with `^`.
    no_chain_in_rule: bool,

    options: RuleOptions,
    warnings: Vec<Warning>,
}

impl<'a> RuleParser<'a> {
    pub(crate) fn new(rules: &'a str) -> Result<Self, RuleError> {
        let sets = ScannerSets::build().map_err(|_| RuleError {
            kind: RuleErrorKind::Internal,
            line: 1,
            column: 0,
        })?;
        Ok(Self {
            scanner: RuleScanner::new(rules),
            c: RuleChar {
                ch: None,
                escaped: false,
            },
            sets,
            state_stack: Vec::new(),
            node_stack: Vec::new(),
            arena: NodeArena::new(),
            symbols: SymbolTable::new(),
            set_table: IndexMap::new(),
            set_nodes: Vec::new(),
            roots: [None; 4],
            default_tree: RuleDirection::Forward.index(),
            rule_num: 0,
            option_start: 0,
            reverse_rule: false,
            look_ahead_rule: false,
            no_chain_in_rule: false,
            options: RuleOptions::default(),
            warnings: Vec::new(),
        })
    }

    pub(crate) fn into_compiled(self) -> CompiledRules {
        CompiledRules {
            arena: self.arena,
            roots: self.roots,
            set_nodes: self.set_nodes,
            symbols: self.symbols,
            warnings: self.warnings,
            options: self.options,
            rule_count: self.rule_num,
        }
    }

    fn error(&self, kind: RuleErrorKind) -> RuleError {
        self.scanner.error(kind)
    }

    /// Main loop of the parse state machine. Runs once per state
    /// transition until an exit action or an error.
    pub(crate) fn parse(&mut self) -> Result<(), RuleError> {
        let mut state = State::Start;
        self.c = self.scanner.next_char()?;

        loop {
            let row = self.find_row(state)?;

            if !self.do_parse_actions(row.action)? {
                break;
            }

            if let Some(push) = row.push {
                if self.state_stack.len() >= STACK_SIZE {
                    return Err(self.error(RuleErrorKind::Internal));
                }
                self.state_stack.push(push);
            }

            if row.advance {
                self.c = self.scanner.next_char()?;
            }

            state = match row.next {
                Next::To(next) => next,
                Next::Pop => self
                    .state_stack
                    .pop()
                    .ok_or_else(|| self.error(RuleErrorKind::Internal))?,
                Next::Exit => break,
            };
        }

        // A rule file with no forward rules compiles to nothing useful.
        if self.roots[RuleDirection::Forward.index()].is_none() {
            return Err(self.error(RuleErrorKind::RuleSyntax));
        }

        // If no reverse rules were supplied, install the equivalent of
        // ".*;" so reverse iteration is always defined.
        if self.roots[RuleDirection::Reverse.index()].is_none() {
            let star = self.push_new_node(NodeType::OpStar)?;
            let operand = self.push_new_node(NodeType::SetRef)?;
            self.find_set_for("any", operand, None);
            self.arena.node_mut(star).left = Some(operand);
            self.arena.node_mut(operand).parent = Some(star);
            self.roots[RuleDirection::Reverse.index()] = Some(star);
            let len = self.node_stack.len();
            self.node_stack.truncate(len - 2);
        }
        Ok(())
    }

    /// First table row of `state` whose class matches the current character.
    /// Every state's last row matches anything, so this cannot miss.
    fn find_row(&self, state: State) -> Result<Row, RuleError> {
        table::rows(state)
            .iter()
            .copied()
            .find(|row| self.class_matches(row.class))
            .ok_or_else(|| self.error(RuleErrorKind::Internal))
    }

    fn class_matches(&self, class: CharClass) -> bool {
        let c = self.c;
        match class {
            CharClass::Ch(lit) => !c.escaped && c.ch == Some(lit as u32),
            CharClass::Escaped => c.escaped,
            CharClass::EscapedP => c.escaped && matches!(c.ch, Some(0x50 | 0x70)),
            CharClass::Eof => c.ch.is_none(),
            CharClass::Any => true,
            _ => {
                !c.escaped
                    && c.ch.is_some_and(|ch| {
                        self.sets
                            .for_class(class)
                            .is_some_and(|set| set.contains(ch))
                    })
            }
        }
    }

    /// Allocate a node and push it on the node stack.
    fn push_new_node(&mut self, node_type: NodeType) -> Result<NodeId, RuleError> {
        if self.node_stack.len() >= STACK_SIZE {
            return Err(self.error(RuleErrorKind::Internal));
        }
        let id = self.arena.alloc(node_type);
        self.node_stack.push(id);
        Ok(id)
    }

    fn pop_node(&mut self) -> Result<NodeId, RuleError> {
        match self.node_stack.pop() {
            Some(id) => Ok(id),
            None => Err(self.error(RuleErrorKind::Internal)),
        }
    }

    /// Node `down` entries below the top of the node stack; 0 is the top.
    fn from_top(&self, down: usize) -> Result<NodeId, RuleError> {
        self.node_stack
            .iter()
            .rev()
            .nth(down)
            .copied()
            .ok_or_else(|| self.error(RuleErrorKind::Internal))
    }

    /// Bind stacked operators to their right operands.
    ///
    /// Walks down the stack while the stacked operator's precedence is at
    /// least `p`, attaching the operand above it as its right child. When
    /// `p` closes a group (right paren or end of expression), the marker
    /// it lands on must be the matching open marker, which is then
    /// discarded with the finished subexpression taking its place.
    fn fix_op_stack(&mut self, p: u8) -> Result<(), RuleError> {
        loop {
            let op = self.from_top(1)?;
            let prec = self.arena.node(op).precedence();
            if prec == PREC_ZERO {
                return Err(self.error(RuleErrorKind::Internal));
            }
            if prec < p || prec <= PREC_LPAREN {
                if p <= PREC_LPAREN {
                    if prec != p {
                        return Err(self.error(RuleErrorKind::MismatchedParen));
                    }
                    let expr = self.pop_node()?;
                    let len = self.node_stack.len();
                    self.node_stack[len - 1] = expr;
                }
                return Ok(());
            }
            let operand = self.pop_node()?;
            self.arena.node_mut(op).right = Some(operand);
            self.arena.node_mut(operand).parent = Some(op);
        }
    }

    /// Pop an operand and wrap it in a fresh binary-operator node as its
    /// left child.
    fn start_binary_op(&mut self, node_type: NodeType) -> Result<(), RuleError> {
        self.fix_op_stack(PREC_OP_CAT)?;
        let operand = self.pop_node()?;
        let op = self.push_new_node(node_type)?;
        self.arena.node_mut(op).left = Some(operand);
        self.arena.node_mut(operand).parent = Some(op);
        Ok(())
    }

    /// Pop an operand and wrap it in a unary-operator node.
    fn apply_unary_op(&mut self, node_type: NodeType) -> Result<(), RuleError> {
        let operand = self.pop_node()?;
        let op = self.push_new_node(node_type)?;
        self.arena.node_mut(op).left = Some(operand);
        self.arena.node_mut(operand).parent = Some(op);
        Ok(())
    }

    /// Push a set-reference leaf for the span of the current character.
    fn push_set_ref(&mut self, key: &str, set: Option<UnicodeSet>) -> Result<(), RuleError> {
        let n = self.push_new_node(NodeType::SetRef)?;
        self.find_set_for(key, n, set);
        let first = self.scanner.scan_index();
        let last = self.scanner.next_index();
        let text = self.scanner.rules()[first..last].to_owned();
        let node = self.arena.node_mut(n);
        node.first_pos = first;
        node.last_pos = last;
        node.text = text;
        Ok(())
    }

    /// Perform one grammar action. `Ok(false)` stops the parse loop.
    fn do_parse_actions(&mut self, action: ParseAction) -> Result<bool, RuleError> {
        match action {
            ParseAction::Nop | ParseAction::ExprFinished => {}

            ParseAction::ExprStart => {
                self.push_new_node(NodeType::OpStart)?;
                self.rule_num += 1;
            }

            ParseAction::NoChain => {
                self.no_chain_in_rule = true;
            }

            ParseAction::ExprOrOperator => self.start_binary_op(NodeType::OpOr)?,
            ParseAction::ExprCatOperator => self.start_binary_op(NodeType::OpCat)?,

            // The open-paren marker is a dummy low-precedence operator; any
            // real operator inside the parens binds more tightly than
            // anything outside.
            ParseAction::LParen => {
                self.push_new_node(NodeType::OpLParen)?;
            }
            ParseAction::ExprRParen => self.fix_op_stack(PREC_LPAREN)?,

            ParseAction::UnaryOpStar => self.apply_unary_op(NodeType::OpStar)?,
            ParseAction::UnaryOpPlus => self.apply_unary_op(NodeType::OpPlus)?,
            ParseAction::UnaryOpQuestion => self.apply_unary_op(NodeType::OpQuestion)?,

            // A literal character in an expression becomes a reference to a
            // singleton set, keeping terms uniform for the tree consumers.
            ParseAction::RuleChar => {
                let c = self
                    .c
                    .ch
                    .ok_or_else(|| self.error(RuleErrorKind::Internal))?;
                let key = char::from_u32(c)
                    .map(String::from)
                    .unwrap_or_else(|| format!("\\u{c:04X}"));
                self.push_set_ref(&key, Some(UnicodeSet::single(c)))?;
            }

            ParseAction::DotAny => {
                self.push_set_ref("any", None)?;
            }

            ParseAction::Slash => {
                // one look-ahead marker per rule
                if self.look_ahead_rule {
                    return Err(self.error(RuleErrorKind::RuleSyntax));
                }
                let n = self.push_new_node(NodeType::LookAhead)?;
                let first = self.scanner.scan_index();
                let last = self.scanner.next_index();
                let text = self.scanner.rules()[first..last].to_owned();
                let rule_num = self.rule_num;
                let node = self.arena.node_mut(n);
                node.val = rule_num as i32;
                node.first_pos = first;
                node.last_pos = last;
                node.text = text;
                self.look_ahead_rule = true;
            }

            ParseAction::StartTagValue => {
                let n = self.push_new_node(NodeType::Tag)?;
                let first = self.scanner.scan_index();
                let last = self.scanner.next_index();
                let node = self.arena.node_mut(n);
                node.val = 0;
                node.first_pos = first;
                node.last_pos = last;
            }

            ParseAction::TagDigit => {
                let d = self
                    .c
                    .ch
                    .and_then(char::from_u32)
                    .and_then(|ch| ch.to_digit(10))
                    .ok_or_else(|| self.error(RuleErrorKind::Internal))?;
                let n = self.from_top(0)?;
                let val = self.arena.node(n).val;
                match val.checked_mul(10).and_then(|v| v.checked_add(d as i32)) {
                    Some(v) => self.arena.node_mut(n).val = v,
                    None => return Err(self.error(RuleErrorKind::MalformedRuleTag)),
                }
            }

            ParseAction::TagValue => {
                let n = self.from_top(0)?;
                let last = self.scanner.next_index();
                let first = self.arena.node(n).first_pos;
                let text = self.scanner.rules()[first..last].to_owned();
                let node = self.arena.node_mut(n);
                node.last_pos = last;
                node.text = text;
            }

            ParseAction::OptionStart => {
                self.option_start = self.scanner.scan_index();
            }

            ParseAction::OptionEnd => {
                let opt = &self.scanner.rules()[self.option_start..self.scanner.scan_index()];
                match opt {
                    "chain" => self.options.chain_rules = true,
                    "LBCMNoChain" => self.options.lbcm_no_chain = true,
                    "lookAheadHardBreak" => self.options.look_ahead_hard_break = true,
                    "forward" => self.default_tree = RuleDirection::Forward.index(),
                    "reverse" => self.default_tree = RuleDirection::Reverse.index(),
                    "safe_forward" => self.default_tree = RuleDirection::SafeForward.index(),
                    "safe_reverse" => self.default_tree = RuleDirection::SafeReverse.index(),
                    _ => self.warnings.push(Warning {
                        kind: WarningKind::UnrecognizedOption(opt.to_owned()),
                        line: self.scanner.line(),
                        column: self.scanner.column(),
                    }),
                }
            }

            ParseAction::ReverseDir => {
                self.reverse_rule = true;
            }

            ParseAction::StartVariableName => {
                let first = self.scanner.scan_index();
                let n = self.push_new_node(NodeType::VarRef)?;
                self.arena.node_mut(n).first_pos = first;
            }

            ParseAction::EndVariableName => {
                let n = self.from_top(0)?;
                if self.arena.node(n).node_type != NodeType::VarRef {
                    return Err(self.error(RuleErrorKind::Internal));
                }
                let first = self.arena.node(n).first_pos;
                let last = self.scanner.scan_index();
                // skip the leading '$'
                let text = self.scanner.rules()[first + 1..last].to_owned();
                // When the name is already defined, wire the definition in.
                // During an assignment the lookup comes up empty, and the
                // left child is attached when the assignment completes.
                let def = self.symbols.lookup(&text);
                let node = self.arena.node_mut(n);
                node.last_pos = last;
                node.text = text;
                node.left = def;
            }

            ParseAction::CheckVarDef => {
                let n = self.from_top(0)?;
                if self.arena.node(n).left.is_none() {
                    return Err(self.error(RuleErrorKind::UndefinedVariable));
                }
            }

            ParseAction::StartAssign => {
                // Stack holds [exprStart, varRef]. Remember where the RHS
                // text begins in the start node, for the definition's
                // source-text record.
                let start_expr = self.from_top(1)?;
                self.arena.node_mut(start_expr).first_pos = self.scanner.next_index();
                // A fresh start node keeps the RHS expression parse happy.
                self.push_new_node(NodeType::OpStart)?;
            }

            ParseAction::EndAssign => {
                // Terminate the RHS expression; its tree is left on top.
                self.fix_op_stack(PREC_START)?;
                let rhs = self.from_top(0)?;
                let var_ref = self.from_top(1)?;
                let start_expr = self.from_top(2)?;

                let first = self.arena.node(start_expr).first_pos;
                let last = self.scanner.scan_index();
                let text = self.scanner.rules()[first..last].to_owned();
                {
                    let node = self.arena.node_mut(rhs);
                    node.first_pos = first;
                    node.last_pos = last;
                    node.text = text;
                    node.parent = Some(var_ref);
                }
                self.arena.node_mut(var_ref).left = Some(rhs);

                // The only place new bindings are created.
                let name = self.arena.node(var_ref).text.clone();
                if !self.symbols.insert(name, var_ref) {
                    return Err(self.error(RuleErrorKind::VariableRedefinition));
                }
                let len = self.node_stack.len();
                self.node_stack.truncate(len - 3);
            }

            ParseAction::EndOfRule => self.end_of_rule()?,

            ParseAction::ScanSet => self.scan_set()?,

            ParseAction::RuleError | ParseAction::VariableNameExpected => {
                return Err(self.error(RuleErrorKind::RuleSyntax));
            }
            ParseAction::TagExpectedError => {
                return Err(self.error(RuleErrorKind::MalformedRuleTag));
            }
            ParseAction::RuleErrorAssignExpr => {
                return Err(self.error(RuleErrorKind::AssignError));
            }
            ParseAction::UnclosedExpression => {
                let unclosed_paren = self
                    .node_stack
                    .iter()
                    .any(|&id| self.arena.node(id).node_type == NodeType::OpLParen);
                let kind = if unclosed_paren {
                    RuleErrorKind::MismatchedParen
                } else {
                    RuleErrorKind::RuleSyntax
                };
                return Err(self.error(kind));
            }

            ParseAction::Exit => return Ok(false),
        }
        Ok(true)
    }

    /// `;` at the end of a rule: close the expression and OR it into the
    /// tree for its direction group.
    fn end_of_rule(&mut self) -> Result<(), RuleError> {
        self.fix_op_stack(PREC_START)?;
        if self.node_stack.len() != 1 {
            return Err(self.error(RuleErrorKind::Internal));
        }
        let mut this_rule = self.from_top(0)?;

        // A look-ahead rule gets an end-mark appended, so the match end and
        // the break position stay distinguishable downstream.
        if self.look_ahead_rule {
            let end_node = self.push_new_node(NodeType::EndMark)?;
            let cat_node = self.push_new_node(NodeType::OpCat)?;
            let len = self.node_stack.len();
            self.node_stack.truncate(len - 2);
            {
                let cat = self.arena.node_mut(cat_node);
                cat.left = Some(this_rule);
                cat.right = Some(end_node);
            }
            self.arena.node_mut(this_rule).parent = Some(cat_node);
            {
                let end = self.arena.node_mut(end_node);
                end.parent = Some(cat_node);
                end.val = self.rule_num as i32;
                end.look_ahead_end = true;
            }
            let top = self.node_stack.len() - 1;
            self.node_stack[top] = cat_node;
            this_rule = cat_node;
        }

        self.arena.node_mut(this_rule).rule_root = true;
        if self.options.chain_rules && !self.no_chain_in_rule {
            self.arena.node_mut(this_rule).chain_in = true;
        }

        // The ';' is really a '|' with the lowest precedence: every rule in
        // a direction group ORs with the ones before it.
        let dest = if self.reverse_rule {
            RuleDirection::Reverse.index()
        } else {
            self.default_tree
        };
        match self.roots[dest] {
            Some(prev) => {
                let or_node = self.push_new_node(NodeType::OpOr)?;
                {
                    let or = self.arena.node_mut(or_node);
                    or.left = Some(prev);
                    or.right = Some(this_rule);
                }
                self.arena.node_mut(prev).parent = Some(or_node);
                self.arena.node_mut(this_rule).parent = Some(or_node);
                self.roots[dest] = Some(or_node);
            }
            None => self.roots[dest] = Some(this_rule),
        }

        self.reverse_rule = false;
        self.look_ahead_rule = false;
        self.no_chain_in_rule = false;
        self.node_stack.clear();
        Ok(())
    }

    /// Hand the scan position to the set pattern grammar, intern the
    /// resulting class, and leave a set-reference leaf on the node stack.
    /// The raw cursor is advanced past the literal without disturbing the
    /// line/column bookkeeping.
    fn scan_set(&mut self) -> Result<(), RuleError> {
        let start = self.scanner.scan_index();
        let parsed = {
            let resolver = SymbolSetResolver {
                arena: &self.arena,
                symbols: &self.symbols,
            };
            pattern::parse_at(self.scanner.rules(), start, &resolver)
        };
        let (uset, end) = match parsed {
            Ok(parsed) => parsed,
            Err(_) => return Err(self.error(RuleErrorKind::MalformedSet)),
        };

        // An empty class is almost certainly not what the author wanted,
        // and the downstream tree passes assume non-empty classes.
        if uset.is_empty() {
            return Err(self.error(RuleErrorKind::RuleEmptySet));
        }

        self.scanner.advance_to(end)?;

        let n = self.push_new_node(NodeType::SetRef)?;
        let last = self.scanner.next_index();
        let text = self.scanner.rules()[start..last].to_owned();
        {
            let node = self.arena.node_mut(n);
            node.first_pos = start;
            node.last_pos = last;
            node.text = text.clone();
        }
        self.find_set_for(&text, n, Some(uset));
        Ok(())
    }

    /// Intern a character class by source text. The set-reference node gets
    /// the shared set-holding node as its left child; identical source text
    /// always maps to the same node, so equal literals are never duplicated.
    fn find_set_for(&mut self, key: &str, node: NodeId, set_to_adopt: Option<UnicodeSet>) {
        if let Some(&uset_node) = self.set_table.get(key) {
            self.arena.node_mut(node).left = Some(uset_node);
            return;
        }

        let set = match set_to_adopt {
            Some(set) => set,
            None if key == "any" => UnicodeSet::any(),
            None => key
                .chars()
                .next()
                .map(|c| UnicodeSet::single(c as u32))
                .unwrap_or_default(),
        };

        let uset_node = self.arena.alloc(NodeType::USet);
        {
            let uset = self.arena.node_mut(uset_node);
            uset.input_set = Some(set);
            uset.parent = Some(node);
            uset.text = key.to_owned();
        }
        self.arena.node_mut(node).left = Some(uset_node);
        self.set_nodes.push(uset_node);
        self.set_table.insert(key.to_owned(), uset_node);
    }
}
