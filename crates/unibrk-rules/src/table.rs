//! The rule-parsing state transition table.
//!
//! Each state owns a list of rows. The parser scans a state's rows in
//! order and takes the first whose character class matches the current
//! input character; every state ends with an `Any` row, so the scan always
//! terminates. A row carries the action to perform, an optional state to
//! push (the return address for nested sub-grammars), whether to advance
//! the input, and the next state.

/// Parser states. `Pop` transitions return to the most recently pushed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Start,
    StartAfterCaret,
    BreakRuleEnd,
    RevOption,
    ReverseRule,
    OptionScan1,
    OptionScan2,
    OptionScan3,
    Term,
    ScanSet,
    TermVarRef,
    ExprMod,
    ExprCont,
    LookAhead,
    ExprContNoSlash,
    TagOpen,
    TagValue,
    TagClose,
    ExprContNoTag,
    ScanVarName,
    ScanVarStart,
    ScanVarBody,
    AssignOrRule,
    AssignEnd,
}

/// What a row matches against the current input character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    /// A specific unescaped literal character.
    Ch(char),
    /// Any escaped character.
    Escaped,
    /// Escaped `p` or `P`, the opening of a property class.
    EscapedP,
    /// End of input.
    Eof,
    /// Unescaped member of the rule-character set (literals that stand for
    /// themselves in an expression).
    RuleChar,
    /// Unescaped pattern white space.
    WhiteSpace,
    /// Unescaped variable/option name continuation character.
    NameChar,
    /// Unescaped variable/option name start character.
    NameStartChar,
    /// Unescaped ASCII digit.
    Digit,
    /// Anything, including end of input. Last row of every state.
    Any,
}

/// Grammar actions, performed against the node stack and symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseAction {
    Nop,
    ExprStart,
    NoChain,
    ExprOrOperator,
    ExprCatOperator,
    LParen,
    ExprRParen,
    StartAssign,
    EndAssign,
    EndOfRule,
    RuleError,
    VariableNameExpected,
    UnaryOpPlus,
    UnaryOpQuestion,
    UnaryOpStar,
    RuleChar,
    DotAny,
    Slash,
    StartTagValue,
    TagDigit,
    TagValue,
    TagExpectedError,
    OptionStart,
    OptionEnd,
    ReverseDir,
    StartVariableName,
    EndVariableName,
    CheckVarDef,
    ExprFinished,
    RuleErrorAssignExpr,
    /// Input ended in the middle of an expression; reports mismatched
    /// parens when an open paren is still on the node stack, plain rule
    /// syntax otherwise.
    UnclosedExpression,
    Exit,
    ScanSet,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Next {
    To(State),
    /// Return to the state on top of the state stack.
    Pop,
    /// Leave the parse loop.
    Exit,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Row {
    pub class: CharClass,
    pub action: ParseAction,
    pub push: Option<State>,
    pub advance: bool,
    pub next: Next,
}

const fn row(
    class: CharClass,
    action: ParseAction,
    push: Option<State>,
    advance: bool,
    next: Next,
) -> Row {
    Row {
        class,
        action,
        push,
        advance,
        next,
    }
}

use CharClass as C;
use Next::{Exit, Pop, To};
use ParseAction as A;
use State as S;

pub(crate) fn rows(state: State) -> &'static [Row] {
    match state {
        S::Start => const { &[
            row(C::WhiteSpace, A::Nop, None, true, To(S::Start)),
            row(C::Ch('$'), A::ExprStart, Some(S::AssignOrRule), false, To(S::ScanVarName)),
            row(C::Ch('!'), A::Nop, None, true, To(S::RevOption)),
            row(C::Ch(';'), A::Nop, None, true, To(S::Start)),
            row(C::Ch('^'), A::NoChain, None, true, To(S::StartAfterCaret)),
            row(C::Eof, A::Exit, None, false, Exit),
            row(C::Escaped, A::ExprStart, Some(S::BreakRuleEnd), false, To(S::Term)),
            row(C::Any, A::ExprStart, Some(S::BreakRuleEnd), false, To(S::Term)),
        ] },
        // after a '^' chain-in inhibit; an empty rule here is an error
        S::StartAfterCaret => const { &[
            row(C::Ch('$'), A::ExprStart, Some(S::AssignOrRule), false, To(S::ScanVarName)),
            row(C::Ch('^'), A::RuleError, None, false, Exit),
            row(C::Ch(';'), A::RuleError, None, false, Exit),
            row(C::Eof, A::RuleError, None, false, Exit),
            row(C::Escaped, A::ExprStart, Some(S::BreakRuleEnd), false, To(S::Term)),
            row(C::Any, A::ExprStart, Some(S::BreakRuleEnd), false, To(S::Term)),
        ] },
        S::BreakRuleEnd => const { &[
            row(C::Ch(';'), A::EndOfRule, None, true, To(S::Start)),
            row(C::WhiteSpace, A::Nop, None, true, To(S::BreakRuleEnd)),
            row(C::Eof, A::UnclosedExpression, None, false, Exit),
            row(C::Any, A::RuleError, None, false, Exit),
        ] },
        // '!' seen: either '!!option' or a reverse-direction rule
        S::RevOption => const { &[
            row(C::Ch('!'), A::Nop, None, true, To(S::OptionScan1)),
            row(C::Any, A::ReverseDir, Some(S::BreakRuleEnd), false, To(S::ReverseRule)),
        ] },
        S::ReverseRule => const { &[
            row(C::Any, A::ExprStart, None, false, To(S::Term)),
        ] },
        S::OptionScan1 => const { &[
            row(C::NameStartChar, A::OptionStart, None, true, To(S::OptionScan2)),
            row(C::Any, A::RuleError, None, false, Exit),
        ] },
        S::OptionScan2 => const { &[
            row(C::NameChar, A::Nop, None, true, To(S::OptionScan2)),
            row(C::Any, A::OptionEnd, None, false, To(S::OptionScan3)),
        ] },
        S::OptionScan3 => const { &[
            row(C::Ch(';'), A::Nop, None, true, To(S::Start)),
            row(C::WhiteSpace, A::Nop, None, true, To(S::OptionScan3)),
            row(C::Any, A::RuleError, None, false, Exit),
        ] },
        S::Term => const { &[
            row(C::EscapedP, A::Nop, Some(S::ExprMod), false, To(S::ScanSet)),
            row(C::Escaped, A::RuleChar, None, true, To(S::ExprMod)),
            row(C::WhiteSpace, A::Nop, None, true, To(S::Term)),
            row(C::RuleChar, A::RuleChar, None, true, To(S::ExprMod)),
            row(C::Ch('['), A::Nop, Some(S::ExprMod), false, To(S::ScanSet)),
            row(C::Ch('('), A::LParen, Some(S::ExprMod), true, To(S::Term)),
            row(C::Ch('$'), A::Nop, Some(S::TermVarRef), false, To(S::ScanVarName)),
            row(C::Ch('.'), A::DotAny, None, true, To(S::ExprMod)),
            row(C::Any, A::RuleError, None, false, Exit),
        ] },
        // class literals are parsed by the set pattern grammar, which
        // advances the scan past the whole literal
        S::ScanSet => const { &[
            row(C::Ch('['), A::ScanSet, None, true, Pop),
            row(C::EscapedP, A::ScanSet, None, true, Pop),
            row(C::Any, A::RuleError, None, false, Exit),
        ] },
        S::TermVarRef => const { &[
            row(C::Any, A::CheckVarDef, None, false, To(S::ExprMod)),
        ] },
        S::ExprMod => const { &[
            row(C::WhiteSpace, A::Nop, None, true, To(S::ExprMod)),
            row(C::Ch('*'), A::UnaryOpStar, None, true, To(S::ExprCont)),
            row(C::Ch('+'), A::UnaryOpPlus, None, true, To(S::ExprCont)),
            row(C::Ch('?'), A::UnaryOpQuestion, None, true, To(S::ExprCont)),
            row(C::Any, A::Nop, None, false, To(S::ExprCont)),
        ] },
        S::ExprCont => const { &[
            row(C::Escaped, A::ExprCatOperator, None, false, To(S::Term)),
            row(C::WhiteSpace, A::Nop, None, true, To(S::ExprCont)),
            row(C::RuleChar, A::ExprCatOperator, None, false, To(S::Term)),
            row(C::Ch('['), A::ExprCatOperator, None, false, To(S::Term)),
            row(C::Ch('('), A::ExprCatOperator, None, false, To(S::Term)),
            row(C::Ch('$'), A::ExprCatOperator, None, false, To(S::Term)),
            row(C::Ch('.'), A::ExprCatOperator, None, false, To(S::Term)),
            row(C::Ch('/'), A::ExprCatOperator, None, false, To(S::LookAhead)),
            row(C::Ch('{'), A::ExprCatOperator, None, false, To(S::TagOpen)),
            row(C::Ch('|'), A::ExprOrOperator, None, true, To(S::Term)),
            row(C::Ch(')'), A::ExprRParen, None, true, Pop),
            row(C::Eof, A::ExprFinished, None, false, Pop),
            row(C::Any, A::ExprFinished, None, false, Pop),
        ] },
        S::LookAhead => const { &[
            row(C::Ch('/'), A::Slash, None, true, To(S::ExprContNoSlash)),
            row(C::Any, A::RuleError, None, false, Exit),
        ] },
        // continuation after a look-ahead slash; a second '/' is an error
        S::ExprContNoSlash => const { &[
            row(C::Escaped, A::ExprCatOperator, None, false, To(S::Term)),
            row(C::WhiteSpace, A::Nop, None, true, To(S::ExprContNoSlash)),
            row(C::RuleChar, A::ExprCatOperator, None, false, To(S::Term)),
            row(C::Ch('['), A::ExprCatOperator, None, false, To(S::Term)),
            row(C::Ch('('), A::ExprCatOperator, None, false, To(S::Term)),
            row(C::Ch('$'), A::ExprCatOperator, None, false, To(S::Term)),
            row(C::Ch('.'), A::ExprCatOperator, None, false, To(S::Term)),
            row(C::Ch('{'), A::ExprCatOperator, None, false, To(S::TagOpen)),
            row(C::Ch('|'), A::ExprOrOperator, None, true, To(S::Term)),
            row(C::Ch(')'), A::ExprRParen, None, true, Pop),
            row(C::Eof, A::ExprFinished, None, false, Pop),
            row(C::Any, A::ExprFinished, None, false, Pop),
        ] },
        S::TagOpen => const { &[
            row(C::Ch('{'), A::StartTagValue, None, true, To(S::TagValue)),
            row(C::Any, A::TagExpectedError, None, false, Exit),
        ] },
        S::TagValue => const { &[
            row(C::Ch('}'), A::Nop, None, false, To(S::TagClose)),
            row(C::Digit, A::TagDigit, None, true, To(S::TagValue)),
            row(C::Any, A::TagExpectedError, None, false, Exit),
        ] },
        S::TagClose => const { &[
            row(C::Ch('}'), A::TagValue, None, true, To(S::ExprContNoTag)),
            row(C::Any, A::TagExpectedError, None, false, Exit),
        ] },
        // a tag ends its term; only alternation or end-of-rule may follow
        S::ExprContNoTag => const { &[
            row(C::WhiteSpace, A::Nop, None, true, To(S::ExprContNoTag)),
            row(C::Ch('|'), A::ExprOrOperator, None, true, To(S::Term)),
            row(C::Eof, A::ExprFinished, None, false, Pop),
            row(C::Any, A::ExprFinished, None, false, Pop),
        ] },
        S::ScanVarName => const { &[
            row(C::Ch('$'), A::StartVariableName, None, true, To(S::ScanVarStart)),
            row(C::Any, A::RuleError, None, false, Exit),
        ] },
        S::ScanVarStart => const { &[
            row(C::NameStartChar, A::Nop, None, true, To(S::ScanVarBody)),
            row(C::Any, A::VariableNameExpected, None, false, Exit),
        ] },
        S::ScanVarBody => const { &[
            row(C::NameChar, A::Nop, None, true, To(S::ScanVarBody)),
            row(C::Any, A::EndVariableName, None, false, Pop),
        ] },
        // a scanned $name is either the left side of an assignment or a
        // variable reference starting a rule
        S::AssignOrRule => const { &[
            row(C::WhiteSpace, A::Nop, None, true, To(S::AssignOrRule)),
            row(C::Ch('='), A::StartAssign, Some(S::AssignEnd), true, To(S::Term)),
            row(C::Any, A::Nop, Some(S::BreakRuleEnd), false, To(S::TermVarRef)),
        ] },
        S::AssignEnd => const { &[
            row(C::Ch(';'), A::EndAssign, None, true, To(S::Start)),
            row(C::Any, A::RuleErrorAssignExpr, None, false, Exit),
        ] },
    }
}
