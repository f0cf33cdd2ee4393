//! Rule compilation errors and warnings, all carrying the line and column
//! where the scanner stood when the problem was detected.

use thiserror::Error;

/// A fatal rule compilation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error {kind} at line {line} column {column}")]
pub struct RuleError {
    pub kind: RuleErrorKind,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column within the line.
    pub column: u32,
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleErrorKind {
    #[error("rule syntax error")]
    RuleSyntax,
    #[error("malformed rule tag")]
    MalformedRuleTag,
    #[error("undefined variable")]
    UndefinedVariable,
    #[error("variable redefinition")]
    VariableRedefinition,
    #[error("mismatched parentheses")]
    MismatchedParen,
    #[error("malformed set")]
    MalformedSet,
    #[error("empty set in rule")]
    RuleEmptySet,
    #[error("error in variable assignment")]
    AssignError,
    #[error("new line in quoted string")]
    NewLineInQuotedString,
    #[error("hex digits expected after escape")]
    HexDigitsExpected,
    #[error("internal error")]
    Internal,
}

/// A non-fatal condition noticed during compilation. Compilation continues;
/// warnings are collected on the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// A `!!option` keyword that is not one of the known options.
    UnrecognizedOption(String),
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::UnrecognizedOption(name) => {
                write!(f, "unrecognized !!option `{name}`")
            }
        }
    }
}
