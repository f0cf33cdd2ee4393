//! Character-class pattern parsing.
//!
//! Grammar:
//!
//! ```text
//! set      := '[' '^'? item* ']' | '[:' '^'? name ':]' | '\p{name}' | '\P{name}' | '$name'
//! item     := char | char '-' char | set | set '-' set | set '&' set | escape
//! ```
//!
//! Bracketed sets union their items; `-` between set operands is difference
//! and `&` is intersection. Pattern white space between tokens is ignored.
//! Multi-character string elements (`{abc}`) are not supported.

use thiserror::Error;

use crate::escape::{is_pattern_white_space, unescape_at};
use crate::property;
use crate::set::UnicodeSet;

/// Failures while parsing a character-class pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The text at the given position does not start a set.
    #[error("expected a set pattern")]
    NotASet,
    /// Input ended before the set was closed.
    #[error("unterminated set pattern")]
    Unterminated,
    /// A backslash escape could not be decoded.
    #[error("invalid escape sequence")]
    BadEscape,
    /// `\p{...}` or `[:...:]` named a property that does not exist.
    #[error("unknown property `{0}`")]
    UnknownProperty(String),
    /// `$name` referenced a variable the resolver does not know.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),
    /// A `a-b` range with endpoints out of order, or a stray `-`/`&`.
    #[error("invalid range or operator placement")]
    BadRange,
    /// A recognized construct this parser deliberately rejects.
    #[error("unsupported construct: {0}")]
    Unsupported(&'static str),
    /// The convenience entry point found text after the closing bracket.
    #[error("trailing characters after set pattern")]
    TrailingCharacters,
}

/// Resolves `$name` references that appear inside set patterns.
pub trait SetResolver {
    /// The set bound to `name`, or `None` when the name is unknown.
    fn resolve_set(&self, name: &str) -> Option<UnicodeSet>;
}

/// A resolver with no variables. `$name` always fails.
impl SetResolver for () {
    fn resolve_set(&self, _name: &str) -> Option<UnicodeSet> {
        None
    }
}

/// Parse a complete pattern. Errors if anything follows the set.
pub fn parse(text: &str, resolver: &dyn SetResolver) -> Result<UnicodeSet, PatternError> {
    let (set, end) = parse_at(text, 0, resolver)?;
    if text[end..].chars().any(|c| !is_pattern_white_space(c)) {
        return Err(PatternError::TrailingCharacters);
    }
    Ok(set)
}

/// Parse one set pattern starting at byte offset `start`. Returns the set
/// and the byte offset just past it.
pub fn parse_at(
    text: &str,
    start: usize,
    resolver: &dyn SetResolver,
) -> Result<(UnicodeSet, usize), PatternError> {
    let mut p = Parser {
        text,
        pos: start,
        resolver,
    };
    let set = p.parse_set()?;
    Ok((set, p.pos))
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    resolver: &'a dyn SetResolver,
}

/// What the next token in a bracketed set is.
enum Item {
    Char(u32),
    Set(UnicodeSet),
    Close,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_white_space(&mut self) {
        while let Some(c) = self.peek() {
            if !is_pattern_white_space(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// True when the text at the cursor opens a nested set.
    fn at_set_start(&self) -> bool {
        let rest = &self.text[self.pos..];
        rest.starts_with('[')
            || rest.starts_with("\\p")
            || rest.starts_with("\\P")
            || rest.starts_with('$')
    }

    /// Dispatch on the opening token of a set pattern.
    fn parse_set(&mut self) -> Result<UnicodeSet, PatternError> {
        self.skip_white_space();
        let rest = &self.text[self.pos..];
        if rest.starts_with("[:") {
            self.parse_posix()
        } else if rest.starts_with('[') {
            self.parse_bracket()
        } else if rest.starts_with("\\p") || rest.starts_with("\\P") {
            self.parse_property()
        } else if rest.starts_with('$') {
            self.parse_variable()
        } else {
            Err(PatternError::NotASet)
        }
    }

    fn parse_bracket(&mut self) -> Result<UnicodeSet, PatternError> {
        self.bump(); // '['
        self.skip_white_space();
        let negated = if self.peek() == Some('^') {
            self.bump();
            true
        } else {
            false
        };

        let mut result = UnicodeSet::new();
        // a literal waiting to learn whether it starts a range
        let mut pending: Option<u32> = None;

        loop {
            self.skip_white_space();
            match self.peek() {
                None => return Err(PatternError::Unterminated),
                Some(']') => {
                    self.bump();
                    if let Some(c) = pending {
                        result.add(c);
                    }
                    break;
                }
                Some('-') => {
                    self.bump();
                    self.skip_white_space();
                    match self.peek() {
                        None => return Err(PatternError::Unterminated),
                        // trailing '-' is a literal member
                        Some(']') => {
                            if let Some(c) = pending.take() {
                                result.add(c);
                            }
                            result.add('-' as u32);
                        }
                        _ if self.at_set_start() => {
                            if let Some(c) = pending.take() {
                                result.add(c);
                            }
                            let operand = self.parse_set()?;
                            result.remove_set(&operand);
                        }
                        _ => match self.next_item()? {
                            Item::Char(hi) => match pending.take() {
                                Some(lo) if lo <= hi => result.add_range(lo, hi),
                                Some(_) => return Err(PatternError::BadRange),
                                // leading '-' is a literal member
                                None => {
                                    result.add('-' as u32);
                                    pending = Some(hi);
                                }
                            },
                            _ => return Err(PatternError::BadRange),
                        },
                    }
                }
                Some('&') => {
                    self.bump();
                    self.skip_white_space();
                    if !self.at_set_start() {
                        return Err(PatternError::BadRange);
                    }
                    if let Some(c) = pending.take() {
                        result.add(c);
                    }
                    let operand = self.parse_set()?;
                    result.retain_set(&operand);
                }
                Some('{') => return Err(PatternError::Unsupported("string elements")),
                _ => {
                    if let Some(c) = pending.take() {
                        result.add(c);
                    }
                    match self.next_item()? {
                        Item::Char(c) => pending = Some(c),
                        Item::Set(s) => result.add_set(&s),
                        Item::Close => unreachable!("']' is handled by the caller"),
                    }
                }
            }
        }

        if negated {
            result.complement();
        }
        Ok(result)
    }

    /// One operand inside brackets: a literal char, an escape, or a nested set.
    fn next_item(&mut self) -> Result<Item, PatternError> {
        if self.at_set_start() {
            return Ok(Item::Set(self.parse_set()?));
        }
        match self.peek() {
            None => Err(PatternError::Unterminated),
            Some(']') => {
                self.bump();
                Ok(Item::Close)
            }
            Some('\\') => {
                self.bump();
                let (c, end) =
                    unescape_at(self.text, self.pos).ok_or(PatternError::BadEscape)?;
                self.pos = end;
                Ok(Item::Char(c))
            }
            Some(c) => {
                self.bump();
                Ok(Item::Char(c as u32))
            }
        }
    }

    /// `\p{name}` or `\P{name}`.
    fn parse_property(&mut self) -> Result<UnicodeSet, PatternError> {
        self.bump(); // '\'
        let negated = self.bump() == Some('P');
        if self.peek() != Some('{') {
            return Err(PatternError::BadEscape);
        }
        self.bump();
        let name_start = self.pos;
        let Some(close) = self.text[self.pos..].find('}') else {
            return Err(PatternError::Unterminated);
        };
        let name = &self.text[name_start..name_start + close];
        self.pos = name_start + close + 1;
        property::lookup(name, negated)
            .ok_or_else(|| PatternError::UnknownProperty(name.to_owned()))
    }

    /// `[:name:]` or `[:^name:]`, same lookup as `\p`.
    fn parse_posix(&mut self) -> Result<UnicodeSet, PatternError> {
        self.pos += 2; // "[:"
        let negated = if self.peek() == Some('^') {
            self.bump();
            true
        } else {
            false
        };
        let name_start = self.pos;
        let Some(close) = self.text[self.pos..].find(":]") else {
            return Err(PatternError::Unterminated);
        };
        let name = &self.text[name_start..name_start + close];
        self.pos = name_start + close + 2;
        property::lookup(name, negated)
            .ok_or_else(|| PatternError::UnknownProperty(name.to_owned()))
    }

    /// `$name`, resolved through the caller-supplied symbol table.
    fn parse_variable(&mut self) -> Result<UnicodeSet, PatternError> {
        self.bump(); // '$'
        let name_start = self.pos;
        while let Some(c) = self.peek() {
            let is_name_char = if self.pos == name_start {
                c == '_' || c.is_alphabetic()
            } else {
                c == '_' || c.is_alphanumeric()
            };
            if !is_name_char {
                break;
            }
            self.pos += c.len_utf8();
        }
        let name = &self.text[name_start..self.pos];
        if name.is_empty() {
            return Err(PatternError::NotASet);
        }
        self.resolver
            .resolve_set(name)
            .ok_or_else(|| PatternError::UnknownVariable(name.to_owned()))
    }
}
