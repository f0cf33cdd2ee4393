//! Low-level character scanning over rule source text.
//!
//! The scanner hands single characters to the parse state machine, after
//! stripping comments, decoding backslash escapes, and folding quoted runs
//! into synthetic grouping parens. It tracks line and column for error
//! reporting; positions handed upward are byte offsets into the source.

use unibrk_set::escape::unescape_at;

use crate::error::{RuleError, RuleErrorKind};

const CH_NEL: u32 = 0x85;
const CH_LS: u32 = 0x2028;

/// One character as seen by the parse state machine.
///
/// `ch` is `None` at end of input. `escaped` is set for backslash escapes,
/// for `''` pairs, and for everything inside a quoted run; an escaped
/// character never matches a literal-character table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleChar {
    pub ch: Option<u32>,
    pub escaped: bool,
}

/// Character reader over the rule source.
pub struct RuleScanner<'a> {
    rules: &'a str,
    /// Byte offset of the character most recently handed out.
    scan_index: usize,
    /// Byte offset of the first character not yet scanned.
    next_index: usize,
    /// Inside a `'...'` quoted run.
    quote_mode: bool,
    line_num: u32,
    char_num: u32,
    /// Previous char, so CR-LF counts as one new line, not two.
    last_char: Option<u32>,
}

impl<'a> RuleScanner<'a> {
    pub fn new(rules: &'a str) -> Self {
        Self {
            rules,
            scan_index: 0,
            next_index: 0,
            quote_mode: false,
            line_num: 1,
            char_num: 0,
            last_char: None,
        }
    }

    pub fn rules(&self) -> &'a str {
        self.rules
    }

    /// Byte offset of the current character.
    pub fn scan_index(&self) -> usize {
        self.scan_index
    }

    /// Byte offset of the first unscanned character.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn line(&self) -> u32 {
        self.line_num
    }

    pub fn column(&self) -> u32 {
        self.char_num
    }

    /// Build an error at the current scan position.
    pub fn error(&self, kind: RuleErrorKind) -> RuleError {
        RuleError {
            kind,
            line: self.line_num,
            column: self.char_num,
        }
    }

    fn peek_ll(&self) -> Option<u32> {
        self.rules[self.next_index..].chars().next().map(|c| c as u32)
    }

    /// Raw character fetch: advances the cursor and maintains line/column.
    /// `None` at end of input.
    fn next_char_ll(&mut self) -> Result<Option<u32>, RuleError> {
        let Some(ch) = self.rules[self.next_index..].chars().next() else {
            return Ok(None);
        };
        self.next_index += ch.len_utf8();
        let c = ch as u32;

        if c == u32::from(b'\r')
            || c == CH_NEL
            || c == CH_LS
            || (c == u32::from(b'\n') && self.last_char != Some(u32::from(b'\r')))
        {
            self.line_num += 1;
            self.char_num = 0;
            if self.quote_mode {
                self.quote_mode = false;
                return Err(self.error(RuleErrorKind::NewLineInQuotedString));
            }
        } else if c != u32::from(b'\n') {
            // LF after CR stays on the same logical line
            self.char_num += 1;
        }
        self.last_char = Some(c);
        Ok(Some(c))
    }

    /// The scanner proper: comment stripping, `''` and quote-mode handling,
    /// and backslash escape decoding. Everything above this is grammar.
    pub fn next_char(&mut self) -> Result<RuleChar, RuleError> {
        self.scan_index = self.next_index;
        let mut c = RuleChar {
            ch: self.next_char_ll()?,
            escaped: false,
        };

        // '' is an escaped single quote, in all contexts.
        // A lone ' toggles quote mode, and reads as a grouping paren so that
        // the quoted run binds as a unit.
        if c.ch == Some(u32::from(b'\'')) {
            if self.peek_ll() == Some(u32::from(b'\'')) {
                c.ch = self.next_char_ll()?;
                c.escaped = true;
            } else {
                self.quote_mode = !self.quote_mode;
                c.ch = Some(u32::from(if self.quote_mode { b'(' } else { b')' }));
                c.escaped = false;
                return Ok(c);
            }
        }

        if self.quote_mode {
            c.escaped = true;
        } else {
            if c.ch == Some(u32::from(b'#')) {
                // Comment runs to end of line. The terminating new-line is
                // returned; it reads as white space and keeps tokens on either
                // side of the comment from clumping together.
                loop {
                    c.ch = self.next_char_ll()?;
                    match c.ch {
                        None => break,
                        Some(ch)
                            if ch == u32::from(b'\r')
                                || ch == u32::from(b'\n')
                                || ch == CH_NEL
                                || ch == CH_LS =>
                        {
                            break;
                        }
                        _ => {}
                    }
                }
            }
            let Some(ch) = c.ch else {
                return Ok(c);
            };

            if ch == u32::from(b'\\') {
                c.escaped = true;
                match unescape_at(self.rules, self.next_index) {
                    Some((val, end)) => {
                        let consumed = self.rules[self.next_index..end].chars().count();
                        self.char_num += consumed as u32;
                        self.next_index = end;
                        c.ch = Some(val);
                    }
                    None => return Err(self.error(RuleErrorKind::HexDigitsExpected)),
                }
            }
        }
        Ok(c)
    }

    /// Advance the raw cursor up to byte offset `end`, keeping line/column
    /// bookkeeping intact. Used after an external grammar (the set pattern
    /// parser) has consumed a span of the source.
    pub fn advance_to(&mut self, end: usize) -> Result<(), RuleError> {
        while self.next_index < end {
            self.next_char_ll()?;
        }
        Ok(())
    }
}

/// Return `rules` with `#` comments and ISO control characters removed,
/// otherwise unaltered. Used for display and diagnostics, not for parsing.
pub fn strip_rules(rules: &str) -> String {
    let mut stripped = String::with_capacity(rules.len());
    let mut chars = rules.chars();
    while let Some(mut ch) = chars.next() {
        if ch == '#' {
            for c in chars.by_ref() {
                ch = c;
                if matches!(ch, '\r' | '\n' | '\u{85}') {
                    break;
                }
            }
        }
        if !is_iso_control(ch) {
            stripped.push(ch);
        }
    }
    stripped
}

/// C0 and C1 control characters.
fn is_iso_control(c: char) -> bool {
    let c = c as u32;
    c <= 0x9F && (c < 0x20 || c >= 0x7F)
}
