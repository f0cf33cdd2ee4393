//! Backslash escape decoding.
//!
//! Shared between the rule scanner (escapes in rule text) and the set
//! pattern parser (escapes inside `[...]`). Decodes exactly one escape
//! sequence; the caller has already consumed the backslash.

use crate::set::CODE_POINT_MAX;

/// Decode one escape sequence starting at byte `offset` (the position just
/// after a backslash). Returns the decoded code point and the byte offset of
/// the first character after the sequence.
///
/// Recognized forms: `\uXXXX` (exactly 4 hex digits; a lead surrogate
/// followed by another `\uXXXX` trail is combined), `\UXXXXXXXX` (8 hex
/// digits), `\x{h...h}` (1-6 hex digits), `\xXX` (1-2 hex digits), `\cX`
/// (control), octal `\o`, `\oo`, `\ooo`, the single-letter controls
/// `\a \b \e \f \n \r \t \v`, and any other character standing for itself.
///
/// Returns `None` when nothing valid can be consumed: end of input right
/// after the backslash, or malformed hex digits.
pub fn unescape_at(text: &str, offset: usize) -> Option<(u32, usize)> {
    let c = text[offset..].chars().next()?;
    let pos = offset + c.len_utf8();
    match c {
        'u' => {
            let (lead, end) = hex_exact(text, pos, 4)?;
            // a lead surrogate pairs with an immediately following \uXXXX trail
            if (0xD800..=0xDBFF).contains(&lead)
                && text[end..].starts_with("\\u")
                && let Some((trail, trail_end)) = hex_exact(text, end + 2, 4)
                && (0xDC00..=0xDFFF).contains(&trail)
            {
                let combined = 0x10000 + ((lead - 0xD800) << 10) + (trail - 0xDC00);
                return Some((combined, trail_end));
            }
            Some((lead, end))
        }
        'U' => {
            let (cp, end) = hex_exact(text, pos, 8)?;
            (cp <= CODE_POINT_MAX).then_some((cp, end))
        }
        'x' => {
            if text[pos..].starts_with('{') {
                let (cp, end) = hex_bounded(text, pos + 1, 1, 6)?;
                if !text[end..].starts_with('}') || cp > CODE_POINT_MAX {
                    return None;
                }
                Some((cp, end + 1))
            } else {
                hex_bounded(text, pos, 1, 2)
            }
        }
        'c' => {
            let ctl = text[pos..].chars().next()?;
            Some(((ctl as u32) & 0x1F, pos + ctl.len_utf8()))
        }
        '0'..='7' => {
            let mut val = c.to_digit(8).unwrap_or(0);
            let mut p = pos;
            for ch in text[pos..].chars().take(2) {
                match ch.to_digit(8) {
                    Some(d) => {
                        val = val * 8 + d;
                        p += ch.len_utf8();
                    }
                    None => break,
                }
            }
            Some((val, p))
        }
        'a' => Some((0x07, pos)),
        'b' => Some((0x08, pos)),
        'e' => Some((0x1B, pos)),
        'f' => Some((0x0C, pos)),
        'n' => Some((0x0A, pos)),
        'r' => Some((0x0D, pos)),
        't' => Some((0x09, pos)),
        'v' => Some((0x0B, pos)),
        _ => Some((c as u32, pos)),
    }
}

/// Read exactly `n` hex digits at `pos`.
fn hex_exact(text: &str, pos: usize, n: usize) -> Option<(u32, usize)> {
    let mut val = 0u32;
    let mut p = pos;
    for _ in 0..n {
        let ch = text[p..].chars().next()?;
        let d = ch.to_digit(16)?;
        val = val * 16 + d;
        p += ch.len_utf8();
    }
    Some((val, p))
}

/// Read between `min` and `max` hex digits at `pos`.
fn hex_bounded(text: &str, pos: usize, min: usize, max: usize) -> Option<(u32, usize)> {
    let mut val = 0u32;
    let mut p = pos;
    let mut count = 0;
    while count < max {
        let Some(ch) = text[p..].chars().next() else {
            break;
        };
        let Some(d) = ch.to_digit(16) else { break };
        val = val * 16 + d;
        p += ch.len_utf8();
        count += 1;
    }
    (count >= min).then_some((val, p))
}

/// Pattern_White_Space, the fixed set of characters ignorable in patterns.
pub fn is_pattern_white_space(c: char) -> bool {
    matches!(
        c,
        '\u{9}'..='\u{D}' | ' ' | '\u{85}' | '\u{200E}' | '\u{200F}' | '\u{2028}' | '\u{2029}'
    )
}
