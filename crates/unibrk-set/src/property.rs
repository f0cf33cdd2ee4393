//! Unicode property lookup.
//!
//! Property names are resolved through `regex-syntax`, which embeds the
//! Unicode character database tables. A `\p{Lu}` or `[:Greek:]` reference
//! becomes a parsed `\p{...}` class whose ranges feed straight into a
//! [`UnicodeSet`].

use regex_syntax::ParserBuilder;
use regex_syntax::hir::{Class, HirKind};

use crate::set::UnicodeSet;

/// Resolve a property query (`Lu`, `Greek`, `gc=Nd`, ...) into the set of
/// matching code points. `negated` selects the `\P{...}` complement.
/// Returns `None` when the name is not a recognized property.
pub(crate) fn lookup(name: &str, negated: bool) -> Option<UnicodeSet> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.contains(['{', '}', '\\']) {
        return None;
    }
    let pattern = if negated {
        format!(r"\P{{{trimmed}}}")
    } else {
        format!(r"\p{{{trimmed}}}")
    };
    let hir = ParserBuilder::new()
        .unicode(true)
        .utf8(false)
        .build()
        .parse(&pattern)
        .ok()?;
    let HirKind::Class(Class::Unicode(cls)) = hir.kind() else {
        return None;
    };
    let mut set = UnicodeSet::new();
    for range in cls.ranges() {
        set.add_range(range.start() as u32, range.end() as u32);
    }
    Some(set)
}
