//! Tag bytes of the SCSU byte stream (UTR #6, table 2).
//!
//! Single-byte mode tags occupy the low control range; Unicode mode tags
//! occupy `0xE0..=0xF2`. Bytes that collide with a tag must be quoted
//! before they can appear as literal data.

/// Quote one character from static or dynamic window 0; `+ n` for window n.
pub(crate) const SQ0: u8 = 0x01;
/// Quote one Unicode character in single-byte mode.
pub(crate) const SQU: u8 = 0x0E;
/// Switch to Unicode mode.
pub(crate) const SCU: u8 = 0x0F;
/// Change to dynamic window 0; `+ n` for window n.
pub(crate) const SC0: u8 = 0x10;
/// Define dynamic window 0 at the offset index that follows; `+ n` for window n.
pub(crate) const SD0: u8 = 0x18;
/// Change to single-byte mode, dynamic window 0; `+ n` for window n.
pub(crate) const UC0: u8 = 0xE0;
/// Define dynamic window 0 and change to single-byte mode; `+ n` for window n.
pub(crate) const UD0: u8 = 0xE8;
/// Quote one Unicode character in Unicode mode.
pub(crate) const UQU: u8 = 0xF0;

/// Bytes read as tags in single-byte mode: SQ0-SQ7, SDX, Srs, SQU, SCU,
/// SC0-SC7, SD0-SD7.
pub(crate) fn is_single_byte_tag(b: u8) -> bool {
    matches!(b, 0x01..=0x08 | 0x0B | 0x0C | 0x0E | 0x0F | 0x10..=0x1F)
}

/// Bytes read as tags in Unicode mode: UC0-UC7, UD0-UD7, UQU, UDX, Urs.
pub(crate) fn is_unicode_tag(b: u8) -> bool {
    matches!(b, 0xE0..=0xF2)
}
