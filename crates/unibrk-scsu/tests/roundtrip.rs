//! Round-trip checks against a small reference decoder.
//!
//! The decoder understands exactly the stream the encoder produces: the
//! two modes, window changes and definitions, and quoting. It exists so
//! the compressed output can be validated as real SCSU rather than just
//! compared against fixed bytes.

use unibrk_scsu::{Compressor, compress_all};

const STATIC_OFFSETS: [u32; 8] = [
    0x0000, 0x0080, 0x0100, 0x0300, 0x2000, 0x2080, 0x2100, 0x3000,
];

fn offset_for_index(index: u8) -> u32 {
    match index {
        0x01..=0x67 => index as u32 * 0x80,
        0x68..=0xA7 => index as u32 * 0x80 + 0xAC00,
        0xF9 => 0x00C0,
        0xFA => 0x0250,
        0xFB => 0x0370,
        0xFC => 0x0530,
        0xFD => 0x3040,
        0xFE => 0x30A0,
        0xFF => 0xFF60,
        _ => 0,
    }
}

fn decompress(bytes: &[u8]) -> String {
    let mut offsets: [u32; 8] = [
        0x0080, 0x00C0, 0x0400, 0x0600, 0x0900, 0x3040, 0x30A0, 0xFF00,
    ];
    let mut window = 0usize;
    let mut unicode_mode = false;
    let mut units: Vec<u16> = Vec::new();

    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        i += 1;
        if unicode_mode {
            match b {
                // UCn
                0xE0..=0xE7 => {
                    window = (b - 0xE0) as usize;
                    unicode_mode = false;
                }
                // UDn: define window, back to single-byte mode
                0xE8..=0xEF => {
                    window = (b - 0xE8) as usize;
                    offsets[window] = offset_for_index(bytes[i]);
                    i += 1;
                    unicode_mode = false;
                }
                // UQU
                0xF0 => {
                    units.push(((bytes[i] as u16) << 8) | bytes[i + 1] as u16);
                    i += 2;
                }
                // raw pair; b is the high byte
                _ => {
                    units.push(((b as u16) << 8) | bytes[i] as u16);
                    i += 1;
                }
            }
        } else {
            match b {
                // SQn: one quoted character, static or dynamic
                0x01..=0x08 => {
                    let w = (b - 0x01) as usize;
                    let quoted = bytes[i] as u32;
                    i += 1;
                    let c = if quoted < 0x80 {
                        STATIC_OFFSETS[w] + quoted
                    } else {
                        offsets[w] + (quoted - 0x80)
                    };
                    units.push(c as u16);
                }
                // SQU
                0x0E => {
                    units.push(((bytes[i] as u16) << 8) | bytes[i + 1] as u16);
                    i += 2;
                }
                // SCU
                0x0F => unicode_mode = true,
                // SCn
                0x10..=0x17 => window = (b - 0x10) as usize,
                // SDn
                0x18..=0x1F => {
                    window = (b - 0x18) as usize;
                    offsets[window] = offset_for_index(bytes[i]);
                    i += 1;
                }
                // window byte
                0x80..=0xFF => units.push((offsets[window] + (b as u32 - 0x80)) as u16),
                // transparent ASCII
                _ => units.push(b as u16),
            }
        }
    }

    String::from_utf16(&units).unwrap()
}

fn round_trip(text: &str) {
    let bytes = compress_all(text);
    assert_eq!(decompress(&bytes), text, "failed for {text:?}");
}

#[test]
fn ascii() {
    round_trip("");
    round_trip("hello, world");
    round_trip("line one\nline two\r\n\ttabbed");
}

#[test]
fn tag_collisions() {
    round_trip("\u{1}\u{f}\u{e}\u{10}");
}

#[test]
fn latin() {
    round_trip("caf\u{E9} na\u{EF}vet\u{E9}");
    round_trip("\u{C0}\u{113}\u{14D}");
}

#[test]
fn cyrillic() {
    round_trip("\u{43F}\u{440}\u{438}\u{432}\u{435}\u{442}, \u{43C}\u{438}\u{440}");
}

#[test]
fn greek_and_armenian() {
    round_trip("\u{3B1}\u{3B2}\u{3B3}\u{3B4} \u{561}\u{562}\u{563}\u{564}");
}

#[test]
fn kana() {
    round_trip("\u{3053}\u{3093}\u{306B}\u{3061}\u{306F} \u{30AB}\u{30BF}\u{30AB}\u{30CA}");
}

#[test]
fn cjk() {
    round_trip("\u{6F22}\u{5B57}\u{306E}\u{30C6}\u{30B9}\u{30C8}");
    round_trip("interleaved \u{4E00} ascii \u{4E8C}\u{4E09}\u{56DB} text");
}

#[test]
fn combining_marks() {
    round_trip("a\u{301}e\u{302}o\u{303}");
}

#[test]
fn surrogates() {
    round_trip("\u{1F600}\u{1F601} ok \u{10000}");
}

#[test]
fn mode_thrash() {
    round_trip("a\u{4E00}b\u{4E8C}c\u{4E09}d");
}

#[test]
fn private_use_area() {
    round_trip("\u{E000}\u{E001}\u{E002}");
}

#[test]
fn chunked_stream_decodes_identically() {
    let text = "mix \u{3B1}\u{3B2}\u{3B3} and \u{4E00}\u{4E8C} plus \u{430}\u{431}\u{432}";
    let units: Vec<u16> = text.encode_utf16().collect();

    let mut compressor = Compressor::new();
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < units.len() {
        let mut buf = [0u8; 4];
        let progress = compressor.compress(&units[pos..], &mut buf).unwrap();
        assert!(progress.chars_read > 0);
        out.extend_from_slice(&buf[..progress.bytes_written]);
        pos += progress.chars_read;
    }

    assert_eq!(decompress(&out), text);
}
