use crate::compressor::{Compressor, Progress, ScsuError, compress_all};

#[test]
fn ascii_passes_through() {
    assert_eq!(compress_all("hello"), b"hello");
    assert_eq!(compress_all("hi\tthere\n"), b"hi\tthere\n");
    assert_eq!(compress_all(""), b"");
}

#[test]
fn tag_bytes_are_quoted() {
    // 0x0F would read as the switch-to-Unicode tag
    assert_eq!(compress_all("\u{000F}"), [0x01, 0x0F]);
    assert_eq!(compress_all("\u{0001}"), [0x01, 0x01]);
    // 0x09/0x0A/0x0D are not tags and stay bare
    assert_eq!(compress_all("\u{0009}"), [0x09]);
}

#[test]
fn latin1_uses_the_default_window() {
    // window 0 starts at 0x80, so Latin-1 is byte-identical
    assert_eq!(compress_all("caf\u{E9}"), [0x63, 0x61, 0x66, 0xE9]);
}

#[test]
fn cyrillic_run_switches_to_its_default_window() {
    // window 2 is predefined at 0x0400
    assert_eq!(
        compress_all("\u{430}\u{431}\u{432}"),
        [0x12, 0xB0, 0xB1, 0xB2]
    );
}

#[test]
fn lone_windowed_char_is_quoted_not_switched() {
    assert_eq!(compress_all("\u{430}b"), [0x03, 0xB0, 0x62]);
}

#[test]
fn greek_run_defines_a_window() {
    // no default window covers Greek; expect a define of window 7 (the
    // least recently used) at the Greek half-block offset 0x0370
    assert_eq!(
        compress_all("\u{3B1}\u{3B2}\u{3B3}"),
        [0x1F, 0xFB, 0xC1, 0xC2, 0xC3]
    );
}

#[test]
fn window_definitions_evict_least_recently_used() {
    // Greek takes window 7, so Armenian must take window 6
    assert_eq!(
        compress_all("\u{3B1}\u{3B2}\u{3B3}\u{561}\u{562}\u{563}"),
        [0x1F, 0xFB, 0xC1, 0xC2, 0xC3, 0x1E, 0xFC, 0xB1, 0xB2, 0xB3]
    );
}

#[test]
fn static_window_quoting() {
    // combining acute lives in static window 3 (0x0300), quoted unbiased
    assert_eq!(compress_all("a\u{301}b"), [0x61, 0x04, 0x01, 0x62]);
}

#[test]
fn lone_uncompressible_char_is_quoted() {
    assert_eq!(compress_all("a\u{4E00}b"), [0x61, 0x0E, 0x4E, 0x00, 0x62]);
}

#[test]
fn uncompressible_run_switches_to_unicode_mode() {
    assert_eq!(
        compress_all("\u{4E00}\u{4E8C}"),
        [0x0F, 0x4E, 0x00, 0x4E, 0x8C]
    );
}

#[test]
fn unicode_mode_returns_to_single_byte_for_ascii() {
    assert_eq!(
        compress_all("\u{4E00}\u{4E8C}ab"),
        [0x0F, 0x4E, 0x00, 0x4E, 0x8C, 0xE0, 0x61, 0x62]
    );
}

#[test]
fn surrogate_pairs_travel_as_raw_pairs() {
    // U+1F600 encodes as the surrogates D83D DE00, both uncompressible
    assert_eq!(
        compress_all("\u{1F600}"),
        [0x0F, 0xD8, 0x3D, 0xDE, 0x00]
    );
}

#[test]
fn fullwidth_ascii_has_a_default_window() {
    // window 7 is predefined at 0xFF00
    assert_eq!(
        compress_all("\u{FF01}\u{FF01}\u{FF01}"),
        [0x17, 0x81, 0x81, 0x81]
    );
}

#[test]
fn output_buffer_must_hold_four_bytes() {
    let mut compressor = Compressor::new();
    let mut small = [0u8; 3];
    assert_eq!(
        compressor.compress(&[0x61], &mut small),
        Err(ScsuError::OutputBufferTooSmall)
    );
}

#[test]
fn compress_reports_progress() {
    let mut compressor = Compressor::new();
    let mut buf = [0u8; 16];
    let progress = compressor.compress(&[0x61, 0x62], &mut buf).unwrap();
    assert_eq!(
        progress,
        Progress {
            chars_read: 2,
            bytes_written: 2,
        }
    );
}

#[test]
fn chunked_output_matches_one_shot() {
    let text = "\u{3B1}\u{3B2}\u{3B3}\u{561}\u{562}\u{563} mixed ascii \u{430}\u{431}\u{432}";
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

    assert_eq!(out, compress_all(text));
}

#[test]
fn reset_restores_the_initial_state() {
    let text = "\u{3B1}\u{3B2}\u{3B3}";
    let units: Vec<u16> = text.encode_utf16().collect();

    let mut compressor = Compressor::new();
    let mut first = [0u8; 16];
    let a = compressor.compress(&units, &mut first).unwrap();

    compressor.reset();
    let mut second = [0u8; 16];
    let b = compressor.compress(&units, &mut second).unwrap();

    assert_eq!(a, b);
    assert_eq!(first, second);
}
