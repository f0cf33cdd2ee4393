//! The SCSU encoder.
//!
//! Compression works through eight dynamic windows, each covering 128
//! consecutive code points. In single-byte mode a character inside the
//! active window is one byte; ASCII passes through directly. Text that
//! does not cluster into windows is handled in Unicode mode, two bytes
//! per character. Mode and window switches are chosen by looking ahead
//! up to two characters, so a switch is only paid for when the following
//! text will amortize it.
//!
//! Input is a `u16` slice in UTF-16 code unit order; surrogates need no
//! special handling because both halves of a pair fall in the
//! uncompressible range and travel as raw Unicode-mode bytes.

use thiserror::Error;

use crate::tags::{self, SC0, SCU, SD0, SQ0, SQU, UC0, UD0};

const NUM_WINDOWS: usize = 8;

/// A window byte is `char - window_offset + 0x80`.
const COMPRESSION_OFFSET: u32 = 0x80;

/// Offset-table indices for the half-block scripts of UTR #6 table 4.
const RESERVED_INDEX: u8 = 0x00;
const LATIN_INDEX: u8 = 0xF9;
const IPA_EXTENSION_INDEX: u8 = 0xFA;
const GREEK_INDEX: u8 = 0xFB;
const ARMENIAN_INDEX: u8 = 0xFC;
const HIRAGANA_INDEX: u8 = 0xFD;
const KATAKANA_INDEX: u8 = 0xFE;
const HALFWIDTH_KATAKANA_INDEX: u8 = 0xFF;

/// Dynamic window positions at reset: Latin-1, Latin Extended, Cyrillic,
/// Arabic, Devanagari, Hiragana, Katakana, Fullwidth ASCII.
const DEFAULT_OFFSETS: [u32; NUM_WINDOWS] = [
    0x0080, 0x00C0, 0x0400, 0x0600, 0x0900, 0x3040, 0x30A0, 0xFF00,
];

/// Static windows, quotable with SQ0-SQ7 but never repositioned.
const STATIC_OFFSETS: [u32; NUM_WINDOWS] = [
    0x0000, 0x0080, 0x0100, 0x0300, 0x2000, 0x2080, 0x2100, 0x3000,
];

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScsuError {
    /// The worst case for one character is four bytes (SCU, UQU, and the
    /// character itself), so smaller buffers could make no progress at all.
    #[error("output buffer must hold at least 4 bytes")]
    OutputBufferTooSmall,
}

/// How much one [`Compressor::compress`] call consumed and produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// UTF-16 code units consumed from the input slice.
    pub chars_read: usize,
    /// Bytes written to the output slice.
    pub bytes_written: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    SingleByte,
    Unicode,
}

/// An incremental SCSU encoder.
///
/// Window definitions, the active mode, and the index history survive
/// across [`compress`] calls, so long inputs may be fed through a small
/// output buffer chunk by chunk. A call consumes only input it can
/// completely output.
///
/// [`compress`]: Compressor::compress
#[derive(Debug, Clone)]
pub struct Compressor {
    current_window: usize,
    offsets: [u32; NUM_WINDOWS],
    mode: Mode,
    /// How often each offset-table index has been seen; a repeat earns the
    /// script its own window.
    index_count: [u32; 256],
    time_stamps: [u32; NUM_WINDOWS],
    time_stamp: u32,
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor {
    pub fn new() -> Self {
        Self {
            current_window: 0,
            offsets: DEFAULT_OFFSETS,
            mode: Mode::SingleByte,
            index_count: [0; 256],
            time_stamps: [0; NUM_WINDOWS],
            time_stamp: 0,
        }
    }

    /// Return the compressor to its initial state: default windows,
    /// single-byte mode, cleared history.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Compress as much of `chars` as fits in `bytes`.
    ///
    /// When the output buffer fills mid-character, the character is left
    /// unconsumed for the next call rather than split.
    pub fn compress(&mut self, chars: &[u16], bytes: &mut [u8]) -> Result<Progress, ScsuError> {
        if bytes.len() < 4 {
            return Err(ScsuError::OutputBufferTooSmall);
        }

        let mut uc_pos = 0usize;
        let mut byte_pos = 0usize;

        'main: while uc_pos < chars.len() && byte_pos < bytes.len() {
            match self.mode {
                Mode::SingleByte => {
                    'single: while uc_pos < chars.len() && byte_pos < bytes.len() {
                        let cur = chars[uc_pos] as u32;
                        uc_pos += 1;
                        let next = chars.get(uc_pos).map(|&c| c as u32);

                        if cur < 0x80 {
                            // ASCII is transparent, except bytes that read
                            // as tags, which quote through static window 0.
                            let lo = cur as u8;
                            if tags::is_single_byte_tag(lo) {
                                if byte_pos + 1 >= bytes.len() {
                                    uc_pos -= 1;
                                    break 'main;
                                }
                                bytes[byte_pos] = SQ0;
                                byte_pos += 1;
                            }
                            bytes[byte_pos] = lo;
                            byte_pos += 1;
                        } else if self.in_dynamic_window(cur, self.current_window) {
                            bytes[byte_pos] = (cur - self.offsets[self.current_window]
                                + COMPRESSION_OFFSET) as u8;
                            byte_pos += 1;
                        } else if !is_compressible(cur) {
                            // Quote a lone uncompressible character; a run
                            // of them is cheaper in Unicode mode.
                            if next.is_some_and(is_compressible) {
                                if byte_pos + 2 >= bytes.len() {
                                    uc_pos -= 1;
                                    break 'main;
                                }
                                bytes[byte_pos] = SQU;
                                byte_pos += 1;
                                put_raw_unicode(bytes, &mut byte_pos, cur);
                            } else {
                                if byte_pos + 3 >= bytes.len() {
                                    uc_pos -= 1;
                                    break 'main;
                                }
                                bytes[byte_pos] = SCU;
                                byte_pos += 1;
                                put_unicode(bytes, &mut byte_pos, cur);
                                self.mode = Mode::Unicode;
                                break 'single;
                            }
                        } else if let Some(window) = self.find_dynamic_window(cur) {
                            let forward = chars.get(uc_pos + 1).map(|&c| c as u32);

                            // Switch windows only when the next two
                            // characters come along; otherwise quote.
                            if next.is_some_and(|c| self.in_dynamic_window(c, window))
                                && forward.is_some_and(|c| self.in_dynamic_window(c, window))
                            {
                                if byte_pos + 1 >= bytes.len() {
                                    uc_pos -= 1;
                                    break 'main;
                                }
                                bytes[byte_pos] = SC0 + window as u8;
                                bytes[byte_pos + 1] =
                                    (cur - self.offsets[window] + COMPRESSION_OFFSET) as u8;
                                byte_pos += 2;
                                self.touch(window);
                                self.current_window = window;
                            } else {
                                if byte_pos + 1 >= bytes.len() {
                                    uc_pos -= 1;
                                    break 'main;
                                }
                                bytes[byte_pos] = SQ0 + window as u8;
                                bytes[byte_pos + 1] =
                                    (cur - self.offsets[window] + COMPRESSION_OFFSET) as u8;
                                byte_pos += 2;
                            }
                        } else if let Some(window) = find_static_window(cur)
                            .filter(|&w| !next.is_some_and(|c| in_static_window(c, w)))
                        {
                            // Static windows quote without the 0x80 bias.
                            if byte_pos + 1 >= bytes.len() {
                                uc_pos -= 1;
                                break 'main;
                            }
                            bytes[byte_pos] = SQ0 + window as u8;
                            bytes[byte_pos + 1] = (cur - STATIC_OFFSETS[window]) as u8;
                            byte_pos += 2;
                        } else {
                            let cur_index = make_index(cur);
                            self.index_count[cur_index as usize] += 1;
                            let forward = chars.get(uc_pos + 1).map(|&c| c as u32);
                            let next_index = next.map_or(RESERVED_INDEX, make_index);
                            let forward_index = forward.map_or(RESERVED_INDEX, make_index);

                            // A repeated script, or three characters of it
                            // in a row, earns a window. Otherwise gamble on
                            // Unicode mode and keep the windows for longer
                            // runs.
                            if self.index_count[cur_index as usize] > 1
                                || (cur_index == next_index && cur_index == forward_index)
                            {
                                if byte_pos + 2 >= bytes.len() {
                                    uc_pos -= 1;
                                    break 'main;
                                }
                                let window = self.lr_defined_window();
                                bytes[byte_pos] = SD0 + window as u8;
                                bytes[byte_pos + 1] = cur_index;
                                bytes[byte_pos + 2] =
                                    (cur - offset_for_index(cur_index) + COMPRESSION_OFFSET) as u8;
                                byte_pos += 3;
                                self.offsets[window] = offset_for_index(cur_index);
                                self.current_window = window;
                                self.touch(window);
                            } else {
                                if byte_pos + 3 >= bytes.len() {
                                    uc_pos -= 1;
                                    break 'main;
                                }
                                bytes[byte_pos] = SCU;
                                byte_pos += 1;
                                put_unicode(bytes, &mut byte_pos, cur);
                                self.mode = Mode::Unicode;
                                break 'single;
                            }
                        }
                    }
                }

                Mode::Unicode => {
                    'unicode: while uc_pos < chars.len() && byte_pos < bytes.len() {
                        let cur = chars[uc_pos] as u32;
                        uc_pos += 1;
                        let next = chars.get(uc_pos).map(|&c| c as u32);

                        if !is_compressible(cur) || next.is_some_and(|c| !is_compressible(c)) {
                            // Two uncompressible characters in a row stay
                            // as raw pairs.
                            if byte_pos + 2 >= bytes.len() {
                                uc_pos -= 1;
                                break 'main;
                            }
                            put_unicode(bytes, &mut byte_pos, cur);
                        } else if cur < 0x80 {
                            let lo = cur as u8;

                            // Two ASCII characters in a row pay for the
                            // switch back to single-byte mode.
                            if next.is_some_and(|c| c < 0x80) && !tags::is_single_byte_tag(lo) {
                                if byte_pos + 1 >= bytes.len() {
                                    uc_pos -= 1;
                                    break 'main;
                                }
                                let window = self.current_window;
                                bytes[byte_pos] = UC0 + window as u8;
                                bytes[byte_pos + 1] = lo;
                                byte_pos += 2;
                                self.touch(window);
                                self.mode = Mode::SingleByte;
                                break 'unicode;
                            } else {
                                if byte_pos + 1 >= bytes.len() {
                                    uc_pos -= 1;
                                    break 'main;
                                }
                                bytes[byte_pos] = 0x00;
                                bytes[byte_pos + 1] = lo;
                                byte_pos += 2;
                            }
                        } else if let Some(window) = self.find_dynamic_window(cur) {
                            if next.is_some_and(|c| self.in_dynamic_window(c, window)) {
                                if byte_pos + 1 >= bytes.len() {
                                    uc_pos -= 1;
                                    break 'main;
                                }
                                bytes[byte_pos] = UC0 + window as u8;
                                bytes[byte_pos + 1] =
                                    (cur - self.offsets[window] + COMPRESSION_OFFSET) as u8;
                                byte_pos += 2;
                                self.touch(window);
                                self.current_window = window;
                                self.mode = Mode::SingleByte;
                                break 'unicode;
                            } else {
                                if byte_pos + 2 >= bytes.len() {
                                    uc_pos -= 1;
                                    break 'main;
                                }
                                put_unicode(bytes, &mut byte_pos, cur);
                            }
                        } else {
                            let cur_index = make_index(cur);
                            self.index_count[cur_index as usize] += 1;
                            let forward = chars.get(uc_pos + 1).map(|&c| c as u32);
                            let next_index = next.map_or(RESERVED_INDEX, make_index);
                            let forward_index = forward.map_or(RESERVED_INDEX, make_index);

                            if self.index_count[cur_index as usize] > 1
                                || (cur_index == next_index && cur_index == forward_index)
                            {
                                if byte_pos + 2 >= bytes.len() {
                                    uc_pos -= 1;
                                    break 'main;
                                }
                                let window = self.lr_defined_window();
                                bytes[byte_pos] = UD0 + window as u8;
                                bytes[byte_pos + 1] = cur_index;
                                bytes[byte_pos + 2] =
                                    (cur - offset_for_index(cur_index) + COMPRESSION_OFFSET) as u8;
                                byte_pos += 3;
                                self.offsets[window] = offset_for_index(cur_index);
                                self.current_window = window;
                                self.touch(window);
                                self.mode = Mode::SingleByte;
                                break 'unicode;
                            } else {
                                if byte_pos + 2 >= bytes.len() {
                                    uc_pos -= 1;
                                    break 'main;
                                }
                                put_unicode(bytes, &mut byte_pos, cur);
                            }
                        }
                    }
                }
            }
        }

        Ok(Progress {
            chars_read: uc_pos,
            bytes_written: byte_pos,
        })
    }

    fn in_dynamic_window(&self, c: u32, window: usize) -> bool {
        c >= self.offsets[window] && c < self.offsets[window] + 0x80
    }

    /// The dynamic window containing `c`, if any, bumping its use count.
    /// Scans from window 7 down, so the search matches the eviction order.
    fn find_dynamic_window(&mut self, c: u32) -> Option<usize> {
        let found = (0..NUM_WINDOWS).rev().find(|&w| self.in_dynamic_window(c, w));
        if let Some(w) = found {
            self.time_stamps[w] += 1;
        }
        found
    }

    /// The window least recently defined or switched to; this is the one a
    /// new definition overwrites.
    fn lr_defined_window(&self) -> usize {
        let mut least = u32::MAX;
        let mut which = 0;
        for w in (0..NUM_WINDOWS).rev() {
            if self.time_stamps[w] < least {
                least = self.time_stamps[w];
                which = w;
            }
        }
        which
    }

    fn touch(&mut self, window: usize) {
        self.time_stamp += 1;
        self.time_stamps[window] = self.time_stamp;
    }
}

/// Compress a whole string with a fresh [`Compressor`].
pub fn compress_all(text: &str) -> Vec<u8> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let mut compressor = Compressor::new();

    // Worst case is three bytes per code unit (SQU plus the raw pair),
    // after an initial SCU.
    let mut buf = vec![0u8; (3 * units.len() + 1).max(4)];
    let Ok(progress) = compressor.compress(&units, &mut buf) else {
        unreachable!("buffer is sized above the minimum");
    };
    debug_assert_eq!(progress.chars_read, units.len());

    buf.truncate(progress.bytes_written);
    buf
}

fn is_compressible(c: u32) -> bool {
    c < 0x3400 || c >= 0xE000
}

fn in_static_window(c: u32, window: usize) -> bool {
    c >= STATIC_OFFSETS[window] && c < STATIC_OFFSETS[window] + 0x80
}

fn find_static_window(c: u32) -> Option<usize> {
    (0..NUM_WINDOWS).rev().find(|&w| in_static_window(c, w))
}

/// Write `c` as a raw big-endian pair.
fn put_raw_unicode(bytes: &mut [u8], byte_pos: &mut usize, c: u32) {
    bytes[*byte_pos] = (c >> 8) as u8;
    bytes[*byte_pos + 1] = (c & 0xFF) as u8;
    *byte_pos += 2;
}

/// Write `c` as a Unicode-mode pair, quoting high bytes that collide with
/// Unicode-mode tags.
fn put_unicode(bytes: &mut [u8], byte_pos: &mut usize, c: u32) {
    if tags::is_unicode_tag((c >> 8) as u8) {
        bytes[*byte_pos] = tags::UQU;
        *byte_pos += 1;
    }
    put_raw_unicode(bytes, byte_pos, c);
}

/// The offset-table index for a compressible character at or above 0x80
/// (UTR #6 table 4). The named half-block scripts get fixed high indices;
/// everything else maps by 128-character block.
fn make_index(c: u32) -> u8 {
    match c {
        0x00C0..0x0140 => LATIN_INDEX,
        0x0250..0x02D0 => IPA_EXTENSION_INDEX,
        0x0370..0x03F0 => GREEK_INDEX,
        0x0530..0x0590 => ARMENIAN_INDEX,
        0x3040..0x30A0 => HIRAGANA_INDEX,
        0x30A0..0x3120 => KATAKANA_INDEX,
        0xFF60..0xFF9F => HALFWIDTH_KATAKANA_INDEX,
        0x0080..0x3400 => ((c / 0x80) & 0xFF) as u8,
        0xE000..=0xFFFF => (((c - 0xAC00) / 0x80) & 0xFF) as u8,
        _ => RESERVED_INDEX,
    }
}

/// The window start position named by an offset-table index.
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
