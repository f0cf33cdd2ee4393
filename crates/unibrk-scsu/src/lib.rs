#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Standard Compression Scheme for Unicode (UTR #6) encoder.
//!
//! SCSU stores runs of small-alphabet text at roughly one byte per
//! character by sliding 128-character windows over the script in use,
//! while staying byte-transparent for ASCII and falling back to two
//! bytes per character for text that does not cluster.
//!
//! [`compress_all`] handles the whole-string case; [`Compressor`] is the
//! incremental form for feeding long input through a bounded buffer.
//!
//! ```
//! let bytes = unibrk_scsu::compress_all("hello");
//! assert_eq!(bytes, b"hello");
//! ```

pub mod compressor;

mod tags;

#[cfg(test)]
mod compressor_tests;

pub use compressor::{Compressor, Progress, ScsuError, compress_all};
