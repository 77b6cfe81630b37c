//! A Huffman coder with a small, self-describing container format.
//!
//! Compression builds a Huffman tree from the byte frequencies of the input, derives the
//! prefix code for every symbol, writes the code table followed by the bit-packed payload.
//! Decompression rebuilds a decoding tree from the stored table and walks it bit by bit.
//!
//! ```
//! let input = b"abracadabra";
//! let compressed = ruhuff::encoding::compress(input).unwrap();
//! let decompressed = ruhuff::decoding::decompress(&compressed).unwrap();
//! assert_eq!(&decompressed, input);
//! ```
#![no_std]
#![deny(trivial_casts, trivial_numeric_casts, rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

/// Emits a debug event when the `tracing` feature is enabled, compiles to nothing otherwise.
macro_rules! vprintln {
    ($($x:tt)*) => {{
        #[cfg(feature = "tracing")]
        {
            tracing::debug!($($x)*);
        }
    }};
}

pub mod code;
pub mod decoding;
pub mod encoding;
pub mod frame;
pub mod frequency;
pub mod table;
pub mod tree;
mod tests;

pub use code::{Code, CodeMap};
pub use decoding::{decompress, decompress_raw, DecompressError};
pub use encoding::{compress, compress_raw, CompressError, FrameCompressor};
pub use frequency::FrequencyTable;
pub use tree::HuffmanTree;

/// Compress `data` in both layouts and check that decoding gives back the input.
///
/// Panics on any mismatch, meant for fuzzing and tests.
#[cfg(any(test, feature = "fuzz_exports"))]
pub fn round_trip(data: &[u8]) {
    if data.is_empty() {
        return;
    }

    let compressed = encoding::compress(data).unwrap();
    let decompressed = decoding::decompress(&compressed).unwrap();
    assert_eq!(data, &decompressed[..]);

    let raw = encoding::compress_raw(data).unwrap();
    let (decompressed, used) =
        decoding::decompress_raw(&raw.data, raw.symbol_count, raw.content_size).unwrap();
    assert_eq!(data, &decompressed[..]);
    assert_eq!(used, raw.data.len());
}
