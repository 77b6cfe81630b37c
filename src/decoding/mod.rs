//! Structures and utilities used for decoding frames and headerless artifacts.
pub(crate) mod bit_reader;
mod frame_decoder;

pub use bit_reader::{unpack, BitUnpackError};
pub use frame_decoder::*;

use crate::frame::{ReadFrameHeaderError, CHECKSUM_SIZE};
use crate::table::{DecoderTree, TableDecodeError};
use alloc::vec::Vec;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecompressError {
    #[error(transparent)]
    ReadFrameHeaderError(#[from] ReadFrameHeaderError),
    #[error(transparent)]
    TableDecodeError(#[from] TableDecodeError),
    #[error(transparent)]
    BitUnpackError(#[from] BitUnpackError),
    #[error("Frame announces a content checksum but is missing the {CHECKSUM_SIZE} checksum bytes")]
    MissingChecksum,
    #[error("Content checksum mismatch. Stored: 0x{stored:08X}, Computed: 0x{computed:08X}")]
    ChecksumMismatch { stored: u32, computed: u32 },
    #[error("Payload has {got} unused bytes after the last symbol")]
    TrailingPayload { got: usize },
}

/// Decompress a complete frame.
pub fn decompress(source: &[u8]) -> Result<Vec<u8>, DecompressError> {
    FrameDecoder::new(source)?.decode()
}

/// Decompress the headerless layout, with the record count and decoded size supplied by
/// the caller.
///
/// Returns the decoded bytes and the number of bytes of `source` used.
pub fn decompress_raw(
    source: &[u8],
    symbol_count: usize,
    content_size: u64,
) -> Result<(Vec<u8>, usize), DecompressError> {
    let (tree, table_size) = DecoderTree::read_table(source, symbol_count)?;
    let (output, payload_size) = unpack(&source[table_size..], &tree, content_size)?;
    Ok((output, table_size + payload_size))
}
