//! Compressing data into the framed format, or into the bare table plus payload layout.
pub(crate) mod bit_writer;
mod frame_compressor;

pub use bit_writer::{pack, BitPackError};
pub use frame_compressor::*;

use crate::code::{CodeAssignError, CodeMap};
use crate::frequency::FrequencyTable;
use crate::table::write_table;
use crate::tree::{HuffmanTree, TreeBuildError};
use alloc::vec::Vec;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CompressError {
    #[error(transparent)]
    TreeBuildError(#[from] TreeBuildError),
    #[error(transparent)]
    CodeAssignError(#[from] CodeAssignError),
    #[error(transparent)]
    BitPackError(#[from] BitPackError),
}

/// Code table and payload without a frame header.
///
/// The decoder needs `symbol_count` and `content_size` from somewhere else, see
/// [`decompress_raw`](crate::decoding::decompress_raw).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArtifact {
    pub symbol_count: usize,
    pub content_size: u64,
    pub data: Vec<u8>,
}

/// Build the tree for `table` and derive its codes.
pub fn build_codes(table: &FrequencyTable) -> Result<CodeMap, CompressError> {
    let tree = HuffmanTree::build(table)?;
    Ok(CodeMap::assign(&tree)?)
}

/// Compress `data` into a frame using the default [`FrameCompressor`] settings.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CompressError> {
    FrameCompressor::new().compress(data)
}

/// Compress `data` into the headerless layout, counting the frequencies from `data`.
pub fn compress_raw(data: &[u8]) -> Result<RawArtifact, CompressError> {
    compress_raw_with_table(data, &FrequencyTable::from_bytes(data))
}

/// Compress `data` with codes built from a caller supplied frequency table.
///
/// Every byte of `data` needs an entry in `table`, otherwise this fails with
/// [`BitPackError::UnknownSymbol`].
pub fn compress_raw_with_table(
    data: &[u8],
    table: &FrequencyTable,
) -> Result<RawArtifact, CompressError> {
    let codes = build_codes(table)?;
    let mut out = Vec::with_capacity(codes.len() * crate::table::RECORD_SIZE + data.len() / 2);
    let symbol_count = write_table(&codes, &mut out);
    pack(data, &codes, &mut out)?;
    Ok(RawArtifact {
        symbol_count,
        content_size: data.len() as u64,
        data: out,
    })
}
