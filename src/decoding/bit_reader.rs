use crate::table::DecoderTree;
use alloc::vec::Vec;
use core::convert::TryFrom;

/// Reads bits in the order the [`BitWriter`](crate::encoding) wrote them: most significant
/// bit of every byte first.
pub(crate) struct BitReader<'s> {
    idx: usize, //index counts bits already read
    source: &'s [u8],
}

impl<'s> BitReader<'s> {
    pub fn new(source: &'s [u8]) -> BitReader<'s> {
        BitReader { idx: 0, source }
    }

    pub fn bits_left(&self) -> usize {
        self.source.len() * 8 - self.idx
    }

    pub fn bits_read(&self) -> usize {
        self.idx
    }

    /// Number of bytes touched so far, including a partially read one
    pub fn bytes_used(&self) -> usize {
        self.idx.div_ceil(8)
    }

    pub fn get_bit(&mut self) -> Option<bool> {
        let byte = *self.source.get(self.idx / 8)?;
        let bit = (byte >> (7 - self.idx % 8)) & 1 == 1;
        self.idx += 1;
        Some(bit)
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitUnpackError {
    #[error("Payload ended after {decoded} of {expected} symbols")]
    TruncatedStream { decoded: u64, expected: u64 },
    #[error("Decoder tree has a node with a missing child, reached at bit {bit_position}. Table is probably corrupted")]
    CorruptTree { bit_position: usize },
    #[error("Can't decode {got} symbols on this platform")]
    ContentTooLarge { got: u64 },
}

/// Decode exactly `expected` symbols from `source` by walking `tree`.
///
/// Padding bits after the last symbol are ignored. Returns the decoded bytes and the
/// number of bytes of `source` that were used.
pub fn unpack(
    source: &[u8],
    tree: &DecoderTree,
    expected: u64,
) -> Result<(Vec<u8>, usize), BitUnpackError> {
    let expected_len =
        usize::try_from(expected).map_err(|_| BitUnpackError::ContentTooLarge { got: expected })?;

    // single symbol alphabet: every symbol is encoded with zero bits
    if let Some(symbol) = tree.symbol(DecoderTree::ROOT) {
        let mut output = Vec::new();
        output
            .try_reserve_exact(expected_len)
            .map_err(|_| BitUnpackError::ContentTooLarge { got: expected })?;
        output.resize(expected_len, symbol);
        return Ok((output, 0));
    }

    let mut br = BitReader::new(source);
    // every symbol needs at least one bit, don't trust `expected` for the allocation
    let mut output = Vec::with_capacity(expected_len.min(br.bits_left()));
    let mut node = DecoderTree::ROOT;
    let mut decoded = 0u64;

    while decoded < expected {
        let (left, right) = match tree.children(node) {
            [Some(left), Some(right)] => (left, right),
            _ => {
                return Err(BitUnpackError::CorruptTree {
                    bit_position: br.bits_read(),
                })
            }
        };
        let bit = br
            .get_bit()
            .ok_or(BitUnpackError::TruncatedStream { decoded, expected })?;
        node = if bit { right } else { left };

        if let Some(symbol) = tree.symbol(node) {
            output.push(symbol);
            decoded += 1;
            node = DecoderTree::ROOT;
        }
    }

    vprintln!(
        "Unpacked {} symbols from {} bits",
        decoded,
        br.bits_read()
    );
    Ok((output, br.bytes_used()))
}
