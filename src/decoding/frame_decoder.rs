use super::{unpack, DecompressError};
use crate::code::CodeMap;
use crate::frame::{FrameHeader, CHECKSUM_SIZE, FRAME_HEADER_SIZE};
use crate::table::DecoderTree;
use alloc::vec::Vec;

/// A parsed frame: header, rebuilt decoder tree and the still packed payload.
///
/// `FrameDecoder::new` checks everything that can be checked without decoding the payload.
/// [`FrameDecoder::decode`] does the rest.
///
/// ```
/// let frame = ruhuff::compress(b"a frame of bytes").unwrap();
/// let decoder = ruhuff::decoding::FrameDecoder::new(&frame).unwrap();
/// assert_eq!(decoder.header().content_size(), 16);
/// assert_eq!(decoder.decode().unwrap(), b"a frame of bytes");
/// ```
pub struct FrameDecoder<'s> {
    header: FrameHeader,
    tree: DecoderTree,
    payload: &'s [u8],
    checksum: Option<u32>,
}

impl<'s> FrameDecoder<'s> {
    pub fn new(source: &'s [u8]) -> Result<FrameDecoder<'s>, DecompressError> {
        let header = FrameHeader::read(source)?;
        let rest = &source[FRAME_HEADER_SIZE..];
        let (tree, table_size) = DecoderTree::read_table(rest, header.symbol_count())?;
        let rest = &rest[table_size..];

        let (payload, checksum) = if header.content_checksum() {
            if rest.len() < CHECKSUM_SIZE {
                return Err(DecompressError::MissingChecksum);
            }
            let (payload, checksum) = rest.split_at(rest.len() - CHECKSUM_SIZE);
            let checksum = u32::from_le_bytes([checksum[0], checksum[1], checksum[2], checksum[3]]);
            (payload, Some(checksum))
        } else {
            (rest, None)
        };

        Ok(FrameDecoder {
            header,
            tree,
            payload,
            checksum,
        })
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn tree(&self) -> &DecoderTree {
        &self.tree
    }

    /// The codes stored in the frame's table
    pub fn codes(&self) -> CodeMap {
        self.tree.codes()
    }

    /// Size of the packed payload in bytes
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }

    /// The checksum stored in the frame, if any
    pub fn stored_checksum(&self) -> Option<u32> {
        self.checksum
    }

    /// Decode the payload and verify it.
    ///
    /// Fails if the payload is too short for the announced content size, if bytes are left
    /// over after the last symbol, or if the content checksum doesn't match. Checksums are
    /// only verified with the `hash` feature.
    pub fn decode(&self) -> Result<Vec<u8>, DecompressError> {
        let (output, used) = unpack(self.payload, &self.tree, self.header.content_size())?;
        if used < self.payload.len() {
            return Err(DecompressError::TrailingPayload {
                got: self.payload.len() - used,
            });
        }

        if let Some(stored) = self.checksum {
            #[cfg(feature = "hash")]
            {
                let computed = crate::frame::content_checksum(&output);
                if computed != stored {
                    return Err(DecompressError::ChecksumMismatch { stored, computed });
                }
            }
            #[cfg(not(feature = "hash"))]
            {
                let _ = stored;
                vprintln!(
                    "Skipping verification of checksum 0x{:08X}, hash feature disabled",
                    stored
                );
            }
        }

        Ok(output)
    }
}

/// Summary of a frame, everything but the decoded content
#[derive(Debug, Clone)]
pub struct FrameInfo {
    pub header: FrameHeader,
    /// Codes read back from the rebuilt decoder tree
    pub codes: CodeMap,
    pub payload_size: usize,
    pub checksum: Option<u32>,
}

/// Parse the header and code table of a frame without decoding the payload.
pub fn inspect(source: &[u8]) -> Result<FrameInfo, DecompressError> {
    let decoder = FrameDecoder::new(source)?;
    Ok(FrameInfo {
        header: decoder.header,
        codes: decoder.codes(),
        payload_size: decoder.payload_size(),
        checksum: decoder.checksum,
    })
}

/// Read a whole frame from `reader` and write the decoded bytes to `writer`.
///
/// Returns the number of bytes written.
#[cfg(feature = "std")]
pub fn decompress_stream<R: std::io::Read, W: std::io::Write>(
    mut reader: R,
    mut writer: W,
) -> Result<usize, StreamDecompressError> {
    let mut source = Vec::new();
    reader.read_to_end(&mut source)?;
    let output = FrameDecoder::new(&source)?.decode()?;
    writer.write_all(&output)?;
    writer.flush()?;
    Ok(output.len())
}

#[cfg(feature = "std")]
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StreamDecompressError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    DecompressError(#[from] DecompressError),
}
