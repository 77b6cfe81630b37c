//! Utilities and interfaces for encoding an entire frame.

use super::{build_codes, pack, CompressError};
use crate::frame::FrameHeader;
use crate::frequency::FrequencyTable;
use crate::table::write_table;
use alloc::vec::Vec;

/// Compresses a buffer into a single self-describing frame.
///
/// # Examples
/// ```
/// use ruhuff::encoding::FrameCompressor;
/// let mock_data: &[_] = b"aaaaaaaabbbbcc";
/// let compressor = FrameCompressor::new().with_checksum(false);
/// let compressed = compressor.compress(mock_data).unwrap();
/// assert_eq!(ruhuff::decompress(&compressed).unwrap(), mock_data);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FrameCompressor {
    checksum: bool,
}

impl Default for FrameCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCompressor {
    /// A compressor that appends a content checksum when the `hash` feature is enabled
    pub fn new() -> Self {
        FrameCompressor {
            checksum: cfg!(feature = "hash"),
        }
    }

    /// Enable or disable the content checksum. Without the `hash` feature no checksum is
    /// ever written.
    pub fn with_checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum && cfg!(feature = "hash");
        self
    }

    pub fn checksum(&self) -> bool {
        self.checksum
    }

    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressError> {
        let mut out = Vec::new();
        self.compress_into(data, &mut out)?;
        Ok(out)
    }

    /// Append a frame holding `data` to `out` and return the number of bytes appended.
    ///
    /// On error nothing is appended.
    pub fn compress_into(&self, data: &[u8], out: &mut Vec<u8>) -> Result<usize, CompressError> {
        let start = out.len();
        let codes = build_codes(&FrequencyTable::from_bytes(data))?;

        let header = FrameHeader::new(codes.len(), data.len() as u64, self.checksum);
        out.reserve(crate::frame::FRAME_HEADER_SIZE + header.table_size() + data.len() / 2);
        header.write(out);
        write_table(&codes, out);
        if let Err(e) = pack(data, &codes, out) {
            out.truncate(start);
            return Err(e.into());
        }

        #[cfg(feature = "hash")]
        if self.checksum {
            out.extend_from_slice(&crate::frame::content_checksum(data).to_le_bytes());
        }

        vprintln!(
            "Compressed {} bytes into a frame of {} bytes",
            data.len(),
            out.len() - start
        );
        Ok(out.len() - start)
    }

    /// Read `reader` to the end and write the compressed frame to `writer`.
    ///
    /// Returns the number of bytes written.
    #[cfg(feature = "std")]
    pub fn compress_stream<R: std::io::Read, W: std::io::Write>(
        &self,
        mut reader: R,
        mut writer: W,
    ) -> Result<usize, StreamCompressError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let frame = self.compress(&data)?;
        writer.write_all(&frame)?;
        writer.flush()?;
        Ok(frame.len())
    }
}

#[cfg(feature = "std")]
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StreamCompressError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    CompressError(#[from] CompressError),
}
