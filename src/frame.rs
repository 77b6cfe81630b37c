//! The frame header that makes a compressed artifact self-describing.
//!
//! | bytes | content |
//! |---|---|
//! | 4 | magic number, little endian |
//! | 1 | format version |
//! | 1 | frame descriptor, bit 0 is the content checksum flag |
//! | 2 | number of code table records, little endian |
//! | 8 | number of decoded bytes, little endian |
//!
//! The header is followed by the code table, the packed payload and, if the checksum flag
//! is set, the lower 32 bits of the XXH64 hash of the decoded content.
use alloc::vec::Vec;

pub const MAGIC_NUM: u32 = 0x4846_5552;
pub const FORMAT_VERSION: u8 = 1;
pub const FRAME_HEADER_SIZE: usize = 16;
pub const CHECKSUM_SIZE: usize = 4;
/// Every byte value can have a code
pub const MAX_SYMBOL_COUNT: u16 = crate::table::MAX_SYMBOLS as u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDescriptor(pub u8);

impl FrameDescriptor {
    pub fn new(content_checksum: bool) -> Self {
        FrameDescriptor(content_checksum as u8)
    }

    pub fn content_checksum_flag(&self) -> bool {
        (self.0 & 0x1) == 1
    }

    /// Must be zero in this version of the format
    pub fn reserved_bits(&self) -> u8 {
        self.0 >> 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: u8,
    pub descriptor: FrameDescriptor,
    symbol_count: u16,
    content_size: u64,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ReadFrameHeaderError {
    #[error("Not enough bytes for the frame header. Is: {got}, Should be: {FRAME_HEADER_SIZE}")]
    NotEnoughBytes { got: usize },
    #[error("Read wrong magic number: 0x{0:X}")]
    BadMagicNumber(u32),
    #[error("Unsupported format version. Is: {got}, Should be: {FORMAT_VERSION}")]
    UnsupportedVersion { got: u8 },
    #[error("Reserved bits of the frame descriptor are set: 0b{got:08b}")]
    ReservedBitsSet { got: u8 },
    #[error("Invalid symbol count. Is: {got}, Should be between 1 and {MAX_SYMBOL_COUNT}")]
    InvalidSymbolCount { got: u16 },
}

impl FrameHeader {
    /// Panics if `symbol_count` is not within `1..=256`; the code map of any input
    /// satisfies this.
    pub fn new(symbol_count: usize, content_size: u64, content_checksum: bool) -> Self {
        assert!((1..=MAX_SYMBOL_COUNT as usize).contains(&symbol_count));
        FrameHeader {
            version: FORMAT_VERSION,
            descriptor: FrameDescriptor::new(content_checksum),
            symbol_count: symbol_count as u16,
            content_size,
        }
    }

    /// Number of records in the code table
    pub fn symbol_count(&self) -> usize {
        usize::from(self.symbol_count)
    }

    /// Number of bytes the payload decodes to
    pub fn content_size(&self) -> u64 {
        self.content_size
    }

    pub fn content_checksum(&self) -> bool {
        self.descriptor.content_checksum_flag()
    }

    pub fn table_size(&self) -> usize {
        self.symbol_count() * crate::table::RECORD_SIZE
    }

    /// Append the [`FRAME_HEADER_SIZE`] header bytes to `out`
    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC_NUM.to_le_bytes());
        out.push(self.version);
        out.push(self.descriptor.0);
        out.extend_from_slice(&self.symbol_count.to_le_bytes());
        out.extend_from_slice(&self.content_size.to_le_bytes());
    }

    /// Parse the header at the start of `source`. Uses exactly [`FRAME_HEADER_SIZE`] bytes.
    pub fn read(source: &[u8]) -> Result<FrameHeader, ReadFrameHeaderError> {
        use ReadFrameHeaderError as err;

        if source.len() < FRAME_HEADER_SIZE {
            return Err(err::NotEnoughBytes { got: source.len() });
        }

        let magic_num = u32::from_le_bytes([source[0], source[1], source[2], source[3]]);
        if magic_num != MAGIC_NUM {
            return Err(err::BadMagicNumber(magic_num));
        }

        let version = source[4];
        if version != FORMAT_VERSION {
            return Err(err::UnsupportedVersion { got: version });
        }

        let descriptor = FrameDescriptor(source[5]);
        if descriptor.reserved_bits() != 0 {
            return Err(err::ReservedBitsSet { got: descriptor.0 });
        }

        let symbol_count = u16::from_le_bytes([source[6], source[7]]);
        if symbol_count == 0 || symbol_count > MAX_SYMBOL_COUNT {
            return Err(err::InvalidSymbolCount { got: symbol_count });
        }

        let mut content_size = [0u8; 8];
        content_size.copy_from_slice(&source[8..FRAME_HEADER_SIZE]);
        let content_size = u64::from_le_bytes(content_size);

        vprintln!(
            "Frame header: {} symbols, {} bytes of content, checksum: {}",
            symbol_count,
            content_size,
            descriptor.content_checksum_flag()
        );

        Ok(FrameHeader {
            version,
            descriptor,
            symbol_count,
            content_size,
        })
    }
}

/// Lower 32 bits of the XXH64 hash (seed 0) of `data`
#[cfg(feature = "hash")]
pub fn content_checksum(data: &[u8]) -> u32 {
    use core::hash::Hasher;

    let mut hasher = twox_hash::XxHash64::with_seed(0);
    hasher.write(data);
    hasher.finish() as u32
}
