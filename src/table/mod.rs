//! Serialization of the code table.
//!
//! Every symbol is stored as a fixed size record:
//!
//! | bytes | content |
//! |---|---|
//! | 1 | the symbol |
//! | 4 | the code length as a little endian `i32`, 0 to 32 |
//! | 4 | the code bits as a little endian `i32`, first path step in the highest used bit |
//!
//! Leading zeros of short codes are only recoverable through the stored length.
//! The records can appear in any order. The decoder rebuilds the tree by inserting one
//! record at a time, see [`DecoderTree`].
mod table_decoder;
mod table_encoder;

pub use table_decoder::*;
pub use table_encoder::*;

use crate::code::{Code, MAX_CODE_LEN};

/// Size of one serialized [`CodeRecord`] in bytes
pub const RECORD_SIZE: usize = 9;

/// One entry of the stored code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRecord {
    pub symbol: u8,
    pub code: Code,
}

impl CodeRecord {
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        buf[0] = self.symbol;
        buf[1..5].copy_from_slice(&i32::from(self.code.len()).to_le_bytes());
        // codes of 32 bits with the first step going right turn negative, the bit pattern is what counts
        buf[5..9].copy_from_slice(&self.code.bits().to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: [u8; RECORD_SIZE]) -> Result<CodeRecord, TableDecodeError> {
        let symbol = buf[0];
        let len = i32::from_le_bytes([buf[1], buf[2], buf[3], buf[4]]);
        let bits = u32::from_le_bytes([buf[5], buf[6], buf[7], buf[8]]);

        if !(0..=i32::from(MAX_CODE_LEN)).contains(&len) {
            return Err(TableDecodeError::InvalidCodeLength { symbol, got: len });
        }
        let len = len as u8;
        let code =
            Code::new(bits, len).ok_or(TableDecodeError::CodeValueOutOfRange { symbol, bits, len })?;

        Ok(CodeRecord { symbol, code })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        write_table, CodeRecord, DecoderTree, TableDecodeError, RECORD_SIZE,
    };
    use crate::code::{Code, CodeMap};
    use crate::frequency::FrequencyTable;
    use crate::tree::HuffmanTree;
    use alloc::vec::Vec;

    fn codes_for(data: &[u8]) -> CodeMap {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(data)).unwrap();
        CodeMap::assign(&tree).unwrap()
    }

    #[test]
    fn record_layout() {
        let record = CodeRecord {
            symbol: b'a',
            code: Code::new(0b1100, 4).unwrap(),
        };
        assert_eq!(
            record.to_bytes(),
            [b'a', 4, 0, 0, 0, 0b1100, 0, 0, 0]
        );
        assert_eq!(CodeRecord::from_bytes(record.to_bytes()).unwrap(), record);

        let long = CodeRecord {
            symbol: 0xff,
            code: Code::new(0x8000_0001, 32).unwrap(),
        };
        assert_eq!(long.to_bytes(), [0xff, 32, 0, 0, 0, 1, 0, 0, 0x80]);
        assert_eq!(CodeRecord::from_bytes(long.to_bytes()).unwrap(), long);
    }

    #[test]
    fn invalid_records() {
        assert!(matches!(
            CodeRecord::from_bytes([1, 33, 0, 0, 0, 0, 0, 0, 0]),
            Err(TableDecodeError::InvalidCodeLength { symbol: 1, got: 33 })
        ));
        assert!(matches!(
            CodeRecord::from_bytes([1, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0]),
            Err(TableDecodeError::InvalidCodeLength { got: -1, .. })
        ));
        assert!(matches!(
            CodeRecord::from_bytes([1, 2, 0, 0, 0, 0b111, 0, 0, 0]),
            Err(TableDecodeError::CodeValueOutOfRange { bits: 0b111, len: 2, .. })
        ));
    }

    #[test]
    fn table_roundtrip() {
        for data in [
            &b"abcdef"[..],
            &b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaab"[..],
            &b"the quick brown fox jumps over the lazy dog"[..],
            &b"q"[..],
        ] {
            let codes = codes_for(data);
            let mut table = Vec::new();
            let written = write_table(&codes, &mut table);
            assert_eq!(written, codes.len());
            assert_eq!(table.len(), written * RECORD_SIZE);

            let (tree, bytes_read) = DecoderTree::read_table(&table, written).unwrap();
            assert_eq!(bytes_read, table.len());
            assert_eq!(tree.codes(), codes);
        }
    }

    #[test]
    fn table_is_deterministic() {
        let data = b"mississippi river banks";
        let mut first = Vec::new();
        let mut second = Vec::new();
        write_table(&codes_for(data), &mut first);
        write_table(&codes_for(data), &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn record_order_does_not_matter() {
        let codes = codes_for(b"abbcccddddeeeeeffffff");
        let mut table = Vec::new();
        write_table(&codes, &mut table);

        let mut reversed = Vec::new();
        for record in table.chunks(RECORD_SIZE).rev() {
            reversed.extend_from_slice(record);
        }
        let (tree, _) = DecoderTree::read_table(&reversed, codes.len()).unwrap();
        assert_eq!(tree.codes(), codes);
    }
}
