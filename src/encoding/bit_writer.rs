use crate::code::{Code, CodeMap};
use alloc::vec::Vec;

/// Appends bits to a byte buffer, most significant bit of every byte first.
pub(crate) struct BitWriter<'o> {
    /// The buffer that's filled with whole bytes
    output: &'o mut Vec<u8>,
    /// Bits that don't form a full byte yet, in the lowest `bits_in_container` bits
    container: u64,
    bits_in_container: u8,
    /// Number of bits written so far
    bit_idx: u64,
}

impl<'o> BitWriter<'o> {
    /// Bits are appended behind whatever `output` already holds
    pub fn new(output: &'o mut Vec<u8>) -> Self {
        Self {
            output,
            container: 0,
            bits_in_container: 0,
            bit_idx: 0,
        }
    }

    /// Write the lowest `num_bits` of `bits`, the highest of those first.
    pub fn write_bits(&mut self, bits: u32, num_bits: u8) {
        debug_assert!(num_bits <= 32);
        if num_bits == 0 {
            return;
        }
        // at most 7 bits are left over from earlier writes, so 39 bits fit easily
        self.container = (self.container << num_bits) | u64::from(bits);
        self.bits_in_container += num_bits;
        self.bit_idx += u64::from(num_bits);

        while self.bits_in_container >= 8 {
            self.bits_in_container -= 8;
            self.output
                .push((self.container >> self.bits_in_container) as u8);
        }
        self.container &= (1 << self.bits_in_container) - 1;
    }

    pub fn write_code(&mut self, code: Code) {
        self.write_bits(code.bits(), code.len());
    }

    #[cfg(test)]
    pub fn bits_written(&self) -> u64 {
        self.bit_idx
    }

    /// Flush a partially filled last byte, padded with zeros in its low bits.
    ///
    /// Returns the number of bits written, not counting the padding.
    pub fn finish(self) -> u64 {
        if self.bits_in_container > 0 {
            let padding = 8 - self.bits_in_container;
            self.output.push((self.container << padding) as u8);
        }
        self.bit_idx
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitPackError {
    #[error("Byte 0x{symbol:02X} at position {position} has no code in the code table")]
    UnknownSymbol { symbol: u8, position: usize },
}

/// Append the codes of all bytes in `data` to `out`.
///
/// Returns the number of payload bits, the last byte is zero padded. On error `out` is left
/// as it was.
pub fn pack(data: &[u8], codes: &CodeMap, out: &mut Vec<u8>) -> Result<u64, BitPackError> {
    let start = out.len();
    let mut writer = BitWriter::new(out);
    for (position, symbol) in data.iter().copied().enumerate() {
        match codes.get(symbol) {
            Some(code) => writer.write_code(code),
            None => {
                drop(writer);
                out.truncate(start);
                return Err(BitPackError::UnknownSymbol { symbol, position });
            }
        }
    }
    let bits = writer.finish();
    vprintln!(
        "Packed {} bytes into {} bits ({} bytes)",
        data.len(),
        bits,
        out.len() - start
    );
    Ok(bits)
}
