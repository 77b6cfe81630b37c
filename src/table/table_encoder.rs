use super::CodeRecord;
use crate::code::CodeMap;
use alloc::vec::Vec;

/// Append one record per symbol to `out`, in the order the codes were assigned.
///
/// Returns the number of records written.
pub fn write_table(codes: &CodeMap, out: &mut Vec<u8>) -> usize {
    let mut written = 0;
    for (symbol, code) in codes.iter() {
        out.extend_from_slice(&CodeRecord { symbol, code }.to_bytes());
        written += 1;
    }
    vprintln!("Wrote code table with {} records", written);
    written
}
