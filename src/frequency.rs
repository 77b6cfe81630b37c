//! Symbol frequencies, the input to tree construction.

use alloc::vec::Vec;

/// A symbol together with how often it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyEntry {
    pub symbol: u8,
    pub count: u64,
}

/// Mapping from symbol to occurrence count.
///
/// Entries keep their insertion order. Tree construction breaks ties between equal counts
/// by that order, so two tables with the same entries in the same order always produce
/// the same code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<FrequencyEntry>,
    /// Position of each symbol in `entries`, if present
    index: [Option<u8>; 256],
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FrequencyTableError {
    #[error("Symbol 0x{symbol:02X} is already present in the frequency table")]
    DuplicateSymbol { symbol: u8 },
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable {
            entries: Vec::new(),
            index: [None; 256],
        }
    }

    /// Count every byte of `data`. Symbols are inserted in ascending order, only
    /// symbols that actually occur get an entry.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for byte in data {
            counts[*byte as usize] += 1;
        }

        let mut table = Self::new();
        for (symbol, count) in counts.iter().copied().enumerate() {
            if count > 0 {
                table.push_unchecked(symbol as u8, count);
            }
        }
        table
    }

    /// Build a table from `(symbol, count)` pairs, keeping their order.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (u8, u64)>,
    ) -> Result<Self, FrequencyTableError> {
        let mut table = Self::new();
        for (symbol, count) in pairs {
            table.insert(symbol, count)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, symbol: u8, count: u64) -> Result<(), FrequencyTableError> {
        if self.index[symbol as usize].is_some() {
            return Err(FrequencyTableError::DuplicateSymbol { symbol });
        }
        self.push_unchecked(symbol, count);
        Ok(())
    }

    fn push_unchecked(&mut self, symbol: u8, count: u64) {
        // at most 256 distinct symbols, so the position always fits
        self.index[symbol as usize] = Some(self.entries.len() as u8);
        self.entries.push(FrequencyEntry { symbol, count });
    }

    pub fn get(&self, symbol: u8) -> Option<u64> {
        self.index[symbol as usize].map(|idx| self.entries[idx as usize].count)
    }

    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }
}
