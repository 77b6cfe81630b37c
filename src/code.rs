//! Prefix codes derived from a [`HuffmanTree`].
//!
//! A code is the path from the root to a leaf: 0 for every step to the left child,
//! 1 for every step to the right child. Codes are kept in the lower bits of a `u32`,
//! the first step of the path being the most significant of those bits.

use crate::tree::{HuffmanTree, Node};
use alloc::vec::Vec;

/// Longest code the container format can store.
pub const MAX_CODE_LEN: u8 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Code {
    bits: u32,
    len: u8,
}

impl Code {
    /// The code of the only symbol of a single symbol alphabet.
    pub const EMPTY: Code = Code { bits: 0, len: 0 };

    /// Returns `None` if `len` exceeds [`MAX_CODE_LEN`] or `bits` has bits set above `len`.
    pub fn new(bits: u32, len: u8) -> Option<Code> {
        if len > MAX_CODE_LEN {
            return None;
        }
        if len < MAX_CODE_LEN && bits >> len != 0 {
            return None;
        }
        Some(Code { bits, len })
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The `idx`th step of the path, starting at the root. `true` means right.
    pub fn bit(&self, idx: u8) -> bool {
        debug_assert!(idx < self.len);
        (self.bits >> (self.len - 1 - idx)) & 1 == 1
    }

    /// Iterates the path from the root to the leaf.
    pub fn path(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |idx| self.bit(idx))
    }

    /// Extend the path by one step. The caller has to make sure `len < MAX_CODE_LEN`.
    pub(crate) fn push(self, bit: bool) -> Code {
        debug_assert!(self.len < MAX_CODE_LEN);
        Code {
            bits: (self.bits << 1) | bit as u32,
            len: self.len + 1,
        }
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.len > other.len {
            return false;
        }
        if self.len == 0 {
            return true;
        }
        let shift = other.len - self.len;
        u64::from(other.bits) >> shift == u64::from(self.bits)
    }
}

impl core::fmt::Display for Code {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.len == 0 {
            return f.write_str("-");
        }
        for bit in self.path() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CodeAssignError {
    #[error("Huffman tree is deeper than the {MAX_CODE_LEN} bits a code can hold: found a leaf at depth {depth}")]
    CodeTooLong { depth: usize },
}

/// Symbol to code mapping.
#[derive(Debug, Clone)]
pub struct CodeMap {
    codes: [Option<Code>; 256],
    /// Symbols in the order they were added
    order: Vec<u8>,
    max_len: u8,
}

impl PartialEq for CodeMap {
    fn eq(&self, other: &Self) -> bool {
        self.codes == other.codes
    }
}

impl Eq for CodeMap {}

impl Default for CodeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeMap {
    pub fn new() -> Self {
        CodeMap {
            codes: [None; 256],
            order: Vec::new(),
            max_len: 0,
        }
    }

    /// Walk the tree depth first, left before right, and record the path to every leaf.
    ///
    /// Fails if any leaf sits deeper than [`MAX_CODE_LEN`].
    pub fn assign(tree: &HuffmanTree) -> Result<Self, CodeAssignError> {
        let mut map = Self::new();

        let mut stack: Vec<(&Node, Code)> = Vec::new();
        stack.push((tree.root(), Code::EMPTY));
        while let Some((node, code)) = stack.pop() {
            match node {
                Node::Leaf { symbol, .. } => map.insert(*symbol, code),
                Node::Internal { left, right, .. } => {
                    if code.len() == MAX_CODE_LEN {
                        return Err(CodeAssignError::CodeTooLong {
                            depth: code.len() as usize + 1,
                        });
                    }
                    // right goes first so the left subtree is visited first
                    stack.push((&**right, code.push(true)));
                    stack.push((&**left, code.push(false)));
                }
            }
        }

        vprintln!(
            "Assigned codes to {} symbols, longest code has {} bits",
            map.len(),
            map.max_len()
        );
        Ok(map)
    }

    /// Add or replace the code of a symbol.
    pub(crate) fn insert(&mut self, symbol: u8, code: Code) {
        if self.codes[symbol as usize].replace(code).is_none() {
            self.order.push(symbol);
        }
        self.max_len = self.max_len.max(code.len());
    }

    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    /// Symbols and their codes in the order they were assigned
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.order
            .iter()
            .filter_map(move |symbol| self.get(*symbol).map(|code| (*symbol, code)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The length of the longest code, which is also the depth of the tree
    pub fn max_len(&self) -> u8 {
        self.max_len
    }

    /// Number of bits needed to encode `data`, or `None` if it contains an unknown symbol.
    pub fn encoded_bits(&self, data: &[u8]) -> Option<u64> {
        data.iter()
            .map(|symbol| self.get(*symbol).map(|code| u64::from(code.len())))
            .sum()
    }
}
