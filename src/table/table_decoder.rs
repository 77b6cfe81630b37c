use super::{CodeRecord, RECORD_SIZE};
use crate::code::{Code, CodeMap, MAX_CODE_LEN};
use alloc::vec::Vec;

/// At most one record per possible byte value
pub const MAX_SYMBOLS: usize = 256;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TableDecodeError {
    #[error("Can't build a decoder from an empty code table")]
    NoRecords,
    #[error("Code table claims {count} records but there can be at most {MAX_SYMBOLS}")]
    TooManyRecords { count: usize },
    #[error("Not enough bytes for the code table. Is: {got}, Should be at least: {need}")]
    NotEnoughBytes { got: usize, need: usize },
    #[error("Invalid code length for symbol 0x{symbol:02X}. Is: {got}, Should be between 0 and {MAX_CODE_LEN}")]
    InvalidCodeLength { symbol: u8, got: i32 },
    #[error("Code value 0x{bits:X} of symbol 0x{symbol:02X} does not fit into {len} bits")]
    CodeValueOutOfRange { symbol: u8, bits: u32, len: u8 },
    #[error("Symbol 0x{symbol:02X} appears more than once in the code table")]
    DuplicateSymbol { symbol: u8 },
    #[error("Code {code} of symbol 0x{symbol:02X} runs through the code of symbol 0x{existing:02X}. Table is probably corrupted")]
    PathThroughTerminal { symbol: u8, code: Code, existing: u8 },
    #[error("Code {code} of symbol 0x{symbol:02X} is a prefix of, or equal to, another code. Table is probably corrupted")]
    PrefixConflict { symbol: u8, code: Code },
}

/// Index of a node in a [`DecoderTree`]
pub type NodeId = usize;

#[derive(Debug, Clone, Default)]
struct DecoderNode {
    /// left (bit 0) and right (bit 1) child
    children: [Option<NodeId>; 2],
    symbol: Option<u8>,
}

/// The tree the decoder walks, rebuilt from the stored code table.
///
/// Nodes live in a single vector owned by the tree, a parent refers to its children by
/// index. A node with a symbol is terminal and has no children.
#[derive(Debug, Clone)]
pub struct DecoderTree {
    nodes: Vec<DecoderNode>,
    seen: [bool; MAX_SYMBOLS],
    symbol_count: usize,
}

impl Default for DecoderTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderTree {
    pub const ROOT: NodeId = 0;

    /// A tree that only consists of an empty root
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(2 * MAX_SYMBOLS);
        nodes.push(DecoderNode::default());
        DecoderTree {
            nodes,
            seen: [false; MAX_SYMBOLS],
            symbol_count: 0,
        }
    }

    /// Read `count` records from the start of `source` and insert them.
    ///
    /// Returns the tree and the number of bytes used.
    pub fn read_table(source: &[u8], count: usize) -> Result<(Self, usize), TableDecodeError> {
        if count == 0 {
            return Err(TableDecodeError::NoRecords);
        }
        if count > MAX_SYMBOLS {
            return Err(TableDecodeError::TooManyRecords { count });
        }
        let need = count * RECORD_SIZE;
        if source.len() < need {
            return Err(TableDecodeError::NotEnoughBytes {
                got: source.len(),
                need,
            });
        }

        let mut tree = Self::new();
        for chunk in source[..need].chunks_exact(RECORD_SIZE) {
            let mut buf = [0u8; RECORD_SIZE];
            buf.copy_from_slice(chunk);
            tree.insert(CodeRecord::from_bytes(buf)?)?;
        }
        vprintln!(
            "Rebuilt decoder tree with {} nodes from {} records",
            tree.nodes.len(),
            count
        );
        Ok((tree, need))
    }

    /// Walk the path of the record's code, creating missing nodes, and mark the node at
    /// its end as terminal.
    pub fn insert(&mut self, record: CodeRecord) -> Result<(), TableDecodeError> {
        let CodeRecord { symbol, code } = record;
        if self.seen[symbol as usize] {
            return Err(TableDecodeError::DuplicateSymbol { symbol });
        }

        let mut node = Self::ROOT;
        for bit in code.path() {
            if let Some(existing) = self.nodes[node].symbol {
                return Err(TableDecodeError::PathThroughTerminal {
                    symbol,
                    code,
                    existing,
                });
            }
            let slot = bit as usize;
            node = match self.nodes[node].children[slot] {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(DecoderNode::default());
                    self.nodes[node].children[slot] = Some(child);
                    child
                }
            };
        }

        let target = &mut self.nodes[node];
        if target.symbol.is_some() || target.children.iter().any(Option::is_some) {
            return Err(TableDecodeError::PrefixConflict { symbol, code });
        }
        target.symbol = Some(symbol);
        self.seen[symbol as usize] = true;
        self.symbol_count += 1;
        Ok(())
    }

    /// The symbol of a terminal node
    pub fn symbol(&self, node: NodeId) -> Option<u8> {
        self.nodes[node].symbol
    }

    /// Left and right child of a node
    pub fn children(&self, node: NodeId) -> [Option<NodeId>; 2] {
        self.nodes[node].children
    }

    /// Follow one edge, `false` is left and `true` is right
    pub fn child(&self, node: NodeId, bit: bool) -> Option<NodeId> {
        self.nodes[node].children[bit as usize]
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The code of every symbol as induced by the tree shape, left before right.
    pub fn codes(&self) -> CodeMap {
        let mut codes = CodeMap::new();
        let mut stack = Vec::new();
        stack.push((Self::ROOT, Code::EMPTY));
        while let Some((node, code)) = stack.pop() {
            let DecoderNode { children, symbol } = &self.nodes[node];
            if let Some(symbol) = symbol {
                codes.insert(*symbol, code);
                continue;
            }
            // inserted codes are at most MAX_CODE_LEN long, so no child is deeper
            if let Some(right) = children[1] {
                stack.push((right, code.push(true)));
            }
            if let Some(left) = children[0] {
                stack.push((left, code.push(false)));
            }
        }
        codes
    }
}
