//! Construction of the Huffman tree from a [`FrequencyTable`].
//!
//! The tree is built bottom up: every symbol starts out as a leaf in a min-queue ordered by
//! frequency, the two cheapest nodes are merged into a new internal node until one node is
//! left. Among nodes with equal frequency the one that entered the queue first leaves it
//! first, so the resulting tree only depends on the table contents and their order.

use crate::frequency::FrequencyTable;
use alloc::boxed::Box;
use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        frequency: u64,
    },
    /// Always has exactly two children
    Internal {
        frequency: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn frequency(&self) -> u64 {
        match self {
            Node::Leaf { frequency, .. } => *frequency,
            Node::Internal { frequency, .. } => *frequency,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TreeBuildError {
    #[error("Can't build a huffman tree without any symbols")]
    EmptyInput,
    #[error("Sum of symbol frequencies overflows a u64")]
    FrequencyOverflow,
}

/// A node waiting in the merge queue.
struct QueueEntry {
    frequency: u64,
    /// Insertion order, used to break ties between equal frequencies
    sequence: usize,
    node: Node,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // BinaryHeap is a max-heap, so the ordering is reversed: the lowest frequency and the
    // lowest sequence number compare as the greatest entry.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .frequency
            .cmp(&self.frequency)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
    symbol_count: usize,
}

impl HuffmanTree {
    pub fn build(table: &FrequencyTable) -> Result<Self, TreeBuildError> {
        if table.is_empty() {
            return Err(TreeBuildError::EmptyInput);
        }

        let mut queue = BinaryHeap::with_capacity(table.len());
        for (sequence, entry) in table.entries().iter().enumerate() {
            queue.push(QueueEntry {
                frequency: entry.count,
                sequence,
                node: Node::Leaf {
                    symbol: entry.symbol,
                    frequency: entry.count,
                },
            });
        }

        let mut next_sequence = table.len();
        // N leaves take exactly N - 1 merges, the last entry left is the root
        let root = loop {
            let left = queue.pop().ok_or(TreeBuildError::EmptyInput)?;
            let right = match queue.pop() {
                Some(right) => right,
                None => break left.node,
            };
            let frequency = left
                .frequency
                .checked_add(right.frequency)
                .ok_or(TreeBuildError::FrequencyOverflow)?;
            queue.push(QueueEntry {
                frequency,
                sequence: next_sequence,
                node: Node::Internal {
                    frequency,
                    left: Box::new(left.node),
                    right: Box::new(right.node),
                },
            });
            next_sequence += 1;
        };

        vprintln!(
            "Built huffman tree for {} symbols, total frequency {}",
            table.len(),
            root.frequency()
        );

        Ok(HuffmanTree {
            root,
            symbol_count: table.len(),
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of leaves
    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// Length of the longest root to leaf path
    pub fn depth(&self) -> usize {
        self.leaves().map(|(_, depth)| depth).max().unwrap_or(0)
    }

    /// Sum of `frequency * depth` over all leaves. This is the number of payload bits
    /// needed to encode the data the frequencies were counted from.
    ///
    /// `None` if the sum doesn't fit in a u64. Building only checks the total frequency,
    /// which is smaller by up to a factor of the depth.
    pub fn weighted_path_length(&self) -> Option<u64> {
        self.leaves().try_fold(0u64, |sum, (node, depth)| {
            node.frequency()
                .checked_mul(depth as u64)
                .and_then(|cost| sum.checked_add(cost))
        })
    }

    /// All leaves with their depth, left before right.
    fn leaves(&self) -> impl Iterator<Item = (&Node, usize)> + '_ {
        let mut stack: Vec<(&Node, usize)> = Vec::new();
        stack.push((&self.root, 0));
        core::iter::from_fn(move || {
            while let Some((node, depth)) = stack.pop() {
                match node {
                    Node::Leaf { .. } => return Some((node, depth)),
                    Node::Internal { left, right, .. } => {
                        stack.push((&**right, depth + 1));
                        stack.push((&**left, depth + 1));
                    }
                }
            }
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{HuffmanTree, Node, TreeBuildError};
    use crate::frequency::FrequencyTable;
    use alloc::vec::Vec;

    fn example_table() -> FrequencyTable {
        FrequencyTable::from_pairs([
            (b'a', 5),
            (b'b', 9),
            (b'c', 12),
            (b'd', 13),
            (b'e', 16),
            (b'f', 45),
        ])
        .unwrap()
    }

    /// Minimal weighted path length computed by repeatedly merging the two smallest weights
    fn minimal_cost(weights: &[u64]) -> u64 {
        let mut weights: Vec<u64> = weights.to_vec();
        let mut cost = 0;
        while weights.len() > 1 {
            weights.sort_unstable_by(|a, b| b.cmp(a));
            let a = weights.pop().unwrap();
            let b = weights.pop().unwrap();
            cost += a + b;
            weights.push(a + b);
        }
        cost
    }

    #[test]
    fn optimal_for_example_weights() {
        let tree = HuffmanTree::build(&example_table()).unwrap();
        assert_eq!(tree.weighted_path_length(), Some(224));
        assert_eq!(
            tree.weighted_path_length(),
            Some(minimal_cost(&[5, 9, 12, 13, 16, 45]))
        );
        assert_eq!(tree.root().frequency(), 100);
        assert_eq!(tree.symbol_count(), 6);
        assert_eq!(tree.depth(), 4);
    }

    #[test]
    fn optimal_for_skewed_weights() {
        let weights = [1u64, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 1000, 7, 7, 7];
        let table =
            FrequencyTable::from_pairs(weights.iter().enumerate().map(|(s, w)| (s as u8, *w)))
                .unwrap();
        let tree = HuffmanTree::build(&table).unwrap();
        assert_eq!(tree.weighted_path_length(), Some(minimal_cost(&weights)));
    }

    #[test]
    fn most_frequent_is_on_the_left() {
        let tree = HuffmanTree::build(&example_table()).unwrap();
        match tree.root() {
            Node::Internal { left, right, .. } => {
                assert_eq!(
                    **left,
                    Node::Leaf {
                        symbol: b'f',
                        frequency: 45
                    }
                );
                assert_eq!(right.frequency(), 55);
            }
            Node::Leaf { .. } => panic!("root must be internal"),
        }
    }

    #[test]
    fn ties_are_broken_by_insertion_order() {
        let forward = FrequencyTable::from_pairs([(1, 4), (2, 4)]).unwrap();
        let backward = FrequencyTable::from_pairs([(2, 4), (1, 4)]).unwrap();

        let left_symbol = |tree: &HuffmanTree| match tree.root() {
            Node::Internal { left, .. } => match **left {
                Node::Leaf { symbol, .. } => symbol,
                _ => panic!("expected a leaf"),
            },
            _ => panic!("expected an internal root"),
        };

        assert_eq!(left_symbol(&HuffmanTree::build(&forward).unwrap()), 1);
        assert_eq!(left_symbol(&HuffmanTree::build(&backward).unwrap()), 2);
        assert_eq!(
            HuffmanTree::build(&forward).unwrap(),
            HuffmanTree::build(&forward).unwrap()
        );
    }

    #[test]
    fn single_symbol_is_a_leaf_root() {
        let table = FrequencyTable::from_bytes(b"zzzz");
        let tree = HuffmanTree::build(&table).unwrap();
        assert!(tree.root().is_leaf());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.weighted_path_length(), Some(0));
    }

    #[test]
    fn empty_table() {
        assert!(matches!(
            HuffmanTree::build(&FrequencyTable::new()),
            Err(TreeBuildError::EmptyInput)
        ));
    }

    #[test]
    fn weighted_path_length_too_large() {
        let third = u64::MAX / 3;
        let table = FrequencyTable::from_pairs([(0, third), (1, third), (2, third)]).unwrap();
        let tree = HuffmanTree::build(&table).unwrap();
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.weighted_path_length(), None);
    }

    #[test]
    fn overflowing_frequencies() {
        let table = FrequencyTable::from_pairs([(0, u64::MAX), (1, 1)]).unwrap();
        assert!(matches!(
            HuffmanTree::build(&table),
            Err(TreeBuildError::FrequencyOverflow)
        ));
    }
}
