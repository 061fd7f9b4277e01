use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::{self, Write};

use crate::huffman::code::{Code, CodeTable};
use crate::lz77::tokens::Token;

/// A node of the Huffman tree built over the token payload alphabet
#[derive(Clone, Debug)]
pub enum HuffmanNode {
    Leaf { value: u8, freq: u64 },
    Internal { freq: u64, left: Box<HuffmanNode>, right: Box<HuffmanNode> },
}

impl HuffmanNode {
    pub fn freq(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { freq, .. } => *freq,
            HuffmanNode::Internal { freq, .. } => *freq,
        }
    }
}

/// Heap entry ordered by frequency alone; ties resolve however the heap
/// decides, which only needs to be consistent within one encode since
/// the resulting table travels on the wire.
struct HeapNode(HuffmanNode);

impl PartialEq for HeapNode {
    fn eq(&self, other: &Self) -> bool {
        self.0.freq() == other.0.freq()
    }
}
impl Eq for HeapNode {}
impl PartialOrd for HeapNode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapNode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.freq().cmp(&other.0.freq())
    }
}

/// Count how often each byte value occurs in the on-wire token payloads:
/// one byte per literal, three per back-reference. This is the alphabet
/// the Huffman coder operates over, not the raw input bytes.
pub fn count_payload_frequencies(tokens: &[Token]) -> [u64; 256] {
    let mut freqs = [0u64; 256];
    for token in tokens {
        match *token {
            Token::Literal(value) => freqs[value as usize] += 1,
            Token::BackRef { .. } => {
                // Back-references always expose a three-byte payload
                if let Some(payload) = token.pointer_payload() {
                    for byte in payload {
                        freqs[byte as usize] += 1;
                    }
                }
            }
        }
    }
    freqs
}

/// Build the Huffman tree from payload frequencies by repeatedly joining
/// the two lowest-frequency nodes. Returns `None` when no byte occurs at
/// all (empty input).
pub fn build_tree(freqs: &[u64; 256]) -> Option<HuffmanNode> {
    let mut heap: BinaryHeap<Reverse<HeapNode>> = freqs
        .iter()
        .enumerate()
        .filter(|(_, &freq)| freq > 0)
        .map(|(value, &freq)| Reverse(HeapNode(HuffmanNode::Leaf { value: value as u8, freq })))
        .collect();

    if heap.is_empty() {
        return None;
    }

    while heap.len() > 1 {
        let Reverse(HeapNode(right)) = heap.pop().unwrap();
        let Reverse(HeapNode(left)) = heap.pop().unwrap();
        let freq = left.freq() + right.freq();
        heap.push(Reverse(HeapNode(HuffmanNode::Internal {
            freq,
            left: Box::new(left),
            right: Box::new(right),
        })));
    }

    heap.pop().map(|Reverse(HeapNode(root))| root)
}

/// Derive the code table: depth-first traversal appending 0 for left
/// edges and 1 for right edges. A single-leaf tree gets the one-bit code
/// `0` so the table stays prefix-decodable.
pub fn derive_codes(root: &HuffmanNode) -> CodeTable {
    let mut table = CodeTable::new();
    match root {
        HuffmanNode::Leaf { value, .. } => {
            table.insert(*value, Code { value: 0, bits: 1 });
        }
        HuffmanNode::Internal { .. } => assign_codes(root, Code::EMPTY, &mut table),
    }
    table
}

fn assign_codes(node: &HuffmanNode, prefix: Code, table: &mut CodeTable) {
    match node {
        HuffmanNode::Leaf { value, .. } => {
            // Depths past 64 would need Fibonacci-scale frequency skew
            debug_assert!(prefix.bits <= 64, "code length exceeds the wire format limit");
            table.insert(*value, prefix);
        }
        HuffmanNode::Internal { left, right, .. } => {
            assign_codes(left, prefix.push_bit(false), table);
            assign_codes(right, prefix.push_bit(true), table);
        }
    }
}

/// Dump the tree in Graphviz DOT form, one node per line with frequency
/// labels and edges labelled with the bit they contribute
pub fn write_graphviz<W: Write + ?Sized>(root: &HuffmanNode, w: &mut W) -> io::Result<()> {
    writeln!(w, "digraph huffman {{")?;
    let mut next_id = 0usize;
    write_node(root, &mut next_id, w)?;
    writeln!(w, "}}")
}

fn write_node<W: Write + ?Sized>(node: &HuffmanNode, next_id: &mut usize, w: &mut W) -> io::Result<()> {
    let id = *next_id;
    *next_id += 1;
    match node {
        HuffmanNode::Leaf { value, freq } => {
            writeln!(w, "\t{}[label=\"value={} freq={}\"]", id, value, freq)?;
        }
        HuffmanNode::Internal { freq, left, right } => {
            writeln!(w, "\t{}[label=\"freq={}\"]", id, freq)?;
            writeln!(w, "\t{} -> {}[label=\"0\"]", id, *next_id)?;
            write_node(left, next_id, w)?;
            writeln!(w, "\t{} -> {}[label=\"1\"]", id, *next_id)?;
            write_node(right, next_id, w)?;
        }
    }
    Ok(())
}
