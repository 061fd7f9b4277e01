pub mod code;
pub mod tree;

pub use code::{Code, CodeTable};
pub use tree::{build_tree, count_payload_frequencies, derive_codes, write_graphviz, HuffmanNode};
