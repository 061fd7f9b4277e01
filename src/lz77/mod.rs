pub mod decoder;
pub mod encoder;
pub mod tokens;

pub use decoder::reconstruct;
pub use encoder::{longest_match, tokenize, Match};
pub use tokens::Token;
