use crate::error::{Error, Result};
use crate::lz77::tokens::Token;

/// Expand a token stream back into bytes.
///
/// Back-references are copied byte at a time so a reference may overlap
/// the bytes it is producing; a `distance` smaller than `length` repeats
/// the run, as the encoder relies on.
pub fn reconstruct(tokens: &[Token]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(tokens.len() * 2);

    for token in tokens {
        match *token {
            Token::Literal(value) => out.push(value),
            Token::BackRef { distance, length } => {
                let d = distance as usize;
                if d == 0 || d > out.len() {
                    return Err(Error::InvalidBackReference { distance, available: out.len() });
                }
                let start = out.len() - d;
                for i in 0..length as usize {
                    let byte = out[start + i];
                    out.push(byte);
                }
            }
        }
    }

    Ok(out)
}
