use std::collections::HashMap;
use std::io::Read;

use crate::bits::BitReader;
use crate::error::{Error, Result};
use crate::huffman::Code;
use crate::lz77::tokens::{decode_pointer, Token};

/// Parses a compressed stream back into tokens: the code table header,
/// then flag-plus-code tokens until the stream runs out.
///
/// The writer pads the last byte with zero bits and the format has no
/// end marker, so up to seven trailing bits can masquerade as the start
/// of one more token. A token cut short by end-of-input is therefore
/// only an error when its flag bit came from a non-final byte (the
/// stream was truncated mid-token); inside the final byte it is
/// padding, as is a fully-assembled trailing back-reference whose
/// distance cannot possibly resolve.
pub struct StreamReader<R: Read> {
    bits: BitReader<R>,
    table: HashMap<Code, u8>,
}

impl<R: Read> StreamReader<R> {
    pub fn new(source: R) -> Self {
        Self { bits: BitReader::new(source), table: HashMap::new() }
    }

    /// Read the table and then every token until end of stream
    pub fn read_tokens(mut self) -> Result<Vec<Token>> {
        if !self.read_table()? {
            return Ok(Vec::new());
        }

        let mut tokens = Vec::new();
        let mut produced = 0usize;
        while let Some(token) = self.next_token(produced)? {
            produced += token.uncompressed_len();
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Parse the code table into the reverse `Code -> byte` map.
    /// Returns `false` on an entirely empty source, which decodes to an
    /// empty token stream; the count header cannot express zero entries.
    fn read_table(&mut self) -> Result<bool> {
        let count = match self.bits.read_bits(8) {
            Ok(n) => n as usize + 1,
            Err(Error::UnexpectedEof) => return Ok(false),
            Err(e) => return Err(e),
        };

        for _ in 0..count {
            let value = self.bits.read_bits(8)? as u8;
            let bits = self.bits.read_bits(8)? as u8;
            if bits == 0 || bits > 64 {
                return Err(Error::InvalidCodeLength(bits));
            }
            let code_value = self.bits.read_bits(bits)?;
            self.table.insert(Code { value: code_value, bits }, value);
        }
        Ok(true)
    }

    /// Decode the next token; `Ok(None)` is a clean end of stream.
    /// `produced` is the output length the tokens so far expand to,
    /// which bounds any resolvable back-reference distance.
    fn next_token(&mut self, produced: usize) -> Result<Option<Token>> {
        let is_literal = match self.bits.read_bit() {
            Ok(bit) => bit,
            Err(Error::UnexpectedEof) => return Ok(None),
            Err(e) => return Err(e),
        };
        let in_padding_region = self.bits.in_final_byte();

        if is_literal {
            match self.walk_code() {
                Ok(value) => Ok(Some(Token::literal(value))),
                Err(Error::UnexpectedEof) if in_padding_region => Ok(None),
                Err(Error::UnexpectedEof) => Err(Error::TruncatedToken),
                Err(e) => Err(e),
            }
        } else {
            let mut payload = [0u8; 3];
            for slot in payload.iter_mut() {
                match self.walk_code() {
                    Ok(value) => *slot = value,
                    Err(Error::UnexpectedEof) if in_padding_region => return Ok(None),
                    Err(Error::UnexpectedEof) => return Err(Error::TruncatedToken),
                    Err(e) => return Err(e),
                }
            }

            let (distance, length) = decode_pointer(payload);
            if distance == 0 || distance as usize > produced {
                if in_padding_region {
                    // Trailing padding happened to assemble a full token
                    return Ok(None);
                }
                return Err(Error::InvalidBackReference { distance, available: produced });
            }
            Ok(Some(Token::back_ref(distance, length)))
        }
    }

    /// Walk the prefix codes bit by bit until the accumulator matches a
    /// table entry
    fn walk_code(&mut self) -> Result<u8> {
        let mut code = Code::EMPTY;
        loop {
            code = code.push_bit(self.bits.read_bit()?);
            if let Some(&value) = self.table.get(&code) {
                return Ok(value);
            }
            if code.bits == 64 {
                return Err(Error::CodeNotFound);
            }
        }
    }
}
