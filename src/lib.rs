pub mod bits;
pub mod error;
pub mod huffman;
pub mod lz77;
pub mod stream;

pub use error::{Error, Result};
pub use lz77::tokens::Token;

use std::io::{Read, Write};

use crate::huffman::{build_tree, count_payload_frequencies, derive_codes, write_graphviz};
use crate::stream::{StreamReader, StreamWriter};

/// Configuration for the LZ77 match search
#[derive(Clone, Copy, Debug)]
pub struct CompressConfig {
    /// Minimum match length eligible for a back-reference (0 = any)
    pub min_match_len: u8,
    /// Maximum match length; the wire format caps lengths at 255
    pub max_match_len: u8,
    /// How far back the search window reaches (0 = no back-references)
    pub max_search_len: u16,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self { min_match_len: 4, max_match_len: 255, max_search_len: 4096 }
    }
}

impl CompressConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_match_len == 0 && self.min_match_len > 0 {
            return Err(Error::ZeroMaxMatch(self.min_match_len));
        }
        if self.min_match_len > self.max_match_len {
            return Err(Error::InvalidMatchBounds {
                min: self.min_match_len,
                max: self.max_match_len,
            });
        }
        Ok(())
    }
}

/// Statistics from a compression run
#[derive(Clone, Debug, Default)]
pub struct CompressStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub tokens: u64,
    pub back_references: u64,
    pub table_entries: usize,
}

impl CompressStats {
    /// Share of tokens that are back-references
    pub fn pointer_ratio(&self) -> f64 {
        if self.tokens == 0 {
            0.0
        } else {
            self.back_references as f64 / self.tokens as f64
        }
    }
}

/// Statistics from a decompression run
#[derive(Clone, Debug, Default)]
pub struct DecompressStats {
    pub output_bytes: u64,
    pub tokens: u64,
}

/// Optional sinks for diagnostic dumps produced during compression
#[derive(Default)]
pub struct DiagnosticSinks<'a> {
    /// Graphviz rendering of the Huffman tree
    pub tree_dot: Option<&'a mut dyn Write>,
    /// Textual LZ77 token dump
    pub token_dump: Option<&'a mut dyn Write>,
}

/// Compress `input` into `output`: LZ77 tokenisation, a Huffman table
/// over the token payload bytes, then the bit-serialised table and
/// token stream
pub fn compress<R: Read, W: Write>(
    input: R,
    output: W,
    config: &CompressConfig,
) -> Result<CompressStats> {
    compress_with_diagnostics(input, output, config, DiagnosticSinks::default())
}

/// [`compress`] with optional diagnostic dumps of the intermediate
/// stages
pub fn compress_with_diagnostics<R: Read, W: Write>(
    mut input: R,
    output: W,
    config: &CompressConfig,
    mut diagnostics: DiagnosticSinks<'_>,
) -> Result<CompressStats> {
    config.validate()?;

    let mut data = Vec::new();
    input.read_to_end(&mut data)?;

    let tokens = lz77::encoder::tokenize(&data, config)?;
    if let Some(sink) = diagnostics.token_dump.as_deref_mut() {
        for token in &tokens {
            write!(sink, "{}", token)?;
        }
    }

    let mut stats = CompressStats {
        input_bytes: data.len() as u64,
        tokens: tokens.len() as u64,
        back_references: tokens.iter().filter(|t| !t.is_literal()).count() as u64,
        ..Default::default()
    };

    // Empty input produces no payload alphabet, and the table header
    // cannot express an empty table; the stream is simply empty.
    let freqs = count_payload_frequencies(&tokens);
    let root = match build_tree(&freqs) {
        Some(root) => root,
        None => return Ok(stats),
    };
    if let Some(sink) = diagnostics.tree_dot.as_deref_mut() {
        write_graphviz(&root, sink)?;
    }

    let table = derive_codes(&root);
    stats.table_entries = table.len();

    stats.output_bytes = StreamWriter::new(output, table).write_tokens(&tokens)?;
    Ok(stats)
}

/// Decompress a stream produced by [`compress`]. The whole token
/// sequence is decoded before any output is written; a failed run
/// yields no partial output.
pub fn decompress<R: Read, W: Write>(input: R, mut output: W) -> Result<DecompressStats> {
    let tokens = StreamReader::new(input).read_tokens()?;
    let bytes = lz77::decoder::reconstruct(&tokens)?;
    output.write_all(&bytes)?;
    Ok(DecompressStats { output_bytes: bytes.len() as u64, tokens: tokens.len() as u64 })
}
