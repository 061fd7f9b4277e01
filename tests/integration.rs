//! End-to-end round-trip tests for the lzhuff codec.
//!
//! Every compressed stream must decompress to the exact original bytes,
//! across input shapes and search configurations.

use std::io::Cursor;

use lzhuff::huffman::{build_tree, count_payload_frequencies, derive_codes, Code};
use lzhuff::lz77::{reconstruct, tokenize};
use lzhuff::{compress, decompress, CompressConfig, Error, Token};

// ============================================================================
// Test Data Generators
// ============================================================================

/// Generate random data using a simple xorshift PRNG
fn generate_random_data(size: usize, seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.push((state & 0xFF) as u8);
    }
    data
}

/// Generate highly repetitive data (good compression)
fn generate_repetitive_data(size: usize) -> Vec<u8> {
    let pattern = b"ABCDABCDABCDABCD";
    pattern.iter().cycle().take(size).copied().collect()
}

/// Generate text-like data with recurring phrases
fn generate_text_data(size: usize) -> Vec<u8> {
    let sentence = b"the quick brown fox jumps over the lazy dog. ";
    sentence.iter().cycle().take(size).copied().collect()
}

// ============================================================================
// Round-trip helpers
// ============================================================================

fn roundtrip_with(data: &[u8], config: &CompressConfig) -> Vec<u8> {
    let mut compressed = Vec::new();
    compress(Cursor::new(data), &mut compressed, config).unwrap();
    let mut restored = Vec::new();
    decompress(Cursor::new(&compressed), &mut restored).unwrap();
    restored
}

fn assert_roundtrip(data: &[u8]) {
    assert_eq!(roundtrip_with(data, &CompressConfig::default()), data);
}

// ============================================================================
// Round-trip scenarios
// ============================================================================

#[test]
fn test_roundtrip_literals_only() {
    assert_roundtrip(b"abcdefghijkl");
}

#[test]
fn test_roundtrip_empty_input() {
    assert_roundtrip(b"");
}

#[test]
fn test_roundtrip_single_match() {
    assert_roundtrip(b"XXXaaaXXX");
}

#[test]
fn test_roundtrip_multiple_matches() {
    assert_roundtrip(b"XXXabXXXcdXXXijXXX");
}

#[test]
fn test_roundtrip_repeated_characters() {
    // 23 Xs: the padding of this stream assembles a complete bogus
    // back-reference that the decoder has to discard
    assert_roundtrip(&[b'X'; 23]);
}

#[test]
fn test_roundtrip_single_byte() {
    assert_roundtrip(&[0x42]);
}

#[test]
fn test_roundtrip_two_distinct_bytes() {
    assert_roundtrip(b"ab");
}

#[test]
fn test_roundtrip_binary_with_zero_bytes() {
    assert_roundtrip(&[0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 1, 0, 0, 0, 2]);
}

#[test]
fn test_roundtrip_all_byte_values() {
    // Touches the full 256-entry table, the widest the header encodes
    let data: Vec<u8> = (0..1024).map(|i| (i * 7 % 256) as u8).collect();
    assert_roundtrip(&data);
}

#[test]
fn test_roundtrip_random_data() {
    for &size in &[1usize, 2, 37, 100, 1000, 5000] {
        let data = generate_random_data(size, 0x1234_5678 + size as u64);
        assert_roundtrip(&data);
    }
}

#[test]
fn test_roundtrip_repetitive_data() {
    let data = generate_repetitive_data(1_000);
    assert_roundtrip(&data);
}

#[test]
fn test_roundtrip_text_data() {
    let data = generate_text_data(3_000);
    assert_roundtrip(&data);
}

#[test]
fn test_roundtrip_config_sweep() {
    // Small inputs across window and match-length extremes; any bogus
    // pointer the padding can assemble is out of range for outputs
    // this short
    let inputs: [&[u8]; 4] = [
        b"abcd abcd abcd abcd",
        b"mississippi mississippi",
        &[b'X'; 64],
        b"aabbccaabbccaabbccaabbcc",
    ];
    for data in inputs {
        for min in [1u8, 2, 4, 8] {
            for window in [1u16, 4, 16, 255, 4096, 65535] {
                let config = CompressConfig {
                    min_match_len: min,
                    max_match_len: 255,
                    max_search_len: window,
                };
                assert_eq!(
                    roundtrip_with(data, &config),
                    data,
                    "round-trip failed for min={} window={}",
                    min,
                    window
                );
            }
        }
    }
}

#[test]
fn test_roundtrip_min_match_equals_max_match() {
    let config = CompressConfig { min_match_len: 3, max_match_len: 3, max_search_len: 255 };
    let data = b"XXXXabcdXXXX";
    assert_eq!(roundtrip_with(data, &config), data);
}

#[test]
fn test_roundtrip_zero_window_stores_literals() {
    let config = CompressConfig { min_match_len: 0, max_match_len: 255, max_search_len: 0 };
    let data = b"abcabcabcabc";
    assert_eq!(roundtrip_with(data, &config), data);
}

#[test]
fn test_compression_shrinks_repetitive_input() {
    let data = generate_repetitive_data(50_000);
    let mut compressed = Vec::new();
    compress(Cursor::new(&data), &mut compressed, &CompressConfig::default()).unwrap();
    assert!(compressed.len() < data.len() / 2);
}

// ============================================================================
// Token stream invariants
// ============================================================================

#[test]
fn test_back_reference_bounds() {
    let data = generate_text_data(4_000);
    for (min, max, window) in [(1u8, 255u8, 16u16), (4, 255, 4096), (3, 8, 64)] {
        let config =
            CompressConfig { min_match_len: min, max_match_len: max, max_search_len: window };
        let tokens = tokenize(&data, &config).unwrap();
        for token in &tokens {
            if let Token::BackRef { distance, length } = *token {
                assert!(length >= min.max(1) && length <= max);
                assert!(distance >= 1 && distance <= window);
            }
        }
        // The tokens must reproduce the input on their own
        assert_eq!(reconstruct(&tokens).unwrap(), data);
    }
}

#[test]
fn test_code_table_is_prefix_free_and_covering() {
    fn is_prefix_of(a: Code, b: Code) -> bool {
        a.bits < b.bits && (b.value >> (b.bits - a.bits)) == a.value
    }

    let data = generate_text_data(2_000);
    let tokens = tokenize(&data, &CompressConfig::default()).unwrap();
    let freqs = count_payload_frequencies(&tokens);
    let table = derive_codes(&build_tree(&freqs).unwrap());

    for (byte, &freq) in freqs.iter().enumerate() {
        assert_eq!(freq > 0, table.get(byte as u8).is_some());
    }

    let codes: Vec<Code> = table.iter().map(|(_, c)| c).collect();
    for (i, &a) in codes.iter().enumerate() {
        for &b in &codes[i + 1..] {
            assert_ne!(a, b);
            assert!(!is_prefix_of(a, b));
            assert!(!is_prefix_of(b, a));
        }
    }
}

#[test]
fn test_self_overlap_run_semantics() {
    // distance < length repeats the run the encoder saw
    let tokens = [Token::literal(b'X'), Token::back_ref(1, 9)];
    assert_eq!(reconstruct(&tokens).unwrap(), &[b'X'; 10]);
}

// ============================================================================
// Error paths
// ============================================================================

#[test]
fn test_compress_rejects_invalid_bounds() {
    let config = CompressConfig { min_match_len: 9, max_match_len: 8, max_search_len: 255 };
    let mut out = Vec::new();
    let err = compress(Cursor::new(b"abc".as_slice()), &mut out, &config).unwrap_err();
    assert!(matches!(err, Error::InvalidMatchBounds { min: 9, max: 8 }));
}

#[test]
fn test_compress_rejects_zero_max_match() {
    let config = CompressConfig { min_match_len: 4, max_match_len: 0, max_search_len: 255 };
    let mut out = Vec::new();
    let err = compress(Cursor::new(b"abc".as_slice()), &mut out, &config).unwrap_err();
    assert!(matches!(err, Error::ZeroMaxMatch(4)));
}

#[test]
fn test_decompress_empty_stream_yields_empty_output() {
    let mut restored = Vec::new();
    let stats = decompress(Cursor::new(b"".as_slice()), &mut restored).unwrap();
    assert!(restored.is_empty());
    assert_eq!(stats.tokens, 0);
}

#[test]
fn test_decompress_truncated_table_fails() {
    // A count byte promising entries the stream does not contain
    let data = [0x05u8, 0x41];
    let mut restored = Vec::new();
    let err = decompress(Cursor::new(data.as_slice()), &mut restored).unwrap_err();
    assert!(matches!(err, Error::UnexpectedEof));
}

#[test]
fn test_decompress_zero_code_length_fails() {
    let data = [0x00u8, 0x41, 0x00];
    let mut restored = Vec::new();
    let err = decompress(Cursor::new(data.as_slice()), &mut restored).unwrap_err();
    assert!(matches!(err, Error::InvalidCodeLength(0)));
}

#[test]
fn test_failed_decompression_writes_no_output() {
    let data = [0x05u8, 0x41];
    let mut restored = Vec::new();
    assert!(decompress(Cursor::new(data.as_slice()), &mut restored).is_err());
    assert!(restored.is_empty());
}
