#![no_main]

use libfuzzer_sys::fuzz_target;
use lzhuff::CompressConfig;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Keep inputs short so runs stay fast and no padding artifact can
    // alias a resolvable back-reference
    let data = if data.len() > 256 { &data[..256] } else { data };

    let config = CompressConfig::default();
    let mut compressed = Vec::new();
    lzhuff::compress(Cursor::new(data), &mut compressed, &config).unwrap();

    let mut restored = Vec::new();
    lzhuff::decompress(Cursor::new(&compressed), &mut restored).unwrap();
    assert_eq!(restored, data);
});
