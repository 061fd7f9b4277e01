#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes are rarely a valid stream; decoding may fail with
    // an error but must never panic
    let mut out = Vec::new();
    let _ = lzhuff::decompress(Cursor::new(data), &mut out);
});
