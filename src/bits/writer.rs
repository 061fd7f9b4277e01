use crate::error::Result;
use std::io::Write;

/// Bit-level writer for the compressed stream
///
/// Bits are packed MSB-first within each byte. The final partial byte is
/// padded with zero bits when the writer is finished.
pub struct BitWriter<W: Write> {
    sink: W,
    /// Current byte being built
    current: u8,
    /// Bits written to the current byte (0-7)
    bits_in_byte: u8,
    /// Total complete bytes flushed to the sink
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, current: 0, bits_in_byte: 0, bytes_written: 0 }
    }

    /// Write the low `n` bits of `value` (1-64), most significant first
    pub fn write_bits(&mut self, value: u64, n: u8) -> Result<()> {
        debug_assert!(n <= 64, "cannot write more than 64 bits at once");

        let mut remaining = n;
        while remaining > 0 {
            let space = 8 - self.bits_in_byte;
            let take = remaining.min(space);

            let shift = remaining - take;
            let chunk = ((value >> shift) as u8) & ((1u16 << take) - 1) as u8;
            self.current |= chunk << (space - take);

            self.bits_in_byte += take;
            remaining -= take;

            if self.bits_in_byte == 8 {
                self.flush_byte()?;
            }
        }
        Ok(())
    }

    /// Write a single bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write_bits(bit as u64, 1)
    }

    /// Pad the current byte with zero bits and flush it, returning the
    /// total number of bytes written
    pub fn finish(mut self) -> Result<u64> {
        if self.bits_in_byte > 0 {
            self.flush_byte()?;
        }
        self.sink.flush()?;
        Ok(self.bytes_written)
    }

    /// Bytes flushed so far (excludes any partial byte)
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn flush_byte(&mut self) -> Result<()> {
        self.sink.write_all(&[self.current])?;
        self.current = 0;
        self.bits_in_byte = 0;
        self.bytes_written += 1;
        Ok(())
    }
}
