use crate::error::{Error, Result};
use std::io::Read;

/// Bit-level reader for the compressed stream
///
/// Bits are consumed MSB-first within each byte, matching [`BitWriter`].
/// The reader keeps a one-byte lookahead so callers can tell whether the
/// bit they just read came from the final byte of the source; the token
/// decoder uses that to tell zero padding apart from a truncated stream.
///
/// [`BitWriter`]: crate::bits::BitWriter
pub struct BitReader<R: Read> {
    source: R,
    /// Byte currently being consumed
    current: u8,
    /// Unread bits remaining in `current` (0-8)
    bits_left: u8,
    /// Lookahead byte, `None` once the source is exhausted
    next: Option<u8>,
    /// Whether the lookahead has been primed
    primed: bool,
    /// Total bytes consumed from the source
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R) -> Self {
        Self { source, current: 0, bits_left: 0, next: None, primed: false, bytes_read: 0 }
    }

    /// Read a single bit
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bits_left == 0 {
            self.refill()?;
        }
        self.bits_left -= 1;
        Ok((self.current >> self.bits_left) & 1 == 1)
    }

    /// Read `n` bits (1-64) as an unsigned value, most significant first
    pub fn read_bits(&mut self, n: u8) -> Result<u64> {
        debug_assert!(n <= 64, "cannot read more than 64 bits at once");

        let mut value = 0u64;
        let mut remaining = n;
        while remaining > 0 {
            if self.bits_left == 0 {
                self.refill()?;
            }
            let take = remaining.min(self.bits_left);
            self.bits_left -= take;
            let chunk = (self.current >> self.bits_left) & ((1u16 << take) - 1) as u8;
            value = (value << take) | chunk as u64;
            remaining -= take;
        }
        Ok(value)
    }

    /// Whether the most recently read bit came from the final byte of the
    /// source. Only meaningful after at least one successful read.
    pub fn in_final_byte(&self) -> bool {
        self.next.is_none()
    }

    /// Total bytes consumed from the source
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Load the next byte into `current`, keeping the lookahead one byte
    /// ahead of it
    fn refill(&mut self) -> Result<()> {
        if !self.primed {
            self.next = self.next_byte()?;
            self.primed = true;
        }
        match self.next.take() {
            Some(byte) => {
                self.current = byte;
                self.bits_left = 8;
                self.next = self.next_byte()?;
                Ok(())
            }
            None => Err(Error::UnexpectedEof),
        }
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.source.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.bytes_read += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                    // Retry on interrupt
                }
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }
}
