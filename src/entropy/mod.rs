use tracing::trace;

use crate::oracle::Oracle;

/// Byte queue between oracle refills.
///
/// The buffer holds the last output block of the oracle and a cursor to the
/// next unread byte. When the cursor reaches the end, the next read refills
/// the whole buffer from the oracle first.
#[derive(Debug, Clone)]
pub struct EntropyBuffer {
    bytes: Vec<u8>,
    cursor: usize,
    refills: u64,
    consumed: u64,
}

impl EntropyBuffer {
    // `capacity` must be positive: an empty buffer is always exhausted and
    // would be indexed past its end
    fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "entropy buffer capacity must be positive");
        Self {
            bytes: vec![0_u8; capacity],
            cursor: capacity,
            refills: 0,
            consumed: 0,
        }
    }

    /// Create an exhausted buffer sized for the output of `O`
    #[must_use]
    pub fn for_oracle<O: Oracle>() -> Self {
        Self::new(O::OUTPUT_LEN)
    }

    /// Read the next byte, refilling from `oracle` if needed
    pub fn next_byte<O: Oracle>(&mut self, oracle: &mut O) -> u8 {
        if self.is_exhausted() {
            oracle.squeeze(&mut self.bytes);
            self.cursor = 0;
            self.refills += 1;
            trace!("entropy buffer refill #{}: {} bytes", self.refills, self.bytes.len());
        }
        let byte = self.bytes[self.cursor];
        self.cursor += 1;
        self.consumed += 1;
        byte
    }

    /// Discard every unread byte: the next read triggers a refill.
    pub fn invalidate(&mut self) {
        self.cursor = self.bytes.len();
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.bytes.len()
    }

    /// Number of unread bytes
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Number of refills since creation
    #[must_use]
    pub fn refills(&self) -> u64 {
        self.refills
    }

    /// Number of bytes read since creation
    #[must_use]
    pub fn consumed(&self) -> u64 {
        self.consumed
    }
}
