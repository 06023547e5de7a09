use sha2::{Digest, Sha256};

use super::{check_block_len, Oracle};
use crate::PrgError;

/// SHA-256 in counter mode.
///
/// The seed blocks are fed, in order, to a single SHA-256 context. Each refill
/// increments a 128-bit counter, hashes its little-endian encoding on a copy
/// of that context and outputs the digest. Absorbing more blocks later simply
/// continues the message; the counter is never reset.
#[derive(Clone)]
pub struct CounterHash {
    state: Sha256,
    counter: u128,
}

impl CounterHash {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Sha256::new(),
            counter: 0,
        }
    }

    /// Number of refills performed so far
    #[must_use]
    pub fn counter(&self) -> u128 {
        self.counter
    }
}

impl Default for CounterHash {
    fn default() -> Self {
        Self::new()
    }
}

impl Oracle for CounterHash {
    const BLOCK_LEN: usize = 64;
    const NAME: &'static str = "sha256-counter";
    const OUTPUT_LEN: usize = 32;

    fn absorb(&mut self, block: &[u8]) -> Result<(), PrgError> {
        check_block_len::<Self>(block)?;
        self.state.update(block);
        Ok(())
    }

    fn squeeze(&mut self, out: &mut [u8]) {
        self.counter = self.counter.wrapping_add(1);
        let mut h = self.state.clone();
        h.update(self.counter.to_le_bytes());
        out.copy_from_slice(&h.finalize());
    }

    fn parameters(&self) -> Vec<(&'static str, usize)> {
        vec![("block", Self::BLOCK_LEN)]
    }

    fn from_parameters(parameters: &[(String, usize)]) -> Result<Self, PrgError> {
        for (name, value) in parameters {
            match (name.as_str(), *value) {
                ("block", v) if v == Self::BLOCK_LEN => {}
                ("block", v) => {
                    return Err(PrgError::DescriptionError(format!(
                        "{} absorbs blocks of at most {} bytes, got {v}",
                        Self::NAME,
                        Self::BLOCK_LEN
                    )))
                }
                (other, _) => {
                    return Err(PrgError::DescriptionError(format!(
                        "unknown {} parameter: {other}",
                        Self::NAME
                    )))
                }
            }
        }
        Ok(Self::new())
    }
}
