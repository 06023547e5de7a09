//! The cryptographic primitives feeding the entropy buffer.
//!
//! A primitive absorbs seed blocks into its state and deterministically
//! produces fresh output blocks from that state. Two strategies are provided:
//!
//! - [`CounterHash`]: a SHA-256 context loaded with the seed, finalized over an
//!   incrementing 128-bit counter on every refill
//! - [`Sparkle512`]: a sponge over the 512-bit SPARKLE permutation
mod counter_hash;
mod sparkle;

pub use counter_hash::CounterHash;
pub use sparkle::{Sparkle512, DEFAULT_STEPS};

use crate::PrgError;

pub trait Oracle {
    /// Strategy name, as printed in generator descriptions
    const NAME: &'static str;

    /// Maximum length of a block absorbed in one call
    const BLOCK_LEN: usize;

    /// Number of bytes produced by one refill
    const OUTPUT_LEN: usize;

    /// Mix `block` into the state.
    ///
    /// Fails with [`PrgError::OversizedBlock`] without touching the state if
    /// `block` is longer than [`Oracle::BLOCK_LEN`].
    fn absorb(&mut self, block: &[u8]) -> Result<(), PrgError>;

    /// Fill `out` (exactly [`Oracle::OUTPUT_LEN`] bytes long) with the next
    /// output block. Only depends on the current state.
    fn squeeze(&mut self, out: &mut [u8]);

    /// Tunable parameters, in display order
    fn parameters(&self) -> Vec<(&'static str, usize)>;

    /// Rebuild a fresh (nothing absorbed) instance from parameters previously
    /// returned by [`Oracle::parameters`].
    fn from_parameters(parameters: &[(String, usize)]) -> Result<Self, PrgError>
    where
        Self: Sized;
}

/// Check a block length against the absorption unit of `O`
pub(crate) fn check_block_len<O: Oracle>(block: &[u8]) -> Result<(), PrgError> {
    if block.len() > O::BLOCK_LEN {
        return Err(PrgError::OversizedBlock {
            given: block.len(),
            max: O::BLOCK_LEN,
        });
    }
    Ok(())
}
