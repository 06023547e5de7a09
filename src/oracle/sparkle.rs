use super::{check_block_len, Oracle};
use crate::PrgError;

/// Number of 64-bit branches of SPARKLE-512
const BRANCHES: usize = 8;
const STATE_WORDS: usize = 2 * BRANCHES;

/// Words of the state a block is XORed into
const RATE_WORDS: usize = 8;

/// Number of steps per permutation call when none is configured
pub const DEFAULT_STEPS: usize = 8;

/// Domain marker XORed into the capacity before an absorbing permutation
const ABSORB_DOMAIN: u32 = 1;

const RCON: [u32; BRANCHES] = [
    0xB7E1_5162,
    0xBF71_5880,
    0x38B4_DA56,
    0x324E_7738,
    0xBB11_85EB,
    0x4F7C_7B57,
    0xCFBF_A1C8,
    0xC2B3_293D,
];

#[inline]
fn ell(x: u32) -> u32 {
    (x ^ (x << 16)).rotate_right(16)
}

/// The SPARKLE-512 permutation with `steps` steps
fn permute(state: &mut [u32; STATE_WORDS], steps: usize) {
    for i in 0..steps {
        // add step counter and round constant
        state[1] ^= RCON[i % BRANCHES];
        state[3] ^= i as u32;
        // ARX-box layer
        for j in (0..STATE_WORDS).step_by(2) {
            let rc = RCON[j >> 1];
            state[j] = state[j].wrapping_add(state[j + 1].rotate_right(31));
            state[j + 1] ^= state[j].rotate_right(24);
            state[j] ^= rc;
            state[j] = state[j].wrapping_add(state[j + 1].rotate_right(17));
            state[j + 1] ^= state[j].rotate_right(17);
            state[j] ^= rc;
            state[j] = state[j].wrapping_add(state[j + 1]);
            state[j + 1] ^= state[j].rotate_right(31);
            state[j] ^= rc;
            state[j] = state[j].wrapping_add(state[j + 1].rotate_right(24));
            state[j + 1] ^= state[j].rotate_right(16);
            state[j] ^= rc;
        }
        // linear layer: Feistel-like mix of the left half into the right one
        let (x0, y0) = (state[0], state[1]);
        let (mut tmpx, mut tmpy) = (x0, y0);
        for j in (2..BRANCHES).step_by(2) {
            tmpx ^= state[j];
            tmpy ^= state[j + 1];
        }
        let tmpx = ell(tmpx);
        let tmpy = ell(tmpy);
        for j in (2..BRANCHES).step_by(2) {
            state[j - 2] = state[j + BRANCHES] ^ state[j] ^ tmpy;
            state[j + BRANCHES] = state[j];
            state[j - 1] = state[j + BRANCHES + 1] ^ state[j + 1] ^ tmpx;
            state[j + BRANCHES + 1] = state[j + 1];
        }
        state[BRANCHES - 2] = state[BRANCHES] ^ x0 ^ tmpy;
        state[BRANCHES] = x0;
        state[BRANCHES - 1] = state[BRANCHES + 1] ^ y0 ^ tmpx;
        state[BRANCHES + 1] = y0;
    }
}

/// Sponge over SPARKLE-512.
///
/// A block is zero padded to the 32-byte rate, XORed into the first eight
/// state words (little-endian), its length is marked in the last capacity
/// word, and the permutation is applied. A refill applies the permutation
/// again and outputs the whole 64-byte state.
#[derive(Clone)]
pub struct Sparkle512 {
    state: [u32; STATE_WORDS],
    steps: usize,
}

impl Sparkle512 {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: [0_u32; STATE_WORDS],
            steps: DEFAULT_STEPS,
        }
    }

    /// Sponge running `steps` rounds of the permutation per call.
    ///
    /// Zero steps would make the permutation the identity and the output
    /// stream periodic, so it is refused.
    pub fn with_steps(steps: usize) -> Result<Self, PrgError> {
        if steps == 0 {
            return Err(PrgError::DescriptionError(format!(
                "{} needs at least one step",
                Self::NAME
            )));
        }
        Ok(Self {
            state: [0_u32; STATE_WORDS],
            steps,
        })
    }

    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl Default for Sparkle512 {
    fn default() -> Self {
        Self::new()
    }
}

impl Oracle for Sparkle512 {
    const BLOCK_LEN: usize = 4 * RATE_WORDS;
    const NAME: &'static str = "sparkle512-sponge";
    const OUTPUT_LEN: usize = 4 * STATE_WORDS;

    fn absorb(&mut self, block: &[u8]) -> Result<(), PrgError> {
        check_block_len::<Self>(block)?;
        let mut padded = [0_u8; 4 * RATE_WORDS];
        padded[..block.len()].copy_from_slice(block);
        for (word, chunk) in self.state.iter_mut().zip(padded.chunks_exact(4)) {
            *word ^= u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        // BLOCK_LEN is 32 so the length always fits
        self.state[STATE_WORDS - 1] ^= ABSORB_DOMAIN ^ ((block.len() as u32) << 8);
        permute(&mut self.state, self.steps);
        Ok(())
    }

    fn squeeze(&mut self, out: &mut [u8]) {
        permute(&mut self.state, self.steps);
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.state.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
    }

    fn parameters(&self) -> Vec<(&'static str, usize)> {
        vec![("steps", self.steps), ("rate", Self::BLOCK_LEN)]
    }

    fn from_parameters(parameters: &[(String, usize)]) -> Result<Self, PrgError> {
        let mut steps = DEFAULT_STEPS;
        for (name, value) in parameters {
            match (name.as_str(), *value) {
                ("steps", v) => steps = v,
                ("rate", v) if v == Self::BLOCK_LEN => {}
                ("rate", v) => {
                    return Err(PrgError::DescriptionError(format!(
                        "{} has a fixed rate of {} bytes, got {v}",
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
        Self::with_steps(steps)
    }
}
