use std::{
    fmt::{Debug, Display},
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use num_bigint::BigUint;
use rand_core::{impls, RngCore};
use tracing::{debug, warn};

use crate::{
    descriptor::Descriptor,
    entropy::EntropyBuffer,
    oracle::{check_block_len, CounterHash, Oracle, Sparkle512},
    sampler::{below_big, below_u128, full_width_bound, ByteSource, UniformBound},
    seed::{Seed, SeedBlock},
    PrgError,
};

/// Generator over SHA-256 in counter mode
pub type Sha256Prg = ReproduciblePrg<CounterHash>;

/// Generator over the SPARKLE-512 sponge
pub type SparklePrg = ReproduciblePrg<Sparkle512>;

/// A deterministic pseudo random generator for reproducible experiments.
///
/// All the output derives from the seed blocks absorbed by the oracle `O`:
/// two generators built from the same blocks and asked the same sequence of
/// draws return the same values, on any machine.
///
/// This is NOT a cryptographically secure generator, in particular when
/// reseeded with [`ReproduciblePrg::reseed_from_time_and_pid`]: never use it
/// to produce secrets. It deliberately does not implement `CryptoRng`.
///
/// The generator prints as its [`Descriptor`], which parses back into an
/// identically seeded instance.
#[derive(Clone)]
pub struct ReproduciblePrg<O: Oracle> {
    oracle: O,
    buffer: EntropyBuffer,
    absorbed: Vec<SeedBlock>,
}

impl<O: Oracle + Default> ReproduciblePrg<O> {
    /// Create a generator with the default oracle parameters.
    ///
    /// - `seed`    : one block or an ordered sequence of blocks
    pub fn new(seed: impl Into<Seed>) -> Result<Self, PrgError> {
        Self::with_oracle(O::default(), seed)
    }
}

impl<O: Oracle> ReproduciblePrg<O> {
    /// Create a generator absorbing `seed` into a fresh `oracle`.
    ///
    /// Fails with [`PrgError::OversizedBlock`] if any block is larger than
    /// the oracle absorption unit.
    pub fn with_oracle(oracle: O, seed: impl Into<Seed>) -> Result<Self, PrgError> {
        let mut prg = Self {
            oracle,
            buffer: EntropyBuffer::for_oracle::<O>(),
            absorbed: Vec::new(),
        };
        prg.absorb_blocks(seed.into().into_blocks())?;
        debug!("{} generator seeded with {} block(s)", O::NAME, prg.absorbed.len());
        Ok(prg)
    }

    /// Rebuild the generator described by `descriptor`
    pub fn from_descriptor(descriptor: &Descriptor) -> Result<Self, PrgError> {
        if descriptor.strategy != O::NAME {
            return Err(PrgError::DescriptionError(format!(
                "expected strategy {}, found {}",
                O::NAME,
                descriptor.strategy
            )));
        }
        let oracle = O::from_parameters(&descriptor.parameters)?;
        Self::with_oracle(oracle, descriptor.blocks.clone())
    }

    // all blocks are checked before the first one is absorbed so that a
    // failure leaves the generator untouched
    fn absorb_blocks(&mut self, blocks: Vec<SeedBlock>) -> Result<(), PrgError> {
        for block in &blocks {
            check_block_len::<O>(block.as_bytes())?;
        }
        for block in blocks {
            self.oracle.absorb(block.as_bytes())?;
            self.absorbed.push(block);
        }
        self.buffer.invalidate();
        Ok(())
    }

    /// Absorb more blocks on top of the current state.
    ///
    /// Unread buffered bytes are discarded: the next draw only depends on the
    /// state after absorption.
    pub fn reseed(&mut self, seed: impl Into<Seed>) -> Result<(), PrgError> {
        let blocks = seed.into().into_blocks();
        let n = blocks.len();
        self.absorb_blocks(blocks)?;
        debug!("{} generator reseeded with {n} block(s)", O::NAME);
        Ok(())
    }

    /// Reseed with the current UNIX time and the process id, returning the
    /// two absorbed blocks.
    ///
    /// The output stops being reproducible from the original seed, although
    /// the blocks are recorded and printed with the generator. Obviously
    /// unfit to generate cryptographic keys.
    pub fn reseed_from_time_and_pid(&mut self) -> Result<Vec<SeedBlock>, PrgError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let blocks = vec![
            SeedBlock::from(format!("{}.{:06}", now.as_secs(), now.subsec_micros())),
            SeedBlock::from(u128::from(std::process::id()).to_le_bytes().to_vec()),
        ];
        warn!(
            "{} generator reseeded from time and pid, output is no longer reproducible from its initial seed",
            O::NAME
        );
        self.reseed(blocks.clone())?;
        Ok(blocks)
    }

    /// Return `d` with `lower <= d < upper`, uniformly distributed.
    ///
    /// Fails with [`PrgError::InvalidRange`] if `upper <= lower`, leaving the
    /// generator untouched.
    pub fn generate<T: UniformBound>(&mut self, lower: T, upper: T) -> Result<T, PrgError> {
        T::sample(self, &lower, &upper)
    }

    /// Draw uniformly in `[0, 2^w)` where `w` is the output width of the
    /// oracle in bits
    pub fn next_full_width(&mut self) -> BigUint {
        below_big(self, &full_width_bound(8 * O::OUTPUT_LEN))
    }

    /// The next `len` raw buffer bytes
    pub fn random_bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.next_byte()).collect()
    }

    /// Shuffle `items` in place (Fisher-Yates)
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        let n = items.len();
        for i in 0..n {
            // same draw as `generate(i, n)`
            let j = i + below_u128(self, (n - i) as u128) as usize;
            items.swap(i, j);
        }
    }

    /// A uniformly random permutation of `0..n`
    pub fn random_permutation(&mut self, n: usize) -> Vec<usize> {
        let mut result: Vec<usize> = (0..n).collect();
        self.shuffle(&mut result);
        result
    }

    /// Every block absorbed so far, in order
    #[must_use]
    pub fn seed_blocks(&self) -> &[SeedBlock] {
        &self.absorbed
    }

    #[must_use]
    pub fn descriptor(&self) -> Descriptor {
        Descriptor {
            strategy: O::NAME.to_string(),
            parameters: self
                .oracle
                .parameters()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            blocks: self.absorbed.clone(),
        }
    }

    #[must_use]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Number of oracle refills so far
    #[must_use]
    pub fn refill_count(&self) -> u64 {
        self.buffer.refills()
    }

    /// Number of bytes drawn so far
    #[must_use]
    pub fn bytes_consumed(&self) -> u64 {
        self.buffer.consumed()
    }
}

impl<O: Oracle> ByteSource for ReproduciblePrg<O> {
    fn next_byte(&mut self) -> u8 {
        self.buffer.next_byte(&mut self.oracle)
    }
}

impl<O: Oracle> RngCore for ReproduciblePrg<O> {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for b in dest.iter_mut() {
            *b = self.next_byte();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<O: Oracle> Display for ReproduciblePrg<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.descriptor())
    }
}

impl<O: Oracle> Debug for ReproduciblePrg<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReproduciblePrg")
            .field("descriptor", &self.descriptor().to_string())
            .field("buffered", &self.buffer.remaining())
            .field("refills", &self.buffer.refills())
            .finish()
    }
}

impl<O: Oracle> FromStr for ReproduciblePrg<O> {
    type Err = PrgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_descriptor(&s.parse()?)
    }
}
