//! Reproducible pseudo random generation for research experiments.
//!
//! A [`ReproduciblePrg`] derives all its output from an ordered list of seed
//! blocks absorbed by a cryptographic primitive (SHA-256 in counter mode, or a
//! sponge over the SPARKLE-512 permutation), and samples integers uniformly in
//! arbitrary ranges by rejection. Same seed, same draws, same values.
//!
//! It is a reproducibility tool, not a source of secrets.
mod error;

pub mod descriptor;
pub mod entropy;
pub mod generator;
pub mod oracle;
pub mod sampler;
pub mod seed;

pub use descriptor::Descriptor;
pub use error::PrgError;
pub use generator::{ReproduciblePrg, Sha256Prg, SparklePrg};
pub use oracle::{CounterHash, Oracle, Sparkle512};
pub use sampler::{ByteSource, UniformBound};
pub use seed::{Seed, SeedBlock};
