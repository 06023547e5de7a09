use std::fmt::Display;

/// An immutable chunk of seeding material, absorbed in one oracle call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeedBlock(Vec<u8>);

impl SeedBlock {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for SeedBlock {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for SeedBlock {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for SeedBlock {
    fn from(bytes: &[u8; N]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for SeedBlock {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for SeedBlock {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<SeedBlock> for Vec<u8> {
    fn from(block: SeedBlock) -> Self {
        block.0
    }
}

impl AsRef<[u8]> for SeedBlock {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for SeedBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

/// Seeding material: either one block or an ordered sequence of blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    Single(SeedBlock),
    Sequence(Vec<SeedBlock>),
}

impl Seed {
    /// The blocks, in absorption order
    #[must_use]
    pub fn into_blocks(self) -> Vec<SeedBlock> {
        match self {
            Seed::Single(block) => vec![block],
            Seed::Sequence(blocks) => blocks,
        }
    }
}

impl From<SeedBlock> for Seed {
    fn from(block: SeedBlock) -> Self {
        Seed::Single(block)
    }
}

impl From<&[u8]> for Seed {
    fn from(bytes: &[u8]) -> Self {
        Seed::Single(bytes.into())
    }
}

impl<const N: usize> From<&[u8; N]> for Seed {
    fn from(bytes: &[u8; N]) -> Self {
        Seed::Single(bytes.into())
    }
}

impl From<Vec<u8>> for Seed {
    fn from(bytes: Vec<u8>) -> Self {
        Seed::Single(bytes.into())
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        Seed::Single(s.into())
    }
}

impl From<Vec<SeedBlock>> for Seed {
    fn from(blocks: Vec<SeedBlock>) -> Self {
        Seed::Sequence(blocks)
    }
}

macro_rules! impl_sequence {
    ($($t:ty),*) => {$(
        impl From<Vec<$t>> for Seed {
            fn from(items: Vec<$t>) -> Self {
                Seed::Sequence(items.into_iter().map(SeedBlock::from).collect())
            }
        }

        impl From<&[$t]> for Seed {
            fn from(items: &[$t]) -> Self {
                Seed::Sequence(items.iter().cloned().map(SeedBlock::from).collect())
            }
        }

        impl<const N: usize> From<[$t; N]> for Seed {
            fn from(items: [$t; N]) -> Self {
                Seed::Sequence(items.into_iter().map(SeedBlock::from).collect())
            }
        }
    )*};
}

impl_sequence!(&[u8], &str, Vec<u8>, String);

#[cfg(test)]
mod tests {
    use super::{Seed, SeedBlock};

    #[test]
    fn test_single_block() {
        let seed = Seed::from(b"blabli");
        assert_eq!(vec![SeedBlock::from("blabli")], seed.into_blocks());
        let seed = Seed::from("blabli");
        assert_eq!(Seed::Single(SeedBlock::from(b"blabli".to_vec())), seed);
    }

    #[test]
    fn test_sequence_keeps_order() {
        let blocks: [&[u8]; 2] = [b"blabli", b"blu"];
        let expected = vec![SeedBlock::from("blabli"), SeedBlock::from("blu")];
        assert_eq!(expected, Seed::from(blocks).into_blocks());
        assert_eq!(expected, Seed::from(&blocks[..]).into_blocks());
        assert_eq!(expected, Seed::from(["blabli", "blu"]).into_blocks());
        let strings = vec!["blabli".to_string(), "blu".to_string()];
        assert_eq!(expected, Seed::from(strings).into_blocks());
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!("626c75", SeedBlock::from("blu").to_string());
        assert_eq!("", SeedBlock::from(Vec::<u8>::new()).to_string());
    }
}
