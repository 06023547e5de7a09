use std::{fmt::Display, str::FromStr};

use itertools::Itertools;

use crate::{seed::SeedBlock, PrgError};

/// Everything needed to rebuild a generator: the strategy, its parameters and
/// the ordered seed history.
///
/// It is printed as
///
/// ```text
/// sparkle512-sponge(steps=8, rate=32) [0x626c61626c69, 0x626c75]
/// ```
///
/// with the blocks hex encoded, and parsed back with [`FromStr`]. The `0x`
/// prefix keeps an empty block apart from an empty history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub strategy: String,
    pub parameters: Vec<(String, usize)>,
    pub blocks: Vec<SeedBlock>,
}

impl Display for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}) [{}]",
            self.strategy,
            self.parameters
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .join(", "),
            self.blocks.iter().map(|b| format!("0x{b}")).join(", ")
        )
    }
}

fn malformed(s: &str, reason: &str) -> PrgError {
    PrgError::DescriptionError(format!("{reason} in {s:?}"))
}

impl FromStr for Descriptor {
    type Err = PrgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (strategy, rest) = s
            .trim()
            .split_once('(')
            .ok_or_else(|| malformed(s, "missing '('"))?;
        let (parameters, rest) = rest
            .split_once(')')
            .ok_or_else(|| malformed(s, "missing ')'"))?;
        let blocks = rest
            .trim()
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .ok_or_else(|| malformed(s, "seed blocks must be enclosed in []"))?;

        let strategy = strategy.trim();
        if strategy.is_empty() {
            return Err(malformed(s, "missing strategy name"));
        }

        let parameters = parameters
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| -> Result<(String, usize), PrgError> {
                let (k, v) = p
                    .split_once('=')
                    .ok_or_else(|| malformed(s, "parameters must read key=value"))?;
                Ok((k.trim().to_string(), v.trim().parse::<usize>()?))
            })
            .collect::<Result<Vec<_>, PrgError>>()?;

        let blocks = if blocks.trim().is_empty() {
            vec![]
        } else {
            blocks
                .split(',')
                .map(|b| -> Result<SeedBlock, PrgError> {
                    let b = b
                        .trim()
                        .strip_prefix("0x")
                        .ok_or_else(|| malformed(s, "seed blocks must start with 0x"))?;
                    Ok(hex::decode(b)?.into())
                })
                .collect::<Result<Vec<_>, PrgError>>()?
        };

        Ok(Self {
            strategy: strategy.to_string(),
            parameters,
            blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Descriptor;
    use crate::{seed::SeedBlock, PrgError};

    fn sample() -> Descriptor {
        Descriptor {
            strategy: "sparkle512-sponge".to_string(),
            parameters: vec![("steps".to_string(), 8), ("rate".to_string(), 32)],
            blocks: vec![SeedBlock::from("blabli"), SeedBlock::from("blu")],
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            "sparkle512-sponge(steps=8, rate=32) [0x626c61626c69, 0x626c75]",
            sample().to_string()
        );
        let empty = Descriptor {
            strategy: "sha256-counter".to_string(),
            parameters: vec![],
            blocks: vec![],
        };
        assert_eq!("sha256-counter() []", empty.to_string());
    }

    #[test]
    fn test_parse_printed_form() {
        let d = sample();
        assert_eq!(d, d.to_string().parse::<Descriptor>().unwrap());
        let d: Descriptor = "  sha256-counter( ) [ ]  ".parse().unwrap();
        assert_eq!("sha256-counter", d.strategy);
        assert!(d.parameters.is_empty());
        assert!(d.blocks.is_empty());
    }

    #[test]
    fn test_empty_blocks() {
        let d: Descriptor = "sha256-counter() [0x626c75, 0x]".parse().unwrap();
        let empty = SeedBlock::from(Vec::<u8>::new());
        assert_eq!(vec![SeedBlock::from("blu"), empty.clone()], d.blocks);
        let d: Descriptor = "sha256-counter() [0x]".parse().unwrap();
        assert_eq!(vec![empty], d.blocks);
        assert_eq!("sha256-counter() [0x]", d.to_string());
    }

    #[test]
    fn test_malformed() {
        for s in [
            "sha256-counter [00]",
            "sha256-counter(",
            "sha256-counter() 00",
            "(steps=8) []",
            "sparkle512-sponge(steps) []",
            "sparkle512-sponge(steps=eight) []",
            "sha256-counter() [626c75]",
        ] {
            assert!(
                matches!(s.parse::<Descriptor>(), Err(PrgError::DescriptionError(_))),
                "{s}"
            );
        }
        assert!(matches!(
            "sha256-counter() [0xzz]".parse::<Descriptor>(),
            Err(PrgError::HexParseError(_))
        ));
    }
}
