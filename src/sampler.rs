//! Uniform sampling of integers in `[lower, upper)` by rejection.
//!
//! For a range of size `r`, an attempt draws `n = ceil(log2(r))` bits: the
//! whole bytes first, most significant first, then one last byte masked down
//! to the `n mod 8` remaining bits. That last byte is drawn even when no bit
//! is left, so every attempt consumes `n / 8 + 1` bytes. The candidate is
//! accepted if it is below `r`, which happens with probability above 1/2.
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::One;
use tracing::trace;

use crate::PrgError;

/// A stream of pseudo random bytes
pub trait ByteSource {
    fn next_byte(&mut self) -> u8;
}

/// Integer types that can be sampled uniformly between two bounds
pub trait UniformBound: Sized {
    /// Return `d` such that `lower <= d < upper`, uniformly distributed.
    ///
    /// Fails with [`PrgError::InvalidRange`] if `upper <= lower`, in which
    /// case no byte is drawn.
    fn sample<S: ByteSource + ?Sized>(
        source: &mut S,
        lower: &Self,
        upper: &Self,
    ) -> Result<Self, PrgError>;
}

#[inline]
fn low_mask(bits: u32) -> u8 {
    debug_assert!(bits < 8);
    ((1_u16 << bits) - 1) as u8
}

/// Bits needed to write any value of `[0, range)`, for `range >= 1`
#[inline]
fn bit_length_u128(range: u128) -> u32 {
    u128::BITS - (range - 1).leading_zeros()
}

fn draw_u128<S: ByteSource + ?Sized>(source: &mut S, n_bits: u32) -> u128 {
    let mut candidate = 0_u128;
    let mut remaining = n_bits;
    while remaining >= 8 {
        candidate = (candidate << 8) | u128::from(source.next_byte());
        remaining -= 8;
    }
    let last = source.next_byte() & low_mask(remaining);
    (candidate << remaining) | u128::from(last)
}

/// Sample `[0, range)` for `range >= 1`
pub(crate) fn below_u128<S: ByteSource + ?Sized>(source: &mut S, range: u128) -> u128 {
    let n_bits = bit_length_u128(range);
    loop {
        let candidate = draw_u128(source, n_bits);
        if candidate < range {
            return candidate;
        }
        trace!("rejected {candidate} >= {range}");
    }
}

fn draw_big<S: ByteSource + ?Sized>(source: &mut S, n_bits: u64) -> BigUint {
    let full_bytes = (n_bits / 8) as usize;
    let remaining = (n_bits % 8) as u32;
    let bytes: Vec<u8> = (0..full_bytes).map(|_| source.next_byte()).collect();
    let last = source.next_byte() & low_mask(remaining);
    (BigUint::from_bytes_be(&bytes) << remaining) | BigUint::from(last)
}

/// Sample `[0, range)` for `range >= 1`
pub(crate) fn below_big<S: ByteSource + ?Sized>(source: &mut S, range: &BigUint) -> BigUint {
    let n_bits = (range - 1_u32).bits();
    loop {
        let candidate = draw_big(source, n_bits);
        if &candidate < range {
            return candidate;
        }
        trace!("rejected a {n_bits} bits candidate");
    }
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {$(
        impl UniformBound for $t {
            fn sample<S: ByteSource + ?Sized>(
                source: &mut S,
                lower: &Self,
                upper: &Self,
            ) -> Result<Self, PrgError> {
                if upper <= lower {
                    return Err(PrgError::invalid_range(lower, upper));
                }
                let range = (*upper - *lower) as u128;
                // the offset is below `upper - lower` so it fits in Self
                Ok(*lower + below_u128(source, range) as $t)
            }
        }
    )*};
}

impl_unsigned!(u8, u16, u32, u64, u128, usize);

macro_rules! impl_signed {
    ($($t:ty => $u:ty),*) => {$(
        impl UniformBound for $t {
            fn sample<S: ByteSource + ?Sized>(
                source: &mut S,
                lower: &Self,
                upper: &Self,
            ) -> Result<Self, PrgError> {
                if upper <= lower {
                    return Err(PrgError::invalid_range(lower, upper));
                }
                // two's complement difference, exact once read as unsigned
                let range = (*upper).wrapping_sub(*lower) as $u as u128;
                Ok((*lower).wrapping_add(below_u128(source, range) as $t))
            }
        }
    )*};
}

impl_signed!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, i128 => u128, isize => usize);

impl UniformBound for BigUint {
    fn sample<S: ByteSource + ?Sized>(
        source: &mut S,
        lower: &Self,
        upper: &Self,
    ) -> Result<Self, PrgError> {
        if upper <= lower {
            return Err(PrgError::invalid_range(lower, upper));
        }
        Ok(lower + below_big(source, &(upper - lower)))
    }
}

impl UniformBound for BigInt {
    fn sample<S: ByteSource + ?Sized>(
        source: &mut S,
        lower: &Self,
        upper: &Self,
    ) -> Result<Self, PrgError> {
        if upper <= lower {
            return Err(PrgError::invalid_range(lower, upper));
        }
        let (sign, range) = (upper - lower).into_parts();
        debug_assert_eq!(Sign::Plus, sign);
        Ok(lower + BigInt::from(below_big(source, &range)))
    }
}

/// `2^bits`, the exclusive upper bound of a `bits` wide draw
#[must_use]
pub fn full_width_bound(bits: usize) -> BigUint {
    BigUint::one() << bits
}

#[cfg(test)]
mod tests {
    use num_bigint::{BigInt, BigUint};

    use super::{bit_length_u128, ByteSource, UniformBound};
    use crate::PrgError;

    /// Replays a fixed script of bytes, counting reads
    struct Script {
        bytes: Vec<u8>,
        read: usize,
    }

    impl Script {
        fn new(bytes: &[u8]) -> Self {
            Self {
                bytes: bytes.to_vec(),
                read: 0,
            }
        }
    }

    impl ByteSource for Script {
        fn next_byte(&mut self) -> u8 {
            let b = self.bytes[self.read];
            self.read += 1;
            b
        }
    }

    #[test]
    fn test_bit_length() {
        assert_eq!(0, bit_length_u128(1));
        assert_eq!(1, bit_length_u128(2));
        assert_eq!(2, bit_length_u128(3));
        assert_eq!(3, bit_length_u128(6));
        assert_eq!(8, bit_length_u128(256));
        assert_eq!(9, bit_length_u128(257));
        assert_eq!(128, bit_length_u128(u128::MAX));
    }

    #[test]
    fn test_most_significant_byte_first() {
        // 12 bits: one full byte then the low nibble of the next one
        let mut source = Script::new(&[0xAB, 0xFC]);
        let d = u32::sample(&mut source, &0, &4096).unwrap();
        assert_eq!(0xABC, d);
        assert_eq!(2, source.read);
    }

    #[test]
    fn test_power_of_two_draws_one_extra_byte() {
        let mut source = Script::new(&[0x42, 0xFF, 0x17, 0x00]);
        assert_eq!(0x42, u16::sample(&mut source, &0, &256).unwrap());
        assert_eq!(2, source.read);
        assert_eq!(0x17 + 10, u16::sample(&mut source, &10, &266).unwrap());
        assert_eq!(4, source.read);
    }

    #[test]
    fn test_degenerate_range_still_draws_a_byte() {
        let mut source = Script::new(&[0xFF, 0xFF]);
        assert_eq!(7, u8::sample(&mut source, &7, &8).unwrap());
        assert_eq!(1, source.read);
        assert_eq!(-3, i64::sample(&mut source, &-3, &-2).unwrap());
        assert_eq!(2, source.read);
    }

    #[test]
    fn test_rejection_restarts_from_scratch() {
        // range 6 draws 3 bits: 7 and 6 are rejected, 5 is accepted
        let mut source = Script::new(&[0x07, 0xFE, 0x05]);
        assert_eq!(105, u64::sample(&mut source, &100, &106).unwrap());
        assert_eq!(3, source.read);
    }

    #[test]
    fn test_invalid_range_draws_nothing() {
        let mut source = Script::new(&[]);
        assert!(matches!(
            u32::sample(&mut source, &5, &5),
            Err(PrgError::InvalidRange { .. })
        ));
        assert!(matches!(
            i32::sample(&mut source, &10, &3),
            Err(PrgError::InvalidRange { .. })
        ));
        let err = BigUint::sample(&mut source, &BigUint::from(3_u32), &BigUint::from(3_u32))
            .unwrap_err();
        assert_eq!(
            "Invalid range: upper bound 3 must be strictly greater than lower bound 3",
            err.to_string()
        );
        assert_eq!(0, source.read);
    }

    fn near_max_script() -> Script {
        // 128 bits candidate u128::MAX - 2, then the extra masked byte
        let mut bytes = vec![0xFF_u8; 15];
        bytes.extend_from_slice(&[0xFD, 0xFF]);
        Script::new(&bytes)
    }

    #[test]
    fn test_full_unsigned_range() {
        let mut source = near_max_script();
        let d = u128::sample(&mut source, &1, &u128::MAX).unwrap();
        assert_eq!(u128::MAX - 1, d);
        assert_eq!(17, source.read);
    }

    #[test]
    fn test_signed_range_across_zero() {
        let mut source = Script::new(&[0x00, 0x05, 0x09]);
        // range 10 draws 4 bits
        assert_eq!(-5, i8::sample(&mut source, &-5, &5).unwrap());
        assert_eq!(0, i8::sample(&mut source, &-5, &5).unwrap());
        assert_eq!(4, i8::sample(&mut source, &-5, &5).unwrap());
        let mut source = near_max_script();
        let d = i128::sample(&mut source, &i128::MIN, &i128::MAX).unwrap();
        assert_eq!(i128::MAX - 2, d);
        let mut source = Script::new(&[0xC8, 0x00]);
        // 200 above i8::MIN, the range 255 draws 8 bits
        assert_eq!(72, i8::sample(&mut source, &i8::MIN, &i8::MAX).unwrap());
    }

    #[test]
    fn test_big_matches_primitive() {
        let bytes = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22];
        let mut small = Script::new(&bytes);
        let mut big = Script::new(&bytes);
        let mut signed = Script::new(&bytes);
        let lower = 1_u64 << 20;
        let upper = (1_u64 << 40) + 12_345;
        let a = u64::sample(&mut small, &lower, &upper).unwrap();
        let b = BigUint::sample(&mut big, &BigUint::from(lower), &BigUint::from(upper)).unwrap();
        let c = BigInt::sample(&mut signed, &BigInt::from(lower), &BigInt::from(upper)).unwrap();
        assert_eq!(BigUint::from(a), b);
        assert_eq!(BigInt::from(a), c);
        assert_eq!(small.read, big.read);
        assert_eq!(small.read, signed.read);
    }
}
