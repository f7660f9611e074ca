use std::fmt::Debug;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// A fixed-width word used as a bit-vector of hours. Bit `i` of word `b`
/// is hour `b * BITS + i`.
pub trait Block:
    Copy
    + Eq
    + Default
    + Debug
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + Not<Output = Self>
    + BitAndAssign
    + BitOrAssign
{
    const BITS: u32;
    const ZERO: Self;
    const ONES: Self;

    /// Word with bits `lo..=hi` set. Requires `lo <= hi < BITS`.
    fn mask(lo: u32, hi: u32) -> Self;

    fn first_set(self) -> Option<u32>;

    fn count_ones(self) -> u32;

    fn to_word(self) -> u64;

    /// `None` if `word` does not fit.
    fn from_word(word: u64) -> Option<Self>;

    fn is_set(self, bit: u32) -> bool {
        self & Self::mask(bit, bit) != Self::ZERO
    }
}

macro_rules! impl_block {
    ($($t:ty),*) => {$(
        impl Block for $t {
            const BITS: u32 = <$t>::BITS;
            const ZERO: Self = 0;
            const ONES: Self = <$t>::MAX;

            #[inline]
            fn mask(lo: u32, hi: u32) -> Self {
                debug_assert!(lo <= hi && hi < Self::BITS);
                (Self::MAX >> (Self::BITS - 1 - hi)) & (Self::MAX << lo)
            }

            #[inline]
            fn first_set(self) -> Option<u32> {
                (self != 0).then(|| self.trailing_zeros())
            }

            #[inline]
            fn count_ones(self) -> u32 {
                <$t>::count_ones(self)
            }

            #[inline]
            fn to_word(self) -> u64 {
                u64::from(self)
            }

            #[inline]
            fn from_word(word: u64) -> Option<Self> {
                Self::try_from(word).ok()
            }
        }
    )*};
}

impl_block!(u32, u64);
