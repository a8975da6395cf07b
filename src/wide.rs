//! Double-width (128-bit) arithmetic used by `ReciprocalValue64`.
//!
//! Only three primitives are needed: the bit length of a `u64`, the
//! high half of a 64x64 -> 128 multiplication, and a 128 / 64
//! division whose quotient is known to fit in 64 bits.  The native
//! backend leans on `u128`; the portable one works on `(hi, lo)`
//! pairs of `u64` for targets where `u128` lowers to library calls.

/// Returns the number of bits needed to represent `x`, i.e., the
/// 1-based index of its most significant set bit, or 0 for `x == 0`.
#[inline]
pub(crate) fn fls64(x: u64) -> u32 {
    64 - x.leading_zeros()
}

#[cfg(any(test, not(feature = "portable-wide")))]
pub(crate) mod native {
    /// Returns the high 64 bits of `x * y`.
    #[inline]
    pub(crate) fn mul_hi(x: u64, y: u64) -> u64 {
        ((x as u128 * y as u128) >> 64) as u64
    }

    /// Computes `((hi << 64) | lo) / d` and the matching remainder.
    ///
    /// The caller must ensure `hi < d` so the quotient fits in a u64.
    #[inline]
    pub(crate) fn narrowing_div_rem(hi: u64, lo: u64, d: u64) -> (u64, u64) {
        debug_assert!(hi < d);
        let num = ((hi as u128) << 64) | lo as u128;

        ((num / d as u128) as u64, (num % d as u128) as u64)
    }
}

#[cfg(any(test, feature = "portable-wide"))]
pub(crate) mod portable {
    /// Returns `(lo, hi)` for the full product `x * y`, built from
    /// four 32x32 -> 64 partial products.
    #[inline]
    pub(crate) fn mul_wide(x: u64, y: u64) -> (u64, u64) {
        let x_lo = x & 0xFFFF_FFFF;
        let x_hi = x >> 32;
        let y_lo = y & 0xFFFF_FFFF;
        let y_hi = y >> 32;

        let ll = x_lo * y_lo;
        let lh = x_lo * y_hi;
        let hl = x_hi * y_lo;
        let hh = x_hi * y_hi;

        // None of these sums can overflow: each partial product is at
        // most (2**32 - 1)**2 and we only add 32-bit halves to them.
        let mid = hl + (ll >> 32);
        let mid2 = lh + (mid & 0xFFFF_FFFF);

        let lo = (mid2 << 32) | (ll & 0xFFFF_FFFF);
        let hi = hh + (mid >> 32) + (mid2 >> 32);
        (lo, hi)
    }

    #[inline]
    pub(crate) fn mul_hi(x: u64, y: u64) -> u64 {
        mul_wide(x, y).1
    }

    /// Computes `((hi << 64) | lo) / d` and the matching remainder by
    /// restoring shift-subtract division, one quotient bit per step.
    ///
    /// The caller must ensure `hi < d` so the quotient fits in a u64.
    pub(crate) fn narrowing_div_rem(hi: u64, lo: u64, d: u64) -> (u64, u64) {
        debug_assert!(hi < d);

        // Loop invariant: rem < d.
        let mut rem = hi;
        let mut quot = 0u64;
        for i in (0..64).rev() {
            // The shift may push one bit out of `rem`; that bit is
            // worth 2**64 > d, so the subtraction below must happen,
            // and wrapping arithmetic yields the right remainder.
            let carry = rem >> 63;
            rem = (rem << 1) | ((lo >> i) & 1);
            quot <<= 1;

            if carry != 0 || rem >= d {
                rem = rem.wrapping_sub(d);
                quot |= 1;
            }
        }

        (quot, rem)
    }
}

#[cfg(not(feature = "portable-wide"))]
pub(crate) use native::{mul_hi, narrowing_div_rem};

#[cfg(feature = "portable-wide")]
pub(crate) use portable::{mul_hi, narrowing_div_rem};
