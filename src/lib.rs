mod wide;

/// A `ReciprocalValue64` represents an integer (floored) division
/// by any non-zero `u64`.
///
/// Once constructed for a given `d`, `apply`ing a `ReciprocalValue64`
/// to a `u64` computes an integer division of that argument by `d`.
/// The parameters represent an expression of the form
///   `t = (x * m) >> 64; f(x) = (t + ((x - t) >> sh1)) >> sh2`
/// where only the multiplication needs 128 bits.  That's the
/// two-shift sequence of Granlund and Montgomery's
/// [Division by invariant integers using multiplication](https://gmplib.org/~tege/divcnst-pldi94.pdf),
/// section 4: the multiplier approximates `2**(64 + l) / d` with
/// `l = ceil(log_2(d))`, and is one bit too short to fit in a `u64`;
/// the `(x - t) >> sh1` step adds that missing bit back in without
/// overflowing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReciprocalValue64 {
    m: u64,
    sh1: u8,
    sh2: u8,
}

/// A `Divisor64` pairs a non-zero `u64` with its `ReciprocalValue64`,
/// so that remainders can't be computed against the wrong divisor.
///
/// `u64 / Divisor64` and `u64 % Divisor64` work as expected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Divisor64 {
    d: u64,
    recip: ReciprocalValue64,
}

impl ReciprocalValue64 {
    /// Constructs a `ReciprocalValue64` that computes a floored
    /// division by `d`.
    ///
    /// Returns `None` if `d == 0`.
    pub fn new(d: u64) -> Option<ReciprocalValue64> {
        if d == 0 {
            return None;
        }

        // l = ceil(log_2(d)) for d > 1, and 0 for d == 1.
        let l = wide::fls64(d - 1);
        assert!(l <= 64);

        // 2**l - d, without overflowing when l == 64 (d > 2**63).
        // Since 2**(l - 1) < d <= 2**l, this is always less than d.
        let excess = 1u64.checked_shl(l).unwrap_or(0).wrapping_sub(d);
        assert!(excess < d);

        // m = floor(2**64 * (2**l - d) / d) + 1, truncated to 64 bits.
        // The quotient fits in a u64 because excess < d.
        let (scale, _) = wide::narrowing_div_rem(excess, 0, d);

        Some(ReciprocalValue64 {
            m: scale.wrapping_add(1),
            sh1: l.min(1) as u8,
            sh2: l.saturating_sub(1) as u8,
        })
    }

    /// Returns the fixed-point multiplier `m`.
    #[inline]
    #[must_use]
    pub fn multiplier(self) -> u64 {
        self.m
    }

    /// Returns the first correction shift, 0 or 1.
    #[inline]
    #[must_use]
    pub fn sh1(self) -> u8 {
        self.sh1
    }

    /// Returns the final shift, in `0..64`.
    #[inline]
    #[must_use]
    pub fn sh2(self) -> u8 {
        self.sh2
    }

    /// Computes `x / d`, where `d` is the divisor for which this
    /// reciprocal was constructed.
    #[inline]
    #[must_use]
    pub fn apply(self, x: u64) -> u64 {
        let t = wide::mul_hi(x, self.m);
        debug_assert!(t <= x);

        (t + ((x - t) >> self.sh1)) >> self.sh2
    }

    /// Computes `x % d`.
    ///
    /// `d` must be the divisor for which this reciprocal was
    /// constructed; that's not checked, and any other value yields
    /// a meaningless (but well defined) result.
    #[inline]
    #[must_use]
    pub fn remainder(self, x: u64, d: u64) -> u64 {
        let quot = self.apply(x);
        let mut rem = x.wrapping_sub(quot.wrapping_mul(d));

        if rem >= d {
            rem -= d;
        }

        rem
    }
}

/// Computes the `ReciprocalValue64` for `d`.
///
/// # Panics
///
/// Panics if `d == 0`.  Use `ReciprocalValue64::new` to get an
/// `Option` instead.
pub fn compute_reciprocal(d: u64) -> ReciprocalValue64 {
    match ReciprocalValue64::new(d) {
        Some(recip) => recip,
        None => panic!("reciprocal of a zero divisor"),
    }
}

/// Computes `a / d`, where `recip` was constructed for `d`.
#[inline]
#[must_use]
pub fn reciprocal_divide(a: u64, recip: ReciprocalValue64) -> u64 {
    recip.apply(a)
}

/// Computes `a % d`, where `recip` was constructed for `d`.
///
/// The relationship between `d` and `recip` is not checked.
#[inline]
#[must_use]
pub fn reciprocal_remainder(a: u64, d: u64, recip: ReciprocalValue64) -> u64 {
    recip.remainder(a, d)
}

impl Divisor64 {
    /// Returns `None` if `d == 0`.
    pub fn new(d: u64) -> Option<Divisor64> {
        let recip = ReciprocalValue64::new(d)?;

        Some(Divisor64 { d, recip })
    }

    /// Returns the divisor.
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.d
    }

    #[inline]
    #[must_use]
    pub fn reciprocal(self) -> ReciprocalValue64 {
        self.recip
    }

    #[inline]
    #[must_use]
    pub fn quotient(self, x: u64) -> u64 {
        self.recip.apply(x)
    }

    #[inline]
    #[must_use]
    pub fn remainder(self, x: u64) -> u64 {
        self.recip.remainder(x, self.d)
    }

    /// Returns `(x / d, x % d)` with a single multiplication.
    #[inline]
    #[must_use]
    pub fn div_rem(self, x: u64) -> (u64, u64) {
        let quot = self.recip.apply(x);

        // apply is exact, so no correction is needed here.
        (quot, x - quot * self.d)
    }
}

impl core::ops::Div<Divisor64> for u64 {
    type Output = u64;

    #[inline]
    fn div(self, rhs: Divisor64) -> u64 {
        rhs.quotient(self)
    }
}

impl core::ops::Rem<Divisor64> for u64 {
    type Output = u64;

    #[inline]
    fn rem(self, rhs: Divisor64) -> u64 {
        rhs.remainder(self)
    }
}
