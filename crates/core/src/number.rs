//! Pluggable numeric type for counting and sampling (C9).
//!
//! The construction engine itself is numeric-type-agnostic; [`count::count`]
//! is generic over [`Count`], with three concrete bindings: `u64`
//! (overflow-checked machine integer), `f64`, and `num_bigint::BigUint`
//! (arbitrary precision). Per `DESIGN.md`'s Open Question resolution, this
//! rewrite drops the original's conditionally-compiled hand-rolled bignum in
//! favour of a single `num-bigint` binding.

use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::zdd::NodeId;

/// A semiring-like numeric type usable as a ZDD solution count: has an
/// additive identity, a multiplicative identity (the accept terminal's
/// count), checked addition (for the machine-integer binding), and a way to
/// turn a `hi`/`lo` pair into a sampling probability.
pub trait Count: Clone {
    /// `count(0)`.
    fn zero() -> Self;

    /// `count(1)`.
    fn one() -> Self;

    /// `count(lo) + count(hi)`, raising [`Error::CountOverflow`] for the
    /// overflow-checked binding (`u64`); infallible for `f64`/`BigUint`.
    fn checked_add(&self, other: &Self, node: NodeId) -> Result<Self>;

    /// `P(take hi)` for uniform-random sampling at a node with the given
    /// child counts: `count(hi) / (count(lo) + count(hi))`. `BigUint`
    /// computes this through a lossless integer division before converting
    /// to `f64` for the coin flip, rather than truncating each operand to
    /// `f64` first and dividing approximate values.
    fn hi_probability(lo: &Self, hi: &Self) -> f64;

    /// Decimal rendering of the count, used for CLI/test output regardless
    /// of the numeric binding in use.
    fn to_decimal_string(&self) -> String;
}

impl Count for u64 {
    fn zero() -> Self {
        0
    }

    fn one() -> Self {
        1
    }

    fn checked_add(&self, other: &Self, node: NodeId) -> Result<Self> {
        self.checked_add(*other).ok_or(Error::CountOverflow { node: node.0 })
    }

    fn hi_probability(lo: &Self, hi: &Self) -> f64 {
        let total = lo + hi;
        if total == 0 {
            0.0
        } else {
            *hi as f64 / total as f64
        }
    }

    fn to_decimal_string(&self) -> String {
        self.to_string()
    }
}

impl Count for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn checked_add(&self, other: &Self, _node: NodeId) -> Result<Self> {
        Ok(self + other)
    }

    fn hi_probability(lo: &Self, hi: &Self) -> f64 {
        let total = lo + hi;
        if total == 0.0 {
            0.0
        } else {
            hi / total
        }
    }

    fn to_decimal_string(&self) -> String {
        format!("{self}")
    }
}

impl Count for BigUint {
    fn zero() -> Self {
        BigUint::from(0u32)
    }

    fn one() -> Self {
        BigUint::from(1u32)
    }

    fn checked_add(&self, other: &Self, _node: NodeId) -> Result<Self> {
        Ok(self + other)
    }

    fn hi_probability(lo: &Self, hi: &Self) -> f64 {
        let total = lo + hi;
        if total == BigUint::from(0u32) {
            return 0.0;
        }
        // Scale hi up before the integer divide so the truncation happens on
        // a ratio rather than on `hi`/`total` individually, keeping the
        // result accurate even when both operands dwarf `f64`'s mantissa.
        const SCALE: u64 = 1_000_000_000_000;
        let scaled = (hi * SCALE) / &total;
        scaled.to_string().parse::<f64>().unwrap_or(0.0) / SCALE as f64
    }

    fn to_decimal_string(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u64_overflow_is_reported() {
        let err = u64::MAX.checked_add(&1, NodeId(7)).unwrap_err();
        assert!(matches!(err, Error::CountOverflow { node: 7 }));
    }

    #[test]
    fn hi_probability_is_uniform_split_for_equal_counts() {
        assert!((u64::hi_probability(&3, &3) - 0.5).abs() < 1e-9);
        assert!((f64::hi_probability(&3.0, &3.0) - 0.5).abs() < 1e-9);
        assert!((BigUint::hi_probability(&BigUint::from(3u32), &BigUint::from(3u32)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn hi_probability_handles_huge_biguint_counts() {
        let hi = BigUint::from(10u32).pow(40);
        let lo = BigUint::from(10u32).pow(40) * 3u32;
        let p = BigUint::hi_probability(&lo, &hi);
        assert!((p - 0.25).abs() < 1e-3);
    }

    #[test]
    fn zero_total_probability_is_zero() {
        assert_eq!(u64::hi_probability(&0, &0), 0.0);
    }
}
