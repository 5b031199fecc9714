//! Bit-level helpers and the fixed tolerance band shared by all analyzers.

use serde::Serialize;

/// Width of every analyzed digest.
pub const DIGEST_BITS: usize = 32;

/// Number of `(i, j)` pairs with `0 <= i < j < DIGEST_BITS`.
pub const DIGEST_BIT_PAIRS: usize = DIGEST_BITS * (DIGEST_BITS - 1) / 2;

/// Whether bit `i` (0 = least significant) of `digest` is zero.
#[inline]
pub fn bit_is_zero(digest: u32, i: usize) -> bool {
    digest & (1 << i) == 0
}

/// Whether bits `i` and `j` of `digest` hold the same value.
#[inline]
pub fn bits_equal(digest: u32, i: usize, j: usize) -> bool {
    bit_is_zero(digest, i) == bit_is_zero(digest, j)
}

/// `count / total`, or 0.0 for an empty pass.
#[inline]
pub fn fraction(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Open interval around the 50% ideal inside which a fraction counts as
/// "no significant deviation".
///
/// The band is a fixed heuristic and is not derived from the sample size.
/// Both ends are exclusive for flagging: a fraction of exactly `low` or
/// exactly `high` is not flagged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToleranceBand {
    pub low: f64,
    pub high: f64,
}

impl ToleranceBand {
    /// The 49%–51% band.
    pub const STANDARD: Self = Self {
        low: 0.49,
        high: 0.51,
    };

    /// Whether `fraction` lies strictly outside the band.
    #[inline]
    pub fn is_flagged(&self, fraction: f64) -> bool {
        fraction < self.low || fraction > self.high
    }
}

impl Default for ToleranceBand {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// A single output bit whose fraction fell outside the band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BitDeviation {
    pub bit: usize,
    pub fraction: f64,
}

impl BitDeviation {
    pub fn percent(&self) -> f64 {
        100.0 * self.fraction
    }
}

/// A pair of output bits whose agreement fraction fell outside the band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairDeviation {
    pub bit_a: usize,
    pub bit_b: usize,
    pub fraction: f64,
}

impl PairDeviation {
    pub fn percent(&self) -> f64 {
        100.0 * self.fraction
    }
}

/// Flag every per-bit counter whose fraction of `total` is outside `band`.
pub fn flag_bits(counts: &[u64; DIGEST_BITS], total: u64, band: ToleranceBand) -> Vec<BitDeviation> {
    counts
        .iter()
        .enumerate()
        .map(|(bit, &c)| BitDeviation {
            bit,
            fraction: fraction(c, total),
        })
        .filter(|d| band.is_flagged(d.fraction))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_zero_is_least_significant() {
        assert!(!bit_is_zero(1, 0));
        assert!(bit_is_zero(1, 1));
        assert!(!bit_is_zero(0x8000_0000, 31));
        assert!(bit_is_zero(0x7FFF_FFFF, 31));
    }

    #[test]
    fn bits_equal_both_zero_or_both_one() {
        assert!(bits_equal(0b00, 0, 1));
        assert!(bits_equal(0b11, 0, 1));
        assert!(!bits_equal(0b01, 0, 1));
        assert!(!bits_equal(0b10, 0, 1));
    }

    #[test]
    fn pair_count() {
        assert_eq!(DIGEST_BIT_PAIRS, 496);
    }

    #[test]
    fn band_edges_are_not_flagged() {
        let band = ToleranceBand::STANDARD;
        assert!(!band.is_flagged(0.49));
        assert!(!band.is_flagged(0.51));
        assert!(!band.is_flagged(0.5));
    }

    #[test]
    fn just_outside_band_is_flagged() {
        let band = ToleranceBand::STANDARD;
        assert!(band.is_flagged(0.489999));
        assert!(band.is_flagged(0.510001));
        assert!(band.is_flagged(0.0));
        assert!(band.is_flagged(1.0));
    }

    #[test]
    fn exact_count_ratios_at_edges() {
        let band = ToleranceBand::default();
        assert!(!band.is_flagged(fraction(49, 100)));
        assert!(!band.is_flagged(fraction(51, 100)));
        assert!(band.is_flagged(fraction(48, 100)));
        assert!(band.is_flagged(fraction(52, 100)));
    }

    #[test]
    fn fraction_of_empty_pass() {
        assert_eq!(fraction(0, 0), 0.0);
    }

    #[test]
    fn flag_bits_reports_only_outliers() {
        let mut counts = [50u64; DIGEST_BITS];
        counts[3] = 10;
        counts[30] = 90;
        let flagged = flag_bits(&counts, 100, ToleranceBand::STANDARD);
        assert_eq!(flagged.len(), 2);
        assert_eq!(flagged[0].bit, 3);
        assert!((flagged[0].percent() - 10.0).abs() < 1e-9);
        assert_eq!(flagged[1].bit, 30);
    }
}
