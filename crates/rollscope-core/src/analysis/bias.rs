//! Per-bit bias and pairwise-bit correlation over a stream of digests.

use serde::Serialize;

use crate::bits::{
    BitDeviation, DIGEST_BITS, PairDeviation, ToleranceBand, bit_is_zero, bits_equal, flag_bits,
    fraction,
};
use super::{CANCEL_CHECK_BYTES, CancelFlag};
use crate::roller::{Algorithm, Roller};

/// `zeroes[i]` = number of observed digests with bit `i` clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BiasCounters {
    zeroes: [u64; DIGEST_BITS],
    samples: u64,
}

impl BiasCounters {
    pub fn new() -> Self {
        Self {
            zeroes: [0; DIGEST_BITS],
            samples: 0,
        }
    }

    pub fn observe(&mut self, digest: u32) {
        for (i, zeroes) in self.zeroes.iter_mut().enumerate() {
            if bit_is_zero(digest, i) {
                *zeroes += 1;
            }
        }
        self.samples += 1;
    }

    pub fn zeroes(&self, bit: usize) -> u64 {
        self.zeroes[bit]
    }

    pub fn as_array(&self) -> &[u64; DIGEST_BITS] {
        &self.zeroes
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }
}

impl Default for BiasCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Strictly upper-triangular table: entry `(i, j)` with `i < j` counts
/// digests where bits `i` and `j` agree. Entries with `i >= j` do not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrelationCounters {
    /// Row-major 32×32 storage; only cells with `i < j` are ever written.
    equal: Vec<u64>,
    samples: u64,
}

impl CorrelationCounters {
    pub fn new() -> Self {
        Self {
            equal: vec![0; DIGEST_BITS * DIGEST_BITS],
            samples: 0,
        }
    }

    pub fn observe(&mut self, digest: u32) {
        for i in 0..DIGEST_BITS {
            for j in (i + 1)..DIGEST_BITS {
                if bits_equal(digest, i, j) {
                    self.equal[DIGEST_BITS * i + j] += 1;
                }
            }
        }
        self.samples += 1;
    }

    /// Agreement count for `(i, j)`, or `None` unless `i < j < 32`.
    pub fn get(&self, i: usize, j: usize) -> Option<u64> {
        (i < j && j < DIGEST_BITS).then(|| self.equal[DIGEST_BITS * i + j])
    }

    /// All `(i, j, count)` cells with `i < j`, in row-major order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, u64)> + '_ {
        (0..DIGEST_BITS).flat_map(move |i| {
            ((i + 1)..DIGEST_BITS).map(move |j| (i, j, self.equal[DIGEST_BITS * i + j]))
        })
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }
}

impl Default for CorrelationCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulating state of a bias/correlation pass.
///
/// `observe` every digest, then `finish` to threshold the counts. `finish`
/// consumes the analyzer, so a report always reflects a completed pass.
#[derive(Debug, Clone, Default)]
pub struct BiasAnalyzer {
    zeroes: BiasCounters,
    correlations: CorrelationCounters,
}

impl BiasAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, digest: u32) {
        self.zeroes.observe(digest);
        self.correlations.observe(digest);
    }

    /// Roll each byte of `data` through `roller`, observing the digest after
    /// every byte.
    pub fn observe_rolled(&mut self, roller: &mut dyn Roller, data: &[u8]) {
        for &byte in data {
            roller.roll(byte);
            self.observe(roller.digest());
        }
    }

    pub fn finish(self, band: ToleranceBand) -> BiasReport {
        let samples = self.zeroes.samples();
        let biased_bits = flag_bits(self.zeroes.as_array(), samples, band);
        let correlated_pairs = self
            .correlations
            .pairs()
            .map(|(bit_a, bit_b, count)| PairDeviation {
                bit_a,
                bit_b,
                fraction: fraction(count, samples),
            })
            .filter(|p| band.is_flagged(p.fraction))
            .collect();

        BiasReport {
            samples,
            zeroes: self.zeroes,
            correlations: self.correlations,
            biased_bits,
            correlated_pairs,
        }
    }
}

/// Result of a bias/correlation pass.
#[derive(Debug, Clone, Serialize)]
pub struct BiasReport {
    pub samples: u64,
    pub zeroes: BiasCounters,
    pub correlations: CorrelationCounters,
    /// Bits whose zero-fraction is outside the band, ascending by bit.
    pub biased_bits: Vec<BitDeviation>,
    /// Pairs whose agreement fraction is outside the band, row-major.
    pub correlated_pairs: Vec<PairDeviation>,
}

/// Roll every byte of `data` through a fresh roller and accumulate bias and
/// correlation counts over the digest after each byte.
pub fn bias_pass(algorithm: &dyn Algorithm, data: &[u8], band: ToleranceBand) -> BiasReport {
    let mut roller = algorithm.build();
    let mut analyzer = BiasAnalyzer::new();
    analyzer.observe_rolled(roller.as_mut(), data);
    analyzer.finish(band)
}

/// [`bias_pass`] that checks `cancel` once per [`CANCEL_CHECK_BYTES`] and
/// returns `None` when it is set.
pub fn bias_pass_cancellable(
    algorithm: &dyn Algorithm,
    data: &[u8],
    band: ToleranceBand,
    cancel: &CancelFlag,
) -> Option<BiasReport> {
    let mut roller = algorithm.build();
    let mut analyzer = BiasAnalyzer::new();
    for chunk in data.chunks(CANCEL_CHECK_BYTES) {
        if cancel.is_cancelled() {
            return None;
        }
        analyzer.observe_rolled(roller.as_mut(), chunk);
    }
    Some(analyzer.finish(band))
}
