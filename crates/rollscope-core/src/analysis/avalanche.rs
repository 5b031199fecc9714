//! Strict avalanche test.
//!
//! Rolling hashes are path-dependent, so the effect of one flipped input bit
//! can only be observed by replaying the whole perturbed input through a
//! fresh roller. A reference input of `L` bytes costs `L × 8` full replays.

use serde::Serialize;

use crate::bits::{BitDeviation, DIGEST_BITS, ToleranceBand, bit_is_zero, flag_bits};
use super::CancelFlag;
use crate::roller::Algorithm;

/// `differed[i]` = perturbations for which output bit `i` changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvalancheCounters {
    differed: [u64; DIGEST_BITS],
    trials: u64,
}

impl AvalancheCounters {
    pub fn new() -> Self {
        Self {
            differed: [0; DIGEST_BITS],
            trials: 0,
        }
    }

    pub fn differed(&self, bit: usize) -> u64 {
        self.differed[bit]
    }

    pub fn as_array(&self) -> &[u64; DIGEST_BITS] {
        &self.differed
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }
}

impl Default for AvalancheCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulating state of an avalanche pass against a fixed reference digest.
#[derive(Debug, Clone)]
pub struct AvalancheAnalyzer {
    reference_digest: u32,
    counters: AvalancheCounters,
}

impl AvalancheAnalyzer {
    pub fn new(reference_digest: u32) -> Self {
        Self {
            reference_digest,
            counters: AvalancheCounters::new(),
        }
    }

    /// Record the digest of one perturbed replay.
    pub fn observe(&mut self, digest: u32) {
        for (i, differed) in self.counters.differed.iter_mut().enumerate() {
            if bit_is_zero(self.reference_digest, i) != bit_is_zero(digest, i) {
                *differed += 1;
            }
        }
        self.counters.trials += 1;
    }

    pub fn finish(self, band: ToleranceBand) -> AvalancheReport {
        let trials = self.counters.trials;
        AvalancheReport {
            reference_digest: self.reference_digest,
            trials,
            deviant_bits: flag_bits(self.counters.as_array(), trials, band),
            counters: self.counters,
        }
    }
}

/// Result of an avalanche pass.
#[derive(Debug, Clone, Serialize)]
pub struct AvalancheReport {
    /// Digest of the unperturbed reference input.
    pub reference_digest: u32,
    /// Number of single-bit perturbations replayed.
    pub trials: u64,
    pub counters: AvalancheCounters,
    /// Output bits whose change-fraction is outside the band.
    pub deviant_bits: Vec<BitDeviation>,
}

/// Number of single-bit perturbations of an input of `len` bytes.
pub fn trials_for(len: usize) -> u64 {
    len as u64 * 8
}

/// Digest after rolling all of `input` through a fresh roller.
pub fn digest_of(algorithm: &dyn Algorithm, input: &[u8]) -> u32 {
    let mut roller = algorithm.build();
    for &byte in input {
        roller.roll(byte);
    }
    roller.digest()
}

/// Run the strict avalanche test over `reference`.
///
/// The reference digest is computed first on a fresh roller. Then for every
/// byte `j` and bit `k` the input with `reference[j] ^ (1 << k)` is replayed
/// in full on another fresh roller and compared bit by bit.
pub fn avalanche_pass(
    algorithm: &dyn Algorithm,
    reference: &[u8],
    band: ToleranceBand,
) -> AvalancheReport {
    let mut analyzer = AvalancheAnalyzer::new(digest_of(algorithm, reference));
    for_each_perturbation(reference, |perturbed| {
        analyzer.observe(digest_of(algorithm, perturbed));
        true
    });
    analyzer.finish(band)
}

/// [`avalanche_pass`] that checks `cancel` before every replay and returns
/// `None` when it is set.
pub fn avalanche_pass_cancellable(
    algorithm: &dyn Algorithm,
    reference: &[u8],
    band: ToleranceBand,
    cancel: &CancelFlag,
) -> Option<AvalancheReport> {
    if cancel.is_cancelled() {
        return None;
    }
    let mut analyzer = AvalancheAnalyzer::new(digest_of(algorithm, reference));
    let completed = for_each_perturbation(reference, |perturbed| {
        if cancel.is_cancelled() {
            return false;
        }
        analyzer.observe(digest_of(algorithm, perturbed));
        true
    });
    completed.then(|| analyzer.finish(band))
}

/// Call `f` with every single-bit flip of `reference`, byte-major then bit
/// ascending. Stops early and returns `false` as soon as `f` does.
fn for_each_perturbation(reference: &[u8], mut f: impl FnMut(&[u8]) -> bool) -> bool {
    let mut perturbed = reference.to_vec();
    for j in 0..perturbed.len() {
        for k in 0..8 {
            let mask = 1u8 << k;
            perturbed[j] ^= mask;
            if !f(&perturbed) {
                return false;
            }
            perturbed[j] ^= mask;
        }
    }
    true
}
