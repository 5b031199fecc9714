//! Throughput measurement: one roll+digest pass over the sample buffer.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::{CANCEL_CHECK_BYTES, CancelFlag};
use crate::roller::{Algorithm, Roller};

/// Outcome of a timing pass.
#[derive(Debug, Clone, Serialize)]
pub struct TimingResult {
    /// Bytes rolled.
    pub bytes: usize,
    /// Wall-clock time for the whole pass, roller construction excluded.
    pub elapsed: Duration,
    /// XOR of every digest produced during the pass.
    pub digest_fold: u32,
}

impl TimingResult {
    pub fn bytes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.bytes as f64 / secs
        } else {
            0.0
        }
    }

    pub fn nanos_per_byte(&self) -> f64 {
        if self.bytes == 0 {
            0.0
        } else {
            self.elapsed.as_nanos() as f64 / self.bytes as f64
        }
    }
}

/// Time `roll(byte)` + `digest()` for every byte of `data` on a fresh roller.
///
/// Every digest is folded into [`TimingResult::digest_fold`], so none of the
/// per-byte work can be discarded.
pub fn time_pass(algorithm: &dyn Algorithm, data: &[u8]) -> TimingResult {
    let mut roller = algorithm.build();

    let start = Instant::now();
    let fold = roll_and_fold(roller.as_mut(), data);
    let elapsed = start.elapsed();

    TimingResult {
        bytes: data.len(),
        elapsed,
        digest_fold: fold,
    }
}

/// [`time_pass`] that checks `cancel` once per [`CANCEL_CHECK_BYTES`] and
/// returns `None` when it is set.
pub fn time_pass_cancellable(
    algorithm: &dyn Algorithm,
    data: &[u8],
    cancel: &CancelFlag,
) -> Option<TimingResult> {
    let mut roller = algorithm.build();
    let mut fold = 0u32;

    let start = Instant::now();
    for chunk in data.chunks(CANCEL_CHECK_BYTES) {
        if cancel.is_cancelled() {
            return None;
        }
        fold ^= roll_and_fold(roller.as_mut(), chunk);
    }
    let elapsed = start.elapsed();

    Some(TimingResult {
        bytes: data.len(),
        elapsed,
        digest_fold: fold,
    })
}

fn roll_and_fold(roller: &mut dyn Roller, data: &[u8]) -> u32 {
    let mut fold = 0u32;
    for &byte in data {
        roller.roll(byte);
        fold ^= roller.digest();
    }
    fold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roller::FnAlgorithm;

    struct LastByte(u8);

    impl Roller for LastByte {
        fn roll(&mut self, byte: u8) {
            self.0 = byte;
        }

        fn digest(&self) -> u32 {
            self.0 as u32
        }
    }

    #[test]
    fn fold_consumes_every_digest() {
        let algo = FnAlgorithm::custom("last", "", || Box::new(LastByte(0)));
        let result = time_pass(&algo, &[1, 2, 4, 8]);
        assert_eq!(result.bytes, 4);
        assert_eq!(result.digest_fold, 1 ^ 2 ^ 4 ^ 8);
    }

    #[test]
    fn empty_buffer() {
        let algo = FnAlgorithm::custom("last", "", || Box::new(LastByte(0)));
        let result = time_pass(&algo, &[]);
        assert_eq!(result.bytes, 0);
        assert_eq!(result.digest_fold, 0);
        assert_eq!(result.nanos_per_byte(), 0.0);
    }

    #[test]
    fn throughput_is_derived_from_elapsed() {
        let result = TimingResult {
            bytes: 1_000,
            elapsed: Duration::from_millis(500),
            digest_fold: 0,
        };
        assert!((result.bytes_per_second() - 2_000.0).abs() < 1e-6);
        assert!((result.nanos_per_byte() - 500_000.0).abs() < 1e-6);
    }

    #[test]
    fn cancellable_pass_matches_plain_pass() {
        let algo = FnAlgorithm::custom("last", "", || Box::new(LastByte(0)));
        let data: Vec<u8> = (0..3 * CANCEL_CHECK_BYTES + 17).map(|i| i as u8).collect();
        let plain = time_pass(&algo, &data);
        let chunked = time_pass_cancellable(&algo, &data, &CancelFlag::new()).unwrap();
        assert_eq!(chunked.bytes, plain.bytes);
        assert_eq!(chunked.digest_fold, plain.digest_fold);
    }

    #[test]
    fn cancelled_timing_pass_stops_at_chunk_boundary() {
        let cancel = CancelFlag::new();
        let trigger = cancel.clone();
        let algo = FnAlgorithm::custom("last", "", || Box::new(LastByte(0)));
        let data = vec![0u8; 4 * CANCEL_CHECK_BYTES];
        trigger.cancel();
        assert!(time_pass_cancellable(&algo, &data, &cancel).is_none());
    }
}
