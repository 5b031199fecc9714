//! bup-style rollsum.
//!
//! Two running sums over a 64-byte window with every byte offset by 31:
//! `s1 = Σ (w[i] + 31)` and `s2 = Σ (64 - i)·(w[i] + 31) + K`, where `K` comes
//! from bup's initial state. Digest is `s1 << 16 | s2 & 0xffff`.

use crate::roller::{Algorithm, AlgorithmFamily, AlgorithmInfo, Roller};

use super::WINDOW_SIZE;

const CHAR_OFFSET: u32 = 31;

static ROLLSUM_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "rollsum",
    description: "bup/go4 rollsum: offset byte sums s1 and weighted s2 over a 64-byte window",
    family: AlgorithmFamily::Additive,
    digest_bits: 32,
    window_size: WINDOW_SIZE,
    hazard: None,
};

/// Registry entry for [`RollSumRoller`].
pub struct RollSum;

impl Algorithm for RollSum {
    fn info(&self) -> &AlgorithmInfo {
        &ROLLSUM_INFO
    }

    fn build(&self) -> Box<dyn Roller> {
        Box::new(RollSumRoller::new())
    }
}

pub struct RollSumRoller {
    s1: u32,
    s2: u32,
    window: [u8; WINDOW_SIZE],
    wofs: usize,
}

impl RollSumRoller {
    pub fn new() -> Self {
        let n = WINDOW_SIZE as u32;
        Self {
            s1: n * CHAR_OFFSET,
            s2: n * (n - 1) * CHAR_OFFSET,
            window: [0; WINDOW_SIZE],
            wofs: 0,
        }
    }
}

impl Default for RollSumRoller {
    fn default() -> Self {
        Self::new()
    }
}

impl Roller for RollSumRoller {
    fn roll(&mut self, byte: u8) {
        let drop = self.window[self.wofs] as u32;
        let add = byte as u32;
        self.s1 = self.s1.wrapping_add(add).wrapping_sub(drop);
        self.s2 = self.s2.wrapping_add(self.s1).wrapping_sub(
            (WINDOW_SIZE as u32).wrapping_mul(drop.wrapping_add(CHAR_OFFSET)),
        );
        self.window[self.wofs] = byte;
        self.wofs = (self.wofs + 1) & (WINDOW_SIZE - 1);
    }

    fn digest(&self) -> u32 {
        (self.s1 << 16) | (self.s2 & 0xffff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_digest() {
        let r = RollSumRoller::new();
        let s1 = 64 * 31u32;
        let s2 = 64 * 63 * 31u32;
        assert_eq!(r.digest(), (s1 << 16) | (s2 & 0xffff));
    }

    #[test]
    fn zero_bytes_leave_state_unchanged() {
        let mut r = RollSumRoller::new();
        let before = r.digest();
        for _ in 0..200 {
            r.roll(0);
        }
        assert_eq!(r.digest(), before);
    }

    #[test]
    fn s1_tracks_window_sum() {
        let mut r = RollSumRoller::new();
        for b in 1..=100u8 {
            r.roll(b);
        }
        // Window holds 37..=100.
        let expected: u32 = (37..=100u32).map(|b| b + CHAR_OFFSET).sum();
        assert_eq!(r.s1, expected);
    }
}
