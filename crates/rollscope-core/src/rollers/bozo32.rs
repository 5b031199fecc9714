//! Bozo32: integer Rabin-Karp over `u32` with multiplier 65521.
//!
//! The window value is `Σ w[i]·A^(n-1-i)` with wrapping arithmetic. The
//! multiplier is odd and small, so high digest bits mix poorly; it is kept as
//! a deliberately weak baseline.

use crate::roller::{Algorithm, AlgorithmFamily, AlgorithmInfo, Roller};

use super::{WINDOW_SIZE, Window};

const MULTIPLIER: u32 = 65_521;

static BOZO32_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "bozo32",
    description: "Integer Rabin-Karp with multiplier 65521 and wrapping u32 arithmetic",
    family: AlgorithmFamily::Polynomial,
    digest_bits: 32,
    window_size: WINDOW_SIZE,
    hazard: None,
};

/// Registry entry for [`Bozo32Roller`].
pub struct Bozo32;

impl Algorithm for Bozo32 {
    fn info(&self) -> &AlgorithmInfo {
        &BOZO32_INFO
    }

    fn build(&self) -> Box<dyn Roller> {
        Box::new(Bozo32Roller::new(WINDOW_SIZE))
    }
}

pub struct Bozo32Roller {
    sum: u32,
    /// `MULTIPLIER^n` for a window of `n` bytes.
    drop_factor: u32,
    window: Window,
}

impl Bozo32Roller {
    /// Roller over a zero-filled window of `window_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    pub fn new(window_size: usize) -> Self {
        let drop_factor = (0..window_size).fold(1u32, |acc, _| acc.wrapping_mul(MULTIPLIER));
        Self {
            sum: 0,
            drop_factor,
            window: Window::zeroed(window_size),
        }
    }
}

impl Roller for Bozo32Roller {
    fn roll(&mut self, byte: u8) {
        let out = self.window.push(byte);
        self.sum = self
            .sum
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(byte as u32)
            .wrapping_sub((out as u32).wrapping_mul(self.drop_factor));
    }

    fn digest(&self) -> u32 {
        self.sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollers::test_support::lcg_bytes;

    fn direct(window: &[u8]) -> u32 {
        window
            .iter()
            .fold(0u32, |acc, &x| acc.wrapping_mul(MULTIPLIER).wrapping_add(x as u32))
    }

    #[test]
    fn zero_window_is_zero() {
        assert_eq!(Bozo32Roller::new(WINDOW_SIZE).digest(), 0);
    }

    #[test]
    fn rolling_matches_direct_computation() {
        let data = lcg_bytes(500, 9);
        let mut r = Bozo32Roller::new(WINDOW_SIZE);
        for (i, &x) in data.iter().enumerate() {
            r.roll(x);
            if i + 1 >= WINDOW_SIZE {
                assert_eq!(r.digest(), direct(&data[i + 1 - WINDOW_SIZE..=i]), "at {i}");
            }
        }
    }

    #[test]
    fn single_byte_window() {
        let mut r = Bozo32Roller::new(1);
        r.roll(5);
        r.roll(200);
        assert_eq!(r.digest(), 200);
    }
}
