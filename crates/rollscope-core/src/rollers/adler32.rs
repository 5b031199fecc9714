//! Rolling Adler-32.
//!
//! Same sums as zlib's Adler-32 (`a` starts at 1), maintained over a sliding
//! window: dropping byte `d` from a window of length `n` and appending `x`
//! gives `a' = a - d + x` and `b' = b - n·d - 1 + a'`, all mod 65521.

use crate::roller::{Algorithm, AlgorithmFamily, AlgorithmInfo, Roller};

use super::{WINDOW_SIZE, Window};

const MOD: u64 = 65_521;

static ADLER32_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "adler32",
    description: "Adler-32 sums (mod 65521) maintained over a sliding window",
    family: AlgorithmFamily::Additive,
    digest_bits: 32,
    window_size: WINDOW_SIZE,
    hazard: None,
};

/// Registry entry for [`Adler32Roller`].
pub struct Adler32;

impl Algorithm for Adler32 {
    fn info(&self) -> &AlgorithmInfo {
        &ADLER32_INFO
    }

    fn build(&self) -> Box<dyn Roller> {
        Box::new(Adler32Roller::new(WINDOW_SIZE))
    }
}

pub struct Adler32Roller {
    a: u64,
    b: u64,
    window: Window,
}

impl Adler32Roller {
    /// Roller over a zero-filled window of `window_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    pub fn new(window_size: usize) -> Self {
        // Adler-32 of n zero bytes: a = 1, b = n.
        Self {
            a: 1,
            b: window_size as u64 % MOD,
            window: Window::zeroed(window_size),
        }
    }
}

impl Roller for Adler32Roller {
    fn roll(&mut self, byte: u8) {
        let out = self.window.push(byte) as u64;
        let n = self.window.len() as u64 % MOD;
        self.a = (self.a + MOD - out + byte as u64) % MOD;
        self.b = (self.b + MOD - (n * out) % MOD + self.a + MOD - 1) % MOD;
    }

    fn digest(&self) -> u32 {
        ((self.b as u32) << 16) | self.a as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollers::test_support::lcg_bytes;

    fn adler32(data: &[u8]) -> u32 {
        let (mut a, mut b) = (1u64, 0u64);
        for &x in data {
            a = (a + x as u64) % MOD;
            b = (b + a) % MOD;
        }
        ((b as u32) << 16) | a as u32
    }

    #[test]
    fn fresh_roller_matches_zero_window() {
        let r = Adler32Roller::new(WINDOW_SIZE);
        assert_eq!(r.digest(), adler32(&[0u8; WINDOW_SIZE]));
    }

    #[test]
    fn rolling_matches_direct_computation() {
        let data = lcg_bytes(1000, 42);
        let mut r = Adler32Roller::new(WINDOW_SIZE);
        for (i, &x) in data.iter().enumerate() {
            r.roll(x);
            if i + 1 >= WINDOW_SIZE {
                assert_eq!(r.digest(), adler32(&data[i + 1 - WINDOW_SIZE..=i]), "at {i}");
            }
        }
    }

    #[test]
    fn high_bytes_do_not_underflow() {
        let mut r = Adler32Roller::new(4);
        for _ in 0..64 {
            r.roll(0xFF);
        }
        assert_eq!(r.digest(), adler32(&[0xFF; 4]));
    }
}
