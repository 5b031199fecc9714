//! Buzhash (cyclic polynomial) in 32- and 64-bit widths.
//!
//! `H(w) = rotl(T[w0], n-1) ^ rotl(T[w1], n-2) ^ … ^ T[w(n-1)]`. Rolling one
//! byte is `rotl(H, 1) ^ rotl(T[out], n) ^ T[in]`. The byte tables are fixed
//! and derived from splitmix64 so digests are stable across builds.

use crate::roller::{Algorithm, AlgorithmFamily, AlgorithmInfo, Roller};

use super::{WINDOW_SIZE, Window};

const fn splitmix64(state: u64) -> (u64, u64) {
    let next = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = next;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (next, z ^ (z >> 31))
}

const TABLE64: [u64; 256] = {
    let mut table = [0u64; 256];
    let mut state = 0x6275_7A68_6173_6836; // "buzhash6"
    let mut i = 0;
    while i < 256 {
        let (next, value) = splitmix64(state);
        state = next;
        table[i] = value;
        i += 1;
    }
    table
};

const TABLE32: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut state = 0x6275_7A68_6173_6833; // "buzhash3"
    let mut i = 0;
    while i < 256 {
        let (next, value) = splitmix64(state);
        state = next;
        table[i] = (value >> 32) as u32;
        i += 1;
    }
    table
};

static BUZHASH32_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "buzhash32",
    description: "Cyclic polynomial hash over a fixed 256-entry u32 table",
    family: AlgorithmFamily::Cyclic,
    digest_bits: 32,
    window_size: WINDOW_SIZE,
    hazard: None,
};

static BUZHASH64_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "buzhash64",
    description: "Cyclic polynomial hash over a fixed 256-entry u64 table, low 32 bits reported",
    family: AlgorithmFamily::Cyclic,
    digest_bits: 64,
    window_size: WINDOW_SIZE,
    hazard: None,
};

/// Registry entry for [`Buzhash32Roller`].
pub struct Buzhash32;

impl Algorithm for Buzhash32 {
    fn info(&self) -> &AlgorithmInfo {
        &BUZHASH32_INFO
    }

    fn build(&self) -> Box<dyn Roller> {
        Box::new(Buzhash32Roller::new(WINDOW_SIZE))
    }
}

/// Registry entry for [`Buzhash64Roller`].
pub struct Buzhash64;

impl Algorithm for Buzhash64 {
    fn info(&self) -> &AlgorithmInfo {
        &BUZHASH64_INFO
    }

    fn build(&self) -> Box<dyn Roller> {
        Box::new(Buzhash64Roller::new(WINDOW_SIZE))
    }
}

pub struct Buzhash32Roller {
    sum: u32,
    window: Window,
}

impl Buzhash32Roller {
    /// Roller over a zero-filled window of `window_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    pub fn new(window_size: usize) -> Self {
        let sum = (0..window_size).fold(0u32, |h, _| h.rotate_left(1) ^ TABLE32[0]);
        Self {
            sum,
            window: Window::zeroed(window_size),
        }
    }
}

impl Roller for Buzhash32Roller {
    fn roll(&mut self, byte: u8) {
        let out = self.window.push(byte);
        let n = (self.window.len() % 32) as u32;
        self.sum = self.sum.rotate_left(1)
            ^ TABLE32[out as usize].rotate_left(n)
            ^ TABLE32[byte as usize];
    }

    fn digest(&self) -> u32 {
        self.sum
    }
}

pub struct Buzhash64Roller {
    sum: u64,
    window: Window,
}

impl Buzhash64Roller {
    /// Roller over a zero-filled window of `window_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    pub fn new(window_size: usize) -> Self {
        let sum = (0..window_size).fold(0u64, |h, _| h.rotate_left(1) ^ TABLE64[0]);
        Self {
            sum,
            window: Window::zeroed(window_size),
        }
    }

    /// Full-width digest.
    pub fn digest64(&self) -> u64 {
        self.sum
    }
}

impl Roller for Buzhash64Roller {
    fn roll(&mut self, byte: u8) {
        let out = self.window.push(byte);
        let n = (self.window.len() % 64) as u32;
        self.sum = self.sum.rotate_left(1)
            ^ TABLE64[out as usize].rotate_left(n)
            ^ TABLE64[byte as usize];
    }

    fn digest(&self) -> u32 {
        self.sum as u32
    }
}
