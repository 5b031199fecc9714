//! CRC-32 (IEEE) recomputed over the window on every digest.
//!
//! Not a rolling hash: each `digest()` is O(window). It is registered as a
//! well-mixed reference point for the rolling constructions.

use flate2::Crc;

use crate::roller::{Algorithm, AlgorithmFamily, AlgorithmInfo, Roller};

use super::{WINDOW_SIZE, Window};

static CRC32_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "crc32",
    description: "IEEE CRC-32 of the window, recomputed per digest (not strictly rolling)",
    family: AlgorithmFamily::Checksum,
    digest_bits: 32,
    window_size: WINDOW_SIZE,
    hazard: None,
};

/// Registry entry for [`Crc32Roller`].
pub struct Crc32;

impl Algorithm for Crc32 {
    fn info(&self) -> &AlgorithmInfo {
        &CRC32_INFO
    }

    fn build(&self) -> Box<dyn Roller> {
        Box::new(Crc32Roller::new(WINDOW_SIZE))
    }
}

pub struct Crc32Roller {
    window: Window,
}

impl Crc32Roller {
    /// Roller over a zero-filled window of `window_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    pub fn new(window_size: usize) -> Self {
        Self {
            window: Window::zeroed(window_size),
        }
    }
}

impl Roller for Crc32Roller {
    fn roll(&mut self, byte: u8) {
        self.window.push(byte);
    }

    fn digest(&self) -> u32 {
        let (older, newer) = self.window.as_slices();
        let mut crc = Crc::new();
        crc.update(older);
        crc.update(newer);
        crc.sum()
    }
}
