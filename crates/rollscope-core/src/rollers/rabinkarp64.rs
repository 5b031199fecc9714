//! Rabin fingerprint over GF(2) with a fixed degree-53 irreducible
//! polynomial.
//!
//! The window fingerprint is `Σ w[i]·x^(8(n-1-i)) mod P`. Two 256-entry
//! tables make a roll O(1): `out[b]` is the fingerprint of `b` followed by
//! `n-1` zero bytes (XORed away when `b` leaves), and `modt[i]` reduces the
//! top byte shifted out of a fingerprint when a new byte is appended.
//!
//! An adapter of this family once hung the evaluator it was registered in and
//! the cause was never found, so it carries a hazard note and runs under the
//! phase watchdog.

use std::sync::{Arc, OnceLock};

use crate::roller::{Algorithm, AlgorithmFamily, AlgorithmInfo, Roller};

use super::{WINDOW_SIZE, Window};

/// Irreducible polynomial of degree 53.
const POLYNOMIAL: u64 = 0x3DA3_358B_4DC1_73;

static RABINKARP64_INFO: AlgorithmInfo = AlgorithmInfo {
    name: "rabinkarp64",
    description: "Rabin fingerprint over GF(2) mod a degree-53 irreducible polynomial, low 32 bits reported",
    family: AlgorithmFamily::Polynomial,
    digest_bits: 64,
    window_size: WINDOW_SIZE,
    hazard: Some("suspected non-termination in an earlier adapter; root cause never diagnosed"),
};

/// Registry entry for [`RabinKarp64Roller`].
pub struct RabinKarp64;

impl Algorithm for RabinKarp64 {
    fn info(&self) -> &AlgorithmInfo {
        &RABINKARP64_INFO
    }

    fn build(&self) -> Box<dyn Roller> {
        // Avalanche builds thousands of rollers; compute the tables once.
        static TABLES: OnceLock<Arc<Tables>> = OnceLock::new();
        let tables = TABLES.get_or_init(|| Arc::new(Tables::new(POLYNOMIAL, WINDOW_SIZE)));
        Box::new(RabinKarp64Roller::with_tables(WINDOW_SIZE, Arc::clone(tables)))
    }
}

/// Degree of a GF(2) polynomial, -1 for the zero polynomial.
fn degree(p: u64) -> i32 {
    63 - p.leading_zeros() as i32
}

/// `x mod d` over GF(2).
fn poly_mod(mut x: u64, d: u64) -> u64 {
    let dd = degree(d);
    while degree(x) >= dd {
        x ^= d << (degree(x) - dd);
    }
    x
}

/// Append one byte to a fingerprint: `(h·x^8 + b) mod P`.
fn append_byte(hash: u64, byte: u8, poly: u64) -> u64 {
    poly_mod((hash << 8) | byte as u64, poly)
}

struct Tables {
    out: [u64; 256],
    modt: [u64; 256],
}

impl Tables {
    fn new(poly: u64, window_size: usize) -> Self {
        let mut out = [0u64; 256];
        let mut modt = [0u64; 256];
        let k = degree(poly);
        for b in 0..256usize {
            let mut h = append_byte(0, b as u8, poly);
            for _ in 1..window_size {
                h = append_byte(h, 0, poly);
            }
            out[b] = h;
            modt[b] = poly_mod((b as u64) << k, poly) | ((b as u64) << k);
        }
        Self { out, modt }
    }
}

pub struct RabinKarp64Roller {
    fingerprint: u64,
    shift: u32,
    tables: Arc<Tables>,
    window: Window,
}

impl RabinKarp64Roller {
    /// Roller over a zero-filled window of `window_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    pub fn new(window_size: usize) -> Self {
        Self::with_tables(window_size, Arc::new(Tables::new(POLYNOMIAL, window_size)))
    }

    fn with_tables(window_size: usize, tables: Arc<Tables>) -> Self {
        Self {
            fingerprint: 0,
            shift: (degree(POLYNOMIAL) - 8) as u32,
            tables,
            window: Window::zeroed(window_size),
        }
    }

    /// Full-width fingerprint.
    pub fn digest64(&self) -> u64 {
        self.fingerprint
    }
}

impl Roller for RabinKarp64Roller {
    fn roll(&mut self, byte: u8) {
        let out = self.window.push(byte);
        self.fingerprint ^= self.tables.out[out as usize];
        let top = (self.fingerprint >> self.shift) as usize;
        self.fingerprint = ((self.fingerprint << 8) | byte as u64) ^ self.tables.modt[top];
    }

    fn digest(&self) -> u32 {
        self.fingerprint as u32
    }
}
