//! Built-in rolling-hash adapters.
//!
//! Every adapter keeps a 64-byte window that starts out filled with zero
//! bytes, so a freshly built roller already reports the digest of an all-zero
//! window.

pub mod adler32;
pub mod bozo32;
pub mod buzhash;
pub mod crc32;
pub mod rabinkarp64;
pub mod rollsum;

use crate::roller::Algorithm;

/// Window length shared by every built-in adapter.
pub const WINDOW_SIZE: usize = 64;

/// All built-in algorithms, hazardous ones included.
pub fn all_algorithms() -> Vec<Box<dyn Algorithm>> {
    vec![
        // Additive
        Box::new(rollsum::RollSum),
        Box::new(adler32::Adler32),
        // Polynomial
        Box::new(bozo32::Bozo32),
        Box::new(rabinkarp64::RabinKarp64),
        // Cyclic
        Box::new(buzhash::Buzhash32),
        Box::new(buzhash::Buzhash64),
        // Checksum
        Box::new(crc32::Crc32),
    ]
}

/// Fixed-length ring buffer holding the bytes currently inside a rolling
/// window.
#[derive(Debug, Clone)]
pub(crate) struct Window {
    buf: Vec<u8>,
    oldest: usize,
}

impl Window {
    pub(crate) fn zeroed(len: usize) -> Self {
        assert!(len > 0, "window must hold at least one byte");
        Self {
            buf: vec![0; len],
            oldest: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    /// Evict the oldest byte in favour of `byte`, returning the evicted one.
    pub(crate) fn push(&mut self, byte: u8) -> u8 {
        let out = std::mem::replace(&mut self.buf[self.oldest], byte);
        self.oldest = (self.oldest + 1) % self.buf.len();
        out
    }

    /// Window contents, oldest byte first, as two contiguous runs.
    pub(crate) fn as_slices(&self) -> (&[u8], &[u8]) {
        (&self.buf[self.oldest..], &self.buf[..self.oldest])
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::lcg_bytes;
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn window_evicts_oldest_first() {
        let mut w = Window::zeroed(3);
        assert_eq!(w.push(1), 0);
        assert_eq!(w.push(2), 0);
        assert_eq!(w.push(3), 0);
        assert_eq!(w.push(4), 1);
        let (a, b) = w.as_slices();
        let ordered: Vec<u8> = a.iter().chain(b).copied().collect();
        assert_eq!(ordered, vec![2, 3, 4]);
        assert_eq!(w.len(), 3);
    }

    #[test]
    #[should_panic(expected = "window must hold at least one byte")]
    fn adler32_rejects_empty_window() {
        adler32::Adler32Roller::new(0);
    }

    #[test]
    #[should_panic(expected = "window must hold at least one byte")]
    fn rabinkarp64_rejects_empty_window() {
        rabinkarp64::RabinKarp64Roller::new(0);
    }

    #[test]
    fn names_are_unique() {
        let algos = all_algorithms();
        let names: HashSet<_> = algos.iter().map(|a| a.name()).collect();
        assert_eq!(names.len(), algos.len());
    }

    #[test]
    fn only_rabinkarp64_is_hazardous() {
        let hazardous: Vec<_> = all_algorithms()
            .into_iter()
            .filter(|a| a.is_hazardous())
            .map(|a| a.name())
            .collect();
        assert_eq!(hazardous, vec!["rabinkarp64"]);
    }

    #[test]
    fn metadata_is_filled_in() {
        for algo in all_algorithms() {
            let info = algo.info();
            assert!(!info.description.is_empty(), "{} has no description", info.name);
            assert_eq!(info.window_size, WINDOW_SIZE, "{}", info.name);
            assert!(info.digest_bits >= 32, "{}", info.name);
        }
    }

    #[test]
    fn digest_depends_only_on_window_contents() {
        let tail = lcg_bytes(WINDOW_SIZE, 7);
        let mut a_input = lcg_bytes(300, 1);
        a_input.extend_from_slice(&tail);
        let mut b_input = lcg_bytes(17, 2);
        b_input.extend_from_slice(&tail);

        for algo in all_algorithms() {
            let mut a = algo.build();
            let mut b = algo.build();
            a_input.iter().for_each(|&x| a.roll(x));
            b_input.iter().for_each(|&x| b.roll(x));
            assert_eq!(a.digest(), b.digest(), "{} depends on history", algo.name());
        }
    }

    #[test]
    fn fresh_rollers_agree() {
        for algo in all_algorithms() {
            assert_eq!(algo.build().digest(), algo.build().digest(), "{}", algo.name());
        }
    }
}
