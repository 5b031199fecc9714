//! Deterministic sample buffer.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{SeedableRng, TryRngCore};

use crate::error::{Error, Result};

/// Seeded random bytes shared read-only by every pass.
///
/// The avalanche reference input is the first `reference_len` bytes.
/// Clones share one buffer, so a clone can be moved into a phase worker.
#[derive(Debug, Clone)]
pub struct SampleSet {
    seed: u64,
    data: Arc<[u8]>,
    reference_len: usize,
}

impl SampleSet {
    /// Fill `len` bytes from `StdRng` seeded with `seed`.
    pub fn generate(seed: u64, len: usize, reference_len: usize) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::from_rng(&mut rng, seed, len, reference_len)
    }

    /// Fill `len` bytes from an arbitrary, possibly fallible, generator.
    pub fn from_rng<R>(rng: &mut R, seed: u64, len: usize, reference_len: usize) -> Result<Self>
    where
        R: TryRngCore + ?Sized,
    {
        if reference_len > len {
            return Err(Error::InvalidConfig(format!(
                "reference length {reference_len} exceeds sample length {len}"
            )));
        }
        let mut data = vec![0u8; len];
        rng.try_fill_bytes(&mut data)
            .map_err(|e| Error::RandomSource(e.to_string()))?;
        Ok(Self {
            seed,
            data: data.into(),
            reference_len,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn reference_len(&self) -> usize {
        self.reference_len
    }

    /// Avalanche reference input.
    pub fn reference(&self) -> &[u8] {
        &self.data[..self.reference_len]
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use rand::TryRngCore;

    /// Generator that always fails, standing in for an exhausted source.
    pub struct Exhausted;

    impl TryRngCore for Exhausted {
        type Error = std::io::Error;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Err(std::io::Error::other("entropy source exhausted"))
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Err(std::io::Error::other("entropy source exhausted"))
        }

        fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> Result<(), Self::Error> {
            Err(std::io::Error::other("entropy source exhausted"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Exhausted;
    use super::*;

    #[test]
    fn same_seed_same_bytes() {
        let a = SampleSet::generate(42, 4096, 256).unwrap();
        let b = SampleSet::generate(42, 4096, 256).unwrap();
        assert_eq!(a.data(), b.data());
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn different_seed_different_bytes() {
        let a = SampleSet::generate(1, 4096, 256).unwrap();
        let b = SampleSet::generate(2, 4096, 256).unwrap();
        assert_ne!(a.data(), b.data());
    }

    #[test]
    fn reference_is_prefix() {
        let s = SampleSet::generate(9, 1024, 256).unwrap();
        assert_eq!(s.reference(), &s.data()[..256]);
        assert_eq!(s.reference_len(), 256);
        assert_eq!(s.len(), 1024);
        assert!(!s.is_empty());
    }

    #[test]
    fn clones_share_the_buffer() {
        let s = SampleSet::generate(3, 64, 8).unwrap();
        let c = s.clone();
        assert!(std::ptr::eq(s.data().as_ptr(), c.data().as_ptr()));
        assert!(std::ptr::eq(s.reference().as_ptr(), c.reference().as_ptr()));
    }

    #[test]
    fn failing_source_surfaces_random_source_error() {
        let err = SampleSet::from_rng(&mut Exhausted, 0, 1024, 256).unwrap_err();
        assert!(err.is_fatal());
        match err {
            Error::RandomSource(msg) => assert!(msg.contains("exhausted")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn oversized_reference_is_rejected() {
        assert!(matches!(
            SampleSet::generate(0, 16, 32),
            Err(Error::InvalidConfig(_))
        ));
    }
}
