//! Evaluation parameters.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::bits::ToleranceBand;
use crate::error::{Error, Result};

/// Bytes rolled by the timing and bias passes.
pub const DEFAULT_SAMPLE_LEN: usize = 1024 * 1024;

/// Length of the avalanche reference input (a prefix of the sample buffer).
pub const DEFAULT_REFERENCE_LEN: usize = 256;

/// Default per-phase watchdog deadline.
pub const DEFAULT_PHASE_TIMEOUT_SECS: f64 = 120.0;

/// Parameters for one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalConfig {
    /// Seed for the sample buffer.
    pub seed: u64,
    /// Sample buffer length in bytes.
    pub sample_len: usize,
    /// Avalanche reference length in bytes.
    pub reference_len: usize,
    /// Per-phase deadline. `None` runs each phase inline on the calling
    /// thread, except for hazardous algorithms, which always get
    /// [`DEFAULT_PHASE_TIMEOUT_SECS`].
    pub phase_timeout: Option<Duration>,
}

impl EvalConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            sample_len: DEFAULT_SAMPLE_LEN,
            reference_len: DEFAULT_REFERENCE_LEN,
            phase_timeout: Some(Duration::from_secs_f64(DEFAULT_PHASE_TIMEOUT_SECS)),
        }
    }

    /// Current Unix time in seconds, the conventional default seed.
    pub fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    /// The fixed 49%–51% band.
    pub fn band(&self) -> ToleranceBand {
        ToleranceBand::STANDARD
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_len == 0 {
            return Err(Error::InvalidConfig("sample length must be non-zero".into()));
        }
        if self.reference_len == 0 {
            return Err(Error::InvalidConfig(
                "avalanche reference length must be non-zero".into(),
            ));
        }
        if self.reference_len > self.sample_len {
            return Err(Error::InvalidConfig(format!(
                "avalanche reference ({} bytes) is longer than the sample buffer ({} bytes)",
                self.reference_len, self.sample_len
            )));
        }
        if self.phase_timeout == Some(Duration::ZERO) {
            return Err(Error::InvalidConfig(
                "phase timeout must be positive; use None to disable it".into(),
            ));
        }
        Ok(())
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
