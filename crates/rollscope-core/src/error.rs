//! Error type shared by the registry, sample generation, and the evaluator.

use std::time::Duration;

use crate::analysis::Phase;

/// Everything that can stop an evaluation.
///
/// Per-algorithm errors ([`UnknownAlgorithm`](Error::UnknownAlgorithm),
/// [`PhaseTimeout`](Error::PhaseTimeout), [`AdapterPanicked`](Error::AdapterPanicked),
/// [`PhaseCancelled`](Error::PhaseCancelled), [`WorkerSpawn`](Error::WorkerSpawn))
/// end only the affected algorithm's evaluation. Fatal errors
/// ([`RandomSource`](Error::RandomSource), [`InvalidConfig`](Error::InvalidConfig))
/// end the whole run before any report is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A requested name has no registered factory.
    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),

    /// Two algorithms were registered under the same name.
    #[error("algorithm '{0}' is registered more than once")]
    DuplicateAlgorithm(String),

    /// The sample buffer could not be generated.
    #[error("random source failure: {0}")]
    RandomSource(String),

    /// A phase did not finish before the watchdog deadline.
    #[error("algorithm '{algorithm}' did not finish the {phase} phase within {timeout:?}")]
    PhaseTimeout {
        algorithm: String,
        phase: Phase,
        timeout: Duration,
    },

    /// The adapter panicked while a phase was running.
    #[error("algorithm '{algorithm}' panicked during the {phase} phase")]
    AdapterPanicked { algorithm: String, phase: Phase },

    /// A phase gave up because its cancel flag was set.
    #[error("algorithm '{algorithm}' {phase} phase was cancelled")]
    PhaseCancelled { algorithm: String, phase: Phase },

    /// The operating system refused to start a phase worker thread.
    #[error("could not start a worker for algorithm '{algorithm}': {reason}")]
    WorkerSpawn { algorithm: String, reason: String },

    /// The evaluation parameters are inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether this error aborts the entire run rather than one algorithm.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RandomSource(_) | Self::InvalidConfig(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
