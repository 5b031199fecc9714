//! The three measurement passes.
//!
//! Each pass builds its own rollers from the algorithm's factory; no rolling
//! state crosses from one pass to the next.
//!
//! | Phase | Input | Output |
//! |-------|-------|--------|
//! | [`timing`] | full sample buffer | elapsed wall-clock time |
//! | [`bias`] | full sample buffer | per-bit zero counts, per-pair agreement counts |
//! | [`avalanche`] | reference prefix | per-bit change counts over `L × 8` replays |

pub mod avalanche;
pub mod bias;
pub mod timing;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

pub use avalanche::{
    AvalancheAnalyzer, AvalancheCounters, AvalancheReport, avalanche_pass,
    avalanche_pass_cancellable,
};
pub use bias::{
    BiasAnalyzer, BiasCounters, BiasReport, CorrelationCounters, bias_pass, bias_pass_cancellable,
};
pub use timing::{TimingResult, time_pass, time_pass_cancellable};

/// Bytes rolled between cancellation checks in the timing and bias passes.
pub const CANCEL_CHECK_BYTES: usize = 64 * 1024;

/// Stop request shared between a running pass and whoever started it.
///
/// Cancellable passes poll the flag between units of work (a chunk of
/// [`CANCEL_CHECK_BYTES`] bytes, or one avalanche replay) and return `None`
/// once it is set. A single `roll` call is never interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Measurement phase, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Timing,
    Bias,
    Avalanche,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Timing, Phase::Bias, Phase::Avalanche];
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timing => write!(f, "timing"),
            Self::Bias => write!(f, "bias"),
            Self::Avalanche => write!(f, "avalanche"),
        }
    }
}

/// Complete evaluation of one algorithm.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub algorithm: String,
    pub timing: TimingResult,
    pub bias: BiasReport,
    pub avalanche: AvalancheReport,
}

impl Evaluation {
    /// True when no bit, pair, or avalanche deviation was flagged.
    pub fn passed(&self) -> bool {
        self.bias.biased_bits.is_empty()
            && self.bias.correlated_pairs.is_empty()
            && self.avalanche.deviant_bits.is_empty()
    }
}
