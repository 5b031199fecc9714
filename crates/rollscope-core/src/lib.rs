//! # rollscope-core
//!
//! Statistical evaluation of rolling hash functions.
//!
//! Each registered algorithm is run over a seeded buffer of random bytes in
//! three independent passes:
//!
//! - **Timing**: wall-clock time to `roll` + `digest` every byte.
//! - **Bias / correlation**: how often each of the 32 digest bits is zero,
//!   and how often each of the 496 bit pairs agree.
//! - **Avalanche**: how often each output bit changes when a single input
//!   bit of a 256-byte reference is flipped.
//!
//! Any fraction outside 49%–51% is flagged.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rollscope_core::{EvalConfig, Evaluator, Registry, Selection};
//!
//! let evaluator = Evaluator::new(Registry::builtin(), EvalConfig::new(42));
//! let report = evaluator.run(&Selection::all()).unwrap();
//! for eval in report.evaluations() {
//!     println!("{}: {} biased bits", eval.algorithm, eval.bias.biased_bits.len());
//! }
//! ```
//!
//! ## Architecture
//!
//! Registry → Selection (names resolved up front) → SampleSet (seeded) →
//! per algorithm: timing → bias → avalanche, each under the [`watchdog`].
//!
//! Adapters implement [`Roller`] and are registered through an [`Algorithm`]
//! factory. Every pass builds its own fresh roller.

pub mod analysis;
pub mod bits;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod registry;
pub mod roller;
pub mod rollers;
pub mod samples;
pub mod watchdog;

pub use analysis::{
    AvalancheReport, BiasReport, CANCEL_CHECK_BYTES, CancelFlag, Evaluation, Phase, TimingResult,
    avalanche_pass, avalanche_pass_cancellable, bias_pass, bias_pass_cancellable, time_pass,
    time_pass_cancellable,
};
pub use bits::{BitDeviation, DIGEST_BITS, PairDeviation, ToleranceBand};
pub use config::{DEFAULT_PHASE_TIMEOUT_SECS, EvalConfig};
pub use error::{Error, Result};
pub use evaluator::{AlgorithmOutcome, Evaluator, RunReport};
pub use registry::{Registry, RegistryBuilder, Selection};
pub use roller::{Algorithm, AlgorithmFamily, AlgorithmInfo, FnAlgorithm, Roller};
pub use rollers::all_algorithms;
pub use samples::SampleSet;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
