//! Run orchestration: resolve names, generate samples, run the three phases.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{SeedableRng, TryRngCore};
use serde::{Serialize, Serializer};

use crate::analysis::{
    Evaluation, Phase, avalanche_pass_cancellable, bias_pass_cancellable, time_pass_cancellable,
};
use crate::config::{DEFAULT_PHASE_TIMEOUT_SECS, EvalConfig};
use crate::error::{Error, Result};
use crate::registry::{Registry, Selection};
use crate::roller::Algorithm;
use crate::samples::SampleSet;
use crate::watchdog::run_phase;

/// Evaluates algorithms from one registry under one configuration.
#[derive(Debug, Clone)]
pub struct Evaluator {
    registry: Registry,
    config: EvalConfig,
}

impl Evaluator {
    pub fn new(registry: Registry, config: EvalConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Deadline applied to each phase of `algorithm`.
    pub fn phase_timeout(&self, algorithm: &dyn Algorithm) -> Option<Duration> {
        match self.config.phase_timeout {
            Some(limit) => Some(limit),
            None if algorithm.is_hazardous() => {
                Some(Duration::from_secs_f64(DEFAULT_PHASE_TIMEOUT_SECS))
            }
            None => None,
        }
    }

    /// Timing, then bias/correlation, then avalanche, each on fresh rollers.
    ///
    /// The first phase to time out or panic ends this algorithm's evaluation.
    /// A timed-out phase is cancelled and stops at its next check.
    pub fn evaluate(&self, algorithm: &Arc<dyn Algorithm>, samples: &SampleSet) -> Result<Evaluation> {
        let name = algorithm.name();
        let timeout = self.phase_timeout(algorithm.as_ref());
        let band = self.config.band();
        if let Some(hazard) = algorithm.info().hazard {
            warn!("{name}: known hazard ({hazard}); phases limited to {timeout:?}");
        }

        info!("{name}: {} phase over {} bytes", Phase::Timing, samples.len());
        let timing = {
            let algo = Arc::clone(algorithm);
            let samples = samples.clone();
            run_phase(name, Phase::Timing, timeout, move |cancel| {
                time_pass_cancellable(algo.as_ref(), samples.data(), cancel)
            })?
        };
        debug!(
            "{name}: {:?} elapsed, {:.2} ns/byte",
            timing.elapsed,
            timing.nanos_per_byte()
        );

        info!("{name}: {} phase over {} bytes", Phase::Bias, samples.len());
        let bias = {
            let algo = Arc::clone(algorithm);
            let samples = samples.clone();
            run_phase(name, Phase::Bias, timeout, move |cancel| {
                bias_pass_cancellable(algo.as_ref(), samples.data(), band, cancel)
            })?
        };
        debug!(
            "{name}: {} biased bits, {} correlated pairs",
            bias.biased_bits.len(),
            bias.correlated_pairs.len()
        );

        info!(
            "{name}: {} phase over {} reference bytes",
            Phase::Avalanche,
            samples.reference_len()
        );
        let avalanche = {
            let algo = Arc::clone(algorithm);
            let samples = samples.clone();
            run_phase(name, Phase::Avalanche, timeout, move |cancel| {
                avalanche_pass_cancellable(algo.as_ref(), samples.reference(), band, cancel)
            })?
        };
        debug!(
            "{name}: {} avalanche trials, {} deviant bits",
            avalanche.trials,
            avalanche.deviant_bits.len()
        );

        Ok(Evaluation {
            algorithm: name.to_string(),
            timing,
            bias,
            avalanche,
        })
    }

    /// Evaluate `selection` on samples seeded from the configured seed.
    pub fn run(&self, selection: &Selection) -> Result<RunReport> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.run_with_rng(selection, &mut rng)
    }

    /// Evaluate `selection` on samples drawn from `rng`.
    ///
    /// Returns `Err` only for fatal errors. Per-algorithm failures are
    /// recorded in the report and the remaining algorithms still run.
    pub fn run_with_rng<R>(&self, selection: &Selection, rng: &mut R) -> Result<RunReport>
    where
        R: TryRngCore + ?Sized,
    {
        self.config.validate()?;

        let resolved = self.registry.select(selection);
        for (_, entry) in &resolved {
            if let Err(e) = entry {
                warn!("{e}");
            }
        }

        let samples = SampleSet::from_rng(
            rng,
            self.config.seed,
            self.config.sample_len,
            self.config.reference_len,
        )?;
        info!(
            "generated {} sample bytes from seed {}",
            samples.len(),
            samples.seed()
        );

        let outcomes = resolved
            .into_iter()
            .map(|(name, entry)| {
                let result = entry.and_then(|algo| self.evaluate(&algo, &samples));
                AlgorithmOutcome { name, result }
            })
            .collect();

        Ok(RunReport {
            seed: self.config.seed,
            config: self.config.clone(),
            outcomes,
        })
    }
}

/// Result of one run, in selection order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub config: EvalConfig,
    pub outcomes: Vec<AlgorithmOutcome>,
}

impl RunReport {
    pub fn get(&self, name: &str) -> Option<&AlgorithmOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    pub fn evaluations(&self) -> impl Iterator<Item = &Evaluation> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Evaluation or error for one requested algorithm.
#[derive(Debug, Clone)]
pub struct AlgorithmOutcome {
    pub name: String,
    pub result: Result<Evaluation>,
}

#[derive(Serialize)]
struct OutcomeRecord<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    evaluation: Option<&'a Evaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Serialize for AlgorithmOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        OutcomeRecord {
            name: &self.name,
            evaluation: self.result.as_ref().ok(),
            error: self.result.as_ref().err().map(ToString::to_string),
        }
        .serialize(serializer)
    }
}
