//! Rolling-hash capability and algorithm metadata.
//!
//! Every algorithm under evaluation is an adapter implementing [`Roller`]
//! (the per-instance rolling state) and [`Algorithm`] (metadata plus a factory
//! that produces fresh, fully initialized rollers).

/// Construction family of a rolling hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmFamily {
    /// Running sums over the window (Adler-32, rollsum).
    Additive,
    /// Polynomial evaluation over integers or GF(2) (Rabin-Karp, bozo).
    Polynomial,
    /// Cyclic polynomial / table-driven rotation (buzhash).
    Cyclic,
    /// Non-rolling checksum recomputed over a window (CRC-32).
    Checksum,
    /// Test doubles and ad-hoc registrations.
    Custom,
}

impl std::fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Additive => write!(f, "additive"),
            Self::Polynomial => write!(f, "polynomial"),
            Self::Cyclic => write!(f, "cyclic"),
            Self::Checksum => write!(f, "checksum"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// Metadata about a registered algorithm.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AlgorithmInfo {
    /// Unique registry key (e.g. `"buzhash32"`).
    pub name: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
    /// Construction family.
    pub family: AlgorithmFamily,
    /// Native digest width in bits. Digests wider than 32 bits are truncated.
    pub digest_bits: u32,
    /// Rolling window length in bytes (0 when the algorithm has no window).
    pub window_size: usize,
    /// Known hazard, if any.
    ///
    /// Hazardous algorithms stay in the registry but are skipped by
    /// "evaluate everything" selections unless explicitly opted in, and are
    /// always run under the phase watchdog.
    pub hazard: Option<&'static str>,
}

/// Stateful rolling hash.
pub trait Roller {
    /// Consume one byte, updating the rolling state.
    fn roll(&mut self, byte: u8);

    /// Current checksum, truncated to 32 bits. Must not mutate state.
    fn digest(&self) -> u32;
}

/// A registered algorithm: metadata plus a zero-argument factory.
pub trait Algorithm: Send + Sync {
    /// Algorithm metadata.
    fn info(&self) -> &AlgorithmInfo;

    /// Construct a fresh roller, already initialized (window pre-filled) so
    /// that `digest()` is meaningful immediately.
    fn build(&self) -> Box<dyn Roller>;

    /// Convenience: name from info.
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Convenience: whether the algorithm carries a hazard note.
    fn is_hazardous(&self) -> bool {
        self.info().hazard.is_some()
    }
}

/// Closure-backed [`Algorithm`] for ad-hoc registrations.
pub struct FnAlgorithm<F> {
    info: AlgorithmInfo,
    factory: F,
}

impl<F> FnAlgorithm<F>
where
    F: Fn() -> Box<dyn Roller> + Send + Sync,
{
    pub fn new(info: AlgorithmInfo, factory: F) -> Self {
        Self { info, factory }
    }

    /// Register a closure with minimal metadata.
    pub fn custom(name: &'static str, description: &'static str, factory: F) -> Self {
        Self::new(
            AlgorithmInfo {
                name,
                description,
                family: AlgorithmFamily::Custom,
                digest_bits: 32,
                window_size: 0,
                hazard: None,
            },
            factory,
        )
    }
}

impl<F> Algorithm for FnAlgorithm<F>
where
    F: Fn() -> Box<dyn Roller> + Send + Sync,
{
    fn info(&self) -> &AlgorithmInfo {
        &self.info
    }

    fn build(&self) -> Box<dyn Roller> {
        (self.factory)()
    }
}
