//! Name → algorithm lookup.
//!
//! A [`Registry`] is built once and then only read. The evaluator takes one
//! by value, so there is no process-wide table to mutate.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::roller::Algorithm;
use crate::rollers;

/// Immutable set of algorithms keyed by unique name, iterated in name order.
#[derive(Clone, Default)]
pub struct Registry {
    algorithms: BTreeMap<&'static str, Arc<dyn Algorithm>>,
}

impl Registry {
    /// Every built-in adapter, including hazardous ones.
    pub fn builtin() -> Self {
        let mut algorithms: BTreeMap<&'static str, Arc<dyn Algorithm>> = BTreeMap::new();
        for algo in rollers::all_algorithms() {
            algorithms.insert(algo.name(), Arc::from(algo));
        }
        Self { algorithms }
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.algorithms.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Algorithm>> {
        self.algorithms.get(name).cloned()
    }

    /// Like [`get`](Self::get), but a missing name is an error.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Algorithm>> {
        self.get(name)
            .ok_or_else(|| Error::UnknownAlgorithm(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.algorithms.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Algorithm>> {
        self.algorithms.values()
    }

    /// Resolve a selection into `(requested name, algorithm or error)` pairs.
    ///
    /// Every name is resolved here, so an unknown name is reported before
    /// any algorithm is measured. Request order is preserved for named
    /// selections; `All` yields name order.
    pub fn select(&self, selection: &Selection) -> Vec<(String, Result<Arc<dyn Algorithm>>)> {
        match selection {
            Selection::All { include_hazardous } => self
                .iter()
                .filter(|a| *include_hazardous || !a.is_hazardous())
                .map(|a| (a.name().to_string(), Ok(Arc::clone(a))))
                .collect(),
            Selection::Named(names) => names
                .iter()
                .map(|n| (n.clone(), self.resolve(n)))
                .collect(),
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Which algorithms a run evaluates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every registered algorithm. Hazardous ones only when opted in.
    All { include_hazardous: bool },
    /// Exactly these names, in this order. Hazardous algorithms named here
    /// are evaluated.
    Named(Vec<String>),
}

impl Selection {
    pub fn all() -> Self {
        Self::All {
            include_hazardous: false,
        }
    }

    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Named(names.into_iter().map(Into::into).collect())
    }
}

/// Collects algorithms, rejecting duplicate names on [`build`](Self::build).
#[derive(Default)]
pub struct RegistryBuilder {
    algorithms: Vec<Arc<dyn Algorithm>>,
}

impl RegistryBuilder {
    pub fn register<A: Algorithm + 'static>(mut self, algorithm: A) -> Self {
        self.algorithms.push(Arc::new(algorithm));
        self
    }

    pub fn register_boxed(mut self, algorithm: Box<dyn Algorithm>) -> Self {
        self.algorithms.push(Arc::from(algorithm));
        self
    }

    /// Add every built-in adapter.
    pub fn with_builtins(mut self) -> Self {
        for algo in rollers::all_algorithms() {
            self = self.register_boxed(algo);
        }
        self
    }

    pub fn build(self) -> Result<Registry> {
        let mut algorithms = BTreeMap::new();
        for algo in self.algorithms {
            let name = algo.name();
            if algorithms.insert(name, algo).is_some() {
                return Err(Error::DuplicateAlgorithm(name.to_string()));
            }
        }
        Ok(Registry { algorithms })
    }
}
