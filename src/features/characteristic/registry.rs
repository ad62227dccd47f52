//! Algorithm lookup by name

use std::collections::BTreeMap;
use std::sync::Arc;

use super::sta_lta::StaLta;
use super::CharacteristicAlgorithm;

/// Name-indexed set of characteristic-function algorithms
#[derive(Clone, Default)]
pub struct AlgorithmRegistry {
    algorithms: BTreeMap<String, Arc<dyn CharacteristicAlgorithm>>,
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &self.algorithms.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AlgorithmRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in algorithms with default settings
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(StaLta::default());
        registry
    }

    /// Register an algorithm under its own name, replacing any previous entry
    pub fn register<A>(&mut self, algorithm: A) -> Option<Arc<dyn CharacteristicAlgorithm>>
    where
        A: CharacteristicAlgorithm + 'static,
    {
        let name = algorithm.name().to_string();
        log::debug!("Registering characteristic-function algorithm '{}'", name);
        self.algorithms.insert(name, Arc::new(algorithm))
    }

    /// Look an algorithm up by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn CharacteristicAlgorithm>> {
        self.algorithms.get(name).cloned()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.algorithms.keys().map(String::as_str)
    }

    /// Number of registered algorithms
    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}
