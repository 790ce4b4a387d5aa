use crate::config::EvalConfig;
use crate::equation::Equation;
use crate::error::SyntaxError;
use log::{debug, trace};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Bounded cache of parsed equations keyed by their source text.
///
/// The least recently used entry is evicted once `capacity` is reached.
/// Sources that fail to parse are never stored.
#[derive(Debug)]
pub struct EquationCache {
    entries: LruCache<String, Arc<Equation>>,
    config: EvalConfig,
}

impl EquationCache {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self::with_config(capacity, EvalConfig::default())
    }

    /// Equations built by this cache carry `config`.
    pub fn with_config(capacity: usize, config: EvalConfig) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            config,
        }
    }

    pub fn get_or_parse(&mut self, source: &str) -> Result<Arc<Equation>, SyntaxError> {
        if let Some(equation) = self.entries.get(source) {
            trace!("Cache hit: {}", source);
            return Ok(Arc::clone(equation));
        }

        let equation = Arc::new(Equation::with_config(source, self.config)?);
        if let Some((evicted, _)) = self.entries.push(source.to_string(), Arc::clone(&equation)) {
            debug!("Evicted cached equation: {}", evicted);
        }
        Ok(equation)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_returns_same_equation() {
        let mut cache = EquationCache::new(4);
        let first = cache.get_or_parse("x^2 + 1").unwrap();
        let second = cache.get_or_parse("x^2 + 1").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(second.eval_scalar(2.0).unwrap(), 5.0);
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let mut cache = EquationCache::new(2);
        cache.get_or_parse("a + 1").unwrap();
        cache.get_or_parse("b + 2").unwrap();
        cache.get_or_parse("a + 1").unwrap();
        cache.get_or_parse("c + 3").unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("a + 1"));
        assert!(!cache.contains("b + 2"));
        assert!(cache.contains("c + 3"));
    }

    #[test]
    fn test_failures_are_not_cached() {
        let mut cache = EquationCache::new(2);
        assert!(cache.get_or_parse("2 +").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_and_clear() {
        let mut cache = EquationCache::with_config(0, EvalConfig::sequential());
        assert_eq!(cache.capacity(), 1);

        let equation = cache.get_or_parse("sin(x)").unwrap();
        assert_eq!(equation.config(), &EvalConfig::sequential());

        cache.clear();
        assert!(cache.is_empty());
    }
}
