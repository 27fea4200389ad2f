//! Responses and their dispatch
//!
//! A response is a named side-effecting action triggered by a
//! recognition. Dispatch is fire-and-forget: `run` must return promptly
//! (spawning its own work if long-running) and re-dispatch while a prior
//! invocation is conceptually still in flight is permitted and not
//! deduplicated.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

/// A named side-effecting action
pub trait Response: Send + Sync {
    fn name(&self) -> &str;

    /// Trigger the action. Must not block the caller.
    fn run(&self);
}

/// Response built from a closure
pub struct FnResponse {
    name: String,
    action: Box<dyn Fn() + Send + Sync>,
}

impl FnResponse {
    pub fn new(name: impl Into<String>, action: impl Fn() + Send + Sync + 'static) -> Self {
        FnResponse {
            name: name.into(),
            action: Box::new(action),
        }
    }
}

impl Response for FnResponse {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) {
        (self.action)();
    }
}

/// The open set of registered responses
#[derive(Default)]
pub struct ResponseRegistry {
    entries: Vec<Arc<dyn Response>>,
}

impl ResponseRegistry {
    pub fn new() -> Self {
        ResponseRegistry::default()
    }

    /// Register a response, replacing any case-insensitive name collision
    pub fn register(&mut self, response: Arc<dyn Response>) {
        self.entries
            .retain(|existing| !existing.name().eq_ignore_ascii_case(response.name()));
        self.entries.push(response);
    }

    /// Case-insensitive name match
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Response>> {
        self.entries
            .iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Registered names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Dispatch counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub dispatched: u64,
    pub unresolved: u64,
}

/// Resolves response names and triggers them.
///
/// Resolution is cached per name after the first success, so repeated
/// dispatches of the same gesture skip the registry walk.
pub struct ResponseDispatcher {
    registry: ResponseRegistry,
    cache: HashMap<String, Arc<dyn Response>>,
    stats: DispatchStats,
}

impl ResponseDispatcher {
    pub fn new(registry: ResponseRegistry) -> Self {
        ResponseDispatcher {
            registry,
            cache: HashMap::new(),
            stats: DispatchStats::default(),
        }
    }

    pub fn registry(&self) -> &ResponseRegistry {
        &self.registry
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Resolve a response name, consulting the cache first
    pub fn resolve(&mut self, name: &str) -> Option<Arc<dyn Response>> {
        let key = name.to_ascii_lowercase();
        if let Some(cached) = self.cache.get(&key) {
            return Some(Arc::clone(cached));
        }
        let resolved = self.registry.resolve(name)?;
        self.cache.insert(key, Arc::clone(&resolved));
        Some(resolved)
    }

    /// Trigger the response registered under `name`.
    ///
    /// An unresolvable name is a warn-and-no-op, never an error that
    /// fails recognition.
    pub fn dispatch(&mut self, name: &str) -> bool {
        match self.resolve(name) {
            Some(response) => {
                debug!(response = response.name(), "dispatching response");
                response.run();
                self.stats.dispatched += 1;
                true
            }
            None => {
                warn!(response = name, "no response registered under this name");
                self.stats.unresolved += 1;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(name: &str) -> (Arc<dyn Response>, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let witness = Arc::clone(&runs);
        let response = FnResponse::new(name, move || {
            witness.fetch_add(1, Ordering::SeqCst);
        });
        (Arc::new(response), runs)
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let mut registry = ResponseRegistry::new();
        let (response, _) = counting("Toggle-Color");
        registry.register(response);

        assert!(registry.resolve("toggle-color").is_some());
        assert!(registry.resolve("TOGGLE-COLOR").is_some());
        assert!(registry.resolve("swap-shape").is_none());
    }

    #[test]
    fn test_dispatch_runs_and_counts() {
        let mut registry = ResponseRegistry::new();
        let (response, runs) = counting("toggle-color");
        registry.register(response);

        let mut dispatcher = ResponseDispatcher::new(registry);
        assert!(dispatcher.dispatch("toggle-color"));
        assert!(dispatcher.dispatch("TOGGLE-color"));
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(dispatcher.stats().dispatched, 2);
    }

    #[test]
    fn test_unresolved_is_a_no_op() {
        let mut dispatcher = ResponseDispatcher::new(ResponseRegistry::new());
        assert!(!dispatcher.dispatch("ghost"));
        assert_eq!(dispatcher.stats().unresolved, 1);
    }

    #[test]
    fn test_redispatch_not_deduplicated() {
        let mut registry = ResponseRegistry::new();
        let (response, runs) = counting("swap-shape");
        registry.register(response);

        let mut dispatcher = ResponseDispatcher::new(registry);
        for _ in 0..5 {
            dispatcher.dispatch("swap-shape");
        }
        assert_eq!(runs.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ResponseRegistry::new();
        let (first, first_runs) = counting("toggle-color");
        let (second, second_runs) = counting("TOGGLE-COLOR");
        registry.register(first);
        registry.register(second);
        assert_eq!(registry.len(), 1);

        registry.resolve("toggle-color").unwrap().run();
        assert_eq!(first_runs.load(Ordering::SeqCst), 0);
        assert_eq!(second_runs.load(Ordering::SeqCst), 1);
    }
}
