//! Application state for the attendance engine API.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::store::InMemoryEventStore;

/// Shared application state.
///
/// Holds the loaded configuration and the event store shared by all
/// request handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<InMemoryEventStore>,
}

impl AppState {
    /// Creates a new application state with an empty event store.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_store(config, Arc::new(InMemoryEventStore::new()))
    }

    /// Creates a new application state around an existing store.
    pub fn with_store(config: ConfigLoader, store: Arc<InMemoryEventStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a reference to the event store.
    pub fn store(&self) -> &InMemoryEventStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_the_store() {
        let state = AppState::new(ConfigLoader::from_parts(Configuration::default(), vec![]));
        let clone = state.clone();
        assert!(std::ptr::eq(state.store(), clone.store()));
    }
}
