//! Application context shared by every request.
//!
//! Built once at startup by [`crate::lifecycle::startup::build_context`] and
//! handed to the HTTP layer as axum state. Cloning is cheap.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::{DocumentStore, StoreError};

/// State of the single database connection opened at startup.
#[derive(Debug, Clone)]
pub enum StoreHandle {
    Connected(Arc<dyn DocumentStore>),
    /// Startup could not connect; `reason` is the logged failure.
    Unavailable { reason: Arc<str> },
}

impl StoreHandle {
    pub fn unavailable(reason: impl Into<Arc<str>>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub store: StoreHandle,
}

impl AppContext {
    pub fn new(config: AppConfig, store: StoreHandle) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Context with an already opened store.
    pub fn with_store(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self::new(config, StoreHandle::Connected(store))
    }

    /// The connected store, or `StoreError::Unavailable`.
    pub fn store(&self) -> Result<&Arc<dyn DocumentStore>, StoreError> {
        match &self.store {
            StoreHandle::Connected(store) => Ok(store),
            StoreHandle::Unavailable { reason } => Err(StoreError::Unavailable(reason.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_connected_store_is_returned() {
        let ctx = AppContext::with_store(AppConfig::default(), Arc::new(MemoryStore::new()));
        assert!(ctx.store.is_connected());
        assert_eq!(ctx.store().unwrap().kind(), "memory");
    }

    #[test]
    fn test_unavailable_store_reports_reason() {
        let ctx = AppContext::new(AppConfig::default(), StoreHandle::unavailable("refused"));
        match ctx.store() {
            Err(StoreError::Unavailable(reason)) => assert_eq!(reason, "refused"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
