//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the database connection string
//! - Open the one database connection the process uses
//! - Apply the configured failure policy
//! - Produce the `AppContext` the HTTP layer is built from

use std::time::Duration;

use thiserror::Error;

use crate::config::{AppConfig, FailurePolicy};
use crate::context::{AppContext, StoreHandle};
use crate::storage::{self, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    /// The database could not be reached and the policy is `fail_fast`.
    #[error("database connection failed: {0}")]
    Database(#[source] StoreError),
}

/// Build the application context from the process environment.
pub async fn build_context(config: AppConfig) -> Result<AppContext, StartupError> {
    build_context_with(config, |key| std::env::var(key).ok()).await
}

/// Build the application context, reading env vars through `lookup`.
pub async fn build_context_with<F>(config: AppConfig, lookup: F) -> Result<AppContext, StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    let store = match connect_database(&config, lookup).await {
        Ok(store) => {
            tracing::info!(kind = store.kind(), "Connected to database");
            StoreHandle::Connected(store)
        }
        Err(e) => match config.database.on_failure {
            FailurePolicy::Degrade => {
                tracing::error!(
                    error = %e,
                    "Database connection failed; continuing without storage"
                );
                StoreHandle::unavailable(e.to_string())
            }
            FailurePolicy::FailFast => {
                tracing::error!(error = %e, "Database connection failed");
                return Err(StartupError::Database(e));
            }
        },
    };

    Ok(AppContext::new(config, store))
}

async fn connect_database<F>(
    config: &AppConfig,
    lookup: F,
) -> Result<std::sync::Arc<dyn storage::DocumentStore>, StoreError>
where
    F: Fn(&str) -> Option<String>,
{
    let db = &config.database;
    let uri = db
        .uri
        .clone()
        .or_else(|| lookup(&db.uri_env))
        .filter(|uri| !uri.trim().is_empty())
        .ok_or_else(|| StoreError::MissingUri(db.uri_env.clone()))?;

    tokio::time::timeout(
        Duration::from_secs(db.connect_timeout_secs),
        storage::connect(&uri),
    )
    .await
    .map_err(|_| StoreError::Timeout(db.connect_timeout_secs))?
}
