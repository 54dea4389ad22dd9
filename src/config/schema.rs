//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the API.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the portfolio API.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Document database connection settings.
    pub database: DatabaseConfig,

    /// HTTP pipeline settings (timeouts, limits, CORS).
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Routing descriptor used by the `dev` host.
    pub descriptor: DescriptorConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// What to do when the database cannot be reached at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the failure and keep serving; storage-backed routes answer 503.
    #[default]
    Degrade,
    /// Abort startup.
    FailFast,
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "fail_fast" | "fail-fast" => Ok(Self::FailFast),
            other => Err(format!("unknown failure policy '{}'", other)),
        }
    }
}

/// Document database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Inline connection string. Takes precedence over `uri_env`.
    pub uri: Option<String>,

    /// Environment variable holding the connection string.
    pub uri_env: String,

    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Behavior when the connection fails at startup.
    pub on_failure: FailurePolicy,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: None,
            uri_env: "MONGODB_URI".to_string(),
            connect_timeout_secs: 10,
            on_failure: FailurePolicy::Degrade,
        }
    }
}

/// HTTP pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body for parsed bodies, in bytes.
    pub body_limit_bytes: usize,

    /// Maximum accepted multipart upload, in bytes.
    pub upload_limit_bytes: usize,

    /// Directory uploaded files are written to.
    pub upload_dir: PathBuf,

    /// Allowed CORS origins. Empty allows any origin.
    pub cors_allow_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            body_limit_bytes: 1024 * 1024,
            upload_limit_bytes: 10 * 1024 * 1024,
            upload_dir: std::env::temp_dir().join("portfolio-uploads"),
            cors_allow_origins: Vec::new(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Routing descriptor location and the build this process serves.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DescriptorConfig {
    /// Path to the routing descriptor (vercel.json).
    pub path: PathBuf,

    /// `builds[].src` value naming this function.
    pub entry: String,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("vercel.json"),
            entry: "src/bin/lambda.rs".to_string(),
        }
    }
}
