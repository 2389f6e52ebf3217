//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the guard.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Paths requiring authorization: route keys or `<key>/*` variants.
    pub auth_paths: Vec<String>,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Guard behavior settings.
    pub guard: GuardSettings,

    /// The application's route table, as emitted by the link generator.
    pub routes: Vec<RouteEntry>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total request timeout in seconds, rule evaluation included.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// What to do when a request ends in an error and no error handler is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Reject with 403 Forbidden.
    #[default]
    Deny,
    /// Serve the original request as if the guard were absent.
    Allow,
}

/// Status used for redirect responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RedirectStatus {
    /// 307 Temporary Redirect.
    #[default]
    Temporary,
    /// 308 Permanent Redirect.
    Permanent,
}

/// Guard behavior settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardSettings {
    pub failure_mode: FailureMode,
    pub redirect_status: RedirectStatus,
}

/// One addressable route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteEntry {
    /// Route key used by rules, auth paths and redirects.
    pub key: String,

    /// Path template (e.g., "/posts/[id]").
    pub path: String,

    /// Whether the template has dynamic segments.
    #[serde(default)]
    pub is_dynamic: bool,

    /// Parameter names in template order.
    #[serde(default)]
    pub params: Vec<String>,
}

impl RouteEntry {
    /// Entry whose key is its own template.
    pub fn new(path: impl Into<String>, params: &[&str]) -> Self {
        let path = path.into();
        Self {
            key: path.clone(),
            path,
            is_dynamic: !params.is_empty(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }
}
