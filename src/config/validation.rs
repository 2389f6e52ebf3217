//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Parse every route template and check it against its declared metadata
//! - Check that auth paths and rule keys name known routes
//! - Validate value ranges (timeouts > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{GuardConfig, RouteEntry};
use crate::routing::{PatternError, RouteKeyError, RoutePattern, RouteTable};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route `{key}`: {source}")]
    Pattern {
        key: String,
        #[source]
        source: PatternError,
    },

    #[error("route `{key}`: is_dynamic = {declared} does not match its template")]
    DynamicMismatch { key: String, declared: bool },

    #[error("route `{key}`: declared params {declared:?} differ from template params {actual:?}")]
    ParamMismatch {
        key: String,
        declared: Vec<String>,
        actual: Vec<String>,
    },

    #[error("duplicate route key `{0}`")]
    DuplicateKey(String),

    #[error("auth path `{path}`: {source}")]
    AuthPath {
        path: String,
        #[source]
        source: RouteKeyError,
    },

    #[error("rule key `{key}`: {source}")]
    RuleKey {
        key: String,
        #[source]
        source: RouteKeyError,
    },

    #[error("no data fetcher configured")]
    MissingFetcher,

    #[error("bind address `{0}` is not a valid socket address")]
    BindAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Validate the whole configuration.
pub fn validate_config(config: &GuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    match build_route_table(&config.routes) {
        Ok(table) => errors.extend(validate_auth_paths(&table, &config.auth_paths)),
        Err(route_errors) => errors.extend(route_errors),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse route entries into a table, checking metadata against templates.
pub fn build_route_table(entries: &[RouteEntry]) -> Result<RouteTable, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut table = RouteTable::new();

    for entry in entries {
        if !seen.insert(entry.key.as_str()) {
            errors.push(ValidationError::DuplicateKey(entry.key.clone()));
            continue;
        }

        let pattern = match RoutePattern::parse(&entry.path) {
            Ok(pattern) => pattern,
            Err(source) => {
                errors.push(ValidationError::Pattern {
                    key: entry.key.clone(),
                    source,
                });
                continue;
            }
        };

        if entry.is_dynamic != pattern.is_dynamic() {
            errors.push(ValidationError::DynamicMismatch {
                key: entry.key.clone(),
                declared: entry.is_dynamic,
            });
        } else if entry.params != pattern.param_names() {
            errors.push(ValidationError::ParamMismatch {
                key: entry.key.clone(),
                declared: entry.params.clone(),
                actual: pattern.param_names().to_vec(),
            });
        }

        table.insert(entry.key.clone(), pattern);
    }

    if errors.is_empty() {
        Ok(table)
    } else {
        Err(errors)
    }
}

/// Check that every auth path resolves against the table.
pub fn validate_auth_paths(table: &RouteTable, auth_paths: &[String]) -> Vec<ValidationError> {
    auth_paths
        .iter()
        .filter_map(|path| {
            table.resolve(path).err().map(|source| ValidationError::AuthPath {
                path: path.clone(),
                source,
            })
        })
        .collect()
}
