//! The application's addressable routes.
//!
//! # Responsibilities
//! - Store route key → pattern, built once at configuration load
//! - Resolve rule keys and protected paths (`<key>` or `<key>/*`)
//! - Build concrete paths for a route key
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc, no locks)
//! - Unknown keys are reported, never guessed

use std::collections::HashMap;

use thiserror::Error;

use crate::routing::link::{self, RedirectOptions};
use crate::routing::pattern::{PatternError, RoutePattern};

/// Errors resolving a route key against the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteKeyError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("`{0}` is not a route key or a wildcard variant of one")]
    Unknown(String),
}

/// Route key to pattern mapping.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, RoutePattern>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table where every template is its own key.
    pub fn from_templates<I, S>(templates: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for template in templates {
            let pattern = RoutePattern::parse(template.as_ref())?;
            table.insert(template.as_ref(), pattern);
        }
        Ok(table)
    }

    /// Insert or replace a route.
    pub fn insert(&mut self, key: impl Into<String>, pattern: RoutePattern) {
        self.routes.insert(key.into(), pattern);
    }

    pub fn get(&self, key: &str) -> Option<&RoutePattern> {
        self.routes.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.routes.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolve a rule key or protected path to its pattern.
    ///
    /// Accepts a route key as-is, or a route key suffixed with `/*`
    /// (`/*` alone for the root key `/`).
    pub fn resolve(&self, key: &str) -> Result<RoutePattern, RouteKeyError> {
        if let Some(pattern) = self.routes.get(key) {
            return Ok(pattern.clone());
        }

        let base = match key.strip_suffix("/*") {
            Some("") => "/",
            Some(base) => base,
            None => return Err(RouteKeyError::Unknown(key.to_string())),
        };

        match self.routes.get(base) {
            Some(pattern) => {
                let template = format!("{}/*", pattern.template().trim_end_matches('/'));
                Ok(RoutePattern::parse(&template)?)
            }
            None => Err(RouteKeyError::Unknown(key.to_string())),
        }
    }

    /// Concrete path for the route `key`.
    pub fn link(&self, key: &str, options: &RedirectOptions) -> Result<String, RouteKeyError> {
        self.routes
            .get(key)
            .map(|pattern| link::build(pattern, options))
            .ok_or_else(|| RouteKeyError::Unknown(key.to_string()))
    }
}
