//! Authorization guard.
//!
//! # Data Flow
//! ```text
//! request parts
//!     → protected path check (auth paths, same matching as rules)
//!         unprotected → Allow (fetcher never called)
//!     → fetch.rs (collaborator supplies data)
//!         error / no data → Error
//!     → executor.rs (first matching rule group, rules in order)
//!     → Action: Allow | Redirect(path) | Error
//! ```
//!
//! # Design Decisions
//! - Built once through `GuardBuilder`; immutable and shared via Arc
//! - Every rule key and auth path is resolved against the route table at
//!   build time, so a typo fails startup instead of a request
//! - No per-request state outlives the call to `decide`

pub mod executor;
pub mod fetch;
pub mod rule;

use std::sync::Arc;
use std::time::Instant;

use axum::http::request::Parts;

use crate::config::{
    ConfigError, FailureMode, GuardConfig, GuardSettings, RedirectStatus, ValidationError,
};
use crate::error::GuardError;
use crate::observability::metrics;
use crate::routing::{AnyMatcher, Matcher, RouteTable};

pub use executor::{Action, Executor, RuleGroup};
pub use fetch::{error_fn, fetch_fn, DataFetcher, ErrorHandler, FetchResult};
pub use rule::{rule_fn, Decision, Redirect, Rule, RuleContext, RuleResult};

/// The request-level authorization gate.
pub struct Guard<D> {
    routes: Arc<RouteTable>,
    protected: AnyMatcher,
    executor: Executor<D>,
    fetcher: Arc<dyn DataFetcher<D>>,
    error_handler: Option<Arc<dyn ErrorHandler>>,
    settings: GuardSettings,
}

impl<D: Send + Sync + 'static> Guard<D> {
    pub fn builder(routes: RouteTable) -> GuardBuilder<D> {
        GuardBuilder::new(routes)
    }

    /// True if `path` is subject to rule evaluation.
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected.matches(path)
    }

    /// Decide what to do with one request.
    pub async fn decide(&self, request: &Parts) -> Action {
        let path = request.uri.path();

        if !self.is_protected(path) {
            tracing::trace!(path = %path, "Unprotected path");
            metrics::record_decision("allow", false);
            return Action::Allow;
        }

        let start = Instant::now();
        let action = match self.fetcher.fetch(request).await {
            Ok(Some(data)) => self.executor.evaluate(path, Arc::new(data)).await,
            Ok(None) => Action::Error(GuardError::MissingData),
            Err(e) => Action::Error(GuardError::FetchFailure(e)),
        };
        metrics::record_evaluation(start);
        metrics::record_decision(action.label(), true);

        match &action {
            Action::Allow => tracing::debug!(path = %path, "Access allowed"),
            Action::Redirect(destination) => {
                tracing::info!(path = %path, destination = %destination, "Redirecting")
            }
            Action::Error(error) => {
                metrics::record_error(error.kind());
                if error.is_fetch_failure() {
                    tracing::error!(path = %path, error = %error, "Data fetch failed");
                } else {
                    tracing::warn!(path = %path, error = %error, "Rule evaluation failed");
                }
            }
        }

        action
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn error_handler(&self) -> Option<&dyn ErrorHandler> {
        self.error_handler.as_deref()
    }

    pub fn failure_mode(&self) -> FailureMode {
        self.settings.failure_mode
    }

    pub fn redirect_status(&self) -> RedirectStatus {
        self.settings.redirect_status
    }
}

/// Builder for [`Guard`].
pub struct GuardBuilder<D> {
    routes: RouteTable,
    auth_paths: Vec<String>,
    rules: Vec<(String, Vec<Arc<dyn Rule<D>>>)>,
    fetcher: Option<Arc<dyn DataFetcher<D>>>,
    error_handler: Option<Arc<dyn ErrorHandler>>,
    settings: GuardSettings,
}

impl<D: Send + Sync + 'static> GuardBuilder<D> {
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes,
            auth_paths: Vec::new(),
            rules: Vec::new(),
            fetcher: None,
            error_handler: None,
            settings: GuardSettings::default(),
        }
    }

    /// Seed the builder with the route table, auth paths and settings of a
    /// loaded configuration.
    pub fn from_config(config: &GuardConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.route_table()?)
            .protect_all(config.auth_paths.iter().cloned())
            .settings(config.guard.clone()))
    }

    /// Require authorization for a route key or `<key>/*`.
    pub fn protect(mut self, path: impl Into<String>) -> Self {
        self.auth_paths.push(path.into());
        self
    }

    pub fn protect_all<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auth_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Append a rule to the list for `key`.
    pub fn rule<R: Rule<D> + 'static>(self, key: impl Into<String>, rule: R) -> Self {
        self.rules(key, vec![Arc::new(rule) as Arc<dyn Rule<D>>])
    }

    /// Append rules to the list for `key`; an empty list registers the key
    /// with no rules, which always allows.
    pub fn rules(mut self, key: impl Into<String>, rules: Vec<Arc<dyn Rule<D>>>) -> Self {
        let key = key.into();
        match self.rules.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, list)) => list.extend(rules),
            None => self.rules.push((key, rules)),
        }
        self
    }

    pub fn fetch<F: DataFetcher<D> + 'static>(mut self, fetcher: F) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    pub fn on_error<H: ErrorHandler + 'static>(mut self, handler: H) -> Self {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn settings(mut self, settings: GuardSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn failure_mode(mut self, mode: FailureMode) -> Self {
        self.settings.failure_mode = mode;
        self
    }

    pub fn redirect_status(mut self, status: RedirectStatus) -> Self {
        self.settings.redirect_status = status;
        self
    }

    /// Resolve every key against the route table and freeze the guard.
    pub fn build(self) -> Result<Guard<D>, ConfigError> {
        let mut errors = Vec::new();

        let mut protected = Vec::with_capacity(self.auth_paths.len());
        for path in &self.auth_paths {
            match self.routes.resolve(path) {
                Ok(pattern) => protected.push(pattern),
                Err(source) => errors.push(ValidationError::AuthPath {
                    path: path.clone(),
                    source,
                }),
            }
        }

        let mut groups = Vec::with_capacity(self.rules.len());
        for (key, rules) in self.rules {
            match self.routes.resolve(&key) {
                Ok(pattern) => {
                    let mut group = RuleGroup::new(key, pattern);
                    for rule in rules {
                        group.push(rule);
                    }
                    groups.push(group);
                }
                Err(source) => errors.push(ValidationError::RuleKey { key, source }),
            }
        }

        if self.fetcher.is_none() {
            errors.push(ValidationError::MissingFetcher);
        }

        let fetcher = match self.fetcher {
            Some(fetcher) if errors.is_empty() => fetcher,
            _ => return Err(ConfigError::Validation(errors)),
        };

        let protected_count = protected.len();
        let protected = AnyMatcher::from_patterns(protected);
        if protected.is_empty() {
            tracing::warn!("Guard protects no paths; every request is allowed");
        }

        tracing::debug!(
            routes = self.routes.len(),
            protected = protected_count,
            groups = groups.len(),
            "Guard built"
        );

        let routes = Arc::new(self.routes);
        Ok(Guard {
            executor: Executor::new(Arc::clone(&routes), groups),
            routes,
            protected,
            fetcher,
            error_handler: self.error_handler,
            settings: self.settings,
        })
    }
}
