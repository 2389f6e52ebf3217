//! Request-time error definitions.

use thiserror::Error;

/// Boxed error returned by data fetchers and rules.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that end a protected request in the `Errored` state.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The data fetcher returned an error.
    #[error("data fetch failed: {0}")]
    FetchFailure(#[source] BoxError),

    /// The data fetcher resolved without data.
    #[error("data fetch returned no data")]
    MissingData,

    /// A rule returned an error.
    #[error("rule for `{route}` failed: {source}")]
    Rule {
        route: String,
        #[source]
        source: BoxError,
    },

    /// A rule redirected to a route key the table does not know.
    #[error("rule for `{route}` redirected to `{target}`, which is not a known route")]
    UnknownRedirectTarget { route: String, target: String },
}

impl GuardError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GuardError::FetchFailure(_) => "fetch_failure",
            GuardError::MissingData => "missing_data",
            GuardError::Rule { .. } => "rule_failure",
            GuardError::UnknownRedirectTarget { .. } => "unknown_redirect_target",
        }
    }

    /// True for the fetch failure family (error or no data).
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, GuardError::FetchFailure(_) | GuardError::MissingData)
    }
}
