//! Destination path building for redirects and in-app links.
//!
//! # Design Decisions
//! - Output is path-only (no scheme or host), suitable for same-origin redirects
//! - Missing parameters leave the `[name]` segment in place instead of failing
//! - Query pairs keep their supplied order and use form encoding
//! - Values are substituted as given; callers supply path-safe values

use url::form_urlencoded;

use crate::routing::pattern::{RoutePattern, Segment};

/// Optional parameters, query and fragment for a destination path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectOptions {
    params: Vec<(String, String)>,
    query: Vec<(String, String)>,
    hash: Option<String>,
}

impl RedirectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for the `[name]` segment.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Append a query pair. Numbers and flags render through `Display`.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Set the fragment, without the leading `#`.
    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    fn param_value(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Build the concrete path for `pattern` with `options` applied.
pub fn build(pattern: &RoutePattern, options: &RedirectOptions) -> String {
    let mut path = pattern
        .segments()
        .iter()
        .map(|segment| match segment {
            Segment::Literal(literal) => literal.clone(),
            Segment::Param(name) => match options.param_value(name) {
                Some(value) => value.to_string(),
                None => format!("[{name}]"),
            },
            Segment::Wildcard => "*".to_string(),
        })
        .collect::<Vec<_>>()
        .join("/");

    if !options.query.is_empty() {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&options.query)
            .finish();
        path.push('?');
        path.push_str(&query);
    }

    if let Some(hash) = options.hash.as_deref().filter(|h| !h.is_empty()) {
        path.push('#');
        path.push_str(hash);
    }

    path
}
