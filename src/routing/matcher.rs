//! Path matching logic.
//!
//! # Responsibilities
//! - Match a concrete request path against a route pattern
//! - Match a path against a set of patterns (protected paths)
//!
//! # Design Decisions
//! - Segment-by-segment comparison, no regex and no backtracking
//! - Literal segments are case-sensitive
//! - `[name]` matches any non-empty segment
//! - A trailing `*` ends comparison; everything after it is irrelevant
//! - Patterns match as segment prefixes: `/admin` covers `/admin/users`,
//!   but a path shorter than the pattern never matches

use crate::routing::pattern::{RoutePattern, Segment};

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

impl Matcher for RoutePattern {
    fn matches(&self, path: &str) -> bool {
        let mut concrete = path.split('/');

        for segment in self.segments() {
            match segment {
                Segment::Wildcard => return true,
                Segment::Param(_) => match concrete.next() {
                    Some(value) if !value.is_empty() => {}
                    _ => return false,
                },
                Segment::Literal(literal) => {
                    if concrete.next() != Some(literal.as_str()) {
                        return false;
                    }
                }
            }
        }

        true
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug, Default)]
pub struct AnyMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AnyMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    pub fn from_patterns(patterns: impl IntoIterator<Item = RoutePattern>) -> Self {
        Self::new(
            patterns
                .into_iter()
                .map(|p| Box::new(p) as Box<dyn Matcher>)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Matcher for AnyMatcher {
    fn matches(&self, path: &str) -> bool {
        // Any matcher may pass (OR); an empty set protects nothing
        self.matchers.iter().any(|m| m.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(template: &str) -> RoutePattern {
        RoutePattern::parse(template).unwrap()
    }

    #[test]
    fn test_literal_matcher() {
        let matcher = pattern("/admin");
        assert!(matcher.matches("/admin"));
        assert!(!matcher.matches("/Admin")); // Case sensitive
        assert!(!matcher.matches("/administrator"));
        assert!(!matcher.matches("/"));
    }

    #[test]
    fn test_prefix_match() {
        let matcher = pattern("/admin");
        assert!(matcher.matches("/admin/"));
        assert!(matcher.matches("/admin/users"));
        assert!(matcher.matches("/admin/users/7/delete"));
        assert!(!matcher.matches("/posts/admin"));
    }

    #[test]
    fn test_root_matcher() {
        let matcher = pattern("/");
        assert!(matcher.matches("/"));
        assert!(!matcher.matches("/posts"));
        assert!(!matcher.matches("/posts/1"));
    }

    #[test]
    fn test_dynamic_matcher() {
        let matcher = pattern("/posts/[id]");
        assert!(matcher.matches("/posts/42"));
        assert!(!matcher.matches("/posts"));
        assert!(!matcher.matches("/posts/"));
        assert!(matcher.matches("/posts/42/comments"));
    }

    #[test]
    fn test_wildcard_matcher() {
        let matcher = pattern("/admin/*");
        assert!(matcher.matches("/admin"));
        assert!(matcher.matches("/admin/users"));
        assert!(matcher.matches("/admin/users/7/edit"));
        assert!(!matcher.matches("/administrator"));
        assert!(!matcher.matches("/posts"));

        let everything = pattern("/*");
        assert!(everything.matches("/"));
        assert!(everything.matches("/anything/at/all"));
    }

    #[test]
    fn test_any_matcher() {
        let protected = AnyMatcher::from_patterns([pattern("/admin/*"), pattern("/posts/[id]")]);
        assert!(protected.matches("/admin/settings"));
        assert!(protected.matches("/posts/1"));
        assert!(!protected.matches("/posts"));

        assert!(!protected.is_empty());

        let nothing = AnyMatcher::default();
        assert!(nothing.is_empty());
        assert!(!nothing.matches("/admin"));
    }
}
