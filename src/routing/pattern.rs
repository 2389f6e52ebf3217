//! Route pattern descriptors.
//!
//! # Template Syntax
//! - Segments are delimited by `/`
//! - A plain segment matches verbatim (case-sensitive)
//! - `[name]` captures one non-empty segment under `name`
//! - A trailing `*` matches whatever remains of the path, including nothing
//!
//! # Design Decisions
//! - Templates are parsed once at configuration load, never per request
//! - Malformed templates are rejected up front with a `PatternError`
//! - Segments keep the leading empty segment so they line up with
//!   `path.split('/')` position by position

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One `/`-delimited piece of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matched verbatim.
    Literal(String),
    /// `[name]`, captures a single segment.
    Param(String),
    /// Trailing `*`.
    Wildcard,
}

/// Errors raised while parsing a route template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("route template is empty")]
    Empty,

    #[error("route template `{0}` must start with `/`")]
    MissingLeadingSlash(String),

    #[error("unbalanced brackets in segment `{segment}` of `{template}`")]
    UnbalancedBrackets { template: String, segment: String },

    #[error("empty parameter name in `{0}`")]
    EmptyParamName(String),

    #[error("parameter `{param}` appears more than once in `{template}`")]
    DuplicateParam { template: String, param: String },

    #[error("wildcard must be the last segment of `{0}`")]
    MisplacedWildcard(String),

    #[error("`*` must stand alone as a segment in `{0}`")]
    EmbeddedWildcard(String),
}

/// An immutable, validated route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    template: String,
    segments: Vec<Segment>,
    param_names: Vec<String>,
}

impl RoutePattern {
    /// Parse and validate a template such as `/posts/[id]` or `/admin/*`.
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        if template.is_empty() {
            return Err(PatternError::Empty);
        }
        if !template.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(template.to_string()));
        }

        let raw: Vec<&str> = template.split('/').collect();
        let last = raw.len() - 1;
        let mut segments = Vec::with_capacity(raw.len());
        let mut param_names: Vec<String> = Vec::new();

        for (index, part) in raw.iter().enumerate() {
            let segment = classify(template, part)?;
            match &segment {
                Segment::Wildcard if index != last => {
                    return Err(PatternError::MisplacedWildcard(template.to_string()));
                }
                Segment::Param(name) => {
                    if param_names.contains(name) {
                        return Err(PatternError::DuplicateParam {
                            template: template.to_string(),
                            param: name.clone(),
                        });
                    }
                    param_names.push(name.clone());
                }
                _ => {}
            }
            segments.push(segment);
        }

        Ok(Self {
            template: template.to_string(),
            segments,
            param_names,
        })
    }

    /// The raw template string.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameter names in left-to-right order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// True when the template has at least one `[name]` segment.
    pub fn is_dynamic(&self) -> bool {
        !self.param_names.is_empty()
    }

    /// True when the template ends in `*`.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard))
    }
}

fn classify(template: &str, part: &str) -> Result<Segment, PatternError> {
    if part == "*" {
        return Ok(Segment::Wildcard);
    }
    if part.contains('*') {
        return Err(PatternError::EmbeddedWildcard(template.to_string()));
    }

    match part.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(name) if name.contains('[') || name.contains(']') => {
            Err(PatternError::UnbalancedBrackets {
                template: template.to_string(),
                segment: part.to_string(),
            })
        }
        Some("") => Err(PatternError::EmptyParamName(template.to_string())),
        Some(name) => Ok(Segment::Param(name.to_string())),
        None if part.contains('[') || part.contains(']') => {
            Err(PatternError::UnbalancedBrackets {
                template: template.to_string(),
                segment: part.to_string(),
            })
        }
        None => Ok(Segment::Literal(part.to_string())),
    }
}

impl FromStr for RoutePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<RoutePattern> for RoutePattern {
    fn as_ref(&self) -> &RoutePattern {
        self
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_static() {
        let pattern = RoutePattern::parse("/admin").unwrap();
        assert_eq!(
            pattern.segments(),
            &[Segment::Literal(String::new()), Segment::Literal("admin".into())]
        );
        assert!(!pattern.is_dynamic());
        assert!(!pattern.is_wildcard());
    }

    #[test]
    fn test_parse_dynamic() {
        let pattern = RoutePattern::parse("/users/[user]/posts/[id]").unwrap();
        assert!(pattern.is_dynamic());
        assert_eq!(pattern.param_names(), &["user".to_string(), "id".to_string()]);
        assert_eq!(pattern.segments()[2], Segment::Param("user".into()));
    }

    #[test]
    fn test_parse_wildcard() {
        assert!(RoutePattern::parse("/admin/*").unwrap().is_wildcard());
        assert!(RoutePattern::parse("/*").unwrap().is_wildcard());
        assert_eq!(
            RoutePattern::parse("/a/*/b"),
            Err(PatternError::MisplacedWildcard("/a/*/b".into()))
        );
        assert_eq!(
            RoutePattern::parse("/files*"),
            Err(PatternError::EmbeddedWildcard("/files*".into()))
        );
    }

    #[test]
    fn test_root() {
        let pattern = RoutePattern::parse("/").unwrap();
        assert_eq!(pattern.segments().len(), 2);
        assert_eq!(pattern.to_string(), "/");
    }

    #[test]
    fn test_malformed() {
        assert_eq!(RoutePattern::parse(""), Err(PatternError::Empty));
        assert!(matches!(
            RoutePattern::parse("admin"),
            Err(PatternError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            RoutePattern::parse("/posts/[id"),
            Err(PatternError::UnbalancedBrackets { .. })
        ));
        assert!(matches!(
            RoutePattern::parse("/posts/[[id]]"),
            Err(PatternError::UnbalancedBrackets { .. })
        ));
        assert!(matches!(
            RoutePattern::parse("/posts/[]"),
            Err(PatternError::EmptyParamName(_))
        ));
        assert!(matches!(
            RoutePattern::parse("/[id]/[id]"),
            Err(PatternError::DuplicateParam { .. })
        ));
    }
}
