//! Dynamic segment extraction.

use crate::routing::pattern::{RoutePattern, Segment};

/// Values captured from `[name]` segments, in template order.
///
/// A name whose position lies past the end of the concrete path is bound but
/// absent; `get` returns `None` for it rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, Option<String>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// True if `name` was bound, even to an absent value.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    fn bind(&mut self, name: &str, value: Option<&str>) {
        self.entries.push((name.to_string(), value.map(str::to_string)));
    }
}

/// Bind each `[name]` segment of `pattern` to the concrete segment at the
/// same position in `path`.
pub fn extract(pattern: &RoutePattern, path: &str) -> Params {
    let concrete: Vec<&str> = path.split('/').collect();
    let mut params = Params::new();

    for (index, segment) in pattern.segments().iter().enumerate() {
        if let Segment::Param(name) = segment {
            params.bind(name, concrete.get(index).copied());
        }
    }

    params
}
