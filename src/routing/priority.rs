//! Ordering of matched patterns.
//!
//! Wildcard patterns always sort after literal and dynamic ones so that the
//! most specific rule group is evaluated first. Within the same class deeper
//! patterns come first. Ties keep registration order.

use std::cmp::Reverse;

use crate::routing::pattern::RoutePattern;

/// Sort matched patterns in place: non-wildcards first, wildcards last,
/// deeper patterns before shallower ones.
pub fn prioritize<T: AsRef<RoutePattern>>(matches: &mut [T]) {
    matches.sort_by_key(|m| {
        let pattern = m.as_ref();
        (pattern.is_wildcard(), Reverse(pattern.segments().len()))
    });
}
