//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration load:
//!     route entries / templates
//!     → pattern.rs (parse & validate templates)
//!     → table.rs (freeze as immutable RouteTable)
//!
//! Per request:
//!     concrete path
//!     → matcher.rs (which patterns apply)
//!     → priority.rs (wildcards last)
//!     → params.rs (bind [name] segments)
//!
//! On redirect:
//!     route key + options
//!     → link.rs (substitute params, append query and fragment)
//! ```
//!
//! # Design Decisions
//! - Patterns compiled at startup, immutable at runtime
//! - No regex in the hot path (segment comparison only)
//! - Deterministic: same input always selects the same pattern

pub mod link;
pub mod matcher;
pub mod params;
pub mod pattern;
pub mod priority;
pub mod table;

pub use link::RedirectOptions;
pub use matcher::{AnyMatcher, Matcher};
pub use params::Params;
pub use pattern::{PatternError, RoutePattern, Segment};
pub use table::{RouteKeyError, RouteTable};
