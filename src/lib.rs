//! Route guard library.
//!
//! Path-based authorization for Axum applications: protected paths are
//! matched against the application's route table, the rules bound to the
//! most specific matching route run in order, and the outcome becomes a
//! pass-through, a redirect or an error response.

pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::GuardConfig;
pub use error::{BoxError, GuardError};
pub use guard::{Action, Decision, Guard, GuardBuilder, RuleContext};
pub use http::GuardServer;
pub use lifecycle::Shutdown;
pub use routing::{RedirectOptions, RouteTable};
