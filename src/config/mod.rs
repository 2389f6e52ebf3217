//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, route table compilation)
//!     → GuardConfig (validated, immutable)
//!     → GuardBuilder::from_config (route table + auth paths + settings)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; rule bindings live in code
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    FailureMode, GuardConfig, GuardSettings, ListenerConfig, ObservabilityConfig, RedirectStatus,
    RouteEntry, TimeoutConfig,
};
pub use validation::ValidationError;
