//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Guard decisions produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging via `tracing` fields, never formatted strings
//! - Metrics are cheap (atomic increments) and always recorded;
//!   the exporter is optional

pub mod logging;
pub mod metrics;
