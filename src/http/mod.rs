//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing and timeout layers)
//!     → middleware/access_control.rs (guard decides)
//!         Allow    → application router
//!         Redirect → 307/308 with Location
//!         Error    → error handler, or failure mode fallback
//!     → Send to client
//! ```

pub mod middleware;
pub mod server;

pub use middleware::protect;
pub use server::GuardServer;
