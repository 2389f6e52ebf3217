//! HTTP server setup.
//!
//! # Responsibilities
//! - Wrap the application router with the guard middleware
//! - Wire up tower-http layers (tracing, request timeout)
//! - Bind server to listener and stop on the shutdown signal

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GuardConfig;
use crate::guard::Guard;
use crate::http::middleware::protect;

/// HTTP server serving an application behind a guard.
pub struct GuardServer {
    router: Router,
    config: GuardConfig,
}

impl GuardServer {
    /// Create a server for `app`, protected by `guard`.
    pub fn new<D: Send + Sync + 'static>(config: GuardConfig, app: Router, guard: Guard<D>) -> Self {
        let router = Self::build_router(&config, app, Arc::new(guard));
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router<D: Send + Sync + 'static>(
        config: &GuardConfig,
        app: Router,
        guard: Arc<Guard<D>>,
    ) -> Router {
        protect(app, guard)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::guard::{fetch_fn, rule_fn, FetchResult, RuleContext};
    use axum::body::Body;
    use axum::http::{header, request::Parts, Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    const CONFIG: &str = r#"
auth_paths = ["/admin"]

[timeouts]
request_secs = 5

[[routes]]
key = "/"
path = "/"

[[routes]]
key = "/admin"
path = "/admin"
"#;

    fn server() -> GuardServer {
        let config = parse_config(CONFIG).unwrap();
        let guard = Guard::<()>::builder(config.route_table().unwrap())
            .protect_all(config.auth_paths.iter().cloned())
            .rule(
                "/admin",
                rule_fn(|ctx: RuleContext<()>| async move { Ok(ctx.redirect("/")) }),
            )
            .fetch(fetch_fn(|_parts: &Parts| async move { FetchResult::<()>::Ok(Some(())) }))
            .build()
            .unwrap();
        let app = Router::new()
            .route("/", get(|| async { "home" }))
            .route("/admin", get(|| async { "admin" }))
            .route("/admin/{*rest}", get(|| async { "admin" }));

        GuardServer::new(config, app, guard)
    }

    fn request(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_keeps_config() {
        let server = server();
        assert_eq!(server.config().timeouts.request_secs, 5);
        assert_eq!(server.config().auth_paths, vec!["/admin".to_string()]);
    }

    #[tokio::test]
    async fn test_layered_router() {
        let router = server().router();

        let response = router.clone().oneshot(request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        for path in ["/admin", "/admin/settings"] {
            let response = router.clone().oneshot(request(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
            assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
        }
    }
}
