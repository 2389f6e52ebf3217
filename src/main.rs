//! Route guard demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ TraceLayer ─▶ TimeoutLayer ─▶ access control middleware
//!                                                        │
//!                                   unprotected ◀────────┤ AnyMatcher(auth_paths)
//!                                        │               │ protected
//!                                        │               ▼
//!                                        │          DataFetcher (x-user header)
//!                                        │               │
//!                                        │               ▼
//!                                        │          Executor: most specific rule group
//!                                        │               │
//!                                        ▼               ▼
//!     Client Response ◀──────────── handler   |   307/308 redirect   |   403 / error handler
//! ```
//!
//! The demo identifies users from an `x-user: name:role` header. `/admin`
//! requires the `admin` role and `/posts/[id]` requires any signed-in user.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::extract::Path;
use axum::http::request::Parts;
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use serde_json::json;
use tokio::net::TcpListener;

use route_guard::config::{load_config, parse_config, GuardConfig};
use route_guard::guard::{fetch_fn, rule_fn, FetchResult, Guard, GuardBuilder, RuleContext};
use route_guard::lifecycle::{signals, Shutdown};
use route_guard::observability::{logging, metrics};
use route_guard::{GuardServer, RedirectOptions};

const DEMO_CONFIG: &str = r#"
auth_paths = ["/admin/*", "/posts/[id]"]

[listener]
bind_address = "127.0.0.1:8080"

[[routes]]
key = "/"
path = "/"

[[routes]]
key = "/login"
path = "/login"

[[routes]]
key = "/posts"
path = "/posts"

[[routes]]
key = "/posts/[id]"
path = "/posts/[id]"
is_dynamic = true
params = ["id"]

[[routes]]
key = "/admin"
path = "/admin"
"#;

#[derive(Debug, Parser)]
#[command(name = "route-guard", about = "Route guard demo server")]
struct Cli {
    /// Path to a TOML config file; the built-in demo config is used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[derive(Debug, Clone)]
struct User {
    name: String,
    role: String,
}

impl User {
    fn guest() -> Self {
        Self {
            name: "guest".to_string(),
            role: "guest".to_string(),
        }
    }

    fn is_logged_in(&self) -> bool {
        self.role != "guest"
    }
}

/// Parse `x-user: name:role`. A missing header is a guest.
fn user_from_headers(parts: &Parts) -> Option<User> {
    let Some(value) = parts.headers.get("x-user") else {
        return Some(User::guest());
    };
    let (name, role) = value.to_str().ok()?.split_once(':')?;
    Some(User {
        name: name.to_string(),
        role: role.to_string(),
    })
}

fn app() -> Router {
    Router::new()
        .route("/", get(|| async { Json(json!({ "page": "home" })) }))
        .route("/login", get(|| async { Json(json!({ "page": "login" })) }))
        .route("/posts", get(|| async { Json(json!({ "page": "posts" })) }))
        .route(
            "/posts/{id}",
            get(|Path(id): Path<String>| async move { Json(json!({ "page": "post", "id": id })) }),
        )
        .route("/admin", get(|| async { Json(json!({ "page": "admin" })) }))
}

fn guard(config: &GuardConfig) -> Result<Guard<User>, Box<dyn std::error::Error>> {
    let guard = GuardBuilder::<User>::from_config(config)?
        .rule(
            "/posts/[id]",
            rule_fn(|ctx: RuleContext<User>| async move {
                if ctx.data.is_logged_in() {
                    return Ok(ctx.next());
                }
                Ok(ctx.redirect_with("/login", RedirectOptions::new().query("next", ctx.path.clone())))
            }),
        )
        .rule(
            "/admin",
            rule_fn(|ctx: RuleContext<User>| async move {
                if !ctx.data.is_logged_in() {
                    return Ok(ctx.redirect_with(
                        "/login",
                        RedirectOptions::new().query("next", ctx.path.clone()),
                    ));
                }
                Ok(ctx.next())
            }),
        )
        .rule(
            "/admin",
            rule_fn(|ctx: RuleContext<User>| async move {
                if ctx.data.role == "admin" {
                    return Ok(ctx.next());
                }
                tracing::debug!(user = %ctx.data.name, role = %ctx.data.role, "Not an admin");
                Ok(ctx.redirect("/"))
            }),
        )
        .fetch(fetch_fn(|parts: &Parts| {
            let user = user_from_headers(parts);
            async move { FetchResult::<User>::Ok(user) }
        }))
        .build()?;
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => parse_config(DEMO_CONFIG)?,
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level)?;

    tracing::info!("route-guard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        auth_paths = config.auth_paths.len(),
        failure_mode = ?config.guard.failure_mode,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let guard = guard(&config)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let _signals = signals::shutdown_on_ctrl_c(shutdown.clone());

    GuardServer::new(config, app(), guard)
        .run(listener, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
