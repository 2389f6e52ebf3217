//! Shared utilities for integration testing.

use std::net::SocketAddr;

use axum::extract::Path;
use axum::http::request::Parts;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use route_guard::config::{parse_config, GuardConfig};
use route_guard::guard::{fetch_fn, rule_fn, FetchResult, GuardBuilder, RuleContext};
use route_guard::{GuardServer, RedirectOptions, Shutdown};

pub const CONFIG: &str = r#"
auth_paths = ["/admin/*", "/posts/[id]"]

[[routes]]
key = "/"
path = "/"

[[routes]]
key = "/login"
path = "/login"

[[routes]]
key = "/admin"
path = "/admin"

[[routes]]
key = "/admin/users/[id]"
path = "/admin/users/[id]"
is_dynamic = true
params = ["id"]

[[routes]]
key = "/posts/[id]"
path = "/posts/[id]"
is_dynamic = true
params = ["id"]
"#;

#[derive(Debug, Clone)]
pub struct Role(pub String);

pub fn app() -> Router {
    Router::new()
        .route("/", get(|| async { "home" }))
        .route("/login", get(|| async { "login" }))
        .route("/admin", get(|| async { "admin" }))
        .route(
            "/admin/users/{id}",
            get(|Path(id): Path<String>| async move { format!("user {id}") }),
        )
        .route(
            "/posts/{id}",
            get(|Path(id): Path<String>| async move { format!("post {id}") }),
        )
}

/// Guard that reads the role from `x-role` and fails the fetch on `x-fail`.
pub fn builder(config: &GuardConfig) -> GuardBuilder<Role> {
    GuardBuilder::<Role>::from_config(config)
        .unwrap()
        .rule(
            "/admin/*",
            rule_fn(|ctx: RuleContext<Role>| async move {
                if ctx.data.0 == "admin" {
                    Ok(ctx.next())
                } else {
                    Ok(ctx.redirect_with(
                        "/login",
                        RedirectOptions::new().query("next", ctx.path.clone()),
                    ))
                }
            }),
        )
        .rule(
            "/posts/[id]",
            rule_fn(|ctx: RuleContext<Role>| async move {
                match ctx.params.get("id") {
                    Some("0") => Ok(ctx.redirect("/")),
                    _ => Ok(ctx.next()),
                }
            }),
        )
        .fetch(fetch_fn(|parts: &Parts| {
            let fail = parts.headers.contains_key("x-fail");
            let role = parts
                .headers
                .get("x-role")
                .and_then(|v| v.to_str().ok())
                .map(|v| Role(v.to_string()));
            async move {
                if fail {
                    return FetchResult::<Role>::Err("session store unavailable".into());
                }
                Ok(role)
            }
        }))
}

/// Start a guarded server on an ephemeral port.
pub async fn start_server(config: GuardConfig, builder: GuardBuilder<Role>) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = GuardServer::new(config, app(), builder.build().unwrap());
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    (addr, shutdown)
}

pub fn config() -> GuardConfig {
    parse_config(CONFIG).unwrap()
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
