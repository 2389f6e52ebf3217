//! Access Control Middleware.
//! Runs the guard for every request and turns its action into a response.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    Router,
};

use crate::config::{FailureMode, RedirectStatus};
use crate::guard::{Action, Guard};

/// Protect every route of `router` with `guard`.
pub fn protect<D: Send + Sync + 'static>(router: Router, guard: Arc<Guard<D>>) -> Router {
    router.layer(middleware::from_fn_with_state(guard, access_control_middleware::<D>))
}

pub async fn access_control_middleware<D: Send + Sync + 'static>(
    State(guard): State<Arc<Guard<D>>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    match guard.decide(&parts).await {
        Action::Allow => next.run(Request::from_parts(parts, body)).await,
        Action::Redirect(destination) => match guard.redirect_status() {
            RedirectStatus::Temporary => Redirect::temporary(&destination).into_response(),
            RedirectStatus::Permanent => Redirect::permanent(&destination).into_response(),
        },
        Action::Error(error) => {
            if let Some(handler) = guard.error_handler() {
                return handler.on_error(&parts, &error).await;
            }

            match guard.failure_mode() {
                FailureMode::Allow => {
                    tracing::warn!(path = %parts.uri.path(), error = %error, "Unhandled guard error, allowing");
                    next.run(Request::from_parts(parts, body)).await
                }
                FailureMode::Deny => {
                    tracing::warn!(path = %parts.uri.path(), error = %error, "Unhandled guard error, denying");
                    (StatusCode::FORBIDDEN, "Access denied").into_response()
                }
            }
        }
    }
}
