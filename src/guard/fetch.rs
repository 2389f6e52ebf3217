//! Collaborator hooks: data fetching and error responses.

use std::future::Future;

use axum::http::request::Parts;
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::error::{BoxError, GuardError};

pub type FetchResult<D> = Result<Option<D>, BoxError>;

/// Supplies the data rules inspect (session, user, ...).
///
/// Called only for protected paths. `Ok(None)` and `Err(_)` both end the
/// request in the `Errored` state.
pub trait DataFetcher<D>: Send + Sync {
    fn fetch<'a>(&'a self, request: &'a Parts) -> BoxFuture<'a, FetchResult<D>>;
}

/// Produces the response for a request that ended in an error.
pub trait ErrorHandler: Send + Sync {
    fn on_error<'a>(&'a self, request: &'a Parts, error: &'a GuardError) -> BoxFuture<'a, Response>;
}

/// Fetcher built from a closure, see [`fetch_fn`].
#[derive(Clone, Copy)]
pub struct FetchFn<F> {
    f: F,
}

/// Wrap a closure as a [`DataFetcher`].
///
/// The returned future must not borrow the request; copy out the headers
/// or cookies it needs first.
pub fn fetch_fn<D, F, Fut>(f: F) -> FetchFn<F>
where
    F: Fn(&Parts) -> Fut + Send + Sync,
    Fut: Future<Output = FetchResult<D>> + Send + 'static,
{
    FetchFn { f }
}

impl<D, F, Fut> DataFetcher<D> for FetchFn<F>
where
    F: Fn(&Parts) -> Fut + Send + Sync,
    Fut: Future<Output = FetchResult<D>> + Send + 'static,
{
    fn fetch<'a>(&'a self, request: &'a Parts) -> BoxFuture<'a, FetchResult<D>> {
        Box::pin((self.f)(request))
    }
}

/// Error handler built from a closure, see [`error_fn`].
#[derive(Clone, Copy)]
pub struct ErrorFn<F> {
    f: F,
}

/// Wrap a closure as an [`ErrorHandler`].
pub fn error_fn<F, Fut>(f: F) -> ErrorFn<F>
where
    F: Fn(&Parts, &GuardError) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    ErrorFn { f }
}

impl<F, Fut> ErrorHandler for ErrorFn<F>
where
    F: Fn(&Parts, &GuardError) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn on_error<'a>(&'a self, request: &'a Parts, error: &'a GuardError) -> BoxFuture<'a, Response> {
        Box::pin((self.f)(request, error))
    }
}
