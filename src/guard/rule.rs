//! Authorization rules and their control surface.
//!
//! A rule inspects the fetched data, the concrete path and the extracted
//! params, then answers with a `Decision`: continue to the next rule,
//! redirect somewhere, or pass without an explicit signal.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::BoxError;
use crate::routing::{Params, RedirectOptions};

/// What a rule asks the executor to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// This rule permits continuing.
    Next,
    /// Stop here and send the client to a route.
    Redirect(Redirect),
    /// No explicit signal; fall through to the next rule.
    Pass,
}

/// A redirect request: target route key plus options.
///
/// `target` must be a key of the route table, not a raw path. An unknown
/// key ends the request with `GuardError::UnknownRedirectTarget`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: String,
    pub options: RedirectOptions,
}

/// Everything a rule sees for one request.
#[derive(Debug)]
pub struct RuleContext<D> {
    /// Data supplied by the fetcher.
    pub data: Arc<D>,
    /// Concrete request path.
    pub path: String,
    /// Rule key whose group is being evaluated.
    pub route: String,
    /// Values of the `[name]` segments of `route`.
    pub params: Params,
}

impl<D> RuleContext<D> {
    pub fn next(&self) -> Decision {
        Decision::Next
    }

    pub fn redirect(&self, target: impl Into<String>) -> Decision {
        self.redirect_with(target, RedirectOptions::new())
    }

    pub fn redirect_with(&self, target: impl Into<String>, options: RedirectOptions) -> Decision {
        Decision::Redirect(Redirect {
            target: target.into(),
            options,
        })
    }

    pub fn pass(&self) -> Decision {
        Decision::Pass
    }
}

pub type RuleResult = Result<Decision, BoxError>;

/// A unit of authorization logic attached to a rule key.
pub trait Rule<D>: Send + Sync {
    fn check<'a>(&'a self, ctx: RuleContext<D>) -> BoxFuture<'a, RuleResult>;
}

/// Rule built from an async closure, see [`rule_fn`].
#[derive(Clone, Copy)]
pub struct RuleFn<F> {
    f: F,
}

/// Wrap an async closure as a [`Rule`].
pub fn rule_fn<D, F, Fut>(f: F) -> RuleFn<F>
where
    F: Fn(RuleContext<D>) -> Fut + Send + Sync,
    Fut: Future<Output = RuleResult> + Send + 'static,
{
    RuleFn { f }
}

impl<D, F, Fut> Rule<D> for RuleFn<F>
where
    F: Fn(RuleContext<D>) -> Fut + Send + Sync,
    Fut: Future<Output = RuleResult> + Send + 'static,
{
    fn check<'a>(&'a self, ctx: RuleContext<D>) -> BoxFuture<'a, RuleResult> {
        Box::pin((self.f)(ctx))
    }
}

impl<F> std::fmt::Debug for RuleFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleFn").finish_non_exhaustive()
    }
}
