//! Rule execution.
//!
//! # Flow
//! ```text
//! concrete path
//!     → every rule group whose pattern matches
//!     → prioritize (wildcards last)
//!     → first group only: run its rules in order
//!         Next     → Continuing, run the following rule
//!         Pass     → unchanged, run the following rule
//!         Redirect → Redirecting, skip the remaining rules
//!         Err      → Errored, skip the remaining rules
//!     → list exhausted → PassThrough
//!     → resolve into an Action
//! ```
//!
//! Only one group is ever evaluated per request. A group with no rules
//! passes through immediately.

use std::sync::Arc;

use crate::error::GuardError;
use crate::guard::rule::{Decision, Redirect, Rule, RuleContext};
use crate::routing::{params, priority, Matcher, RoutePattern, RouteTable};

/// Terminal outcome for one request.
#[derive(Debug)]
pub enum Action {
    /// Continue serving the original request.
    Allow,
    /// Send the client to this path.
    Redirect(String),
    /// Fetching or evaluation failed.
    Error(GuardError),
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Allow => "allow",
            Action::Redirect(_) => "redirect",
            Action::Error(_) => "error",
        }
    }
}

/// Evaluation state for one rule group.
#[derive(Debug)]
enum Evaluation {
    Evaluating,
    Continuing,
    Redirecting(Redirect),
    PassThrough { continued: bool },
    Errored(GuardError),
}

impl Evaluation {
    fn step(self, decision: Decision) -> Self {
        match (self, decision) {
            (Evaluation::Evaluating | Evaluation::Continuing, Decision::Redirect(r)) => {
                Evaluation::Redirecting(r)
            }
            (Evaluation::Evaluating | Evaluation::Continuing, Decision::Next) => {
                Evaluation::Continuing
            }
            (state, _) => state,
        }
    }

    fn fail(self, error: GuardError) -> Self {
        match self {
            Evaluation::Evaluating | Evaluation::Continuing => Evaluation::Errored(error),
            terminal => terminal,
        }
    }

    /// Close the evaluation once the rule list is exhausted.
    fn finish(self) -> Self {
        match self {
            Evaluation::Evaluating => Evaluation::PassThrough { continued: false },
            Evaluation::Continuing => Evaluation::PassThrough { continued: true },
            terminal => terminal,
        }
    }

    fn is_terminal(&self) -> bool {
        !matches!(self, Evaluation::Evaluating | Evaluation::Continuing)
    }

    fn resolve(self, routes: &RouteTable, route: &str, path: &str) -> Action {
        match self {
            Evaluation::Redirecting(redirect) => {
                let destination = match routes.link(&redirect.target, &redirect.options) {
                    Ok(destination) => destination,
                    Err(_) => {
                        tracing::warn!(
                            route = %route,
                            target = %redirect.target,
                            "Rule redirected to an unknown route"
                        );
                        return Action::Error(GuardError::UnknownRedirectTarget {
                            route: route.to_string(),
                            target: redirect.target,
                        });
                    }
                };
                if destination == path {
                    tracing::debug!(path = %path, "Ignoring redirect to the current path");
                    Action::Allow
                } else {
                    Action::Redirect(destination)
                }
            }
            Evaluation::Errored(error) => Action::Error(error),
            Evaluation::PassThrough { continued } => {
                tracing::trace!(path = %path, continued, "Rules passed through");
                Action::Allow
            }
            // finish() runs before resolve()
            Evaluation::Evaluating | Evaluation::Continuing => Action::Allow,
        }
    }
}

/// Ordered rules registered under one rule key.
pub struct RuleGroup<D> {
    key: String,
    pattern: RoutePattern,
    rules: Vec<Arc<dyn Rule<D>>>,
}

impl<D> RuleGroup<D> {
    pub fn new(key: impl Into<String>, pattern: RoutePattern) -> Self {
        Self {
            key: key.into(),
            pattern,
            rules: Vec::new(),
        }
    }

    pub fn push(&mut self, rule: Arc<dyn Rule<D>>) {
        self.rules.push(rule);
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<D> AsRef<RoutePattern> for RuleGroup<D> {
    fn as_ref(&self) -> &RoutePattern {
        &self.pattern
    }
}

impl<D> std::fmt::Debug for RuleGroup<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleGroup")
            .field("key", &self.key)
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// Runs the rule set against concrete paths.
pub struct Executor<D> {
    routes: Arc<RouteTable>,
    groups: Vec<RuleGroup<D>>,
}

impl<D: Send + Sync + 'static> Executor<D> {
    pub fn new(routes: Arc<RouteTable>, groups: Vec<RuleGroup<D>>) -> Self {
        Self { routes, groups }
    }

    /// Rule groups matching `path`, highest priority first.
    pub fn matches(&self, path: &str) -> Vec<&RuleGroup<D>> {
        let mut matched: Vec<&RuleGroup<D>> = self
            .groups
            .iter()
            .filter(|group| group.pattern.matches(path))
            .collect();
        priority::prioritize(&mut matched);
        matched
    }

    /// Evaluate the highest-priority matching group for `path`.
    pub async fn evaluate(&self, path: &str, data: Arc<D>) -> Action {
        let matched = self.matches(path);
        let Some(group) = matched.first() else {
            tracing::debug!(path = %path, "No rule group matched");
            return Action::Allow;
        };

        tracing::debug!(
            path = %path,
            route = %group.key,
            candidates = matched.len(),
            rules = group.rules.len(),
            "Evaluating rule group"
        );

        let params = params::extract(&group.pattern, path);
        let mut state = Evaluation::Evaluating;

        for (index, rule) in group.rules.iter().enumerate() {
            let ctx = RuleContext {
                data: Arc::clone(&data),
                path: path.to_string(),
                route: group.key.clone(),
                params: params.clone(),
            };

            state = match rule.check(ctx).await {
                Ok(decision) => state.step(decision),
                Err(source) => state.fail(GuardError::Rule {
                    route: group.key.clone(),
                    source,
                }),
            };

            if state.is_terminal() {
                tracing::debug!(route = %group.key, rule = index, "Rule ended evaluation");
                break;
            }
        }

        state.finish().resolve(&self.routes, &group.key, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::rule::{rule_fn, RuleResult};
    use crate::routing::RedirectOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct User {
        admin: bool,
    }

    fn routes() -> Arc<RouteTable> {
        Arc::new(
            RouteTable::from_templates(["/", "/login", "/admin", "/admin/users", "/posts", "/posts/[id]"])
                .unwrap(),
        )
    }

    fn group(
        routes: &RouteTable,
        key: &str,
        rules: Vec<Arc<dyn Rule<User>>>,
    ) -> RuleGroup<User> {
        let mut group = RuleGroup::new(key, routes.resolve(key).unwrap());
        for rule in rules {
            group.push(rule);
        }
        group
    }

    fn next() -> Arc<dyn Rule<User>> {
        Arc::new(rule_fn(|ctx: RuleContext<User>| async move { Ok(ctx.next()) }))
    }

    fn pass() -> Arc<dyn Rule<User>> {
        Arc::new(rule_fn(|ctx: RuleContext<User>| async move { Ok(ctx.pass()) }))
    }

    fn redirect_to(target: &'static str) -> Arc<dyn Rule<User>> {
        Arc::new(rule_fn(move |ctx: RuleContext<User>| async move { Ok(ctx.redirect(target)) }))
    }

    fn counting(counter: Arc<AtomicUsize>) -> Arc<dyn Rule<User>> {
        Arc::new(rule_fn(move |ctx: RuleContext<User>| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(ctx.next())
            }
        }))
    }

    fn user(admin: bool) -> Arc<User> {
        Arc::new(User { admin })
    }

    #[tokio::test]
    async fn test_no_match_allows() {
        let routes = routes();
        let executor = Executor::new(routes.clone(), vec![group(&routes, "/admin", vec![redirect_to("/login")])]);
        assert!(matches!(executor.evaluate("/posts", user(false)).await, Action::Allow));
    }

    #[tokio::test]
    async fn test_redirect_short_circuits() {
        let routes = routes();
        let counter = Arc::new(AtomicUsize::new(0));
        let executor = Executor::new(
            routes.clone(),
            vec![group(
                &routes,
                "/admin",
                vec![next(), redirect_to("/login"), counting(counter.clone())],
            )],
        );

        match executor.evaluate("/admin", user(false)).await {
            Action::Redirect(destination) => assert_eq!(destination, "/login"),
            other => panic!("expected redirect, got {other:?}"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_next_passes_through() {
        let routes = routes();
        let counter = Arc::new(AtomicUsize::new(0));
        let executor = Executor::new(
            routes.clone(),
            vec![group(
                &routes,
                "/admin",
                vec![counting(counter.clone()), pass(), counting(counter.clone())],
            )],
        );

        assert!(matches!(executor.evaluate("/admin", user(true)).await, Action::Allow));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_silent_rules_allow() {
        let routes = routes();
        let executor = Executor::new(routes.clone(), vec![group(&routes, "/admin", vec![pass(), pass()])]);
        assert!(matches!(executor.evaluate("/admin", user(false)).await, Action::Allow));
    }

    #[tokio::test]
    async fn test_self_redirect_is_suppressed() {
        let routes = routes();
        let executor = Executor::new(routes.clone(), vec![group(&routes, "/login", vec![redirect_to("/login")])]);
        assert!(matches!(executor.evaluate("/login", user(false)).await, Action::Allow));
    }

    #[tokio::test]
    async fn test_empty_group_wins_over_wildcard() {
        let routes = routes();
        let counter = Arc::new(AtomicUsize::new(0));
        let executor = Executor::new(
            routes.clone(),
            vec![
                group(&routes, "/admin/*", vec![counting(counter.clone()), redirect_to("/login")]),
                group(&routes, "/admin/users", vec![]),
            ],
        );

        assert!(matches!(executor.evaluate("/admin/users", user(false)).await, Action::Allow));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_specific_group_before_wildcard() {
        let routes = routes();
        let executor = Executor::new(
            routes.clone(),
            vec![
                group(&routes, "/admin/*", vec![redirect_to("/login")]),
                group(&routes, "/admin/users", vec![redirect_to("/")]),
            ],
        );

        let matched: Vec<&str> = executor.matches("/admin/users").iter().map(|g| g.key()).collect();
        assert_eq!(matched, vec!["/admin/users", "/admin/*"]);

        match executor.evaluate("/admin/users", user(false)).await {
            Action::Redirect(destination) => assert_eq!(destination, "/"),
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rule_sees_params_and_data() {
        let routes = routes();
        let rule: Arc<dyn Rule<User>> = Arc::new(rule_fn(|ctx: RuleContext<User>| async move {
            assert_eq!(ctx.path, "/posts/42");
            assert_eq!(ctx.route, "/posts/[id]");
            if ctx.data.admin {
                return Ok(ctx.next());
            }
            let id = ctx.params.get("id").unwrap_or_default().to_string();
            Ok(ctx.redirect_with(
                "/login",
                RedirectOptions::new().query("next", format!("/posts/{id}")),
            ))
        }));
        let executor = Executor::new(routes.clone(), vec![group(&routes, "/posts/[id]", vec![rule])]);

        assert!(matches!(executor.evaluate("/posts/42", user(true)).await, Action::Allow));
        match executor.evaluate("/posts/42", user(false)).await {
            Action::Redirect(destination) => assert_eq!(destination, "/login?next=%2Fposts%2F42"),
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rule_error_aborts() {
        let routes = routes();
        let counter = Arc::new(AtomicUsize::new(0));
        let failing: Arc<dyn Rule<User>> =
            Arc::new(rule_fn(|_ctx: RuleContext<User>| async move { RuleResult::Err("session store down".into()) }));
        let executor = Executor::new(
            routes.clone(),
            vec![group(&routes, "/admin", vec![failing, counting(counter.clone())])],
        );

        match executor.evaluate("/admin", user(true)).await {
            Action::Error(GuardError::Rule { route, .. }) => assert_eq!(route, "/admin"),
            other => panic!("expected rule error, got {other:?}"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_redirect_target() {
        let routes = routes();
        let executor = Executor::new(routes.clone(), vec![group(&routes, "/admin", vec![redirect_to("/nowhere")])]);
        match executor.evaluate("/admin", user(false)).await {
            Action::Error(GuardError::UnknownRedirectTarget { route, target }) => {
                assert_eq!(route, "/admin");
                assert_eq!(target, "/nowhere");
            }
            other => panic!("expected unknown target error, got {other:?}"),
        }
    }
}
