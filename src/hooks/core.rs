//! Hook chain core - ordered before/after callables with short-circuit and
//! replacement threading.

use std::sync::Arc;

use tracing::debug;

use crate::server::{Outcome, Request, Response};

/// A before-request hook. `Ok(Some(outcome))` short-circuits the pipeline;
/// `Ok(None)` continues to the next hook or the handler; `Err` is resolved
/// like a handler error.
pub type BeforeHook = Arc<dyn Fn(&mut Request) -> anyhow::Result<Option<Outcome>> + Send + Sync>;

/// An after-request hook. May mutate the response in place and return `None`,
/// or return a replacement response.
pub type AfterHook = Arc<dyn Fn(&Request, &mut Response) -> Option<Response> + Send + Sync>;

/// Ordered lists of before- and after-request hooks.
///
/// Registration order is execution order for both lists.
#[derive(Default)]
pub struct HookChain {
    before: Vec<BeforeHook>,
    after: Vec<AfterHook>,
}

impl HookChain {
    /// Create an empty hook chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a before-request hook.
    pub fn add_before<F>(&mut self, hook: F)
    where
        F: Fn(&mut Request) -> anyhow::Result<Option<Outcome>> + Send + Sync + 'static,
    {
        self.before.push(Arc::new(hook));
    }

    /// Register an after-request hook.
    pub fn add_after<F>(&mut self, hook: F)
    where
        F: Fn(&Request, &mut Response) -> Option<Response> + Send + Sync + 'static,
    {
        self.after.push(Arc::new(hook));
    }

    /// Run the before-hooks in registration order.
    ///
    /// Stops at the first hook that returns an outcome; no further
    /// before-hooks and no route handler run in that case.
    ///
    /// # Errors
    ///
    /// Propagates the first hook error, to be resolved like a handler error.
    pub fn run_before(&self, req: &mut Request) -> anyhow::Result<Option<Outcome>> {
        for (idx, hook) in self.before.iter().enumerate() {
            if let Some(outcome) = hook(req)? {
                debug!(hook_idx = idx, "Before-hook returned early response");
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    /// Run the after-hooks in registration order against the current
    /// response, threading replacements: a hook that returns a response makes
    /// it the current response for subsequent hooks and for serialization.
    #[must_use]
    pub fn run_after(&self, req: &Request, mut resp: Response) -> Response {
        for (idx, hook) in self.after.iter().enumerate() {
            if let Some(replacement) = hook(req, &mut resp) {
                debug!(hook_idx = idx, "After-hook replaced response");
                resp = replacement;
            }
        }
        resp
    }

    /// Number of registered before-hooks.
    #[must_use]
    pub fn before_len(&self) -> usize {
        self.before.len()
    }

    /// Number of registered after-hooks.
    #[must_use]
    pub fn after_len(&self) -> usize {
        self.after.len()
    }
}
