//! Error resolver core - status-code and error-kind registries with built-in
//! defaults.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::server::{Outcome, Request, Response};

/// A status-code error handler. Produces a result that is normalized like a
/// route handler's; the handler's own status applies (default 200), not the
/// status it was registered under.
pub type StatusHandler = Arc<dyn Fn(&mut Request) -> anyhow::Result<Outcome> + Send + Sync>;

type KindHandler =
    Arc<dyn Fn(&mut Request, &anyhow::Error) -> anyhow::Result<Outcome> + Send + Sync>;
type KindPredicate = Arc<dyn Fn(&anyhow::Error) -> bool + Send + Sync>;

/// Registry translating a failure (status code or error kind) into a fallback
/// response.
///
/// Immutable after registration; resolution is read-only during dispatch.
#[derive(Default)]
pub struct ErrorResolver {
    status_handlers: HashMap<u16, StatusHandler>,
    kind_handlers: Vec<(KindPredicate, KindHandler)>,
}

impl ErrorResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an exact status code.
    pub fn on_status<F>(&mut self, status: u16, handler: F)
    where
        F: Fn(&mut Request) -> anyhow::Result<Outcome> + Send + Sync + 'static,
    {
        self.status_handlers.insert(status, Arc::new(handler));
    }

    /// Register a handler for a concrete error kind `E`.
    ///
    /// The handler matches when `E` appears anywhere in the failed handler's
    /// error chain. Handlers are tested in registration order; register a
    /// concrete kind before a generic fallback kind so the concrete one wins.
    pub fn on_error<E, F>(&mut self, handler: F)
    where
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(&mut Request, &anyhow::Error) -> anyhow::Result<Outcome> + Send + Sync + 'static,
    {
        let predicate: KindPredicate =
            Arc::new(|err| err.chain().any(|cause| cause.downcast_ref::<E>().is_some()));
        self.kind_handlers.push((predicate, Arc::new(handler)));
    }

    /// Resolve a pipeline failure that completed with `status` (404 from
    /// routing, 405 from a disallowed method, 500 from an uncaught error).
    pub fn resolve_status(&self, req: &mut Request, status: u16) -> Response {
        if let Some(handler) = self.status_handlers.get(&status) {
            debug!(status, "Status error handler selected");
            match handler(req) {
                Ok(outcome) => return outcome.into_response(),
                Err(err) => {
                    error!(status, error = %err, "Status error handler failed");
                }
            }
        }
        default_response(status)
    }

    /// Resolve a failed route handler (or before-hook) invocation.
    ///
    /// Error-kind handlers are tried first, in registration order; if none
    /// match, falls back to the 500 status handler, else the built-in
    /// default. A matched handler that itself fails drops straight to the
    /// built-in default to keep the one-response-per-request invariant.
    pub fn resolve_error(&self, req: &mut Request, err: &anyhow::Error) -> Response {
        warn!(error = %err, "Handler failed; resolving error response");
        for (idx, (matches, handler)) in self.kind_handlers.iter().enumerate() {
            if !matches(err) {
                continue;
            }
            debug!(handler_idx = idx, "Error-kind handler selected");
            match handler(req, err) {
                Ok(outcome) => return outcome.into_response(),
                Err(inner) => {
                    error!(error = %inner, "Error-kind handler failed");
                    return default_response(500);
                }
            }
        }
        self.resolve_status(req, 500)
    }

    /// Whether any handler is registered for the given status code.
    #[must_use]
    pub fn has_status_handler(&self, status: u16) -> bool {
        self.status_handlers.contains_key(&status)
    }
}

/// Built-in default responses naming the failure at a generic level; no
/// internal diagnostics leak into the body.
fn default_response(status: u16) -> Response {
    let body = match status {
        404 => "Not found",
        405 => "Method not allowed",
        _ => "Internal server error",
    };
    Response::with_body(status, body)
}
