//! Dispatcher core - hot path for request dispatch.

use std::io::{BufReader, Read, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, info, warn};

use crate::errors::ErrorResolver;
use crate::hooks::HookChain;
use crate::router::{Resolution, Router};
use crate::server::{Request, Response};

/// The frozen dispatch pipeline: route table, hook chain, and error
/// registries, built once at setup time and shared read-only across
/// connection units. No locking is required during dispatch because no
/// concurrent writer exists after setup completes.
pub struct Dispatcher {
    /// Route table, immutable after registration.
    pub router: Router,
    /// Before/after hook chains, immutable after registration.
    pub hooks: HookChain,
    /// Status-code and error-kind registries, immutable after registration.
    pub errors: ErrorResolver,
}

impl Dispatcher {
    /// Assemble a dispatcher from its parts.
    #[must_use]
    pub fn new(router: Router, hooks: HookChain, errors: ErrorResolver) -> Self {
        Self {
            router,
            hooks,
            errors,
        }
    }

    /// Serve one connection: read a single request, dispatch it, write the
    /// serialized response, and close (drop) the stream.
    ///
    /// A transport failure before a full request arrives abandons the
    /// connection without a response; every other failure still produces a
    /// complete response.
    pub fn handle_connection<S: Read + Write>(&self, stream: S) {
        let mut stream = BufReader::new(stream);
        let mut req = match Request::read_from(&mut stream) {
            Ok(Some(req)) => req,
            Ok(None) => {
                debug!("Connection closed before a request arrived");
                return;
            }
            Err(err) => {
                warn!(error = %err, "Abandoning connection: unreadable request");
                return;
            }
        };

        let mut resp = self.dispatch(&mut req);
        resp.finalize();
        let wire = resp.serialize();

        let stream = stream.get_mut();
        if let Err(err) = stream.write_all(&wire).and_then(|()| stream.flush()) {
            warn!(error = %err, "Failed to write response");
        }
        info!(
            method = %req.method,
            path = %req.path,
            status = resp.status,
            response_bytes = wire.len(),
            "Request complete"
        );
    }

    /// Run the dispatch pipeline for one request and return the final
    /// response. Exactly one response is produced, even on internal failure.
    #[must_use]
    pub fn dispatch(&self, req: &mut Request) -> Response {
        let resp = self.produce_response(req);
        // After-hooks run whether the response came from the handler, an
        // error handler, or a short-circuiting before-hook.
        self.hooks.run_after(req, resp)
    }

    fn produce_response(&self, req: &mut Request) -> Response {
        match self.hooks.run_before(req) {
            Ok(Some(outcome)) => {
                debug!("Before-hook short-circuited the pipeline");
                return outcome.into_response();
            }
            Ok(None) => {}
            Err(err) => return self.errors.resolve_error(req, &err),
        }

        let (handler, params) = match self.router.resolve(&req.method, &req.path) {
            Resolution::Matched { handler, params } => (handler, params),
            Resolution::NotFound => return self.errors.resolve_status(req, 404),
            Resolution::MethodNotAllowed => return self.errors.resolve_status(req, 405),
        };
        req.path_params = params;

        match catch_unwind(AssertUnwindSafe(|| handler(req))) {
            Ok(Ok(outcome)) => outcome.into_response(),
            Ok(Err(err)) => self.errors.resolve_error(req, &err),
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                let err = anyhow::anyhow!("handler panicked: {message}");
                self.errors.resolve_error(req, &err)
            }
        }
    }
}
