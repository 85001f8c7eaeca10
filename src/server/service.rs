//! The application object: registration surface and accept loop.

use std::io;
use std::sync::Arc;

use http::Method;
use tracing::info;

use crate::dispatcher::Dispatcher;
use crate::errors::ErrorResolver;
use crate::hooks::HookChain;
use crate::router::Router;
use crate::server::transport::{Listener, Spawn};
use crate::server::{Outcome, Request, Response};

/// An application instance owning the router, hook lists, and error
/// registries.
///
/// All registration happens before serving starts; [`App::build`] consumes
/// the app and freezes the registrations into an immutable [`Dispatcher`]
/// shared across connection units. Multiple `App` instances coexist without
/// interference; there is no global state.
///
/// # Example
///
/// ```
/// use microroute::App;
///
/// let mut app = App::new();
/// app.get("/", |_req| Ok("hello".into()));
/// app.before_request(|req| {
///     req.set_bag("traced", true)?;
///     Ok(None)
/// });
/// let dispatcher = app.build();
/// ```
#[derive(Default)]
pub struct App {
    router: Router,
    hooks: HookChain,
    errors: ErrorResolver,
}

impl App {
    /// Create an application with no routes, hooks, or error handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route for an explicit method set.
    pub fn route<F>(&mut self, methods: &[Method], pattern: &str, handler: F)
    where
        F: Fn(&mut Request) -> anyhow::Result<Outcome> + Send + Sync + 'static,
    {
        self.router.add_route(methods, pattern, handler);
    }

    /// Register a GET route.
    pub fn get<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Request) -> anyhow::Result<Outcome> + Send + Sync + 'static,
    {
        self.route(&[Method::GET], pattern, handler);
    }

    /// Register a POST route.
    pub fn post<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Request) -> anyhow::Result<Outcome> + Send + Sync + 'static,
    {
        self.route(&[Method::POST], pattern, handler);
    }

    /// Register a PUT route.
    pub fn put<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Request) -> anyhow::Result<Outcome> + Send + Sync + 'static,
    {
        self.route(&[Method::PUT], pattern, handler);
    }

    /// Register a DELETE route.
    pub fn delete<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Request) -> anyhow::Result<Outcome> + Send + Sync + 'static,
    {
        self.route(&[Method::DELETE], pattern, handler);
    }

    /// Register a before-request hook. Hooks run in registration order prior
    /// to routing; returning `Ok(Some(outcome))` short-circuits the pipeline.
    pub fn before_request<F>(&mut self, hook: F)
    where
        F: Fn(&mut Request) -> anyhow::Result<Option<Outcome>> + Send + Sync + 'static,
    {
        self.hooks.add_before(hook);
    }

    /// Register an after-request hook. Hooks run in registration order once a
    /// response exists; returning `Some(response)` replaces the current one.
    pub fn after_request<F>(&mut self, hook: F)
    where
        F: Fn(&Request, &mut Response) -> Option<Response> + Send + Sync + 'static,
    {
        self.hooks.add_after(hook);
    }

    /// Register an error handler for an exact status code.
    pub fn on_status<F>(&mut self, status: u16, handler: F)
    where
        F: Fn(&mut Request) -> anyhow::Result<Outcome> + Send + Sync + 'static,
    {
        self.errors.on_status(status, handler);
    }

    /// Register an error handler for a concrete error kind `E`, matched
    /// against the failed handler's error chain in registration order.
    pub fn on_error<E, F>(&mut self, handler: F)
    where
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(&mut Request, &anyhow::Error) -> anyhow::Result<Outcome> + Send + Sync + 'static,
    {
        self.errors.on_error::<E, F>(handler);
    }

    /// Freeze the registrations into an immutable dispatcher.
    #[must_use]
    pub fn build(self) -> Dispatcher {
        info!(
            routes = self.router.len(),
            before_hooks = self.hooks.before_len(),
            after_hooks = self.hooks.after_len(),
            "Application frozen for serving"
        );
        Dispatcher::new(self.router, self.hooks, self.errors)
    }

    /// Serve connections from `listener`, handing each accepted stream to a
    /// unit of execution created by `spawner`. Per-request state is owned by
    /// that unit alone; the dispatcher is shared read-only.
    ///
    /// Runs until `accept` fails.
    ///
    /// # Errors
    ///
    /// Returns the first `accept` error.
    pub fn serve<L, S>(self, mut listener: L, spawner: &S) -> io::Result<()>
    where
        L: Listener,
        S: Spawn,
    {
        let dispatcher = Arc::new(self.build());
        loop {
            let stream = listener.accept()?;
            let dispatcher = Arc::clone(&dispatcher);
            spawner.spawn(Box::new(move || dispatcher.handle_connection(stream)));
        }
    }
}
