//! # microroute
//!
//! **microroute** is a minimal, coroutine-powered HTTP request-dispatch engine
//! for constrained environments, built on the `may` runtime.
//!
//! ## Overview
//!
//! microroute accepts raw socket connections, reads a single HTTP request per
//! connection, routes it to a registered handler by method and path, runs
//! ordered before/after hooks, translates handler results and errors into
//! well-formed HTTP/1.0 responses, and writes the response back before closing
//! the connection.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`router`]** - Ordered route table with `{name}` path patterns and
//!   404/405-aware resolution
//! - **[`hooks`]** - Before/after request hook chains with short-circuit and
//!   replacement semantics
//! - **[`errors`]** - Error resolver mapping status codes and error kinds to
//!   fallback handlers
//! - **[`dispatcher`]** - The per-connection dispatch pipeline
//! - **[`server`]** - Request/response model, wire serialization, transport
//!   collaborators, and the [`App`] registration surface
//! - **[`runtime_config`]** - Environment-based coroutine runtime tuning
//!
//! ## Request Handling Flow
//!
//! 1. The accept loop hands each connection to a fresh coroutine
//! 2. One request is read from the connection (EOF or garbage abandons it)
//! 3. Before-hooks run in registration order; a hook returning an outcome
//!    short-circuits routing and the handler
//! 4. The router resolves `(method, path)`; routing failures and handler
//!    errors are recovered into responses by the error resolver
//! 5. After-hooks run against whatever response exists and may mutate or
//!    replace it
//! 6. The response is finalized (`Content-Length`, `Content-Type`, cookie
//!    headers), serialized, written, and the connection closes
//!
//! Every reachable failure except a transport-level parse failure yields a
//! complete HTTP response; exactly one response is produced per request.
//!
//! ## Quick Start
//!
//! ```no_run
//! use microroute::App;
//!
//! let mut app = App::new();
//! app.get("/", |_req| Ok("hello".into()));
//! app.get("/pets/{id}", |req| {
//!     let id = req.path_param("id").unwrap_or("?").to_string();
//!     Ok(format!("pet {id}").into())
//! });
//!
//! let handle = app.start("0.0.0.0:8080").expect("bind failed");
//! let _ = handle.join();
//! ```
//!
//! ## Runtime Considerations
//!
//! microroute uses the `may` coroutine runtime, not tokio or async-std. Each
//! connection is served by a lightweight coroutine whose stack size is
//! configurable via the `MICROROUTE_STACK_SIZE` environment variable. The
//! route table, hook lists, and error registries are frozen into an immutable
//! [`dispatcher::Dispatcher`] before serving begins, so the dispatch path
//! takes no locks.

pub mod dispatcher;
pub mod errors;
pub mod hooks;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use dispatcher::Dispatcher;
pub use errors::ErrorResolver;
pub use hooks::HookChain;
pub use router::{ParamVec, Resolution, RouteHandler, Router, MAX_INLINE_PARAMS};
pub use server::{
    App, CoroutineSpawner, HeaderVec, InlineSpawner, Listener, Outcome, Request, Response,
    ServerHandle, Spawn, MAX_INLINE_HEADERS,
};
