//! # Server Module
//!
//! Request/response model, wire serialization, transport collaborators, and
//! the application registration surface.
//!
//! - [`request`] - the [`Request`] value object, per-request extension bag,
//!   and the minimal HTTP/1.x request reader
//! - [`response`] - the [`Response`] value object, [`Outcome`] normalization,
//!   cookie directives, and HTTP/1.0 serialization
//! - [`transport`] - the [`Listener`] and [`Spawn`] collaborator traits with
//!   `may`-based production implementations
//! - [`service`] - the [`App`] object owning the router, hook chain, and
//!   error registries
//! - [`http_server`] - TCP accept loop and [`ServerHandle`]

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;
pub mod transport;

pub use http_server::ServerHandle;
pub use request::{HeaderVec, Request, MAX_INLINE_HEADERS};
pub use response::{Body, Outcome, Response};
pub use service::App;
pub use transport::{CoroutineSpawner, InlineSpawner, Listener, Spawn};
