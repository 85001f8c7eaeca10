//! # Errors Module
//!
//! The error resolver translates failures into fallback responses.
//!
//! ## Overview
//!
//! Two independent registries:
//!
//! - **status code → handler**, used when the pipeline completes with a
//!   particular status (404/405 from routing, 500 from an uncaught error) and
//!   a handler was registered for that exact code
//! - **error kind → handler**, an ordered list of `(predicate, handler)`
//!   pairs matched against the failed handler's error chain, tested in
//!   registration order; register the concrete kind before the generic
//!   fallback
//!
//! When the route handler fails, error-kind handlers are tried first; if none
//! match, the 500 status handler; else the built-in default
//! `("Internal server error", 500)`. When routing fails, the 404/405 status
//! handler is tried, else the built-in `"Not found"` / `"Method not allowed"`
//! body. A handler's result is normalized exactly like a route handler's.

mod core;

pub use core::{ErrorResolver, StatusHandler};
