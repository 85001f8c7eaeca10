//! # Dispatcher Module
//!
//! The per-connection dispatch pipeline.
//!
//! ## Overview
//!
//! The dispatcher is the only component with side effects on the transport;
//! the router, hook chain, and error resolver are pure decision logic it
//! calls in sequence. Per connection the states are strictly sequential:
//!
//! ```text
//! ACCEPTED → BEFORE_HOOKS → ROUTE_RESOLVED → HANDLER_INVOKED →
//! AFTER_HOOKS → SERIALIZED → WRITTEN → CLOSED
//! ```
//!
//! The terminal state is always `CLOSED`, reached even on failure at any
//! prior state: a failure transitions to error-response construction, then
//! still runs the after-hooks, then serializes, writes, and closes. The one
//! exception is a transport-level read failure (EOF or malformed bytes
//! before a full request), which abandons the connection without a response.
//!
//! ## Error Handling
//!
//! - Routing failures become 404/405 responses via the error resolver
//! - Route handler errors *and panics* are caught at the dispatch boundary
//!   and resolved through the error-kind registry, falling back to 500
//! - Before-hook errors are treated uniformly with handler errors
//! - Write failures are logged; the connection closes regardless

mod core;

pub use core::Dispatcher;
