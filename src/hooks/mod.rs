//! # Hooks Module
//!
//! Ordered before-request and after-request hook chains.
//!
//! ## Overview
//!
//! Before-hooks run in registration order prior to routing. A hook may return
//! an [`crate::server::Outcome`], which short-circuits the rest of the chain
//! and the route handler; the normalized response still flows through the
//! after-hooks. Side effects written onto the request's extension bag by an
//! early hook are visible to later hooks and to the handler.
//!
//! After-hooks run in registration order once a response exists, whether it
//! came from the handler, an error handler, or a short-circuiting
//! before-hook. A hook may mutate the response in place, or return a
//! replacement that becomes the current response for subsequent hooks and for
//! serialization.
//!
//! Hook lists are immutable once serving begins.

mod core;

pub use core::{AfterHook, BeforeHook, HookChain};
