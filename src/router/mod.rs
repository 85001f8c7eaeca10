//! # Router Module
//!
//! The router module provides path matching and route resolution for
//! microroute. Routes are registered programmatically as
//! `(method set, path pattern, handler)` entries and matched against incoming
//! requests in registration order.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Holding the ordered route table built during application setup
//! - Matching incoming `(method, path)` pairs to registered handlers
//! - Extracting `{name}` path parameters from matched routes
//! - Distinguishing "no such path" (404) from "path exists, method
//!   disallowed" (405)
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Compilation**: At registration time, path patterns (e.g.
//!    `/pets/{id}`) are converted into regex patterns that can match and
//!    extract path parameters.
//!
//! 2. **Matching**: For each incoming request, the router tests the request
//!    path against the compiled patterns in registration order until a match
//!    is found. No specificity ranking is applied beyond registration order.
//!
//! The route table is immutable once serving begins; resolution is read-only
//! and takes no locks.

mod core;

pub use core::{ParamVec, Resolution, RouteHandler, Router, MAX_INLINE_PARAMS};
