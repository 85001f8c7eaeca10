//! Router core - hot path for request routing.

use std::sync::Arc;

use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::server::{Outcome, Request};

/// Maximum number of path parameters before heap allocation.
/// Most route patterns have ≤4 dynamic segments.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Param names use `Arc<str>` instead of `String` because names come from the
/// static route table (known at registration time) and `Arc::clone()` is O(1).
/// Values remain `String` as they are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A route handler: receives the request (with captured path parameters
/// already bound) and produces an [`Outcome`] or an error.
pub type RouteHandler = Arc<dyn Fn(&mut Request) -> anyhow::Result<Outcome> + Send + Sync>;

/// Result of resolving an incoming `(method, path)` pair against the table.
pub enum Resolution {
    /// A route matched; carries the handler and the captured path parameters.
    Matched {
        handler: RouteHandler,
        params: ParamVec,
    },
    /// No registered pattern matched the path (status 404).
    NotFound,
    /// A pattern matched the path but no entry allows the method (status 405).
    MethodNotAllowed,
}

struct RouteEntry {
    methods: Vec<Method>,
    pattern: String,
    regex: Regex,
    param_names: Vec<Arc<str>>,
    handler: RouteHandler,
}

/// Router that matches HTTP requests to handlers in registration order.
///
/// Patterns are compiled to regexes once, at registration time. Lookup is a
/// linear scan over the table: the first entry whose pattern matches the path
/// *and* whose method set allows the request method wins. A path that matches
/// some pattern but never with an allowed method resolves to
/// [`Resolution::MethodNotAllowed`] rather than [`Resolution::NotFound`].
#[derive(Default)]
pub struct Router {
    routes: Vec<RouteEntry>,
}

impl Router {
    /// Create an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a route.
    ///
    /// Registration order is preserved and determines match precedence.
    /// Patterns use `{name}` for dynamic segments; a segment matches any
    /// non-empty run of characters without `/`.
    pub fn add_route<F>(&mut self, methods: &[Method], pattern: &str, handler: F)
    where
        F: Fn(&mut Request) -> anyhow::Result<Outcome> + Send + Sync + 'static,
    {
        let (regex, param_names) = Self::path_to_regex(pattern);
        info!(
            methods = ?methods,
            pattern = %pattern,
            route_count = self.routes.len() + 1,
            "Route registered"
        );
        self.routes.push(RouteEntry {
            methods: methods.to_vec(),
            pattern: pattern.to_string(),
            regex,
            param_names,
            handler: Arc::new(handler),
        });
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the route table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolve an incoming request to a handler.
    ///
    /// Deterministic: first-registered-first-matched when multiple patterns
    /// could match the same path.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution {
        debug!(method = %method, path = %path, "Route match attempt");

        let mut path_matched = false;
        for entry in &self.routes {
            let Some(captures) = entry.regex.captures(path) else {
                continue;
            };
            if !entry.methods.contains(method) {
                path_matched = true;
                continue;
            }

            let mut params = ParamVec::new();
            for (i, name) in entry.param_names.iter().enumerate() {
                if let Some(m) = captures.get(i + 1) {
                    params.push((Arc::clone(name), m.as_str().to_string()));
                }
            }

            info!(
                method = %method,
                path = %path,
                route_pattern = %entry.pattern,
                path_params = ?params,
                "Route matched"
            );
            return Resolution::Matched {
                handler: Arc::clone(&entry.handler),
                params,
            };
        }

        if path_matched {
            warn!(method = %method, path = %path, "Method not allowed");
            Resolution::MethodNotAllowed
        } else {
            warn!(method = %method, path = %path, "No route matched");
            Resolution::NotFound
        }
    }

    /// Convert a path pattern to a regex and extract parameter names.
    ///
    /// Transforms patterns like `/pets/{id}` into `^/pets/([^/]+)$` with
    /// parameter names `["id"]`.
    pub(crate) fn path_to_regex(path: &str) -> (Regex, Vec<Arc<str>>) {
        if path == "/" {
            #[allow(clippy::expect_used)]
            return (
                Regex::new(r"^/$").expect("Failed to compile path regex"),
                Vec::new(),
            );
        }

        let mut pattern = String::with_capacity(path.len() + 5);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(path.matches('{').count());

        for segment in path.split('/') {
            if segment.starts_with('{') && segment.ends_with('}') {
                let param_name = segment.trim_start_matches('{').trim_end_matches('}');
                pattern.push_str("/([^/]+)");
                param_names.push(Arc::from(param_name));
            } else if !segment.is_empty() {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }

        pattern.push('$');
        #[allow(clippy::expect_used)]
        let regex = Regex::new(&pattern).expect("Failed to compile path regex");

        (regex, param_names)
    }
}
