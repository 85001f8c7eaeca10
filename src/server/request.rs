//! Request model, per-request extension bag, and the minimal HTTP/1.x
//! request reader.

use std::collections::HashMap;
use std::io::{self, BufRead, Read};
use std::str::FromStr;
use std::sync::Arc;

use http::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::router::ParamVec;

/// Maximum inline headers before heap allocation.
/// Most requests have ≤16 headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for the hot path.
///
/// Header names use `Arc<str>` because names repeat across requests
/// (Content-Type, Host, ...) and `Arc::clone()` is O(1); values remain
/// `String` as they are per-request data.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// One parsed HTTP request, owned exclusively by the dispatch of a single
/// connection and discarded after the response is written.
#[derive(Debug)]
pub struct Request {
    /// HTTP method (uppercase token).
    pub method: Method,
    /// Request path with the query string stripped.
    pub path: String,
    /// HTTP headers as received; reads are case-insensitive.
    pub headers: HeaderVec,
    /// Raw body bytes, possibly empty.
    pub body: Vec<u8>,
    /// Path parameters captured by the router, bound before the handler runs.
    pub path_params: ParamVec,
    /// Query string parameters.
    pub query_params: ParamVec,
    /// Per-request extension bag: scratch storage for passing data from
    /// before-hooks to the handler and onward. Created empty per request,
    /// never shared across connections.
    bag: HashMap<String, Value>,
}

impl Request {
    /// Create a request by hand. Used by tests and by applications that feed
    /// the dispatcher from a custom transport.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let query_params = parse_query_params(&path);
        let path = path.split('?').next().unwrap_or("/").to_string();
        Self {
            method,
            path,
            headers: HeaderVec::new(),
            body: Vec::new(),
            path_params: ParamVec::new(),
            query_params,
            bag: HashMap::new(),
        }
    }

    /// Get a header by name (case-insensitive per RFC 7230). Last occurrence
    /// wins on duplicates.
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rfind(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get a captured path parameter by name, last-write-wins on duplicate
    /// names at different path depths.
    #[inline]
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name, last-write-wins on duplicates.
    #[inline]
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Store a value in the per-request extension bag.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn set_bag<T: Serialize>(&mut self, key: &str, value: T) -> anyhow::Result<()> {
        self.bag.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Read a raw value from the extension bag.
    #[must_use]
    pub fn bag(&self, key: &str) -> Option<&Value> {
        self.bag.get(key)
    }

    /// Read and deserialize a value from the extension bag. `None` when the
    /// key is absent or the stored value does not have the requested shape.
    #[must_use]
    pub fn bag_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.bag
            .get(key)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Read the next HTTP request from a byte stream.
    ///
    /// Parses the request line, header block, and a `Content-Length`-delimited
    /// body. Returns `Ok(None)` on clean end-of-stream before any bytes of a
    /// request line; a malformed or truncated request yields an error. Both
    /// conditions abandon the connection without producing a response.
    ///
    /// # Errors
    ///
    /// `InvalidData` for malformed request lines or headers; `UnexpectedEof`
    /// for a stream that ends mid-request; any underlying I/O error.
    pub fn read_from<S: BufRead>(stream: &mut S) -> io::Result<Option<Request>> {
        let mut line = String::new();
        if stream.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "empty request line",
            ));
        }

        let mut parts = line.split_whitespace();
        let (Some(method), Some(target), Some(version)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "malformed request line",
            ));
        };
        if !version.starts_with("HTTP/") {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "bad protocol version",
            ));
        }
        let method = Method::from_str(method)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "bad method token"))?;

        let mut headers = HeaderVec::new();
        loop {
            let mut header_line = String::new();
            if stream.read_line(&mut header_line)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream closed inside header block",
                ));
            }
            let header_line = header_line.trim_end_matches(['\r', '\n']);
            if header_line.is_empty() {
                break;
            }
            let Some((name, value)) = header_line.split_once(':') else {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "malformed header line",
                ));
            };
            headers.push((Arc::from(name.trim()), value.trim().to_string()));
        }

        debug!(header_count = headers.len(), "Headers extracted");

        let content_length = headers
            .iter()
            .rfind(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(0);

        let mut body = vec![0u8; content_length];
        if content_length > 0 {
            stream.read_exact(&mut body)?;
            debug!(body_size_bytes = content_length, "Request body read");
        }

        let query_params = parse_query_params(target);
        let path = target.split('?').next().unwrap_or("/").to_string();

        info!(
            method = %method,
            path = %path,
            headers_count = headers.len(),
            "HTTP request parsed"
        );

        Ok(Some(Request {
            method,
            path,
            headers,
            body,
            path_params: ParamVec::new(),
            query_params,
            bag: HashMap::new(),
        }))
    }
}

/// Parse query string parameters from a request target.
///
/// Extracts everything after the `?` character and URL-decodes parameter
/// names and values.
#[must_use]
pub fn parse_query_params(target: &str) -> ParamVec {
    let Some(pos) = target.find('?') else {
        return ParamVec::new();
    };
    url::form_urlencoded::parse(target[pos + 1..].as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.to_string()))
        .collect()
}
