//! Response model, handler-result normalization, and HTTP/1.0 serialization.

/// Reason phrase for the status line.
///
/// The wire format uses the standard text for codes the engine knows and the
/// literal placeholder `N/A` for everything else.
fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        _ => "N/A",
    }
}

/// A cookie directive attached to a response.
///
/// Directives are kept separate from ordinary headers and serialized into one
/// `Set-Cookie:` header line each at finalization time.
#[derive(Debug, Clone)]
pub struct CookieDirective {
    name: String,
    value: String,
    attributes: Vec<String>,
}

impl CookieDirective {
    fn render(&self) -> String {
        let mut line = format!("{}={}", self.name, self.value);
        for attr in &self.attributes {
            line.push_str("; ");
            line.push_str(attr);
        }
        line
    }
}

/// An HTTP response under construction.
///
/// Headers are kept in insertion order for wire output. [`Response::set_header`]
/// is last-write-wins per case-insensitive name, preserving the casing and
/// position of the first registration; duplicate header names only arise from
/// cookie directives, and only at finalization.
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    headers: Vec<(String, String)>,
    /// Response body bytes.
    pub body: Vec<u8>,
    cookies: Vec<CookieDirective>,
}

impl Response {
    /// Create an empty response with the given status.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
            cookies: Vec::new(),
        }
    }

    /// Create a response with a status and a text body.
    #[must_use]
    pub fn with_body(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let mut resp = Self::new(status);
        resp.body = body.into();
        resp
    }

    /// Set a header, replacing any existing value under the same
    /// case-insensitive name. The first registration's casing and position in
    /// the wire output are preserved.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            slot.1 = value;
        } else {
            self.headers.push((name.to_string(), value));
        }
    }

    /// Get a header value by case-insensitive name.
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add a cookie directive with no attributes.
    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.set_cookie_with(name, value, &[]);
    }

    /// Add a cookie directive with attributes (e.g. `Path=/`, `HttpOnly`).
    /// Each directive produces its own `Set-Cookie:` header line.
    pub fn set_cookie_with(&mut self, name: &str, value: &str, attributes: &[&str]) {
        self.cookies.push(CookieDirective {
            name: name.to_string(),
            value: value.to_string(),
            attributes: attributes.iter().map(|a| (*a).to_string()).collect(),
        });
    }

    /// Finalize the response for serialization.
    ///
    /// Injects `Content-Type: text/plain` when no content type was set and
    /// `Content-Length` (the exact finalized body length) when not explicitly
    /// set, then renders cookie directives into `Set-Cookie` header lines.
    /// Idempotent with respect to the injected headers.
    pub fn finalize(&mut self) {
        if self.get_header("Content-Type").is_none() {
            self.set_header("Content-Type", "text/plain");
        }
        if self.get_header("Content-Length").is_none() {
            self.set_header("Content-Length", self.body.len().to_string());
        }
        for cookie in std::mem::take(&mut self.cookies) {
            self.headers.push(("Set-Cookie".to_string(), cookie.render()));
        }
    }

    /// Serialize to wire bytes: status line, header lines in insertion order,
    /// a blank CRLF line, then the body.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64 + self.body.len());
        out.extend_from_slice(
            format!("HTTP/1.0 {} {}\r\n", self.status, status_reason(self.status)).as_bytes(),
        );
        for (name, value) in &self.headers {
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.body);
        out
    }
}

/// Body payload of a normalized handler result.
#[derive(Debug, Clone)]
pub enum Body {
    /// Text coerced to bytes using UTF-8.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl Body {
    fn into_bytes(self) -> Vec<u8> {
        match self {
            Body::Text(s) => s.into_bytes(),
            Body::Bytes(b) => b,
        }
    }
}

/// The value a route handler, before-hook, or error handler produces.
///
/// One shared coercion routine, [`Outcome::into_response`], converts any of
/// the three shapes into a canonical [`Response`]:
///
/// - a bare body ⇒ status 200
/// - a `(body, status)` pair ⇒ the given status
/// - a full [`Response`] ⇒ used as-is
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A bare body; normalizes to status 200.
    Body(Body),
    /// A body with an explicit status code.
    Status(Body, u16),
    /// A complete response object, used verbatim.
    Full(Response),
}

impl Outcome {
    /// Normalize into a [`Response`]. Applied identically whether the value
    /// comes from a route handler, a before-hook short-circuit, or an error
    /// handler.
    #[must_use]
    pub fn into_response(self) -> Response {
        match self {
            Outcome::Body(body) => Response::with_body(200, body.into_bytes()),
            Outcome::Status(body, status) => Response::with_body(status, body.into_bytes()),
            Outcome::Full(resp) => resp,
        }
    }
}

impl From<&str> for Outcome {
    fn from(s: &str) -> Self {
        Outcome::Body(Body::Text(s.to_string()))
    }
}

impl From<String> for Outcome {
    fn from(s: String) -> Self {
        Outcome::Body(Body::Text(s))
    }
}

impl From<Vec<u8>> for Outcome {
    fn from(b: Vec<u8>) -> Self {
        Outcome::Body(Body::Bytes(b))
    }
}

impl From<(&str, u16)> for Outcome {
    fn from((s, status): (&str, u16)) -> Self {
        Outcome::Status(Body::Text(s.to_string()), status)
    }
}

impl From<(String, u16)> for Outcome {
    fn from((s, status): (String, u16)) -> Self {
        Outcome::Status(Body::Text(s), status)
    }
}

impl From<(Vec<u8>, u16)> for Outcome {
    fn from((b, status): (Vec<u8>, u16)) -> Self {
        Outcome::Status(Body::Bytes(b), status)
    }
}

impl From<Response> for Outcome {
    fn from(resp: Response) -> Self {
        Outcome::Full(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(202), "N/A");
        assert_eq!(status_reason(404), "N/A");
        assert_eq!(status_reason(500), "N/A");
    }

    #[test]
    fn test_serialize_injects_length_and_type() {
        let mut resp = Outcome::from("foo").into_response();
        resp.finalize();
        let wire = resp.serialize();
        let text = String::from_utf8(wire).unwrap();
        assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(text.contains("Content-Length: 3\r\n"));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.ends_with("\r\n\r\nfoo"));
    }

    #[test]
    fn test_explicit_content_length_wins() {
        let mut resp = Response::with_body(200, "abc");
        resp.set_header("Content-Length", "99");
        resp.finalize();
        assert_eq!(resp.get_header("Content-Length"), Some("99"));
    }

    #[test]
    fn test_set_header_last_write_wins_keeps_casing() {
        let mut resp = Response::new(200);
        resp.set_header("X-Test", "1");
        resp.set_header("x-test", "2");
        resp.finalize();
        let text = String::from_utf8(resp.serialize()).unwrap();
        assert!(text.contains("X-Test: 2\r\n"));
        assert!(!text.contains("x-test"));
    }

    #[test]
    fn test_cookies_render_one_line_each() {
        let mut resp = Response::with_body(200, "ok");
        resp.set_cookie("foo", "bar");
        resp.set_cookie_with("session", "abc", &["Path=/", "HttpOnly"]);
        resp.finalize();
        let text = String::from_utf8(resp.serialize()).unwrap();
        assert!(text.contains("Set-Cookie: foo=bar\r\n"));
        assert!(text.contains("Set-Cookie: session=abc; Path=/; HttpOnly\r\n"));
    }

    #[test]
    fn test_pair_outcome_uses_given_status() {
        let resp = Outcome::from(("bar", 202)).into_response();
        assert_eq!(resp.status, 202);
        assert_eq!(resp.body, b"bar");
    }
}
