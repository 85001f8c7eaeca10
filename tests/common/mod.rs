//! Shared test utilities: an in-memory connection stream, a scripted
//! listener, and a tracing guard.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Cursor, Read, Write};
use std::sync::{Arc, Mutex};

use microroute::Listener;
use tracing_subscriber::EnvFilter;

/// Captured response bytes for one mock connection.
pub type ResponseBuffer = Arc<Mutex<Vec<u8>>>;

/// An in-memory connection: reads from a canned request, writes into a
/// shared buffer the test can inspect after the connection closes.
pub struct MockStream {
    input: Cursor<Vec<u8>>,
    output: ResponseBuffer,
}

impl MockStream {
    pub fn new(raw: Vec<u8>) -> (Self, ResponseBuffer) {
        let output: ResponseBuffer = Arc::default();
        (
            Self {
                input: Cursor::new(raw),
                output: Arc::clone(&output),
            },
            output,
        )
    }

    /// Build a minimal HTTP/1.0 request with no body.
    pub fn request(method: &str, path: &str) -> (Self, ResponseBuffer) {
        Self::new(format!("{method} {path} HTTP/1.0\r\nHost: example.com\r\n\r\n").into_bytes())
    }

    /// Build a request carrying a body with a Content-Length header.
    pub fn request_with_body(method: &str, path: &str, body: &[u8]) -> (Self, ResponseBuffer) {
        let mut raw = format!(
            "{method} {path} HTTP/1.0\r\nHost: example.com\r\nContent-Length: {}\r\n\r\n",
            body.len()
        )
        .into_bytes();
        raw.extend_from_slice(body);
        Self::new(raw)
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A listener fed from a queue of mock connections. `accept` fails once the
/// queue is exhausted, which ends the serve loop.
#[derive(Default)]
pub struct ScriptedListener {
    queue: VecDeque<MockStream>,
}

impl ScriptedListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stream: MockStream) {
        self.queue.push_back(stream);
    }
}

impl Listener for ScriptedListener {
    type Stream = MockStream;

    fn accept(&mut self) -> io::Result<Self::Stream> {
        self.queue
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "request script exhausted"))
    }
}

/// Installs a thread-default subscriber for the duration of a test.
pub struct TestTracing {
    _guard: tracing::subscriber::DefaultGuard,
}

impl TestTracing {
    pub fn init() -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        Self {
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }
}

/// Drain the captured response bytes for assertions.
pub fn response_bytes(buffer: &ResponseBuffer) -> Vec<u8> {
    buffer.lock().unwrap().clone()
}
