//! Transport and concurrency collaborator traits.
//!
//! The dispatch core consumes two external contracts: a [`Listener`] that
//! accepts connections yielding byte streams, and a [`Spawn`] primitive that
//! runs one fire-and-forget unit of execution per connection. Keeping both as
//! injectable collaborators lets the same dispatcher logic run under
//! coroutine-per-connection in production and inline execution in tests.

use std::io::{self, Read, Write};

/// Accepts connections, yielding a byte-stream handle per connection.
pub trait Listener {
    /// The per-connection byte stream.
    type Stream: Read + Write + Send + 'static;

    /// Block until the next connection arrives.
    ///
    /// # Errors
    ///
    /// Propagates transport errors; an error ends the accept loop.
    fn accept(&mut self) -> io::Result<Self::Stream>;
}

impl Listener for may::net::TcpListener {
    type Stream = may::net::TcpStream;

    fn accept(&mut self) -> io::Result<Self::Stream> {
        may::net::TcpListener::accept(self).map(|(stream, _addr)| stream)
    }
}

/// Fire-and-forget execution of one unit of work per connection.
pub trait Spawn {
    /// Run `unit` in a new unit of execution (or inline, for test spawners).
    fn spawn(&self, unit: Box<dyn FnOnce() + Send + 'static>);
}

/// Production spawner: one `may` coroutine per connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoroutineSpawner;

impl Spawn for CoroutineSpawner {
    fn spawn(&self, unit: Box<dyn FnOnce() + Send + 'static>) {
        may::go!(move || unit());
    }
}

/// Test spawner: runs the unit on the caller, so a connection is fully
/// handled before `accept` is polled again.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineSpawner;

impl Spawn for InlineSpawner {
    fn spawn(&self, unit: Box<dyn FnOnce() + Send + 'static>) {
        unit();
    }
}
