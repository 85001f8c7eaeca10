//! TCP accept loop and server handle.

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use may::coroutine::JoinHandle;
use tracing::info;

use crate::runtime_config::RuntimeConfig;
use crate::server::transport::CoroutineSpawner;
use crate::server::App;

/// Handle to a running server.
///
/// Provides methods for waiting until the server is ready, stopping it, or
/// joining the accept-loop coroutine.
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    /// The locally bound address (useful with port 0).
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the server to be ready to accept connections.
    ///
    /// Polls the bound address with TCP connection attempts.
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` if the server is not reachable within ~250ms.
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Stop the server by cancelling the accept-loop coroutine and waiting
    /// for it to finish. Consumes the handle.
    #[allow(unsafe_code)]
    pub fn stop(self) {
        // SAFETY: cancel() is marked unsafe by the may runtime. The handle is
        // valid (we own it) and cancellation during shutdown is the intended
        // behavior; in-flight connection coroutines are unaffected.
        unsafe {
            self.handle.coroutine().cancel();
        }
        let _ = self.handle.join();
    }

    /// Block until the accept loop finishes.
    ///
    /// # Errors
    ///
    /// Returns an error if the accept-loop coroutine panicked.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

impl App {
    /// Bind a TCP listener on `addr` and run the accept loop in a coroutine,
    /// one further coroutine per accepted connection.
    ///
    /// Applies [`RuntimeConfig`] (coroutine stack size) before spawning.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or the port cannot be
    /// bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let config = RuntimeConfig::from_env();
        may::config().set_stack_size(config.stack_size);

        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let listener = may::net::TcpListener::bind(addr)?;
        let local = listener.local_addr()?;
        info!(addr = %local, stack_size = config.stack_size, "Server listening");

        let handle = may::go!(move || {
            let _ = self.serve(listener, &CoroutineSpawner);
        });
        Ok(ServerHandle {
            addr: local,
            handle,
        })
    }
}
