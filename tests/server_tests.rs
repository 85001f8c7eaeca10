//! Live-socket round trip through the coroutine accept loop.

mod common;

use std::io::{Read, Write};
use std::net::TcpStream;

use common::TestTracing;
use microroute::App;

fn round_trip(addr: std::net::SocketAddr, raw: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream.write_all(raw).expect("write request");
    let mut response = Vec::new();
    // The server closes the connection after one response.
    stream.read_to_end(&mut response).expect("read response");
    String::from_utf8_lossy(&response).into_owned()
}

#[test]
fn test_serve_over_tcp() {
    let _tracing = TestTracing::init();
    let mut app = App::new();
    app.get("/", |_req| Ok("foo".into()));
    app.get("/pets/{id}", |req| {
        Ok(req.path_param("id").unwrap_or("?").to_string().into())
    });

    let handle = app.start("127.0.0.1:0").expect("bind");
    handle.wait_ready().expect("server ready");
    let addr = handle.local_addr();

    let text = round_trip(addr, b"GET / HTTP/1.0\r\nHost: localhost\r\n\r\n");
    assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(text.contains("Content-Length: 3\r\n"));
    assert!(text.ends_with("\r\n\r\nfoo"));

    let text = round_trip(addr, b"GET /pets/99 HTTP/1.0\r\n\r\n");
    assert!(text.ends_with("\r\n\r\n99"));

    let text = round_trip(addr, b"GET /nope HTTP/1.0\r\n\r\n");
    assert!(text.starts_with("HTTP/1.0 404 N/A\r\n"));

    handle.stop();
}
