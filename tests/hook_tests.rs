//! Tests for before/after hook ordering, short-circuit, and replacement
//! threading, exercised at the dispatcher level.

mod common;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use common::TestTracing;
use http::Method;
use microroute::{App, Request, Response};

#[test]
fn test_short_circuit_skips_handler_but_not_after_hooks() {
    let _tracing = TestTracing::init();
    let handler_ran = Arc::new(AtomicBool::new(false));
    let after_ran = Arc::new(AtomicBool::new(false));

    let mut app = App::new();
    app.before_request(|_req| Ok(Some(("early", 202).into())));
    {
        let handler_ran = Arc::clone(&handler_ran);
        app.get("/", move |_req| {
            handler_ran.store(true, Ordering::SeqCst);
            Ok("handler".into())
        });
    }
    {
        let after_ran = Arc::clone(&after_ran);
        app.after_request(move |_req, res| {
            after_ran.store(true, Ordering::SeqCst);
            res.set_header("X-After", "yes");
            None
        });
    }

    let dispatcher = app.build();
    let mut req = Request::new(Method::GET, "/");
    let resp = dispatcher.dispatch(&mut req);

    assert_eq!(resp.status, 202);
    assert_eq!(resp.body, b"early");
    assert_eq!(resp.get_header("X-After"), Some("yes"));
    assert!(!handler_ran.load(Ordering::SeqCst));
    assert!(after_ran.load(Ordering::SeqCst));
}

#[test]
fn test_before_hooks_run_in_registration_order_and_stop_at_first_result() {
    let _tracing = TestTracing::init();
    let calls = Arc::new(AtomicUsize::new(0));

    let mut app = App::new();
    {
        let calls = Arc::clone(&calls);
        app.before_request(move |_req| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        });
    }
    app.before_request(|_req| Ok(Some(("stop", 200).into())));
    {
        let calls = Arc::clone(&calls);
        app.before_request(move |_req| {
            calls.fetch_add(100, Ordering::SeqCst);
            Ok(None)
        });
    }
    app.get("/", |_req| Ok("handler".into()));

    let dispatcher = app.build();
    let mut req = Request::new(Method::GET, "/");
    let resp = dispatcher.dispatch(&mut req);

    assert_eq!(resp.body, b"stop");
    // Only the first hook ran; the third was cut off by the short-circuit.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_bag_writes_flow_from_hook_to_handler() {
    let _tracing = TestTracing::init();
    let mut app = App::new();
    app.before_request(|req| {
        req.set_bag("user", "alice")?;
        Ok(None)
    });
    app.get("/", |req| {
        let user = req.bag_as::<String>("user").unwrap_or_default();
        Ok(user.into())
    });

    let dispatcher = app.build();
    let mut req = Request::new(Method::GET, "/");
    let resp = dispatcher.dispatch(&mut req);
    assert_eq!(resp.body, b"alice");
}

#[test]
fn test_after_hook_replacement_threads_to_subsequent_hooks() {
    let _tracing = TestTracing::init();
    let mut app = App::new();
    app.get("/", |_req| Ok("original".into()));
    app.after_request(|_req, _res| {
        let mut replacement = Response::with_body(418, "replaced");
        replacement.set_header("X-Replaced", "1");
        Some(replacement)
    });
    app.after_request(|_req, res| {
        // This hook must observe the replacement, not the original.
        res.set_header("X-Seen-Status", res.status.to_string());
        None
    });

    let dispatcher = app.build();
    let mut req = Request::new(Method::GET, "/");
    let resp = dispatcher.dispatch(&mut req);

    assert_eq!(resp.status, 418);
    assert_eq!(resp.body, b"replaced");
    assert_eq!(resp.get_header("X-Replaced"), Some("1"));
    assert_eq!(resp.get_header("X-Seen-Status"), Some("418"));
}

#[test]
fn test_after_hook_in_place_mutation_persists() {
    let _tracing = TestTracing::init();
    let mut app = App::new();
    app.get("/", |_req| Ok("body".into()));
    app.after_request(|_req, res| {
        res.set_header("X-One", "1");
        None
    });

    let dispatcher = app.build();
    let mut req = Request::new(Method::GET, "/");
    let resp = dispatcher.dispatch(&mut req);
    assert_eq!(resp.get_header("X-One"), Some("1"));
}

#[test]
fn test_after_hooks_run_for_error_responses() {
    let _tracing = TestTracing::init();
    let mut app = App::new();
    app.after_request(|_req, res| {
        res.set_header("X-Always", "1");
        None
    });

    let dispatcher = app.build();
    let mut req = Request::new(Method::GET, "/missing");
    let resp = dispatcher.dispatch(&mut req);

    assert_eq!(resp.status, 404);
    assert_eq!(resp.get_header("X-Always"), Some("1"));
}

#[test]
fn test_failing_before_hook_resolves_like_handler_error() {
    let _tracing = TestTracing::init();
    let mut app = App::new();
    app.before_request(|_req| Err(anyhow::anyhow!("hook exploded")));
    app.get("/", |_req| Ok("never".into()));

    let dispatcher = app.build();
    let mut req = Request::new(Method::GET, "/");
    let resp = dispatcher.dispatch(&mut req);

    assert_eq!(resp.status, 500);
    assert_eq!(resp.body, b"Internal server error");
}
