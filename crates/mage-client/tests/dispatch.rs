// crates/mage-client/tests/dispatch.rs
// ============================================================================
// Module: Dispatcher Tests
// Description: Request/response cycle against local mock servers.
// Purpose: Validate URL joining, envelope decoding and failure mapping.
// Dependencies: mage-client, serde_json, tiny_http
// ============================================================================

//! ## Overview
//! Drives [`Dispatcher`] directly against tiny_http and raw TCP servers to
//! cover decoding, timeouts, transport failures and metrics.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::io::Read;
use std::io::Write;
use std::net::SocketAddr;
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use mage_client::ApiSettings;
use mage_client::ClientError;
use mage_client::ClientMetrics;
use mage_client::CredentialPair;
use mage_client::Dispatcher;
use mage_client::EndpointGroup;
use mage_client::RequestEvent;
use mage_client::RequestOutcome;
use mage_client::params::TextParams;
use mage_client::sign_headers_with;
use mage_config::DEFAULT_USER_AGENT;
use serde_json::json;

use crate::common::MockServer;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn settings(base_url: &str, timeout_ms: u64) -> ApiSettings {
    ApiSettings {
        base_url: base_url.to_string(),
        timeout_ms,
        ..ApiSettings::default()
    }
}

fn dispatcher(base_url: &str) -> Dispatcher {
    Dispatcher::new(&settings(base_url, 5_000)).unwrap()
}

fn text() -> TextParams {
    TextParams {
        text: "hello".to_string(),
    }
}

fn post(dispatcher: &Dispatcher) -> Result<mage_client::ApiResponse, ClientError> {
    let headers = sign_headers_with(
        &CredentialPair::new("pk", "test-secret"),
        "00112233445566778899aabbccddeeff",
        1_700_000_000,
    )
    .unwrap();
    dispatcher.post("/mage/nlp/geoextract", EndpointGroup::GeoExtract, &text(), &headers)
}

fn raw_http_response_server(
    response: Vec<u8>,
    delay: Duration,
) -> (SocketAddr, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            thread::sleep(delay);
            let _ = stream.write_all(&response);
            let _ = stream.flush();
        }
    });
    (addr, handle)
}

#[derive(Default)]
struct RecordingMetrics {
    events: Mutex<Vec<RequestEvent>>,
    latencies: Mutex<Vec<Duration>>,
}

impl ClientMetrics for RecordingMetrics {
    fn record_request(&self, event: &RequestEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn record_latency(&self, _event: &RequestEvent, latency: Duration) {
        self.latencies.lock().unwrap().push(latency);
    }
}

// ============================================================================
// SECTION: Success Path
// ============================================================================

#[test]
fn decodes_envelope_and_joins_base_path() {
    let server = MockServer::ok(&[json!({"code": 0, "message": "ok", "data": {"x": 1}})]);
    let dispatcher = dispatcher(&server.base_url());

    let response = post(&dispatcher).unwrap();
    assert_eq!(response.code, 0);
    assert_eq!(response.message, "ok");
    assert_eq!(response.data, Some(json!({"x": 1})));

    let request = server.next_request();
    assert_eq!(request.url, "/v1/mage/nlp/geoextract");
    assert_eq!(request.json(), json!({"text": "hello"}));
    assert_eq!(request.header("Api-Auth-pubkey"), Some("pk"));
    assert_eq!(request.header("Api-Auth-sign"), Some("9a1eb1b02b93b3a30588452da86c20b86e5b458b"));
    assert_eq!(request.header("Api-Auth-nonce"), Some("00112233445566778899aabbccddeeff"));
    assert_eq!(request.header("Api-Auth-timestamp"), Some("1700000000"));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("user-agent"), Some(DEFAULT_USER_AGENT));
    server.finish();
}

#[test]
fn vendor_error_code_is_returned_not_raised() {
    let server = MockServer::ok(&[json!({"code": 40001, "message": "bad sign"})]);
    let response = post(&dispatcher(&server.base_url())).unwrap();
    assert_eq!(response.code, 40001);
    assert!(!response.is_success());
    assert_eq!(response.data, None);
    server.finish();
}

#[test]
fn non_2xx_status_with_envelope_still_decodes() {
    let body = json!({"code": 500, "message": "busy"}).to_string();
    let server = MockServer::start(vec![(500, body)]);
    let response = post(&dispatcher(&server.base_url())).unwrap();
    assert_eq!(response.code, 500);
    assert_eq!(response.message, "busy");
    server.finish();
}

#[test]
fn base_url_without_path_prefix() {
    let server = MockServer::ok(&[json!({"code": 0})]);
    let dispatcher = dispatcher(&format!("http://{}", server.addr));
    post(&dispatcher).unwrap();
    assert_eq!(server.next_request().url, "/mage/nlp/geoextract");
    server.finish();
}

// ============================================================================
// SECTION: Failure Mapping
// ============================================================================

#[test]
fn malformed_body_is_decode_error() {
    let server = MockServer::start(vec![(200, "not json".to_string())]);
    let err = post(&dispatcher(&server.base_url())).unwrap_err();
    match err {
        ClientError::Decode {
            endpoint,
            status,
            ..
        } => {
            assert_eq!(endpoint, "/mage/nlp/geoextract");
            assert_eq!(status, 200);
        }
        other => panic!("expected decode error, got {other:?}"),
    }
    server.finish();
}

#[test]
fn body_without_code_is_decode_error() {
    let server = MockServer::ok(&[json!({"message": "ok", "data": {}})]);
    let err = post(&dispatcher(&server.base_url())).unwrap_err();
    assert_eq!(err.kind(), "decode");
    server.finish();
}

#[test]
fn empty_body_is_decode_error() {
    let server = MockServer::start(vec![(502, String::new())]);
    let err = post(&dispatcher(&server.base_url())).unwrap_err();
    assert!(matches!(err, ClientError::Decode { status: 502, .. }));
    server.finish();
}

#[test]
fn connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let err = post(&dispatcher(&format!("http://{addr}/v1"))).unwrap_err();
    assert!(matches!(err, ClientError::Transport { .. }), "unexpected error {err:?}");
}

#[test]
fn stalled_server_times_out() {
    let (addr, handle) = raw_http_response_server(Vec::new(), Duration::from_secs(2));
    let dispatcher = Dispatcher::new(&settings(&format!("http://{addr}/v1"), 300)).unwrap();

    let start = Instant::now();
    let err = post(&dispatcher).unwrap_err();
    let elapsed = start.elapsed();

    match err {
        ClientError::Timeout {
            timeout_ms,
            ..
        } => assert_eq!(timeout_ms, 300),
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(elapsed < Duration::from_secs(2), "timeout not enforced, took {elapsed:?}");
    handle.join().unwrap();
}

#[test]
fn oversized_content_length_rejected() {
    let response =
        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 20000000\r\n\r\n"
            .to_vec();
    let (addr, handle) = raw_http_response_server(response, Duration::ZERO);
    let err = post(&dispatcher(&format!("http://{addr}/v1"))).unwrap_err();
    assert!(matches!(err, ClientError::ResponseTooLarge { .. }), "unexpected error {err:?}");
    handle.join().unwrap();
}

#[test]
fn invalid_settings_rejected() {
    assert!(matches!(
        Dispatcher::new(&settings("ftp://example.com", 5_000)),
        Err(ClientError::Config(_))
    ));
    assert!(matches!(
        Dispatcher::new(&settings("http://127.0.0.1/v1", 1)),
        Err(ClientError::Config(_))
    ));
}

#[test]
fn invalid_endpoint_path_rejected_before_send() {
    let server = MockServer::ok(&[json!({"code": 0})]);
    let dispatcher = dispatcher(&server.base_url());
    let headers = sign_headers_with(&CredentialPair::new("pk", "sk"), "n", 1).unwrap();
    let err = dispatcher
        .post("/mage/../admin", EndpointGroup::GeoExtract, &text(), &headers)
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_endpoint");
    server.assert_no_request();
}

// ============================================================================
// SECTION: Metrics
// ============================================================================

#[test]
fn metrics_record_success_and_failure() {
    let server = MockServer::start(vec![
        (200, json!({"code": 0, "data": [1, 2]}).to_string()),
        (200, "garbage".to_string()),
    ]);
    let metrics = Arc::new(RecordingMetrics::default());
    let dispatcher =
        Dispatcher::with_metrics(&settings(&server.base_url(), 5_000), metrics.clone()).unwrap();

    post(&dispatcher).unwrap();
    post(&dispatcher).unwrap_err();

    let events = metrics.events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].outcome, RequestOutcome::Ok);
    assert_eq!(events[0].group, EndpointGroup::GeoExtract);
    assert_eq!(events[0].http_status, Some(200));
    assert_eq!(events[0].api_code, Some(0));
    assert_eq!(events[0].request_bytes, json!({"text": "hello"}).to_string().len());
    assert_eq!(events[1].outcome, RequestOutcome::Error);
    assert_eq!(events[1].error_kind, Some("decode"));
    assert_eq!(events[1].response_bytes, "garbage".len());
    assert_eq!(metrics.latencies.lock().unwrap().len(), 2);
    drop(events);
    server.finish();
}
