// crates/mage-client/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for mage-client integration tests.
// Purpose: Provide a recording mock vendor server and client builders.
// Dependencies: mage-client, serde_json, tempfile, tiny_http
// ============================================================================

//! ## Overview
//! [`MockServer`] stands in for the vendor API: it answers a fixed list of
//! `(status, body)` responses in order and records every request it sees.
//! Credentials for each group are `"{group}-pub"` / `"{group}-secret"` so
//! tests can recompute signatures.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
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

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use mage_client::CONTENT_TYPE_JSON;
use mage_client::CredentialPair;
use mage_client::CredentialSet;
use mage_client::EndpointGroup;
use mage_client::HEADER_CONTENT_TYPE;
use mage_client::HEADER_NONCE;
use mage_client::HEADER_PUBKEY;
use mage_client::HEADER_SIGN;
use mage_client::HEADER_TIMESTAMP;
use mage_client::MageClient;
use mage_client::compute_sign;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Recorded Requests
// ============================================================================

/// Request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request target (path and query).
    pub url: String,
    /// Header name/value pairs as received.
    pub headers: Vec<(String, String)>,
    /// Raw body text.
    pub body: String,
}

impl RecordedRequest {
    /// Returns a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body should be json")
    }
}

// ============================================================================
// SECTION: Mock Server
// ============================================================================

/// Recording mock of the vendor API.
pub struct MockServer {
    /// Bound socket address.
    pub addr: SocketAddr,
    /// Requests in arrival order.
    requests: mpsc::Receiver<RecordedRequest>,
    /// Server thread.
    handle: thread::JoinHandle<()>,
}

impl MockServer {
    /// Starts a server that answers `responses` in order, then stops.
    pub fn start(responses: Vec<(u16, String)>) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let (sender, requests) = mpsc::channel();
        let handle = thread::spawn(move || {
            for (status, body) in responses {
                let Ok(Some(mut request)) = server.recv_timeout(Duration::from_secs(5)) else {
                    return;
                };
                let mut text = String::new();
                let _ = request.as_reader().read_to_string(&mut text);
                let recorded = RecordedRequest {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    headers: request
                        .headers()
                        .iter()
                        .map(|header| (header.field.to_string(), header.value.to_string()))
                        .collect(),
                    body: text,
                };
                let _ = sender.send(recorded);
                let content_type = Header::from_bytes("Content-Type", "application/json").unwrap();
                let response =
                    Response::from_string(body).with_status_code(status).with_header(content_type);
                let _ = request.respond(response);
            }
        });
        Self {
            addr,
            requests,
            handle,
        }
    }

    /// Starts a server that answers each body with HTTP 200.
    pub fn ok(bodies: &[Value]) -> Self {
        Self::start(bodies.iter().map(|body| (200, body.to_string())).collect())
    }

    /// Returns the base URL with a `/v1` prefix.
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Returns the next recorded request.
    pub fn next_request(&self) -> RecordedRequest {
        self.requests.recv_timeout(Duration::from_secs(5)).expect("mock server saw no request")
    }

    /// Asserts no request arrives within a short window.
    pub fn assert_no_request(&self) {
        assert!(
            self.requests.recv_timeout(Duration::from_millis(200)).is_err(),
            "request should not have been sent"
        );
    }

    /// Waits for the server thread to exit.
    pub fn finish(self) {
        self.handle.join().unwrap();
    }
}

// ============================================================================
// SECTION: Client Helpers
// ============================================================================

/// Returns the deterministic key pair for a group.
pub fn group_pair(group: EndpointGroup) -> CredentialPair {
    CredentialPair::new(format!("{group}-pub"), format!("{group}-secret"))
}

/// Returns credentials for every group.
pub fn all_credentials() -> CredentialSet {
    EndpointGroup::ALL
        .into_iter()
        .fold(CredentialSet::new(), |set, group| set.with(group, group_pair(group)))
}

/// Builds a client with every group configured against `base_url`.
pub fn client_for(base_url: &str) -> MageClient {
    client_with(base_url, all_credentials())
}

/// Builds a client with the given credentials against `base_url`.
pub fn client_with(base_url: &str, credentials: CredentialSet) -> MageClient {
    MageClient::builder()
        .base_url(base_url)
        .timeout(Duration::from_secs(5))
        .credentials(credentials)
        .build()
        .expect("client should build")
}

/// Returns a success envelope wrapping `data`.
pub fn envelope(data: &Value) -> Value {
    json!({"code": 0, "message": "ok", "data": data})
}

/// Asserts the request carries valid authentication headers for `group`.
pub fn assert_signed(request: &RecordedRequest, group: EndpointGroup) {
    let pair = group_pair(group);
    let nonce = request.header(HEADER_NONCE).expect("nonce header");
    let timestamp = request.header(HEADER_TIMESTAMP).expect("timestamp header");
    let sign = request.header(HEADER_SIGN).expect("sign header");
    assert_eq!(request.method, "POST");
    assert_eq!(request.header(HEADER_PUBKEY), Some(pair.public_key()));
    assert_eq!(request.header(HEADER_CONTENT_TYPE), Some(CONTENT_TYPE_JSON));
    assert_eq!(nonce.len(), 32);
    assert!(timestamp.parse::<u64>().is_ok(), "timestamp {timestamp} is not decimal");
    assert_eq!(sign, compute_sign(nonce, timestamp, pair.secret_key()));
}

// ============================================================================
// SECTION: Document Helpers
// ============================================================================

/// Writes `bytes` to `name` inside `dir` and returns the path.
pub fn write_doc(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
