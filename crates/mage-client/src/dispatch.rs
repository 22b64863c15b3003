// crates/mage-client/src/dispatch.rs
// ============================================================================
// Module: Mage Dispatcher
// Description: Single signed POST against the Mage API.
// Purpose: Serialize params, attach headers, send, decode the envelope.
// Dependencies: mage-config, reqwest, serde_json, tracing, url
// ============================================================================

//! ## Overview
//! [`Dispatcher`] performs exactly one request/response cycle per call: the
//! params are serialized to JSON, the endpoint path is joined onto the base
//! URL, the signed headers are attached and the body is POSTed. The response
//! body is decoded into an [`ApiResponse`].
//! Invariants:
//! - One request per call; no retry and no backoff.
//! - Every request is bounded by the configured timeout.
//! - A body that is not a valid envelope is an error, never a default value.
//! - Redirects are not followed.
//! - Response bodies are capped at [`MAX_RESPONSE_BYTES`].
//!
//! The HTTP status is not interpreted beyond error context; the envelope
//! `code` is authoritative.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::ErrorKind;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use mage_config::ApiSettings;
use mage_config::ConfigError;
use mage_config::EndpointGroup;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use serde::Serialize;
use url::Url;

use crate::error::ClientError;
use crate::response::ApiResponse;
use crate::signer::SignedHeaders;
use crate::telemetry::ClientMetrics;
use crate::telemetry::NoopMetrics;
use crate::telemetry::RequestEvent;
use crate::telemetry::RequestOutcome;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum response body size accepted from the vendor.
pub const MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Sends signed requests to the Mage API.
///
/// # Invariants
/// - `base_url` and `timeout_ms` are immutable after construction.
/// - The dispatcher holds no per-call state; it is safe to share across threads.
pub struct Dispatcher {
    /// Base URL every endpoint path is joined onto.
    base_url: Url,
    /// Per-request timeout in milliseconds.
    timeout_ms: u64,
    /// Blocking HTTP client configured with the timeout.
    client: Client,
    /// Metrics sink for request events.
    metrics: Arc<dyn ClientMetrics>,
}

impl Dispatcher {
    /// Builds a dispatcher from validated API settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the settings are invalid or the
    /// HTTP client cannot be constructed.
    pub fn new(settings: &ApiSettings) -> Result<Self, ClientError> {
        Self::with_metrics(settings, Arc::new(NoopMetrics))
    }

    /// Builds a dispatcher that reports to the provided metrics sink.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the settings are invalid or the
    /// HTTP client cannot be constructed.
    pub fn with_metrics(
        settings: &ApiSettings,
        metrics: Arc<dyn ClientMetrics>,
    ) -> Result<Self, ClientError> {
        settings.validate()?;
        let base_url = settings.parsed_base_url()?;
        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| ConfigError::Invalid(format!("http client build failed: {err}")))?;
        Ok(Self {
            base_url,
            timeout_ms: settings.timeout_ms,
            client,
            metrics,
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolves an endpoint path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] when the path is empty or
    /// carries a query, fragment or parent segment.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, ClientError> {
        join_endpoint(&self.base_url, endpoint)
    }

    /// POSTs `params` to `endpoint` with the signed headers and decodes the
    /// response envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on serialization, transport, timeout or decode
    /// failure. Serialization failures occur before anything is sent.
    pub fn post<P: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        group: EndpointGroup,
        params: &P,
        headers: &SignedHeaders,
    ) -> Result<ApiResponse, ClientError> {
        let started = Instant::now();
        let mut event = RequestEvent {
            endpoint: endpoint.to_string(),
            group,
            outcome: RequestOutcome::Error,
            http_status: None,
            api_code: None,
            error_kind: None,
            request_bytes: 0,
            response_bytes: 0,
        };
        tracing::debug!(endpoint, group = group.as_str(), "dispatching mage request");
        let result = self.execute(endpoint, params, headers, &mut event);
        let latency = started.elapsed();
        let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(response) => {
                event.outcome = RequestOutcome::Ok;
                event.api_code = Some(response.code);
                tracing::debug!(
                    endpoint,
                    group = group.as_str(),
                    http_status = event.http_status.unwrap_or_default(),
                    code = response.code,
                    latency_ms,
                    "mage request completed"
                );
            }
            Err(err) => {
                event.error_kind = Some(err.kind());
                tracing::warn!(
                    endpoint,
                    group = group.as_str(),
                    error_kind = err.kind(),
                    error = %err,
                    latency_ms,
                    "mage request failed"
                );
            }
        }
        self.metrics.record_request(&event);
        self.metrics.record_latency(&event, latency);
        result
    }

    /// Runs the request cycle, filling in event sizes and status as it goes.
    fn execute<P: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &P,
        headers: &SignedHeaders,
        event: &mut RequestEvent,
    ) -> Result<ApiResponse, ClientError> {
        let body = serde_json::to_vec(params).map_err(|err| ClientError::Serialize {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        })?;
        event.request_bytes = body.len();
        let url = self.endpoint_url(endpoint)?;

        let mut request = self.client.post(url);
        for (name, value) in headers.pairs() {
            request = request.header(name, value);
        }
        let response =
            request.body(body).send().map_err(|err| self.send_error(endpoint, &err))?;
        let status = response.status().as_u16();
        event.http_status = Some(status);

        let bytes = self.read_body(endpoint, response)?;
        event.response_bytes = bytes.len();
        serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode {
            endpoint: endpoint.to_string(),
            status,
            message: err.to_string(),
        })
    }

    /// Reads the response body while enforcing [`MAX_RESPONSE_BYTES`].
    fn read_body(&self, endpoint: &str, response: Response) -> Result<Vec<u8>, ClientError> {
        let too_large = || ClientError::ResponseTooLarge {
            endpoint: endpoint.to_string(),
            max_bytes: MAX_RESPONSE_BYTES,
        };
        let max_bytes = u64::try_from(MAX_RESPONSE_BYTES).map_err(|_| too_large())?;
        if let Some(length) = response.content_length()
            && length > max_bytes
        {
            return Err(too_large());
        }
        let mut bytes = Vec::new();
        response
            .take(max_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|err| self.read_error(endpoint, &err))?;
        if bytes.len() > MAX_RESPONSE_BYTES {
            return Err(too_large());
        }
        Ok(bytes)
    }

    /// Classifies a send failure as a timeout or a transport error.
    fn send_error(&self, endpoint: &str, err: &reqwest::Error) -> ClientError {
        if err.is_timeout() {
            return self.timeout_error(endpoint);
        }
        ClientError::Transport {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }

    /// Classifies a body read failure as a timeout or a transport error.
    fn read_error(&self, endpoint: &str, err: &std::io::Error) -> ClientError {
        let timed_out = err.kind() == ErrorKind::TimedOut
            || err
                .get_ref()
                .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
                .is_some_and(reqwest::Error::is_timeout);
        if timed_out {
            return self.timeout_error(endpoint);
        }
        ClientError::Transport {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }

    /// Builds the timeout error for `endpoint`.
    fn timeout_error(&self, endpoint: &str) -> ClientError {
        ClientError::Timeout {
            endpoint: endpoint.to_string(),
            timeout_ms: self.timeout_ms,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Appends an endpoint path to the base URL path.
///
/// `/v1` joined with `/mage/nlp/geoextract` yields `/v1/mage/nlp/geoextract`.
pub(crate) fn join_endpoint(base: &Url, endpoint: &str) -> Result<Url, ClientError> {
    let invalid = |message: &str| ClientError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        message: message.to_string(),
    };
    let relative = endpoint.trim_start_matches('/');
    if relative.is_empty() {
        return Err(invalid("path is empty"));
    }
    if relative.contains(['?', '#']) {
        return Err(invalid("path must not carry a query or fragment"));
    }
    let dot_segment = relative.split('/').any(|segment| segment == "." || segment == "..");
    if dot_segment || relative.contains('\\') {
        return Err(invalid("path must not contain dot segments"));
    }
    let base_path = base.path().trim_end_matches('/');
    let prefix = format!("{base_path}/");
    let mut url = base.clone();
    url.set_path(&format!("{prefix}{relative}"));
    // Encoded dot segments are resolved by the URL parser.
    if !url.path().starts_with(&prefix) {
        return Err(invalid("path escapes the base path"));
    }
    Ok(url)
}
