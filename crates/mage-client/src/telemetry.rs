// crates/mage-client/src/telemetry.rs
// ============================================================================
// Module: Mage Client Telemetry
// Description: Observability hooks for outbound Mage requests.
// Purpose: Provide request events and latency observations without hard deps.
// Dependencies: mage-config
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for request counters and
//! latency histograms. Deployments can plug in Prometheus or OpenTelemetry by
//! implementing [`ClientMetrics`]; the default sink discards everything.
//! Security posture: events never carry keys, signatures or payload bodies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use mage_config::EndpointGroup;

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Request outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A response envelope was decoded.
    Ok,
    /// The call failed before an envelope was decoded.
    Error,
}

impl RequestOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// Request metric event payload.
///
/// # Invariants
/// - Optional fields are `None` when the metadata is unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEvent {
    /// Endpoint path relative to the base URL.
    pub endpoint: String,
    /// Credential group used to sign the request.
    pub group: EndpointGroup,
    /// Request outcome.
    pub outcome: RequestOutcome,
    /// HTTP status when a response was received.
    pub http_status: Option<u16>,
    /// Vendor envelope code when decoded.
    pub api_code: Option<i64>,
    /// Error kind label (see [`crate::ClientError::kind`]).
    pub error_kind: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for outbound requests.
pub trait ClientMetrics: Send + Sync {
    /// Records a request counter event.
    fn record_request(&self, event: &RequestEvent);
    /// Records a latency observation for the request.
    fn record_latency(&self, event: &RequestEvent, latency: Duration);
}

/// No-op metrics sink.
///
/// # Invariants
/// - Metrics are intentionally discarded.
pub struct NoopMetrics;

impl ClientMetrics for NoopMetrics {
    fn record_request(&self, _event: &RequestEvent) {}

    fn record_latency(&self, _event: &RequestEvent, _latency: Duration) {}
}
