// crates/mage-client/src/lib.rs
// ============================================================================
// Module: Mage Client Library
// Description: Signed HTTP client for the Mage document-intelligence API.
// Purpose: Sign, dispatch and decode calls to every Mage endpoint.
// Dependencies: base64, hex, mage-config, rand, reqwest, serde, sha1, tracing
// ============================================================================

//! ## Overview
//! `mage-client` wraps the Mage API behind [`MageClient`]. Every call is one
//! JSON POST carrying freshly signed authentication headers for the
//! endpoint's credential group; the uniform response envelope comes back as an
//! [`ApiResponse`] with the vendor `data` untouched.
//! Invariants:
//! - Each request is signed with a new nonce and timestamp.
//! - One request per call; no retries, caching or polling.
//! - Per-call failures are returned as [`ClientError`], never process exits.
//!
//! Security posture: secret keys are digest input only and never leave the
//! process; see [`signer`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod dispatch;
pub mod document;
pub mod endpoint;
pub mod error;
pub mod params;
pub mod response;
pub mod signer;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::MageClient;
pub use client::MageClientBuilder;
pub use dispatch::Dispatcher;
pub use dispatch::MAX_RESPONSE_BYTES;
pub use document::MAX_DOCUMENT_BYTES;
pub use document::encode_bytes;
pub use document::encode_file;
pub use endpoint::Endpoint;
pub use error::ClientError;
pub use error::FileErrorKind;
pub use mage_config::ApiSettings;
pub use mage_config::CredentialPair;
pub use mage_config::CredentialSet;
pub use mage_config::EndpointGroup;
pub use mage_config::MageConfig;
pub use response::ApiResponse;
pub use response::TaskId;
pub use signer::CONTENT_TYPE_JSON;
pub use signer::HEADER_CONTENT_TYPE;
pub use signer::HEADER_NONCE;
pub use signer::HEADER_PUBKEY;
pub use signer::HEADER_SIGN;
pub use signer::HEADER_TIMESTAMP;
pub use signer::SignError;
pub use signer::SignedHeaders;
pub use signer::compute_sign;
pub use signer::generate_nonce;
pub use signer::sign_headers;
pub use signer::sign_headers_with;
pub use telemetry::ClientMetrics;
pub use telemetry::NoopMetrics;
pub use telemetry::RequestEvent;
pub use telemetry::RequestOutcome;
