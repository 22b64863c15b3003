// crates/mage-client/src/error.rs
// ============================================================================
// Module: Mage Client Errors
// Description: Error taxonomy for signing, file input, dispatch and decoding.
// Purpose: Surface every per-call failure to the caller with local context.
// Dependencies: mage-config, thiserror
// ============================================================================

//! ## Overview
//! Every failure a client call can hit is returned as a [`ClientError`]. None
//! of them terminate the process: a bad input file or a network fault fails
//! that call only. Errors that originate locally carry the endpoint path or
//! file path they relate to.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use mage_config::ConfigError;
use mage_config::EndpointGroup;
use thiserror::Error;

use crate::signer::SignError;

// ============================================================================
// SECTION: File Errors
// ============================================================================

/// Reason a document could not be read for upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileErrorKind {
    /// The file does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The file exists but could not be read.
    #[error("io failure: {0}")]
    Io(String),
    /// The file exceeds the upload size cap.
    #[error("exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual size in bytes.
        actual_bytes: usize,
    },
}

// ============================================================================
// SECTION: Client Errors
// ============================================================================

/// Errors returned by Mage client operations.
///
/// # Invariants
/// - Variants are stable for programmatic handling; see [`ClientError::kind`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client settings or credentials are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// No credential pair is configured for the endpoint's group.
    #[error("no credentials configured for group {group} (endpoint {endpoint})")]
    MissingCredential {
        /// Group that has no pair.
        group: EndpointGroup,
        /// Endpoint path that required it.
        endpoint: String,
    },
    /// Request headers could not be signed.
    #[error("request signing failed: {0}")]
    Signing(#[from] SignError),
    /// A document could not be read for upload.
    #[error("document {}: {kind}", path.display())]
    File {
        /// Path of the document.
        path: PathBuf,
        /// Failure reason.
        kind: FileErrorKind,
    },
    /// Parameters could not be serialized; nothing was sent.
    #[error("failed to serialize params for {endpoint}: {message}")]
    Serialize {
        /// Endpoint path.
        endpoint: String,
        /// Serializer message.
        message: String,
    },
    /// The endpoint path could not be joined onto the base URL.
    #[error("invalid endpoint path {endpoint}: {message}")]
    InvalidEndpoint {
        /// Endpoint path.
        endpoint: String,
        /// Reason the URL could not be built.
        message: String,
    },
    /// Connection-level failure (DNS, connect, TLS, body read).
    #[error("transport failure calling {endpoint}: {message}")]
    Transport {
        /// Endpoint path.
        endpoint: String,
        /// Transport message.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {endpoint} timed out after {timeout_ms} ms")]
    Timeout {
        /// Endpoint path.
        endpoint: String,
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },
    /// The response body exceeded the accepted size.
    #[error("response from {endpoint} exceeds size limit ({max_bytes} bytes)")]
    ResponseTooLarge {
        /// Endpoint path.
        endpoint: String,
        /// Maximum accepted bytes.
        max_bytes: usize,
    },
    /// The response body was not a valid response envelope.
    #[error("failed to decode response from {endpoint} (http {status}): {message}")]
    Decode {
        /// Endpoint path.
        endpoint: String,
        /// HTTP status of the response.
        status: u16,
        /// Decoder message.
        message: String,
    },
    /// The envelope `data` did not match the requested type.
    #[error("response data does not match requested type: {0}")]
    Data(String),
    /// The vendor reported a non-success code.
    #[error("api error {code}: {message}")]
    Api {
        /// Vendor status code.
        code: i64,
        /// Vendor message.
        message: String,
    },
}

impl ClientError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::MissingCredential {
                ..
            } => "missing_credential",
            Self::Signing(_) => "signing",
            Self::File {
                ..
            } => "file",
            Self::Serialize {
                ..
            } => "serialize",
            Self::InvalidEndpoint {
                ..
            } => "invalid_endpoint",
            Self::Transport {
                ..
            } => "transport",
            Self::Timeout {
                ..
            } => "timeout",
            Self::ResponseTooLarge {
                ..
            } => "response_too_large",
            Self::Decode {
                ..
            } => "decode",
            Self::Data(_) => "data",
            Self::Api {
                ..
            } => "api",
        }
    }
}
