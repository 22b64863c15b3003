// crates/mage-client/src/signer.rs
// ============================================================================
// Module: Mage Request Signer
// Description: One-time authentication headers for Mage API requests.
// Purpose: Prove possession of a secret key without sending it.
// Dependencies: hex, mage-config, rand, sha1, thiserror
// ============================================================================

//! ## Overview
//! The vendor authenticates each request with a nonce, a timestamp and a
//! digest over both plus the secret key:
//!
//! ```text
//! sign = hex(SHA-1(nonce || timestamp || secret_key))
//! ```
//!
//! The nonce is 16 bytes from the operating system CSPRNG, hex-encoded. The
//! timestamp is the current Unix time in decimal seconds.
//! Invariants:
//! - Every call to [`sign_headers`] draws a fresh nonce and reads the clock.
//! - Headers are never cached or reused across requests.
//! - The secret key is only ever digest input.
//!
//! Security posture: SHA-1 is mandated by the vendor protocol; see
//! [`compute_sign`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use mage_config::CredentialPair;
use rand::RngCore;
use rand::rngs::OsRng;
use sha1::Digest;
use sha1::Sha1;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Nonce header name.
pub const HEADER_NONCE: &str = "Api-Auth-nonce";
/// Public key header name.
pub const HEADER_PUBKEY: &str = "Api-Auth-pubkey";
/// Timestamp header name.
pub const HEADER_TIMESTAMP: &str = "Api-Auth-timestamp";
/// Digest header name.
pub const HEADER_SIGN: &str = "Api-Auth-sign";
/// Content type header name.
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
/// Content type sent with every request.
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// Number of random bytes in a nonce before hex encoding.
pub const NONCE_BYTES: usize = 16;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while signing a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignError {
    /// The public key is empty.
    #[error("public key is empty")]
    EmptyPublicKey,
    /// The secret key is empty.
    #[error("secret key is empty")]
    EmptySecretKey,
    /// The operating system entropy source failed.
    #[error("entropy source failed: {0}")]
    Entropy(String),
    /// The system clock reads before the Unix epoch.
    #[error("system clock is before the unix epoch")]
    Clock,
}

// ============================================================================
// SECTION: Signed Headers
// ============================================================================

/// Authentication headers for a single request.
///
/// # Invariants
/// - `sign == compute_sign(nonce, timestamp, secret_key)` for the pair used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// Hex-encoded random nonce.
    pub nonce: String,
    /// Public key of the signing pair.
    pub public_key: String,
    /// Unix timestamp in decimal seconds.
    pub timestamp: String,
    /// Hex-encoded digest.
    pub sign: String,
}

impl SignedHeaders {
    /// Returns the header name/value pairs in wire order.
    #[must_use]
    pub fn pairs(&self) -> [(&'static str, &str); 5] {
        [
            (HEADER_NONCE, self.nonce.as_str()),
            (HEADER_PUBKEY, self.public_key.as_str()),
            (HEADER_TIMESTAMP, self.timestamp.as_str()),
            (HEADER_SIGN, self.sign.as_str()),
            (HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON),
        ]
    }
}

// ============================================================================
// SECTION: Signing
// ============================================================================

/// Signs a request with a fresh nonce and the current time.
///
/// # Errors
///
/// Returns [`SignError`] when either key is empty, or when the entropy source
/// or clock fails.
pub fn sign_headers(credentials: &CredentialPair) -> Result<SignedHeaders, SignError> {
    ensure_keys(credentials)?;
    let nonce = generate_nonce()?;
    let timestamp = unix_timestamp()?;
    sign_headers_with(credentials, &nonce, timestamp)
}

/// Signs a request with a caller-supplied nonce and timestamp.
///
/// Only use this to reproduce a known signature; live requests go through
/// [`sign_headers`].
///
/// # Errors
///
/// Returns [`SignError`] when either key is empty.
pub fn sign_headers_with(
    credentials: &CredentialPair,
    nonce: &str,
    timestamp: u64,
) -> Result<SignedHeaders, SignError> {
    ensure_keys(credentials)?;
    let timestamp = timestamp.to_string();
    let sign = compute_sign(nonce, &timestamp, credentials.secret_key());
    Ok(SignedHeaders {
        nonce: nonce.to_string(),
        public_key: credentials.public_key().to_string(),
        timestamp,
        sign,
    })
}

/// Computes the request digest for a nonce, timestamp and secret key.
#[must_use]
pub fn compute_sign(nonce: &str, timestamp: &str, secret_key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(nonce.as_bytes());
    hasher.update(timestamp.as_bytes());
    hasher.update(secret_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Draws a hex-encoded nonce from the operating system CSPRNG.
///
/// # Errors
///
/// Returns [`SignError::Entropy`] when the entropy source fails.
pub fn generate_nonce() -> Result<String, SignError> {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng.try_fill_bytes(&mut bytes).map_err(|err| SignError::Entropy(err.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Returns the current Unix time in seconds.
fn unix_timestamp() -> Result<u64, SignError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .map_err(|_| SignError::Clock)
}

/// Rejects pairs with an empty key before anything is generated.
fn ensure_keys(credentials: &CredentialPair) -> Result<(), SignError> {
    if credentials.public_key().is_empty() {
        return Err(SignError::EmptyPublicKey);
    }
    if credentials.secret_key().is_empty() {
        return Err(SignError::EmptySecretKey);
    }
    Ok(())
}
