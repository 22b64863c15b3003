// crates/mage-config/src/lib.rs
// ============================================================================
// Module: Mage Config Library
// Description: Endpoint groups, credential pairs and API settings.
// Purpose: Single source of truth for mage.toml semantics.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! `mage-config` defines the configuration model for the Mage client: the
//! credential group each vendor endpoint authenticates with, the per-group key
//! pairs, and the base URL and timeout used for dispatch. Validation is strict
//! and fail-closed; callers treat a [`ConfigError`] at startup as fatal.
//!
//! Security posture: config files carry vendor secrets; see
//! [`credentials`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod credentials;
pub mod groups;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ApiSettings;
pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::DEFAULT_BASE_URL;
pub use config::DEFAULT_TIMEOUT_MS;
pub use config::DEFAULT_USER_AGENT;
pub use config::MAX_TIMEOUT_MS;
pub use config::MIN_TIMEOUT_MS;
pub use config::MageConfig;
pub use credentials::CredentialPair;
pub use credentials::CredentialSet;
pub use groups::EndpointGroup;
