// crates/mage-config/src/credentials.rs
// ============================================================================
// Module: Mage Credentials
// Description: Per-group public/secret key pairs.
// Purpose: Hold the flat credential mapping injected into the client.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`CredentialSet`] maps each [`EndpointGroup`] to exactly one
//! [`CredentialPair`]. Sets are built once at startup and are immutable for the
//! lifetime of a client.
//! Invariants:
//! - A validated set never contains an empty public or secret key.
//! - Secret keys never appear in `Debug` output.
//!
//! Security posture: secret keys are shared secrets with the vendor and must
//! never be logged or serialized back out.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::config::ConfigError;
use crate::groups::EndpointGroup;

// ============================================================================
// SECTION: Credential Pair
// ============================================================================

/// Public/secret key pair issued by the vendor for one endpoint group.
///
/// # Invariants
/// - Keys are opaque strings; no format is assumed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialPair {
    /// Public key sent on the wire as `Api-Auth-pubkey`.
    public_key: String,
    /// Secret key used only as digest input.
    secret_key: String,
}

impl CredentialPair {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Returns the public key.
    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Returns the secret key.
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Returns true when both keys are non-blank.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.public_key.trim().is_empty() && !self.secret_key.trim().is_empty()
    }

    /// Validates the pair for the provided group.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when either key is blank.
    pub fn validate(&self, group: EndpointGroup) -> Result<(), ConfigError> {
        if self.public_key.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "credentials.{group}.public_key must be set"
            )));
        }
        if self.secret_key.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "credentials.{group}.secret_key must be set"
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// SECTION: Credential Set
// ============================================================================

/// Mapping from endpoint group to its credential pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CredentialSet {
    /// Pairs keyed by group.
    pairs: BTreeMap<EndpointGroup, CredentialPair>,
}

impl CredentialSet {
    /// Creates an empty credential set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the set with `pair` registered for `group`.
    #[must_use]
    pub fn with(mut self, group: EndpointGroup, pair: CredentialPair) -> Self {
        self.pairs.insert(group, pair);
        self
    }

    /// Registers `pair` for `group`, returning the replaced pair if any.
    pub fn insert(&mut self, group: EndpointGroup, pair: CredentialPair) -> Option<CredentialPair> {
        self.pairs.insert(group, pair)
    }

    /// Returns the pair registered for `group`.
    #[must_use]
    pub fn get(&self, group: EndpointGroup) -> Option<&CredentialPair> {
        self.pairs.get(&group)
    }

    /// Returns the configured groups in label order.
    pub fn groups(&self) -> impl Iterator<Item = EndpointGroup> + '_ {
        self.pairs.keys().copied()
    }

    /// Returns the number of configured groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true when no group is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Fails unless every listed group has a pair.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first missing group.
    pub fn require(&self, groups: &[EndpointGroup]) -> Result<(), ConfigError> {
        for group in groups {
            if !self.pairs.contains_key(group) {
                return Err(ConfigError::Invalid(format!("credentials.{group} is required")));
            }
        }
        Ok(())
    }

    /// Validates every registered pair.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first incomplete pair.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (group, pair) in &self.pairs {
            pair.validate(*group)?;
        }
        Ok(())
    }
}
