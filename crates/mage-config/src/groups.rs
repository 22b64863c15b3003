// crates/mage-config/src/groups.rs
// ============================================================================
// Module: Mage Endpoint Groups
// Description: Credential groups recognized by the Mage API.
// Purpose: Name the key pair each vendor endpoint authenticates with.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The vendor issues one public/secret key pair per capability group. Several
//! endpoints may share a group (for example, contract compare, detail and
//! download all authenticate with the `contract` pair).
//! Invariants:
//! - Labels are stable snake_case strings used in config files and logs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Endpoint Group
// ============================================================================

/// Credential group for a family of Mage endpoints.
///
/// # Invariants
/// - Variants are stable for config keys and telemetry labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointGroup {
    /// Address normalization (NLP geo extraction).
    GeoExtract,
    /// Document content classification.
    DocContentClassify,
    /// Text matching.
    TextMatch,
    /// Information extraction from document text.
    DocContentExtract,
    /// Asynchronous document extraction (submit/query).
    DocExtract,
    /// Captcha OCR.
    Verification,
    /// License OCR.
    License,
    /// Stamp OCR.
    Stamp,
    /// Bill and invoice OCR.
    Bills,
    /// Table OCR.
    Table,
    /// Template OCR.
    Template,
    /// General-purpose OCR.
    General,
    /// Contract comparison (compare/detail/files).
    Contract,
    /// IDP flow tasks (create/query).
    Flow,
}

impl EndpointGroup {
    /// Every group, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::GeoExtract,
        Self::DocContentClassify,
        Self::TextMatch,
        Self::DocContentExtract,
        Self::DocExtract,
        Self::Verification,
        Self::License,
        Self::Stamp,
        Self::Bills,
        Self::Table,
        Self::Template,
        Self::General,
        Self::Contract,
        Self::Flow,
    ];

    /// Returns a stable label for the group.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GeoExtract => "geo_extract",
            Self::DocContentClassify => "doc_content_classify",
            Self::TextMatch => "text_match",
            Self::DocContentExtract => "doc_content_extract",
            Self::DocExtract => "doc_extract",
            Self::Verification => "verification",
            Self::License => "license",
            Self::Stamp => "stamp",
            Self::Bills => "bills",
            Self::Table => "table",
            Self::Template => "template",
            Self::General => "general",
            Self::Contract => "contract",
            Self::Flow => "flow",
        }
    }
}

impl fmt::Display for EndpointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
