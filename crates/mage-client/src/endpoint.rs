// crates/mage-client/src/endpoint.rs
// ============================================================================
// Module: Mage Endpoints
// Description: Vendor endpoint paths and their credential groups.
// Purpose: Keep the path-to-group mapping in one table.
// Dependencies: mage-config
// ============================================================================

//! ## Overview
//! [`Endpoint`] names every vendor capability this client calls. Each variant
//! maps to one fixed path relative to the base URL and one
//! [`EndpointGroup`] whose key pair signs the request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use mage_config::EndpointGroup;

// ============================================================================
// SECTION: Endpoint
// ============================================================================

/// Vendor endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Address normalization.
    NormalizeAddress,
    /// Document content classification.
    ClassifyDocument,
    /// Text matching.
    MatchText,
    /// Information extraction from document text.
    ExtractDocumentInfo,
    /// Document extraction task submission.
    DocExtractCreate,
    /// Document extraction task query.
    DocExtractQuery,
    /// Captcha OCR.
    OcrCaptcha,
    /// License OCR.
    OcrLicense,
    /// Stamp OCR.
    OcrStamp,
    /// Bill OCR.
    OcrBill,
    /// Table OCR.
    OcrTable,
    /// Template OCR.
    OcrTemplate,
    /// General OCR.
    OcrGeneral,
    /// Contract comparison submission.
    ContractCompare,
    /// Contract comparison result query.
    ContractDetail,
    /// Contract comparison download links.
    ContractFiles,
    /// IDP flow task submission.
    FlowTaskCreate,
    /// IDP flow task query.
    FlowTaskQuery,
}

impl Endpoint {
    /// Every endpoint, in declaration order.
    pub const ALL: [Self; 18] = [
        Self::NormalizeAddress,
        Self::ClassifyDocument,
        Self::MatchText,
        Self::ExtractDocumentInfo,
        Self::DocExtractCreate,
        Self::DocExtractQuery,
        Self::OcrCaptcha,
        Self::OcrLicense,
        Self::OcrStamp,
        Self::OcrBill,
        Self::OcrTable,
        Self::OcrTemplate,
        Self::OcrGeneral,
        Self::ContractCompare,
        Self::ContractDetail,
        Self::ContractFiles,
        Self::FlowTaskCreate,
        Self::FlowTaskQuery,
    ];

    /// Returns the path relative to the base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::NormalizeAddress => "/mage/nlp/geoextract",
            Self::ClassifyDocument => "/document/classify",
            Self::MatchText => "/mage/nlp/textmatch",
            Self::ExtractDocumentInfo => "/document/extract",
            Self::DocExtractCreate => "/mage/nlp/docextract/create",
            Self::DocExtractQuery => "/mage/nlp/docextract/query",
            Self::OcrCaptcha => "/document/ocr/verification",
            Self::OcrLicense => "/document/ocr/license",
            Self::OcrStamp => "/document/ocr/stamp",
            Self::OcrBill => "/document/ocr/bills",
            Self::OcrTable => "/document/ocr/table",
            Self::OcrTemplate => "/document/ocr/template",
            Self::OcrGeneral => "/document/ocr/general",
            Self::ContractCompare => "/mage/solution/contract/compare",
            Self::ContractDetail => "/mage/solution/contract/detail",
            Self::ContractFiles => "/mage/solution/contract/files",
            Self::FlowTaskCreate => "/mage/idp/flow/task/create",
            Self::FlowTaskQuery => "/mage/idp/flow/task/query",
        }
    }

    /// Returns the credential group that signs requests to this endpoint.
    #[must_use]
    pub const fn group(self) -> EndpointGroup {
        match self {
            Self::NormalizeAddress => EndpointGroup::GeoExtract,
            Self::ClassifyDocument => EndpointGroup::DocContentClassify,
            Self::MatchText => EndpointGroup::TextMatch,
            Self::ExtractDocumentInfo => EndpointGroup::DocContentExtract,
            Self::DocExtractCreate | Self::DocExtractQuery => EndpointGroup::DocExtract,
            Self::OcrCaptcha => EndpointGroup::Verification,
            Self::OcrLicense => EndpointGroup::License,
            Self::OcrStamp => EndpointGroup::Stamp,
            Self::OcrBill => EndpointGroup::Bills,
            Self::OcrTable => EndpointGroup::Table,
            Self::OcrTemplate => EndpointGroup::Template,
            Self::OcrGeneral => EndpointGroup::General,
            Self::ContractCompare | Self::ContractDetail | Self::ContractFiles => {
                EndpointGroup::Contract
            }
            Self::FlowTaskCreate | Self::FlowTaskQuery => EndpointGroup::Flow,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
