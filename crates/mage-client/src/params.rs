// crates/mage-client/src/params.rs
// ============================================================================
// Module: Mage Request Parameters
// Description: Typed request bodies for each Mage endpoint shape.
// Purpose: Catch body shape mismatches at compile time.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Each struct here serializes to exactly the JSON body one or more vendor
//! endpoints expect. Field names are the vendor's wire names.
//! Invariants:
//! - [`ImageListParams`] wraps the base64 string in a single-element list;
//!   only the table and general OCR endpoints accept that shape.
//! - File content fields always hold standard base64 with padding.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::response::TaskId;

// ============================================================================
// SECTION: Text Inputs
// ============================================================================

/// Body carrying a single `text` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextParams {
    /// Input text.
    pub text: String,
}

/// Body carrying a single `doc` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocParams {
    /// Document text.
    pub doc: String,
}

/// Body carrying a task identifier for query endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQueryParams {
    /// Task identifier returned by the paired submission call.
    pub task_id: TaskId,
}

// ============================================================================
// SECTION: File Inputs
// ============================================================================

/// Body carrying a document as `file_base64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileParams {
    /// Base64 document content.
    pub file_base64: String,
}

/// Body carrying an image as a bare `img_base64` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageParams {
    /// Base64 image content.
    pub img_base64: String,
}

/// Body carrying an image as a one-element `img_base64` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageListParams {
    /// Base64 image content list.
    pub img_base64: Vec<String>,
}

impl ImageListParams {
    /// Wraps a single base64 image.
    #[must_use]
    pub fn single(img_base64: String) -> Self {
        Self {
            img_base64: vec![img_base64],
        }
    }
}

/// Body for contract comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCompareParams {
    /// Base64 content of the reference contract.
    pub file_base: String,
    /// Base64 content of the contract compared against it.
    pub file_compare: String,
}

/// Named file nested under `file` in IDP flow submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedFile {
    /// Base64 file content.
    pub base64: String,
    /// File name reported to the flow.
    pub name: String,
}

/// Body for IDP flow task creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSubmitParams {
    /// The submitted file.
    pub file: NamedFile,
}

/// Body for IDP flow task queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowQueryParams {
    /// Task identifier returned by flow submission.
    pub task_id: TaskId,
    /// Whether to include general OCR output in the result.
    pub with_ocr_general: bool,
}
