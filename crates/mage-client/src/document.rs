// crates/mage-client/src/document.rs
// ============================================================================
// Module: Mage Document Encoding
// Description: Local file reading and base64 encoding for upload endpoints.
// Purpose: Turn a document path into the base64 string the vendor expects.
// Dependencies: base64, std
// ============================================================================

//! ## Overview
//! File-input endpoints embed the whole document as standard base64 (with
//! padding) inside the JSON body. A missing or unreadable file fails that call
//! with [`ClientError::File`]; it never aborts the process.
//! Invariants:
//! - Documents larger than [`MAX_DOCUMENT_BYTES`] are rejected before encoding.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ClientError;
use crate::error::FileErrorKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum document size accepted for upload.
pub const MAX_DOCUMENT_BYTES: usize = 50 * 1024 * 1024;

// ============================================================================
// SECTION: Encoding
// ============================================================================

/// Reads a document and returns its base64 encoding.
///
/// # Errors
///
/// Returns [`ClientError::File`] when the file is missing, unreadable or
/// larger than [`MAX_DOCUMENT_BYTES`].
pub fn encode_file(path: impl AsRef<Path>) -> Result<String, ClientError> {
    let path = path.as_ref();
    let bytes = read_with_limit(path).map_err(|kind| ClientError::File {
        path: path.to_path_buf(),
        kind,
    })?;
    Ok(encode_bytes(&bytes))
}

/// Returns the base64 encoding of in-memory document bytes.
#[must_use]
pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Reads at most [`MAX_DOCUMENT_BYTES`] + 1 bytes and rejects oversize files.
fn read_with_limit(path: &Path) -> Result<Vec<u8>, FileErrorKind> {
    let file = File::open(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            FileErrorKind::NotFound(err.to_string())
        } else {
            FileErrorKind::Io(err.to_string())
        }
    })?;
    let limit = u64::try_from(MAX_DOCUMENT_BYTES)
        .map_err(|_| FileErrorKind::Io("document size limit exceeds u64".to_string()))?
        .saturating_add(1);
    let mut bytes = Vec::new();
    file.take(limit).read_to_end(&mut bytes).map_err(|err| FileErrorKind::Io(err.to_string()))?;
    if bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(FileErrorKind::TooLarge {
            max_bytes: MAX_DOCUMENT_BYTES,
            actual_bytes: bytes.len(),
        });
    }
    Ok(bytes)
}
