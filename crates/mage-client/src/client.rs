// crates/mage-client/src/client.rs
// ============================================================================
// Module: Mage Client
// Description: Typed adapters for every Mage endpoint.
// Purpose: Resolve credentials, build bodies, sign and dispatch one call.
// Dependencies: mage-config, serde
// ============================================================================

//! ## Overview
//! [`MageClient`] owns one [`Dispatcher`] and one [`CredentialSet`]. Each
//! adapter maps its arguments to the endpoint's request body, looks up the
//! key pair for the endpoint's group, signs fresh headers and dispatches a
//! single POST. The decoded envelope is returned unchanged; callers decide
//! what a non-zero `code` means via [`ApiResponse::into_success`].
//! Invariants:
//! - A call whose group has no key pair fails before any request is sent.
//! - A call whose input file cannot be read fails before any request is sent.
//! - Headers are signed per call and never reused.
//!
//! Asynchronous flows (document extraction, contract comparison, IDP flow)
//! are two calls: submit returns a task id, query takes it back. Polling is
//! left to the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use mage_config::ApiSettings;
use mage_config::CredentialPair;
use mage_config::CredentialSet;
use mage_config::EndpointGroup;
use mage_config::MageConfig;
use serde::Serialize;

use crate::dispatch::Dispatcher;
use crate::document::encode_file;
use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::params::ContractCompareParams;
use crate::params::DocParams;
use crate::params::FileParams;
use crate::params::FlowQueryParams;
use crate::params::FlowSubmitParams;
use crate::params::ImageListParams;
use crate::params::ImageParams;
use crate::params::NamedFile;
use crate::params::TaskQueryParams;
use crate::params::TextParams;
use crate::response::ApiResponse;
use crate::response::TaskId;
use crate::signer::sign_headers;
use crate::telemetry::ClientMetrics;
use crate::telemetry::NoopMetrics;

// ============================================================================
// SECTION: Client
// ============================================================================

/// Mage API client.
///
/// # Invariants
/// - Settings and credentials are validated at construction.
/// - The client is immutable after construction and safe to share.
pub struct MageClient {
    /// Dispatcher for signed requests.
    dispatcher: Dispatcher,
    /// Key pairs per endpoint group.
    credentials: CredentialSet,
}

impl MageClient {
    /// Builds a client from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the configuration is invalid.
    pub fn from_config(config: &MageConfig) -> Result<Self, ClientError> {
        Self::builder()
            .settings(config.api.clone())
            .credentials(config.credentials.clone())
            .build()
    }

    /// Returns a builder with default settings and no credentials.
    #[must_use]
    pub fn builder() -> MageClientBuilder {
        MageClientBuilder::default()
    }

    /// Returns the dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Returns the configured credentials.
    #[must_use]
    pub const fn credentials(&self) -> &CredentialSet {
        &self.credentials
    }

    /// Signs and sends `params` to a known endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredential`] when the endpoint's group has
    /// no key pair, or any dispatch error.
    pub fn call<P: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        params: &P,
    ) -> Result<ApiResponse, ClientError> {
        self.call_path(endpoint.path(), endpoint.group(), params)
    }

    /// Signs and sends `params` to an arbitrary path with a group's key pair.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredential`] when `group` has no key
    /// pair, or any dispatch error.
    pub fn call_path<P: Serialize + ?Sized>(
        &self,
        path: &str,
        group: EndpointGroup,
        params: &P,
    ) -> Result<ApiResponse, ClientError> {
        let pair = self.credentials.get(group).ok_or_else(|| ClientError::MissingCredential {
            group,
            endpoint: path.to_string(),
        })?;
        let headers = sign_headers(pair)?;
        self.dispatcher.post(path, group, params, &headers)
    }

    /// Fails fast when `endpoint`'s group has no key pair.
    fn ensure_credentials(&self, endpoint: Endpoint) -> Result<(), ClientError> {
        let group = endpoint.group();
        if self.credentials.get(group).is_some() {
            return Ok(());
        }
        Err(ClientError::MissingCredential {
            group,
            endpoint: endpoint.path().to_string(),
        })
    }

    /// Checks credentials, then reads and encodes a file for `endpoint`.
    fn encode_for(&self, endpoint: Endpoint, path: &Path) -> Result<String, ClientError> {
        self.ensure_credentials(endpoint)?;
        encode_file(path)
    }

    // ------------------------------------------------------------------------
    // Text endpoints
    // ------------------------------------------------------------------------

    /// Normalizes a free-text address.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub fn normalize_address(&self, text: &str) -> Result<ApiResponse, ClientError> {
        self.call(
            Endpoint::NormalizeAddress,
            &TextParams {
                text: text.to_string(),
            },
        )
    }

    /// Classifies document text.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub fn classify_document(&self, doc: &str) -> Result<ApiResponse, ClientError> {
        self.call(
            Endpoint::ClassifyDocument,
            &DocParams {
                doc: doc.to_string(),
            },
        )
    }

    /// Matches text against the vendor's text model.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub fn match_text(&self, text: &str) -> Result<ApiResponse, ClientError> {
        self.call(
            Endpoint::MatchText,
            &TextParams {
                text: text.to_string(),
            },
        )
    }

    /// Extracts structured information from document text.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub fn extract_document_info(&self, doc: &str) -> Result<ApiResponse, ClientError> {
        self.call(
            Endpoint::ExtractDocumentInfo,
            &DocParams {
                doc: doc.to_string(),
            },
        )
    }

    // ------------------------------------------------------------------------
    // Document extraction
    // ------------------------------------------------------------------------

    /// Submits a document for asynchronous extraction.
    ///
    /// The envelope's `task_id` feeds [`MageClient::query_document_result`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the file cannot be read or the call fails.
    pub fn submit_document(&self, path: impl AsRef<Path>) -> Result<ApiResponse, ClientError> {
        let endpoint = Endpoint::DocExtractCreate;
        let file_base64 = self.encode_for(endpoint, path.as_ref())?;
        self.call(
            endpoint,
            &FileParams {
                file_base64,
            },
        )
    }

    /// Queries a document extraction task.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub fn query_document_result(&self, task_id: &TaskId) -> Result<ApiResponse, ClientError> {
        self.call(
            Endpoint::DocExtractQuery,
            &TaskQueryParams {
                task_id: task_id.clone(),
            },
        )
    }

    // ------------------------------------------------------------------------
    // OCR
    // ------------------------------------------------------------------------

    /// Recognizes a captcha image.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the file cannot be read or the call fails.
    pub fn ocr_captcha(&self, path: impl AsRef<Path>) -> Result<ApiResponse, ClientError> {
        self.ocr_image(Endpoint::OcrCaptcha, path.as_ref())
    }

    /// Recognizes a business license image.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the file cannot be read or the call fails.
    pub fn ocr_license(&self, path: impl AsRef<Path>) -> Result<ApiResponse, ClientError> {
        self.ocr_image(Endpoint::OcrLicense, path.as_ref())
    }

    /// Recognizes a stamp image.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the file cannot be read or the call fails.
    pub fn ocr_stamp(&self, path: impl AsRef<Path>) -> Result<ApiResponse, ClientError> {
        self.ocr_image(Endpoint::OcrStamp, path.as_ref())
    }

    /// Recognizes a bill image.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the file cannot be read or the call fails.
    pub fn ocr_bill(&self, path: impl AsRef<Path>) -> Result<ApiResponse, ClientError> {
        self.ocr_image(Endpoint::OcrBill, path.as_ref())
    }

    /// Recognizes a table image.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the file cannot be read or the call fails.
    pub fn ocr_table(&self, path: impl AsRef<Path>) -> Result<ApiResponse, ClientError> {
        self.ocr_image_list(Endpoint::OcrTable, path.as_ref())
    }

    /// Recognizes an image against a configured template.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the file cannot be read or the call fails.
    pub fn ocr_template(&self, path: impl AsRef<Path>) -> Result<ApiResponse, ClientError> {
        self.ocr_image(Endpoint::OcrTemplate, path.as_ref())
    }

    /// Runs general OCR on an image.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the file cannot be read or the call fails.
    pub fn ocr_general(&self, path: impl AsRef<Path>) -> Result<ApiResponse, ClientError> {
        self.ocr_image_list(Endpoint::OcrGeneral, path.as_ref())
    }

    /// Sends an image as a bare `img_base64` string.
    fn ocr_image(&self, endpoint: Endpoint, path: &Path) -> Result<ApiResponse, ClientError> {
        let img_base64 = self.encode_for(endpoint, path)?;
        self.call(
            endpoint,
            &ImageParams {
                img_base64,
            },
        )
    }

    /// Sends an image as a one-element `img_base64` list.
    fn ocr_image_list(&self, endpoint: Endpoint, path: &Path) -> Result<ApiResponse, ClientError> {
        let img_base64 = self.encode_for(endpoint, path)?;
        self.call(endpoint, &ImageListParams::single(img_base64))
    }

    // ------------------------------------------------------------------------
    // Contract comparison
    // ------------------------------------------------------------------------

    /// Submits two contracts for comparison.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when either file cannot be read or the call fails.
    pub fn submit_contract(
        &self,
        base: impl AsRef<Path>,
        compare: impl AsRef<Path>,
    ) -> Result<ApiResponse, ClientError> {
        let endpoint = Endpoint::ContractCompare;
        let file_base = self.encode_for(endpoint, base.as_ref())?;
        let file_compare = encode_file(compare)?;
        self.call(
            endpoint,
            &ContractCompareParams {
                file_base,
                file_compare,
            },
        )
    }

    /// Queries a contract comparison result.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub fn query_contract_result(&self, task_id: &TaskId) -> Result<ApiResponse, ClientError> {
        self.call(
            Endpoint::ContractDetail,
            &TaskQueryParams {
                task_id: task_id.clone(),
            },
        )
    }

    /// Fetches download links for a finished contract comparison.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub fn download_contract(&self, task_id: &TaskId) -> Result<ApiResponse, ClientError> {
        self.call(
            Endpoint::ContractFiles,
            &TaskQueryParams {
                task_id: task_id.clone(),
            },
        )
    }

    // ------------------------------------------------------------------------
    // IDP flow
    // ------------------------------------------------------------------------

    /// Submits a named file to the IDP flow.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the file cannot be read or the call fails.
    pub fn submit_flow(
        &self,
        path: impl AsRef<Path>,
        name: &str,
    ) -> Result<ApiResponse, ClientError> {
        let endpoint = Endpoint::FlowTaskCreate;
        let base64 = self.encode_for(endpoint, path.as_ref())?;
        self.call(
            endpoint,
            &FlowSubmitParams {
                file: NamedFile {
                    base64,
                    name: name.to_string(),
                },
            },
        )
    }

    /// Queries an IDP flow task.
    ///
    /// Signed with the `flow` key pair, the same pair as
    /// [`MageClient::submit_flow`]; the contract pair is never used here.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails.
    pub fn query_flow_result(
        &self,
        task_id: &TaskId,
        with_ocr_general: bool,
    ) -> Result<ApiResponse, ClientError> {
        self.call(
            Endpoint::FlowTaskQuery,
            &FlowQueryParams {
                task_id: task_id.clone(),
                with_ocr_general,
            },
        )
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builder for [`MageClient`].
pub struct MageClientBuilder {
    /// API settings.
    settings: ApiSettings,
    /// Key pairs per group.
    credentials: CredentialSet,
    /// Metrics sink.
    metrics: Arc<dyn ClientMetrics>,
}

impl Default for MageClientBuilder {
    fn default() -> Self {
        Self {
            settings: ApiSettings::default(),
            credentials: CredentialSet::new(),
            metrics: Arc::new(NoopMetrics),
        }
    }
}

impl MageClientBuilder {
    /// Replaces all API settings.
    #[must_use]
    pub fn settings(mut self, settings: ApiSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.settings.base_url = base_url.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.settings.user_agent = user_agent.into();
        self
    }

    /// Replaces all credentials.
    #[must_use]
    pub fn credentials(mut self, credentials: CredentialSet) -> Self {
        self.credentials = credentials;
        self
    }

    /// Adds or replaces the key pair for one group.
    #[must_use]
    pub fn credential(mut self, group: EndpointGroup, pair: CredentialPair) -> Self {
        self.credentials.insert(group, pair);
        self
    }

    /// Sets the metrics sink.
    #[must_use]
    pub fn metrics(mut self, metrics: Arc<dyn ClientMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Validates settings and credentials and builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when settings or credentials are invalid.
    pub fn build(self) -> Result<MageClient, ClientError> {
        self.credentials.validate()?;
        let dispatcher = Dispatcher::with_metrics(&self.settings, self.metrics)?;
        tracing::debug!(
            base_url = %dispatcher.base_url(),
            groups = self.credentials.len(),
            "mage client ready"
        );
        Ok(MageClient {
            dispatcher,
            credentials: self.credentials,
        })
    }
}
