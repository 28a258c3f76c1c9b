//! API client for the certificate service.
//!
//! This module provides the `ApiClient` struct for logging in, uploading
//! certificates, and listing stored files. All endpoints resolve against a
//! single configured base URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{CertificateCategory, FileDescriptor, FileListResponse, UploadRequest};

use super::{ApiError, CertificateApi};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const LOGIN_PATH: &str = "/login/";
const UPLOAD_PATH: &str = "/upload-certificate/";
const LIST_FILES_PATH: &str = "/list_uploaded_files_view";

/// Content type declared for the uploaded document part
const PDF_MIME_TYPE: &str = "application/pdf";

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginReply {
    pub message: Option<String>,
    /// Bearer token, when the server issues one
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub file_key: Option<String>,
}

/// Fully resolved listing parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileQuery {
    pub owner_name: String,
    pub category: CertificateCategory,
    pub document_name: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

/// API client for the certificate service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!(%status, body = %ApiError::truncate_body(&body), "Request rejected");
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Read and decode a JSON body. Decoding failures are `InvalidResponse`,
    /// read failures stay network errors.
    async fn parse_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body = %ApiError::truncate_body(&body), "Undecodable {} response", what);
            ApiError::InvalidResponse(format!("Failed to parse {} response: {}", what, e))
        })
    }
}

#[async_trait]
impl CertificateApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginReply, ApiError> {
        let url = self.url(LOGIN_PATH);
        debug!(url = %url, username = %credentials.username, "Sending login request");

        let response = self.client.post(&url).json(credentials).send().await?;
        let response = Self::check_response(response).await?;
        let parsed: LoginResponse = Self::parse_json(response, "login").await?;

        if parsed.token.is_none() {
            debug!(username = %credentials.username, "Login accepted without a token");
        }

        Ok(LoginReply {
            message: parsed.message,
            token: parsed.token.filter(|t| !t.is_empty()),
        })
    }

    async fn upload_certificate(&self, upload: &UploadRequest) -> Result<UploadReply, ApiError> {
        let url = self.url(UPLOAD_PATH);
        debug!(
            url = %url,
            owner = %upload.owner_name,
            category = upload.category.as_str(),
            document = %upload.document_name,
            bytes = upload.file.bytes.len(),
            "Sending upload request"
        );

        let file_part = multipart::Part::bytes(upload.file.bytes.clone())
            .file_name(upload.file.file_name.clone())
            .mime_str(PDF_MIME_TYPE)?;

        let form = multipart::Form::new()
            .text("name", upload.owner_name.clone())
            .text("certificate_type", upload.category.as_str())
            .part("pdf_file", file_part)
            .text("document_name", upload.document_name.clone());

        let response = self.client.post(&url).multipart(form).send().await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, "upload").await
    }

    async fn list_files(&self, query: &FileQuery) -> Result<Vec<FileDescriptor>, ApiError> {
        let url = self.url(LIST_FILES_PATH);
        debug!(
            url = %url,
            owner = %query.owner_name,
            category = query.category.as_str(),
            document = %query.document_name,
            "Listing files"
        );

        let mut request = self.client.get(&url).query(&[
            ("name", query.owner_name.as_str()),
            ("certificate_type", query.category.as_str()),
            ("document_name", query.document_name.as_str()),
        ]);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let response = Self::check_response(response).await?;
        let parsed: FileListResponse = Self::parse_json(response, "file list").await?;
        if let (true, Some(message)) = (parsed.files.is_empty(), parsed.message.as_deref()) {
            debug!(message, "Listing returned no files");
        }
        Ok(parsed.files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url(LOGIN_PATH), "http://localhost:8000/login/");
        assert_eq!(
            client.url(LIST_FILES_PATH),
            "http://localhost:8000/list_uploaded_files_view"
        );
    }

    #[test]
    fn test_token_management() {
        let mut client = ApiClient::new("http://localhost:8000").unwrap();
        assert!(!client.has_token());

        let scoped = client.with_token("abc".to_string());
        assert!(scoped.has_token());
        assert!(!client.has_token());

        client.set_token("xyz".to_string());
        assert!(client.has_token());
        client.clear_token();
        assert!(!client.has_token());
    }

    #[test]
    fn test_parse_upload_reply() {
        let reply: UploadReply = serde_json::from_str(
            r#"{"message": "File uploaded successfully", "file_key": "alice/education/degree/d.pdf"}"#,
        )
        .unwrap();
        assert_eq!(reply.message.as_deref(), Some("File uploaded successfully"));
        assert_eq!(reply.file_key.as_deref(), Some("alice/education/degree/d.pdf"));

        let reply: UploadReply = serde_json::from_str("{}").unwrap();
        assert_eq!(reply, UploadReply::default());
    }
}
