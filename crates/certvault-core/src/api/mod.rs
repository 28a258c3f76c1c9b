//! REST API client module for the certificate service.
//!
//! `CertificateApi` is the seam the flows are written against; `ApiClient`
//! is its HTTP implementation. Listing is authenticated with the session's
//! bearer token; login and upload are not.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::models::{FileDescriptor, UploadRequest};

pub use client::{ApiClient, Credentials, FileQuery, LoginReply, UploadReply};
pub use error::ApiError;

#[async_trait]
pub trait CertificateApi: Send + Sync {
    /// `POST /login/` with a JSON body
    async fn login(&self, credentials: &Credentials) -> Result<LoginReply, ApiError>;

    /// `POST /upload-certificate/` as multipart form data
    async fn upload_certificate(&self, upload: &UploadRequest) -> Result<UploadReply, ApiError>;

    /// `GET /list_uploaded_files_view` with a bearer token
    async fn list_files(&self, query: &FileQuery) -> Result<Vec<FileDescriptor>, ApiError>;
}
