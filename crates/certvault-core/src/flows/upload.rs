use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::api::CertificateApi;
use crate::auth::{Route, SessionStore};
use crate::models::{CertificateCategory, FileBlob, UploadRequest};

use super::FlowError;

pub const MISSING_FIELDS: &str = "All fields are required.";

pub const UPLOAD_FALLBACK_ERROR: &str = "Something went wrong.";

pub const UPLOAD_SUCCESS_DEFAULT: &str = "File uploaded successfully";

/// Upload form as edited on screen. The file is picked by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub owner_name: String,
    pub category: Option<CertificateCategory>,
    pub document_name: String,
    pub file_path: String,
}

impl UploadForm {
    /// True when any of the four required fields is unset
    pub fn is_incomplete(&self) -> bool {
        self.owner_name.is_empty()
            || self.category.is_none()
            || self.document_name.is_empty()
            || self.file_path.trim().is_empty()
    }

    /// Validate and read the file into a request
    pub async fn build_request(&self) -> Result<UploadRequest, FlowError> {
        let category = match self.category {
            Some(category) if !self.is_incomplete() => category,
            _ => return Err(FlowError::Validation(MISSING_FIELDS.to_string())),
        };

        let path = Path::new(self.file_path.trim());
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| FlowError::Validation(MISSING_FIELDS.to_string()))?;

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            FlowError::Validation(format!("Could not read {}: {}", path.display(), e))
        })?;
        if bytes.is_empty() {
            return Err(FlowError::Validation(format!("{} is empty.", file_name)));
        }

        Ok(UploadRequest {
            owner_name: self.owner_name.clone(),
            category,
            document_name: self.document_name.clone(),
            file: FileBlob { file_name, bytes },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSuccess {
    pub message: String,
    /// Storage key of the new object, when the server reports it
    pub file_key: Option<String>,
}

/// Send one upload. Not retried on failure.
pub async fn submit<A>(api: &A, request: &UploadRequest) -> Result<UploadSuccess, FlowError>
where
    A: CertificateApi + ?Sized,
{
    let reply = api
        .upload_certificate(request)
        .await
        .map_err(|e| FlowError::from_api(&e, UPLOAD_FALLBACK_ERROR, UPLOAD_FALLBACK_ERROR))?;

    info!(
        owner = %request.owner_name,
        document = %request.document_name,
        file_key = ?reply.file_key,
        "Certificate uploaded"
    );

    Ok(UploadSuccess {
        message: reply
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| UPLOAD_SUCCESS_DEFAULT.to_string()),
        file_key: reply.file_key,
    })
}

/// Validate the form, read the file, and upload it
pub async fn upload<A>(api: &A, form: &UploadForm) -> Result<UploadSuccess, FlowError>
where
    A: CertificateApi + ?Sized,
{
    let request = form.build_request().await?;
    submit(api, &request).await
}

/// End the session locally. The server is not contacted.
pub fn logout(session: &mut SessionStore) -> Result<Route> {
    session.clear()?;
    info!("Logged out");
    Ok(Route::Login)
}
