use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of an uploaded document.
///
/// The wire form (multipart field and query parameter) is lowercase; the
/// display form is capitalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateCategory {
    Professional,
    Personal,
    Education,
}

impl CertificateCategory {
    pub const ALL: [CertificateCategory; 3] = [
        CertificateCategory::Professional,
        CertificateCategory::Personal,
        CertificateCategory::Education,
    ];

    /// Value sent to the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateCategory::Professional => "professional",
            CertificateCategory::Personal => "personal",
            CertificateCategory::Education => "education",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CertificateCategory::Professional => "Professional",
            CertificateCategory::Personal => "Personal",
            CertificateCategory::Education => "Education",
        }
    }

    /// Get the next category (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            CertificateCategory::Professional => CertificateCategory::Personal,
            CertificateCategory::Personal => CertificateCategory::Education,
            CertificateCategory::Education => CertificateCategory::Professional,
        }
    }

    /// Get the previous category (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            CertificateCategory::Professional => CertificateCategory::Education,
            CertificateCategory::Personal => CertificateCategory::Professional,
            CertificateCategory::Education => CertificateCategory::Personal,
        }
    }
}

impl fmt::Display for CertificateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown certificate category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for CertificateCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professional" => Ok(CertificateCategory::Professional),
            "personal" => Ok(CertificateCategory::Personal),
            "education" => Ok(CertificateCategory::Education),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// File content picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A single certificate upload. Built by the upload flow after validation,
/// consumed by one request and then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub owner_name: String,
    pub category: CertificateCategory,
    pub document_name: String,
    pub file: FileBlob,
}
