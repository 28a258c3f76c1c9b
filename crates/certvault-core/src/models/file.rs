use serde::{Deserialize, Serialize};

use crate::utils::format::{format_size_kb, format_timestamp};

/// Metadata for one stored object, as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub file_name: String,
    /// Size in bytes
    pub size: u64,
    /// ISO-8601 timestamp as sent by the server
    pub last_modified: String,
    pub file_key: String,
}

impl FileDescriptor {
    /// Public object URL for this file. No signing; access depends entirely
    /// on the bucket policy.
    pub fn download_url(&self, storage: &StorageLocation) -> String {
        storage.object_url(&self.file_key)
    }

    pub fn to_row(&self, storage: &StorageLocation) -> FileRow {
        FileRow {
            file_name: self.file_name.clone(),
            size_kb: format_size_kb(self.size),
            last_modified: format_timestamp(&self.last_modified),
            download_url: self.download_url(storage),
        }
    }
}

/// Body of a successful listing response. The server answers `{"message": ...}`
/// without a `files` key when nothing matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<FileDescriptor>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Bucket coordinates used to derive download links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocation {
    pub bucket: String,
    pub region: String,
}

impl StorageLocation {
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
        }
    }

    pub fn object_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket, self.region, key
        )
    }
}

/// A descriptor prepared for display in the file table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub file_name: String,
    pub size_kb: String,
    pub last_modified: String,
    pub download_url: String,
}

/// Build one display row per descriptor, preserving server order.
pub fn to_rows(files: &[FileDescriptor], storage: &StorageLocation) -> Vec<FileRow> {
    files.iter().map(|f| f.to_row(storage)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(key: &str, size: u64) -> FileDescriptor {
        FileDescriptor {
            file_name: key.rsplit('/').next().unwrap_or(key).to_string(),
            size,
            last_modified: "2024-03-05T14:07:09+00:00".to_string(),
            file_key: key.to_string(),
        }
    }

    #[test]
    fn test_parse_listing_response() {
        let json = r#"{"files": [{"file_name": "resume.pdf", "file_key": "alice/professional/cv/resume.pdf", "size": 2048, "last_modified": "2024-03-05T14:07:09.120000+00:00"}]}"#;
        let resp: FileListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.files.len(), 1);
        assert_eq!(resp.files[0].file_name, "resume.pdf");
        assert_eq!(resp.files[0].size, 2048);
        assert_eq!(resp.files[0].file_key, "alice/professional/cv/resume.pdf");
    }

    #[test]
    fn test_parse_listing_response_without_files() {
        let resp: FileListResponse =
            serde_json::from_str(r#"{"message": "No files found."}"#).unwrap();
        assert!(resp.files.is_empty());
        assert_eq!(resp.message.as_deref(), Some("No files found."));
    }

    #[test]
    fn test_download_url() {
        let storage = StorageLocation::new("certs-bucket", "eu-north-1");
        let file = descriptor("alice/professional/cv/resume.pdf", 10);
        assert_eq!(
            file.download_url(&storage),
            "https://certs-bucket.s3.eu-north-1.amazonaws.com/alice/professional/cv/resume.pdf"
        );
    }

    #[test]
    fn test_to_rows_one_row_per_descriptor() {
        let storage = StorageLocation::new("b", "us-east-1");
        let files = vec![
            descriptor("bob/personal/id/a.pdf", 1536),
            descriptor("bob/personal/id/b.pdf", 1000),
            descriptor("bob/personal/id/c.pdf", 0),
        ];

        let rows = to_rows(&files, &storage);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].file_name, "a.pdf");
        assert_eq!(rows[0].size_kb, "1.50");
        assert_eq!(rows[1].size_kb, "0.98");
        assert_eq!(rows[2].size_kb, "0.00");
        assert_eq!(
            rows[2].download_url,
            "https://b.s3.us-east-1.amazonaws.com/bob/personal/id/c.pdf"
        );
        assert!(!rows[0].last_modified.is_empty());
    }

    #[test]
    fn test_to_rows_empty() {
        let rows = to_rows(&[], &StorageLocation::default());
        assert!(rows.is_empty());
    }
}
