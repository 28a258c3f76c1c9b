//! Data models for certificates and stored files.
//!
//! - `CertificateCategory`, `UploadRequest`, `FileBlob`: what the upload screen sends
//! - `FileDescriptor`, `FileListResponse`: what the listing endpoint returns
//! - `StorageLocation`, `FileRow`: download link derivation and table rows

pub mod certificate;
pub mod file;

pub use certificate::{CertificateCategory, FileBlob, UnknownCategory, UploadRequest};
pub use file::{to_rows, FileDescriptor, FileListResponse, FileRow, StorageLocation};
