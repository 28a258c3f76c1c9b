use tracing::{info, warn};

use crate::api::{CertificateApi, FileQuery};
use crate::auth::SessionStore;
use crate::models::{CertificateCategory, FileDescriptor};

use super::FlowError;

/// Shown when the server rejects the listing without an `error` field
pub const LIST_FALLBACK_ERROR: &str = "Failed to load files.";

/// Shown when the listing request fails or its reply can't be read
pub const LIST_TRANSPORT_ERROR: &str = "Error fetching data.";

/// Listing parameters as supplied by the caller; any may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileListQuery {
    pub owner_name: Option<String>,
    pub category: Option<CertificateCategory>,
    pub document_name: Option<String>,
}

impl FileListQuery {
    pub fn new(
        owner_name: Option<String>,
        category: Option<CertificateCategory>,
        document_name: Option<String>,
    ) -> Self {
        Self {
            owner_name,
            category,
            document_name,
        }
    }

    /// Fill in the owner from the stored username and check that all three
    /// parameters are present. Returns `None` (and logs) when any is missing.
    pub fn resolve(&self, stored_username: Option<&str>) -> Option<FileQuery> {
        let owner_name = non_empty(self.owner_name.as_deref())
            .or_else(|| non_empty(stored_username))
            .map(str::to_string);
        let document_name = non_empty(self.document_name.as_deref()).map(str::to_string);

        match (owner_name, self.category, document_name) {
            (Some(owner_name), Some(category), Some(document_name)) => Some(FileQuery {
                owner_name,
                category,
                document_name,
            }),
            (owner, category, document) => {
                warn!(?owner, ?category, ?document, "Missing parameters, not listing files");
                None
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// What the file list screen shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FileListState {
    /// No fetch has been made (or parameters are incomplete)
    #[default]
    Idle,
    Loading,
    Loaded(Vec<FileDescriptor>),
    Failed(String),
}

impl FileListState {
    pub fn files(&self) -> &[FileDescriptor] {
        match self {
            FileListState::Loaded(files) => files,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FileListState::Loading)
    }

    pub fn from_result(result: Result<Vec<FileDescriptor>, FlowError>) -> Self {
        match result {
            Ok(files) => FileListState::Loaded(files),
            Err(e) => FileListState::Failed(e.to_string()),
        }
    }
}

/// One authenticated listing request
pub async fn fetch<A>(api: &A, query: &FileQuery) -> Result<Vec<FileDescriptor>, FlowError>
where
    A: CertificateApi + ?Sized,
{
    let files = api
        .list_files(query)
        .await
        .map_err(|e| FlowError::from_api(&e, LIST_FALLBACK_ERROR, LIST_TRANSPORT_ERROR))?;
    info!(count = files.len(), owner = %query.owner_name, "Files listed");
    Ok(files)
}

/// Resolve parameters against the session and fetch. Incomplete parameters
/// leave the list idle and empty without a request.
pub async fn load<A>(api: &A, query: &FileListQuery, session: &SessionStore) -> FileListState
where
    A: CertificateApi + ?Sized,
{
    match query.resolve(session.username()) {
        Some(resolved) => FileListState::from_result(fetch(api, &resolved).await),
        None => FileListState::Idle,
    }
}
