//! REST client for the Drive v3 `files.list` endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use portal_core::error::CoreError;
use portal_core::file_sync::{RemoteFile, RemoteFileLister};
use serde::Deserialize;

use crate::auth::{ServiceAccountKey, TokenSource};

/// Production Drive API base URL.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Fields requested for each listed file.
const LIST_FIELDS: &str = "nextPageToken, files(id,name,mimeType,size,webViewLink,createdTime)";

/// Page size requested from `files.list` (the API maximum).
const PAGE_SIZE: &str = "1000";

/// Errors from the Drive client.
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Drive or the token endpoint returned a non-2xx status code.
    #[error("Drive API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The service-account key could not be read or used.
    #[error("Invalid service account credentials: {0}")]
    Credentials(String),
}

impl From<DriveError> for CoreError {
    fn from(err: DriveError) -> Self {
        CoreError::IntegrationFailure(err.to_string())
    }
}

/// One page of a `files.list` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListPage {
    #[serde(default)]
    files: Vec<RemoteFile>,
    next_page_token: Option<String>,
}

/// Drive client authenticated as a service account.
pub struct DriveClient {
    http: reqwest::Client,
    api_base: String,
    tokens: TokenSource,
}

impl DriveClient {
    /// Create a client for the production Drive API.
    pub fn new(key: ServiceAccountKey) -> Result<Self, DriveError> {
        Self::with_api_base(reqwest::Client::new(), key, DEFAULT_API_BASE.to_string())
    }

    /// Create a client against a custom API base, reusing an existing
    /// [`reqwest::Client`].
    pub fn with_api_base(
        http: reqwest::Client,
        key: ServiceAccountKey,
        api_base: String,
    ) -> Result<Self, DriveError> {
        let tokens = TokenSource::new(http.clone(), key)?;
        Ok(Self {
            http,
            api_base,
            tokens,
        })
    }

    /// Wrap the client as a shared [`RemoteFileLister`].
    pub fn into_lister(self) -> Arc<dyn RemoteFileLister> {
        Arc::new(self)
    }

    /// List every non-trashed file directly inside `folder_id`, following
    /// pagination until the listing is exhausted.
    pub async fn list_folder(&self, folder_id: &str) -> Result<Vec<RemoteFile>, DriveError> {
        let query = folder_query(folder_id);
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let token = self.tokens.access_token().await?;

            let mut params = vec![
                ("q", query.as_str()),
                ("fields", LIST_FIELDS),
                ("pageSize", PAGE_SIZE),
            ];
            if let Some(page) = page_token.as_deref() {
                params.push(("pageToken", page));
            }

            let response = self
                .http
                .get(format!("{}/files", self.api_base))
                .bearer_auth(token)
                .query(&params)
                .send()
                .await?;

            let page: FileListPage = Self::parse_response(response).await?;
            files.extend(page.files);

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        tracing::debug!(folder_id, count = files.len(), "Listed Drive folder");
        Ok(files)
    }

    // ---- private helpers ----

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DriveError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(DriveError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl RemoteFileLister for DriveClient {
    async fn list_files(&self, folder_id: &str) -> Result<Vec<RemoteFile>, CoreError> {
        self.list_folder(folder_id).await.map_err(|e| {
            tracing::warn!(folder_id, error = %e, "Drive listing failed");
            CoreError::from(e)
        })
    }
}

/// Build the `q` parameter selecting a folder's non-trashed children.
///
/// Backslashes and single quotes in the id are escaped.
fn folder_query(folder_id: &str) -> String {
    let escaped = folder_id.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}' in parents and trashed = false")
}
