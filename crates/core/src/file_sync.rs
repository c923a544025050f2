//! Remote folder to local file-list reconciliation.
//!
//! The merge is one-way and insert-only: a remote file whose id is not yet
//! known locally yields one new local record; a known id is skipped even when
//! its remote name, size, or MIME type changed; local files that vanished
//! remotely are left alone.

use std::collections::HashSet;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Remote listing
// ---------------------------------------------------------------------------

/// One entry of a remote folder listing.
///
/// `size` is the provider's decimal string (absent for native documents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
    pub mime_type: Option<String>,
    pub size: Option<String>,
    pub web_view_link: Option<String>,
}

/// Lists the files directly inside a remote storage folder.
///
/// Implementations return the complete listing in provider order. Any
/// transport, auth, or quota failure surfaces as
/// [`CoreError::IntegrationFailure`].
#[async_trait]
pub trait RemoteFileLister: Send + Sync {
    async fn list_files(&self, folder_id: &str) -> Result<Vec<RemoteFile>, CoreError>;
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// A local file record to be created for a newly observed remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSyncedFile {
    pub name: String,
    pub drive_file_id: String,
    pub drive_file_url: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
}

impl NewSyncedFile {
    fn from_remote(remote: &RemoteFile) -> Self {
        Self {
            name: remote.name.clone(),
            drive_file_id: remote.id.clone(),
            drive_file_url: remote.web_view_link.clone().unwrap_or_default(),
            mime_type: remote.mime_type.clone(),
            size_bytes: parse_remote_size(remote.size.as_deref()),
        }
    }
}

/// Decide which remote files need a new local record.
///
/// `local_ids` are the external ids already stored for the project. The
/// returned records keep the remote listing order. An id repeated within the
/// remote listing is planned once.
pub fn plan_new_files<'a, I>(local_ids: I, remote: &'a [RemoteFile]) -> Vec<NewSyncedFile>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut known: HashSet<&str> = local_ids.into_iter().collect();

    remote
        .iter()
        .filter(|file| known.insert(file.id.as_str()))
        .map(NewSyncedFile::from_remote)
        .collect()
}

/// Parse the provider's decimal size string. Unparseable or absent -> `None`.
pub fn parse_remote_size(size: Option<&str>) -> Option<i64> {
    size.and_then(|s| s.trim().parse::<i64>().ok())
}

/// Human-readable summary returned by a sync request.
pub fn sync_summary(inserted: usize) -> String {
    match inserted {
        0 => "Sync complete. No new files.".to_string(),
        1 => "Sync complete. 1 new file added.".to_string(),
        n => format!("Sync complete. {n} new files added."),
    }
}

// ---------------------------------------------------------------------------
// Folder references
// ---------------------------------------------------------------------------

/// Matches `.../folders/<id>` and `...?id=<id>` style Drive URLs.
static FOLDER_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:/folders/|[?&]id=)([A-Za-z0-9_-]+)").expect("valid regex")
});

/// Extract a Drive folder id from a shared folder URL.
pub fn parse_drive_folder_id(url: &str) -> Option<String> {
    FOLDER_URL_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
