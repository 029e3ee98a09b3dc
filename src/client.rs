//! Google Drive API v3 client used as the directory service.

use reqwest::{Client, Response};
use tracing::{debug, warn};

use crate::auth::Authenticator;
use crate::error::{DriveError, Result};
use crate::hierarchy::{ChildEntry, DirectoryService};
use crate::models::{ApiErrorResponse, FileListResponse};

/// Base URL for Google Drive API v3.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Largest page the files.list endpoint will return.
const PAGE_SIZE: &str = "1000";

/// Client for listing folder contents in Google Drive.
pub struct DriveClient {
    auth: Authenticator,
    http: Client,
    base_url: String,
    exclude_trashed: bool,
}

impl DriveClient {
    /// Create a new DriveClient.
    pub fn new(auth: Authenticator) -> Self {
        Self {
            auth,
            http: Client::new(),
            base_url: DRIVE_API_BASE.to_string(),
            exclude_trashed: false,
        }
    }

    /// Point the client at a different API root (e.g. a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Leave items that sit in the trash out of listings.
    pub fn exclude_trashed(mut self, exclude: bool) -> Self {
        self.exclude_trashed = exclude;
        self
    }

    /// Build the files.list query for the children of `folder_id`.
    pub fn children_query(&self, folder_id: &str) -> String {
        let escaped = folder_id.replace('\\', "\\\\").replace('\'', "\\'");
        if self.exclude_trashed {
            format!("'{}' in parents and trashed = false", escaped)
        } else {
            format!("'{}' in parents", escaped)
        }
    }

    /// Fetch a single page of children of `folder_id`.
    pub async fn list_folder(&self, folder_id: &str) -> Result<FileListResponse> {
        let token = self.auth.get_access_token().await?;
        let query = self.children_query(folder_id);

        let response = self
            .http
            .get(format!("{}/files", self.base_url))
            .bearer_auth(&token)
            .query(&[
                ("q", query.as_str()),
                ("fields", "nextPageToken, files(mimeType, id, name)"),
                ("pageSize", PAGE_SIZE),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response.json().await?)
    }
}

impl DirectoryService for DriveClient {
    async fn list_children(&self, folder_id: &str) -> Result<Vec<ChildEntry>> {
        debug!(folder_id, "Listing folder");
        let page = self.list_folder(folder_id).await?;

        if page.next_page_token.is_some() {
            warn!(
                folder_id,
                fetched = page.files.len(),
                "Folder has more items than one page; only the first page is exported"
            );
        }

        Ok(page.files.into_iter().map(ChildEntry::from).collect())
    }
}

/// Turn a failed response into an ApiError, preferring Google's error envelope.
async fn api_error(response: Response) -> DriveError {
    let status = response.status();
    let error_body = response.text().await.unwrap_or_default();

    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        return DriveError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        };
    }

    DriveError::ApiError {
        status: status.as_u16(),
        message: error_body,
    }
}
