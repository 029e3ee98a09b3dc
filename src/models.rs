//! Data models for Google Drive API responses and credential files.

use serde::{Deserialize, Serialize};

use crate::hierarchy::ChildEntry;

/// MIME type Google Drive reports for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// A single item from a files.list response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl From<DriveFile> for ChildEntry {
    fn from(file: DriveFile) -> Self {
        ChildEntry {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type.unwrap_or_default(),
        }
    }
}

/// Response from the files.list API endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
}

/// Service account credentials from a JSON key file.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: Option<String>,
}

/// Installed-app credentials persisted in the credential cache file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedUserCredentials {
    #[serde(rename = "type", default = "authorized_user_type")]
    pub kind: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
}

fn authorized_user_type() -> String {
    "authorized_user".to_string()
}

impl AuthorizedUserCredentials {
    /// A cached record is only usable when every secret is present.
    pub fn is_valid(&self) -> bool {
        self.kind == "authorized_user"
            && !self.client_id.is_empty()
            && !self.client_secret.is_empty()
            && !self.refresh_token.is_empty()
    }
}

/// OAuth client registration as downloaded from the Google Cloud console.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub auth_uri: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

/// Wrapper object of a client secret file (`installed` or `web` application).
#[derive(Debug, Deserialize)]
pub struct ClientSecretFile {
    #[serde(default)]
    pub installed: Option<ClientSecret>,
    #[serde(default)]
    pub web: Option<ClientSecret>,
}

impl ClientSecretFile {
    pub fn into_client(self) -> Option<ClientSecret> {
        self.installed.or(self.web)
    }
}

/// OAuth2 token response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}
