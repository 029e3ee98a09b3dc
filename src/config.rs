//! Run configuration.

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::{DriveError, Result};

/// Application name used for derived file names.
pub const DEFAULT_APP_NAME: &str = "drive_hierarchy";

/// Read-only metadata scope; enough to list names and ids.
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/drive.metadata.readonly";

/// Default client secret file, relative to the working directory.
pub const DEFAULT_CLIENT_SECRET: &str = "client_secret.json";

/// Everything one export run needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    /// Root folder id. May be empty.
    pub folder_id: String,
    /// Root folder display name. May be empty.
    pub folder_name: String,
    pub scope: String,
    pub client_secret: PathBuf,
    /// Overrides `~/.credentials/.<app_name>`.
    pub credentials_cache: Option<PathBuf>,
    /// Overrides `<app_name>.json`.
    pub output: Option<PathBuf>,
    /// Pre-issued bearer token; skips the OAuth exchange entirely.
    pub access_token: Option<String>,
    pub sort: bool,
    pub pretty: bool,
    pub exclude_trashed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            folder_id: String::new(),
            folder_name: String::new(),
            scope: DEFAULT_SCOPE.to_string(),
            client_secret: PathBuf::from(DEFAULT_CLIENT_SECRET),
            credentials_cache: None,
            output: None,
            access_token: None,
            sort: true,
            pretty: false,
            exclude_trashed: false,
        }
    }
}

impl Config {
    /// Path of the output document.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.json", self.app_name)))
    }

    /// Path of the cached OAuth credentials.
    pub fn credentials_cache_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.credentials_cache {
            return Ok(path.clone());
        }

        let dirs = BaseDirs::new().ok_or_else(|| {
            DriveError::ConfigError("Could not determine home directory".to_string())
        })?;

        Ok(dirs
            .home_dir()
            .join(".credentials")
            .join(format!(".{}", self.app_name)))
    }
}
