//! Access token provider for the Google Drive API.
//!
//! Three credential sources are supported: a pre-issued bearer token, a
//! service account key (JWT assertion grant) and an installed-app refresh
//! token cached on disk.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{DriveError, Result};
use crate::installed_flow;
use crate::models::{
    AuthorizedUserCredentials, ClientSecretFile, ServiceAccountCredentials, TokenResponse,
};

/// Google OAuth2 token endpoint.
pub const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// JWT claims for service account authentication.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,   // Issuer (service account email)
    scope: String, // OAuth scope
    aud: String,   // Audience (token endpoint)
    exp: u64,      // Expiration time
    iat: u64,      // Issued at
}

/// Cached access token with expiration.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: SystemTime,
}

enum TokenSource {
    Static(String),
    ServiceAccount(ServiceAccountCredentials),
    AuthorizedUser(AuthorizedUserCredentials),
}

/// Produces bearer tokens for Drive API requests.
#[derive(Clone)]
pub struct Authenticator {
    source: Arc<TokenSource>,
    scope: String,
    token_uri: Option<String>,
    client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl Authenticator {
    fn with_source(source: TokenSource, scope: &str) -> Self {
        Self {
            source: Arc::new(source),
            scope: scope.to_string(),
            token_uri: None,
            client: Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Use a bearer token obtained elsewhere. It is never refreshed.
    pub fn from_access_token(token: impl Into<String>) -> Self {
        Self::with_source(TokenSource::Static(token.into()), "")
    }

    /// Authenticate as a service account.
    pub fn service_account(credentials: ServiceAccountCredentials, scope: &str) -> Self {
        Self::with_source(TokenSource::ServiceAccount(credentials), scope)
    }

    /// Create an authenticator from a service account JSON key file.
    pub fn from_service_account_file<P: AsRef<Path>>(path: P, scope: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let credentials: ServiceAccountCredentials = serde_json::from_str(&content)?;
        Ok(Self::service_account(credentials, scope))
    }

    /// Authenticate with a cached installed-app refresh token.
    pub fn authorized_user(credentials: AuthorizedUserCredentials, scope: &str) -> Self {
        Self::with_source(TokenSource::AuthorizedUser(credentials), scope)
    }

    /// Send token requests to `uri` instead of the endpoint named by the credentials.
    pub fn with_token_uri(mut self, uri: impl Into<String>) -> Self {
        self.token_uri = Some(uri.into());
        self
    }

    /// Pick a credential source for a run.
    ///
    /// Order: configured access token, cached user credentials, a service
    /// account key in the client secret slot, then the interactive consent
    /// flow (whose result is cached for the next run).
    pub async fn from_config(config: &Config) -> Result<Self> {
        if let Some(token) = &config.access_token {
            info!("Using access token from configuration");
            return Ok(Self::from_access_token(token.clone()));
        }

        let cache_path = config.credentials_cache_path()?;
        if let Some(credentials) = load_cached_credentials(&cache_path)? {
            info!(path = %cache_path.display(), "Using cached credentials");
            return Ok(Self::authorized_user(credentials, &config.scope));
        }

        let content = fs::read_to_string(&config.client_secret).map_err(|e| {
            DriveError::AuthenticationError(format!(
                "Failed to read client secret {}: {}",
                config.client_secret.display(),
                e
            ))
        })?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        if value.get("type").and_then(|t| t.as_str()) == Some("service_account") {
            info!("Using service account credentials");
            let credentials: ServiceAccountCredentials = serde_json::from_value(value)?;
            return Ok(Self::service_account(credentials, &config.scope));
        }

        let secret = serde_json::from_value::<ClientSecretFile>(value)?
            .into_client()
            .ok_or_else(|| {
                DriveError::AuthenticationError(
                    "Client secret file has no 'installed' or 'web' section".to_string(),
                )
            })?;

        let credentials = installed_flow::run(&Client::new(), &secret, &config.scope).await?;
        store_cached_credentials(&cache_path, &credentials)?;
        info!(path = %cache_path.display(), "Stored credentials");

        Ok(Self::authorized_user(credentials, &config.scope))
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn get_access_token(&self) -> Result<String> {
        if let TokenSource::Static(token) = self.source.as_ref() {
            return Ok(token.clone());
        }

        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                // Add 60 second buffer before expiration
                let buffer = Duration::from_secs(60);
                if token.expires_at > SystemTime::now() + buffer {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let new_token = self.refresh_token().await?;

        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(new_token.clone());
        }

        Ok(new_token.access_token)
    }

    async fn refresh_token(&self) -> Result<CachedToken> {
        match self.source.as_ref() {
            TokenSource::Static(token) => Ok(CachedToken {
                access_token: token.clone(),
                expires_at: SystemTime::now() + Duration::from_secs(3600),
            }),
            TokenSource::ServiceAccount(credentials) => {
                self.refresh_service_account(credentials).await
            }
            TokenSource::AuthorizedUser(credentials) => {
                let uri = self.resolve_token_uri(credentials.token_uri.as_deref());
                let params = [
                    ("grant_type", "refresh_token"),
                    ("client_id", credentials.client_id.as_str()),
                    ("client_secret", credentials.client_secret.as_str()),
                    ("refresh_token", credentials.refresh_token.as_str()),
                ];
                self.exchange(&uri, &params).await
            }
        }
    }

    /// Refresh the access token using JWT assertion.
    async fn refresh_service_account(
        &self,
        credentials: &ServiceAccountCredentials,
    ) -> Result<CachedToken> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| DriveError::AuthenticationError(format!("System clock error: {}", e)))?
            .as_secs();

        let uri = self.resolve_token_uri(credentials.token_uri.as_deref());
        let claims = Claims {
            iss: credentials.client_email.clone(),
            scope: self.scope.clone(),
            aud: uri.clone(),
            iat: now,
            exp: now + 3600, // 1 hour
        };

        let header = Header::new(Algorithm::RS256);
        let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())?;
        let jwt = encode(&header, &claims, &key)?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", jwt.as_str()),
        ];
        self.exchange(&uri, &params).await
    }

    fn resolve_token_uri(&self, from_credentials: Option<&str>) -> String {
        self.token_uri
            .as_deref()
            .or(from_credentials)
            .unwrap_or(TOKEN_URI)
            .to_string()
    }

    async fn exchange(&self, uri: &str, params: &[(&str, &str)]) -> Result<CachedToken> {
        debug!(uri, "Requesting access token");
        let response = self.client.post(uri).form(params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::TokenRefreshError(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;
        let expires_at = SystemTime::now() + Duration::from_secs(token_response.expires_in);

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }
}

/// Load installed-app credentials from the cache file.
///
/// A missing, unreadable-as-JSON or incomplete record yields `None` so the
/// caller falls back to a fresh consent flow.
pub fn load_cached_credentials<P: AsRef<Path>>(
    path: P,
) -> Result<Option<AuthorizedUserCredentials>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    match serde_json::from_str::<AuthorizedUserCredentials>(&content) {
        Ok(credentials) if credentials.is_valid() => Ok(Some(credentials)),
        Ok(_) => {
            warn!(path = %path.display(), "Cached credentials are incomplete, ignoring");
            Ok(None)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cached credentials are invalid, ignoring");
            Ok(None)
        }
    }
}

/// Persist installed-app credentials, creating parent directories.
pub fn store_cached_credentials<P: AsRef<Path>>(
    path: P,
    credentials: &AuthorizedUserCredentials,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, serde_json::to_string_pretty(credentials)?)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
