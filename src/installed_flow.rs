//! Interactive OAuth consent for installed applications.

use reqwest::{Client, Url};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::auth::TOKEN_URI;
use crate::error::{DriveError, Result};
use crate::models::{AuthorizedUserCredentials, ClientSecret, TokenResponse};

/// Google OAuth2 consent endpoint.
const AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// Used when the client secret lists no redirect URIs.
const DEFAULT_REDIRECT_URI: &str = "http://localhost";

fn redirect_uri(secret: &ClientSecret) -> &str {
    secret
        .redirect_uris
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_REDIRECT_URI)
}

/// Build the consent URL the user has to open.
pub fn authorization_url(secret: &ClientSecret, scope: &str) -> Result<String> {
    let base = secret.auth_uri.as_deref().unwrap_or(AUTH_URI);
    let url = Url::parse_with_params(
        base,
        &[
            ("client_id", secret.client_id.as_str()),
            ("redirect_uri", redirect_uri(secret)),
            ("response_type", "code"),
            ("scope", scope),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .map_err(|e| DriveError::AuthenticationError(format!("Invalid auth URI {}: {}", base, e)))?;

    Ok(url.into())
}

/// Pull the authorization code out of what the user pasted.
///
/// Accepts either the bare code or the whole redirected URL.
pub fn extract_code(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    match Url::parse(trimmed) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned()),
        Err(_) => Some(trimmed.to_string()),
    }
}

/// Exchange an authorization code for a refresh token.
pub async fn exchange_code(
    http: &Client,
    secret: &ClientSecret,
    code: &str,
) -> Result<AuthorizedUserCredentials> {
    let token_uri = secret.token_uri.as_deref().unwrap_or(TOKEN_URI);
    let params = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("client_id", secret.client_id.as_str()),
        ("client_secret", secret.client_secret.as_str()),
        ("redirect_uri", redirect_uri(secret)),
    ];

    let response = http.post(token_uri).form(&params).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(DriveError::AuthenticationError(format!(
            "Code exchange failed with status {}: {}",
            status, body
        )));
    }

    let token: TokenResponse = response.json().await?;
    let refresh_token = token.refresh_token.ok_or_else(|| {
        DriveError::AuthenticationError("Token response did not include a refresh token".to_string())
    })?;

    Ok(AuthorizedUserCredentials {
        kind: "authorized_user".to_string(),
        client_id: secret.client_id.clone(),
        client_secret: secret.client_secret.clone(),
        refresh_token,
        token_uri: secret.token_uri.clone(),
    })
}

/// Run the consent flow on the terminal.
pub async fn run(
    http: &Client,
    secret: &ClientSecret,
    scope: &str,
) -> Result<AuthorizedUserCredentials> {
    let url = authorization_url(secret, scope)?;

    println!("Open this URL in a browser and authorize access:");
    println!();
    println!("  {}", url);
    println!();
    println!("Paste the authorization code (or the full redirected URL):");

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;

    let code = extract_code(&line).ok_or_else(|| {
        DriveError::AuthenticationError("No authorization code entered".to_string())
    })?;

    exchange_code(http, secret, &code).await
}
