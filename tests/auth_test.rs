//! Tests for credential loading and token exchange.

use std::io::Write;

use mockito::{Matcher, Server};
use serde_json::json;
use tempfile::{tempdir, NamedTempFile};

use drive_hierarchy::auth::{load_cached_credentials, store_cached_credentials};
use drive_hierarchy::config::DEFAULT_SCOPE;
use drive_hierarchy::installed_flow::exchange_code;
use drive_hierarchy::models::{AuthorizedUserCredentials, ClientSecret};
use drive_hierarchy::{Authenticator, Config, DriveError};

fn user_credentials() -> AuthorizedUserCredentials {
    AuthorizedUserCredentials {
        kind: "authorized_user".to_string(),
        client_id: "client-1".to_string(),
        client_secret: "shh".to_string(),
        refresh_token: "refresh-1".to_string(),
        token_uri: None,
    }
}

mod credential_cache {
    use super::*;

    #[test]
    fn test_store_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".drive_hierarchy");

        store_cached_credentials(&path, &user_credentials()).unwrap();
        let loaded = load_cached_credentials(&path).unwrap();

        assert_eq!(loaded, Some(user_credentials()));
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let loaded = load_cached_credentials(dir.path().join("absent")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_invalid_json_is_none() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"not valid json").unwrap();

        let loaded = load_cached_credentials(temp_file.path()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_incomplete_record_is_none() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let creds = json!({"client_id": "id", "client_secret": "", "refresh_token": "rt"});
        temp_file.write_all(creds.to_string().as_bytes()).unwrap();

        let loaded = load_cached_credentials(temp_file.path()).unwrap();
        assert!(loaded.is_none());
    }
}

mod token_refresh {
    use super::*;

    #[tokio::test]
    async fn test_refresh_token_grant_is_cached() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
                Matcher::UrlEncoded("refresh_token".into(), "refresh-1".into()),
                Matcher::UrlEncoded("client_id".into(), "client-1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"access_token": "access-1", "expires_in": 3600, "token_type": "Bearer"})
                    .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let auth = Authenticator::authorized_user(user_credentials(), DEFAULT_SCOPE)
            .with_token_uri(format!("{}/token", server.url()));

        assert_eq!(auth.get_access_token().await.unwrap(), "access-1");
        assert_eq!(auth.get_access_token().await.unwrap(), "access-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_refresh_token() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error": "invalid_grant"}"#)
            .create_async()
            .await;

        let auth = Authenticator::authorized_user(user_credentials(), DEFAULT_SCOPE)
            .with_token_uri(format!("{}/token", server.url()));

        let err = auth.get_access_token().await.unwrap_err();
        assert!(matches!(err, DriveError::TokenRefreshError(_)));
        assert!(err.to_string().contains("invalid_grant"));
    }

    #[tokio::test]
    async fn test_service_account_with_bad_key() {
        let creds = serde_json::from_value(json!({
            "client_email": "test@project.iam.gserviceaccount.com",
            "private_key": "not a pem key"
        }))
        .unwrap();

        let auth = Authenticator::service_account(creds, DEFAULT_SCOPE);
        let err = auth.get_access_token().await.unwrap_err();
        assert!(matches!(err, DriveError::JwtError(_)));
    }
}

mod code_exchange {
    use super::*;

    fn secret(token_uri: String) -> ClientSecret {
        ClientSecret {
            client_id: "client-1".to_string(),
            client_secret: "shh".to_string(),
            auth_uri: None,
            token_uri: Some(token_uri),
            redirect_uris: vec!["http://localhost".to_string()],
        }
    }

    #[tokio::test]
    async fn test_exchange_returns_refresh_token() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                Matcher::UrlEncoded("code".into(), "4/abc".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({"access_token": "a", "expires_in": 3600, "refresh_token": "r"}).to_string(),
            )
            .create_async()
            .await;

        let secret = secret(format!("{}/token", server.url()));
        let creds = exchange_code(&reqwest::Client::new(), &secret, "4/abc")
            .await
            .unwrap();

        assert_eq!(creds.refresh_token, "r");
        assert_eq!(creds.client_id, "client-1");
        assert!(creds.is_valid());
    }

    #[tokio::test]
    async fn test_exchange_without_refresh_token() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(json!({"access_token": "a", "expires_in": 3600}).to_string())
            .create_async()
            .await;

        let secret = secret(format!("{}/token", server.url()));
        let err = exchange_code(&reqwest::Client::new(), &secret, "4/abc")
            .await
            .unwrap_err();

        assert!(matches!(err, DriveError::AuthenticationError(_)));
    }
}

mod from_config {
    use super::*;

    #[tokio::test]
    async fn test_access_token_short_circuits() {
        let config = Config {
            access_token: Some("static".to_string()),
            ..Config::default()
        };

        let auth = Authenticator::from_config(&config).await.unwrap();
        assert_eq!(auth.get_access_token().await.unwrap(), "static");
    }

    #[tokio::test]
    async fn test_uses_cached_credentials() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join(".drive_hierarchy");
        store_cached_credentials(&cache, &user_credentials()).unwrap();

        let config = Config {
            credentials_cache: Some(cache),
            client_secret: dir.path().join("missing_secret.json"),
            ..Config::default()
        };

        assert!(Authenticator::from_config(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_service_account_key_as_client_secret() {
        let dir = tempdir().unwrap();
        let key = dir.path().join("key.json");
        std::fs::write(
            &key,
            json!({
                "type": "service_account",
                "client_email": "test@project.iam.gserviceaccount.com",
                "private_key": "key"
            })
            .to_string(),
        )
        .unwrap();

        let config = Config {
            credentials_cache: Some(dir.path().join("absent")),
            client_secret: key,
            ..Config::default()
        };

        assert!(Authenticator::from_config(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_client_secret() {
        let dir = tempdir().unwrap();
        let config = Config {
            credentials_cache: Some(dir.path().join("absent")),
            client_secret: dir.path().join("client_secret.json"),
            ..Config::default()
        };

        let err = Authenticator::from_config(&config).await.err().unwrap();
        assert!(matches!(err, DriveError::AuthenticationError(_)));
    }

    #[tokio::test]
    async fn test_client_secret_without_app_section() {
        let dir = tempdir().unwrap();
        let secret = dir.path().join("client_secret.json");
        std::fs::write(&secret, "{}").unwrap();

        let config = Config {
            credentials_cache: Some(dir.path().join("absent")),
            client_secret: secret,
            ..Config::default()
        };

        let err = Authenticator::from_config(&config).await.err().unwrap();
        assert!(matches!(err, DriveError::AuthenticationError(_)));
    }
}
