#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use clientops_session::api::{HttpIdentityClient, LOGIN_PATH, ME_PATH};
use clientops_session::config::{
    extract_config, ApiConfig, ConfigV1, FileStoreConfig, TokenStoreConfig,
};
use clientops_session::navigation::Navigator;
use clientops_session::session::Session;
use clientops_session::store::create_token_store;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use mockito::{Mock, Server};

pub const TEST_CONFIG: &str = r#"
version: "1.0.0"
logging:
  level: "debug"
  format: "console"
routes:
  login: /login
  default: /dashboard
  max_redirects: 5
"#;

/// Parses the shared test config and points it at `server` and a token file under `dir`.
pub fn test_config(server: &Server, dir: &Path) -> ConfigV1 {
    let mut config = extract_config(&Figment::new().merge(Yaml::string(TEST_CONFIG)))
        .expect("Failed to parse test config YAML");
    config.api = ApiConfig {
        base_url: server.url(),
        timeout_in_ms: 2_000,
    };
    config.token_store = TokenStoreConfig::File(FileStoreConfig {
        path: dir.join("session.json").display().to_string(),
        key: "clientops_auth_token".to_string(),
    });
    config
}

/// Builds the navigator the way the console binary does, restoring any persisted token.
pub async fn build_navigator(config: &ConfigV1) -> Navigator {
    let client = Arc::new(HttpIdentityClient::new(&config.api).expect("client should build"));
    let store = create_token_store(&config.token_store);
    let session = Arc::new(Session::restore(store, client).await);
    Navigator::new(&config.routes, session)
}

pub async fn mock_login(server: &mut Server, username: &str, password: &str, token: &str) -> Mock {
    server
        .mock("POST", LOGIN_PATH)
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("username".into(), username.into()),
            mockito::Matcher::UrlEncoded("password".into(), password.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"access_token": "{}", "token_type": "bearer"}}"#,
            token
        ))
        .create_async()
        .await
}

/// Identity lookup for `token`, expected to be hit exactly `hits` times.
pub async fn mock_me(
    server: &mut Server,
    token: &str,
    (id, username, role): (i64, &str, &str),
    hits: usize,
) -> Mock {
    server
        .mock("GET", ME_PATH)
        .match_header("authorization", format!("Bearer {}", token).as_str())
        .expect(hits)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"id": {}, "username": "{}", "role": "{}"}}"#,
            id, username, role
        ))
        .create_async()
        .await
}

pub async fn mock_me_unauthorized(server: &mut Server, token: &str) -> Mock {
    server
        .mock("GET", ME_PATH)
        .match_header("authorization", format!("Bearer {}", token).as_str())
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "Invalid authentication credentials."}"#)
        .create_async()
        .await
}
