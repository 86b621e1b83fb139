use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{Credential, Identity};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const ME_PATH: &str = "/api/auth/me";

/// Exchanges a username/password for a bearer token and resolves a token to
/// the user behind it.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<Credential, ApiError>;
    async fn me(&self, credential: &Credential) -> Result<Identity, ApiError>;
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
}

/// `IdentityClient` speaking to the console backend over HTTP.
pub struct HttpIdentityClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpIdentityClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        info!(
            "Creating identity client for {} (timeout {} ms)",
            config.base_url, config.timeout_in_ms
        );
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_in_ms))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decodes a success body, or turns the response into an `ApiError`.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status.as_u16(), &body))
        }
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    async fn login(&self, username: &str, password: &str) -> Result<Credential, ApiError> {
        let url = self.url(LOGIN_PATH);
        debug!("Sending login request for '{}' to {}", username, url);
        let response = self
            .client
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let body: LoginResponse = Self::decode(response).await?;
        if let Some(token_type) = body.token_type.as_deref() {
            if !token_type.eq_ignore_ascii_case("bearer") {
                warn!("Login returned unexpected token type '{}'", token_type);
            }
        }
        Credential::parse(body.access_token)
            .ok_or_else(|| ApiError::Decode("login response carried an empty access_token".into()))
    }

    async fn me(&self, credential: &Credential) -> Result<Identity, ApiError> {
        let url = self.url(ME_PATH);
        debug!("Sending identity request to {}", url);
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, credential.bearer())
            .send()
            .await?;
        Self::decode(response).await
    }
}
