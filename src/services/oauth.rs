use async_trait::async_trait;
use serde::Deserialize;

use crate::config::OAuthConfig;
use crate::error::{AppError, Result};
use crate::models::identity::OAuthProfile;
use crate::services::api_client::ensure_success;

/// The external identity provider behind the sign-in redirect.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Where to send the browser, carrying `state` through the round-trip.
    fn authorize_url(&self, state: &str) -> Result<String>;

    /// Exchanges an authorization code for the signed-in user's profile.
    async fn exchange(&self, code: &str) -> Result<OAuthProfile>;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// A standard OAuth 2.0 authorization-code provider (Google by default).
#[derive(Clone)]
pub struct OAuthProvider {
    http: reqwest::Client,
    config: OAuthConfig,
}

impl OAuthProvider {
    pub fn new(http: reqwest::Client, config: OAuthConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl IdentityProvider for OAuthProvider {
    fn authorize_url(&self, state: &str) -> Result<String> {
        let url = url::Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("scope", "openid email profile"),
                ("state", state),
            ],
        )
        .map_err(|e| AppError::Configuration(format!("Invalid OAUTH_AUTHORIZE_URL: {}", e)))?;
        Ok(url.into())
    }

    async fn exchange(&self, code: &str) -> Result<OAuthProfile> {
        if code.is_empty() {
            return Err(AppError::Authentication("Missing authorization code".to_string()));
        }

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
            ])
            .send()
            .await?;
        let bytes = ensure_success(response)
            .await
            .map_err(|e| {
                tracing::warn!("❌ Code exchange rejected: {}", e);
                AppError::Authentication("Code exchange failed".to_string())
            })?
            .bytes()
            .await?;
        let token: TokenResponse = sonic_rs::from_slice(&bytes)
            .map_err(|e| AppError::InvalidResponse(format!("Token response: {}", e)))?;

        let response = self
            .http
            .get(&self.config.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        let profile: OAuthProfile = sonic_rs::from_slice(&bytes)
            .map_err(|e| AppError::InvalidResponse(format!("Userinfo response: {}", e)))?;

        tracing::debug!("🔐 Profile received for {:?}", profile.email);
        Ok(profile)
    }
}
