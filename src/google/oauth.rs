//! OAuth 2.0 authorization-code flow against Google's endpoints.
//!
//! The service is a confidential web client: the user agent is sent to the
//! consent screen, Google redirects back to our configured callback with a
//! single-use authorization code, and the code is exchanged for tokens here,
//! server-side, together with the client secret. The secret never leaves this
//! process; only the consent URL and redirects cross the browser.

use serde::Deserialize;

use crate::config::AppConfig;
use crate::{AppError, AppResult};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scope granting read/write access to calendar events.
const CALENDAR_EVENTS_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

/// Tokens returned by the token endpoint. The refresh token is only present
/// when Google decides to issue one (first consent, or `prompt=consent`).
#[derive(Debug, Clone)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Client for the consent-URL and token legs of the flow.
#[derive(Clone, Debug)]
pub struct OAuthClient {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.google_redirect_uri.clone(),
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Points the token leg at a different endpoint. Tests aim this at a
    /// local mock server.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Builds the consent URL the client redirects the user's agent to.
    ///
    /// `access_type=offline` and `prompt=consent` ask Google to issue a
    /// refresh token on exchange. The optional `state` is echoed back on the
    /// callback; callers pass a correlation token, never payload data.
    pub fn build_auth_url(&self, state: Option<&str>) -> String {
        let mut url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(CALENDAR_EVENTS_SCOPE),
        );
        if let Some(state) = state {
            url.push_str("&state=");
            url.push_str(&urlencoding::encode(state));
        }
        url
    }

    /// Exchanges an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> AppResult<TokenSet> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let response = self.token_request(&params).await?;
        tracing::debug!("authorization code exchanged");

        Ok(TokenSet {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        })
    }

    /// Mints a fresh access token from a stored refresh token.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> AppResult<String> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self.token_request(&params).await?;
        tracing::debug!("access token refreshed");

        Ok(response.access_token)
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> AppResult<TokenResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .form(params)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Provider(format!("failed to read token response: {}", e)))?;

        if !status.is_success() {
            tracing::warn!(status = %status, body, "token endpoint rejected request");
            return Err(AppError::Auth(format!(
                "token request rejected ({}): {}",
                status, body
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::Provider(format!("invalid token response: {}", e)))
    }
}
