//! OAuth 2.0 authorization code flow for a console operator.
//!
//! The operator opens the authorization URL in any browser, grants access,
//! and pastes back either the bare authorization code or the whole redirect
//! URL. The code is then exchanged at the token endpoint for a [`Token`]
//! carrying a refresh token (`access_type=offline`).

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::error::{ProviderError, ProviderResult};

use super::config::ClientCredentials;
use super::tokens::Token;

/// OAuth client for the token endpoint of a [`ClientCredentials`] set.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    credentials: ClientCredentials,
    http_client: reqwest::Client,
}

impl OAuthClient {
    /// Creates a new OAuth client with the given credentials.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the HTTP client cannot be built.
    pub fn new(credentials: ClientCredentials, timeout: Duration) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::internal("failed to create HTTP client").with_source(e))?;

        Ok(Self {
            credentials,
            http_client,
        })
    }

    /// Builds the consent URL the operator must visit.
    ///
    /// Requests offline access so the issued token carries a refresh token.
    pub fn authorization_url(&self, state: &str) -> String {
        let scope = self.credentials.scopes.join(" ");
        let separator = if self.credentials.auth_uri.contains('?') {
            '&'
        } else {
            '?'
        };

        format!(
            "{}{}access_type=offline&client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.credentials.auth_uri,
            separator,
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode(&self.credentials.redirect_uri),
            urlencoding::encode(&scope),
            urlencoding::encode(state),
        )
    }

    /// Exchanges an authorization code for a token.
    pub async fn exchange_code(&self, code: &str) -> ProviderResult<Token> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
        ];

        let response = self.post_token_request(&params, "token exchange").await?;
        info!("obtained token from authorization code");
        Ok(response.into_token(None))
    }

    /// Obtains a fresh access token using a refresh token.
    ///
    /// The returned token keeps `refresh_token` when the endpoint does not
    /// rotate it.
    pub async fn refresh(&self, refresh_token: &str) -> ProviderResult<Token> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        let response = self.post_token_request(&params, "token refresh").await?;
        info!("refreshed access token");
        Ok(response.into_token(Some(refresh_token)))
    }

    async fn post_token_request(
        &self,
        params: &[(&str, &str)],
        operation: &str,
    ) -> ProviderResult<TokenResponse> {
        debug!(token_uri = %self.credentials.token_uri, "{} request", operation);

        let response = self
            .http_client
            .post(&self.credentials.token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| {
                ProviderError::network(format!("{} request failed", operation)).with_source(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::network("failed to read token response").with_source(e)
        })?;

        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "{} failed ({}): {}",
                operation, status, body
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response("invalid token response").with_source(e)
        })
    }
}

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh_token: Option<&str>) -> Token {
        let mut token = Token::new(self.access_token);
        if let Some(token_type) = self.token_type.filter(|t| !t.is_empty()) {
            token.token_type = token_type;
        }
        token.refresh_token = self
            .refresh_token
            .filter(|t| !t.is_empty())
            .or_else(|| previous_refresh_token.map(str::to_string));
        match self.expires_in {
            Some(secs) if secs > 0 => token.expires_in(secs),
            _ => token,
        }
    }
}

/// Extracts the authorization code from what the operator pasted.
///
/// Accepts a bare code or the full redirect URL. When a URL carries a
/// `state` parameter it must equal `expected_state`; an `error` parameter is
/// reported as an authorization failure.
pub fn extract_code(input: &str, expected_state: &str) -> ProviderResult<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ProviderError::authentication("no authorization code entered"));
    }

    let Ok(url) = Url::parse(input) else {
        return Ok(input.to_string());
    };

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(ProviderError::authorization(format!(
            "authorization denied: {}",
            error
        )));
    }

    if state.is_some_and(|state| state != expected_state) {
        return Err(ProviderError::authentication(
            "OAuth state mismatch in redirect URL",
        ));
    }

    code.filter(|c| !c.is_empty())
        .ok_or_else(|| ProviderError::authentication("redirect URL has no authorization code"))
}
