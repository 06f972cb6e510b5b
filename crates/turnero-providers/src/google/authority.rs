//! Token acquisition at startup and token refresh afterwards.
//!
//! [`TokenAuthority`] returns the persisted token when one is usable and
//! otherwise walks the operator through the authorization code flow:
//!
//! ```text
//! AwaitingConsent ──▶ AwaitingCode ──▶ Exchanging ──▶ Issued
//!   (present URL)      (read code)      (POST token)   (save)
//! ```
//!
//! The operator interaction sits behind [`OperatorPrompt`] so the flow can
//! be driven by a script instead of a terminal.
//!
//! Once the server is running, [`TokenSource`] hands out access tokens to
//! the calendar client and refreshes them when they expire.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};

use super::oauth::{OAuthClient, extract_code};
use super::tokens::{Token, TokenStore};

/// Interaction with the human operator who grants calendar access.
pub trait OperatorPrompt: Send + Sync {
    /// Shows the authorization URL to the operator.
    fn present_url(&self, url: &str);

    /// Blocks until the operator enters the authorization code.
    ///
    /// Called from a blocking thread, never on the async runtime.
    fn read_code(&self) -> io::Result<String>;
}

/// [`OperatorPrompt`] on the process's stdout and stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompt;

impl OperatorPrompt for ConsolePrompt {
    fn present_url(&self, url: &str) {
        println!(
            "\nOpen the following URL in your browser and authorize calendar access:\n\n{}\n",
            url
        );
    }

    fn read_code(&self) -> io::Result<String> {
        print!("Paste the authorization code (or the full redirect URL): ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

/// Steps of the interactive authorization.
#[derive(Debug)]
enum FlowState {
    AwaitingConsent,
    AwaitingCode { state: String },
    Exchanging { code: String },
    Issued(Token),
}

/// Obtains a usable token at startup.
pub struct TokenAuthority {
    oauth: OAuthClient,
    store: TokenStore,
    prompt: Arc<dyn OperatorPrompt>,
}

impl TokenAuthority {
    /// Creates an authority that persists tokens in `store`.
    pub fn new(oauth: OAuthClient, store: TokenStore, prompt: Arc<dyn OperatorPrompt>) -> Self {
        Self {
            oauth,
            store,
            prompt,
        }
    }

    /// Returns the stored token, or runs the authorization flow.
    ///
    /// A missing token file is expected on first start; a corrupt one is
    /// logged. Either way the operator is asked to authorize. A stored token
    /// is returned as is, even if expired; [`TokenSource`] refreshes it.
    ///
    /// # Errors
    ///
    /// Fails when the operator input cannot be read, the code is rejected by
    /// the token endpoint, or the new token cannot be saved.
    pub async fn acquire_token(&self) -> ProviderResult<Token> {
        match self.store.load() {
            Ok(token) => {
                info!(path = %self.store.path().display(), "using stored token");
                return Ok(token);
            }
            Err(e) if e.is_not_found() => {
                debug!("no stored token, authorization required");
            }
            Err(e) => {
                warn!(error = %e, "stored token unusable, authorization required");
            }
        }

        self.authorize().await
    }

    /// Runs the authorization flow regardless of any stored token.
    pub async fn authorize(&self) -> ProviderResult<Token> {
        let mut flow = FlowState::AwaitingConsent;
        loop {
            flow = match flow {
                FlowState::AwaitingConsent => {
                    let state = uuid::Uuid::new_v4().simple().to_string();
                    let url = self.oauth.authorization_url(&state);
                    debug!(%url, "presenting authorization URL");
                    self.prompt.present_url(&url);
                    FlowState::AwaitingCode { state }
                }
                FlowState::AwaitingCode { state } => {
                    let input = self.read_code().await?;
                    let code = extract_code(&input, &state)?;
                    FlowState::Exchanging { code }
                }
                FlowState::Exchanging { code } => {
                    info!("exchanging authorization code");
                    FlowState::Issued(self.oauth.exchange_code(&code).await?)
                }
                FlowState::Issued(token) => {
                    self.store.save(&token)?;
                    return Ok(token);
                }
            };
        }
    }

    async fn read_code(&self) -> ProviderResult<String> {
        let prompt = Arc::clone(&self.prompt);
        tokio::task::spawn_blocking(move || prompt.read_code())
            .await
            .map_err(|e| {
                ProviderError::internal("authorization prompt task failed").with_source(e)
            })?
            .map_err(|e| {
                ProviderError::internal("failed to read authorization code").with_source(e)
            })
    }

    /// Wraps `token` into a shared source that refreshes it on expiry.
    pub fn into_source(self, token: Token) -> TokenSource {
        TokenSource::new(token, self.oauth, self.store)
    }
}

/// Shared, refreshable access token.
///
/// The mutex serializes refreshes: concurrent callers that find the token
/// expired wait for the first refresh and then reuse its result.
#[derive(Debug)]
pub struct TokenSource {
    token: Mutex<Token>,
    oauth: OAuthClient,
    store: TokenStore,
}

impl TokenSource {
    /// Creates a source starting from `token`.
    pub fn new(token: Token, oauth: OAuthClient, store: TokenStore) -> Self {
        Self {
            token: Mutex::new(token),
            oauth,
            store,
        }
    }

    /// Returns an unexpired token, refreshing it first if necessary.
    ///
    /// A refreshed token is persisted; a failure to persist is logged and
    /// the fresh token is still used.
    pub async fn token(&self) -> ProviderResult<Token> {
        let mut current = self.token.lock().await;
        if !current.is_expired() {
            return Ok(current.clone());
        }

        if !current.can_refresh() {
            return Err(ProviderError::authentication(
                "access token expired and no refresh token is available",
            ));
        }
        let refresh_token = current.refresh_token.clone().unwrap_or_default();

        debug!("access token expired, refreshing");
        let refreshed = self.oauth.refresh(&refresh_token).await?;
        if let Err(e) = self.store.save(&refreshed) {
            warn!(error = %e, "failed to persist refreshed token");
        }
        *current = refreshed;
        Ok(current.clone())
    }

    /// Returns the `Authorization` header value for an unexpired token.
    pub async fn authorization_header(&self) -> ProviderResult<String> {
        Ok(self.token().await?.authorization_header())
    }
}
