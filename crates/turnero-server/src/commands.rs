//! Startup sequences for the `serve` and `auth` commands.
//!
//! Both load the client credentials and run the token authority first.
//! Any failure on the way is a [`ServerError`] and aborts startup.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use turnero_providers::CalendarService;
use turnero_providers::google::{
    ClientCredentials, ConsolePrompt, GoogleCalendarClient, GoogleConfig, OAuthClient, Token,
    TokenAuthority, TokenStore,
};

use crate::booking::BookingOrchestrator;
use crate::config::AppConfig;
use crate::error::ServerResult;
use crate::render::Renderer;
use crate::routes::{AppState, router};

/// Loads the credentials named in `config` and builds the Google settings.
pub fn google_config(config: &AppConfig) -> ServerResult<GoogleConfig> {
    let credentials = ClientCredentials::from_file(&config.google.credentials_path)?;
    config.google_config(credentials)
}

fn token_authority(google: &GoogleConfig) -> ServerResult<TokenAuthority> {
    let oauth = OAuthClient::new(google.credentials.clone(), google.timeout)?;
    Ok(TokenAuthority::new(
        oauth,
        TokenStore::new(&google.token_path),
        Arc::new(ConsolePrompt),
    ))
}

/// Runs the `auth` command: obtains a token and saves it.
pub async fn auth(config: &AppConfig, force: bool) -> ServerResult<Token> {
    let google = google_config(config)?;
    let authority = token_authority(&google)?;
    let token = if force {
        authority.authorize().await?
    } else {
        authority.acquire_token().await?
    };

    info!(path = %google.token_path.display(), "calendar access authorized");
    Ok(token)
}

/// Builds the calendar service, authorizing first if needed.
pub async fn calendar_service(config: &AppConfig) -> ServerResult<Arc<dyn CalendarService>> {
    let google = google_config(config)?;
    let authority = token_authority(&google)?;
    let token = authority.acquire_token().await?;
    let tokens = Arc::new(authority.into_source(token));
    let client = GoogleCalendarClient::new(&google, tokens)?;

    info!(calendar = client.calendar_id(), "calendar client ready");
    Ok(Arc::new(client))
}

/// Builds the router state around `service`.
pub fn app_state(config: &AppConfig, service: Arc<dyn CalendarService>) -> ServerResult<AppState> {
    let orchestrator = BookingOrchestrator::new(service, config.booking_policy()?);
    let renderer = Renderer::load(config.web.template_path.as_deref())?;
    Ok(AppState::new(orchestrator, renderer))
}

/// Runs the `serve` command until ctrl-c.
pub async fn serve(config: &AppConfig) -> ServerResult<()> {
    let service = calendar_service(config).await?;
    let state = app_state(config, service)?;
    let app = router(state, &config.web.static_dir);

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(address = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
