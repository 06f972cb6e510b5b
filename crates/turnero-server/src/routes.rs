//! HTTP routes.
//!
//! - `GET /` - booking form
//! - `POST /reservar` - create a booking from the form
//! - `GET /static/*` - files from the configured static directory

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

use turnero_core::BookingRequest;

use crate::booking::{BookingOrchestrator, BookingResult};
use crate::render::{PageView, Renderer};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<BookingOrchestrator>,
    pub renderer: Arc<Renderer>,
}

impl AppState {
    pub fn new(orchestrator: BookingOrchestrator, renderer: Renderer) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            renderer: Arc::new(renderer),
        }
    }
}

/// Fields posted by the booking form. Missing fields decode as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "hora")]
    pub time: String,
}

impl From<BookingForm> for BookingRequest {
    fn from(form: BookingForm) -> Self {
        BookingRequest::new(form.name, form.email, form.date, form.time)
    }
}

/// Builds the application router.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/reservar", post(reserve))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Response {
    render(&state.renderer, &PageView::form())
}

async fn reserve(State(state): State<AppState>, Form(form): Form<BookingForm>) -> Response {
    match state.orchestrator.handle_booking(form.into()).await {
        BookingResult::Confirmed(confirmation) => {
            render(&state.renderer, &PageView::confirmed(&confirmation))
        }
        BookingResult::Rejected(failure) => {
            (failure.status_code(), failure.public_message()).into_response()
        }
    }
}

fn render(renderer: &Renderer, view: &PageView) -> Response {
    match renderer.render_page(view) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error al mostrar la página").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_field_names() {
        let form: BookingForm = serde_json::from_value(serde_json::json!({
            "nombre": "Ana",
            "email": "ana@example.com",
            "fecha": "2025-03-10",
            "hora": "09:00",
        }))
        .unwrap();

        let request = BookingRequest::from(form);
        assert_eq!(
            request,
            BookingRequest::new("Ana", "ana@example.com", "2025-03-10", "09:00")
        );
    }

    #[test]
    fn missing_form_fields_are_empty() {
        let form: BookingForm = serde_json::from_value(serde_json::json!({"nombre": "Ana"})).unwrap();
        assert_eq!(form.name, "Ana");
        assert!(form.email.is_empty());
        assert!(form.date.is_empty());
        assert!(form.time.is_empty());
    }
}
