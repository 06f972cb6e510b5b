use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use turnero_core::{BookingPolicy, CalendarEvent, format_wall_clock};
use turnero_providers::{BoxFuture, CalendarService, CreatedEvent, ProviderError, ProviderResult};
use turnero_server::{AppState, BookingOrchestrator, Renderer, router};

#[derive(Default)]
struct FakeCalendar {
    events: Mutex<Vec<CalendarEvent>>,
    fail: bool,
}

impl FakeCalendar {
    fn events(&self) -> Vec<CalendarEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl CalendarService for FakeCalendar {
    fn name(&self) -> &str {
        "fake"
    }

    fn create_event<'a>(
        &'a self,
        event: &'a CalendarEvent,
    ) -> BoxFuture<'a, ProviderResult<CreatedEvent>> {
        Box::pin(async move {
            self.events.lock().unwrap().push(event.clone());
            if self.fail {
                Err(ProviderError::server("API error (503 Service Unavailable)"))
            } else {
                Ok(CreatedEvent::new("evt-http"))
            }
        })
    }
}

fn app(calendar: Arc<FakeCalendar>, static_dir: &Path) -> Router {
    let orchestrator = BookingOrchestrator::new(calendar, BookingPolicy::default());
    let state = AppState::new(orchestrator, Renderer::new().unwrap());
    router(state, static_dir)
}

fn booking_request(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/reservar")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn index_renders_form() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(Arc::new(FakeCalendar::default()), dir.path());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"action="/reservar""#));
}

#[tokio::test]
async fn booking_creates_one_hour_event() {
    let dir = tempfile::tempdir().unwrap();
    let calendar = Arc::new(FakeCalendar::default());
    let app = app(calendar.clone(), dir.path());

    let response = app
        .oneshot(booking_request(
            "nombre=Ana&email=ana%40example.com&fecha=2025-03-10&hora=09%3A00",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<strong>Ana</strong>"));
    assert!(html.contains("2025-03-10"));
    assert!(html.contains("09:00"));

    let events = calendar.events();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert!(event.summary.contains("Ana"));
    assert_eq!(format_wall_clock(&event.start), "2025-03-10T09:00:00");
    assert_eq!(format_wall_clock(&event.end), "2025-03-10T10:00:00");
    assert_eq!(event.time_zone_name(), "America/Argentina/Buenos_Aires");
    assert_eq!(event.attendees, vec!["ana@example.com".to_string()]);
}

#[tokio::test]
async fn invalid_hour_is_bad_request_without_remote_call() {
    let dir = tempfile::tempdir().unwrap();
    let calendar = Arc::new(FakeCalendar::default());
    let app = app(calendar.clone(), dir.path());

    let response = app
        .oneshot(booking_request(
            "nombre=Ana&email=ana%40example.com&fecha=2025-03-10&hora=25%3A00",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Fecha u hora inválida");
    assert!(calendar.events().is_empty());
}

#[tokio::test]
async fn loosely_formatted_dates_are_bad_request() {
    let bodies = [
        "nombre=Ana&email=ana%40example.com&fecha=025-03-10&hora=09%3A00",
        "nombre=Ana&email=ana%40example.com&fecha=2025-3-10&hora=09%3A00",
        "nombre=Ana&email=ana%40example.com&fecha=%2B262142-12-31&hora=23%3A30",
        "nombre=Ana&email=ana%40example.com&fecha=2025-03-10&hora=9%3A5",
    ];

    for body in bodies {
        let dir = tempfile::tempdir().unwrap();
        let calendar = Arc::new(FakeCalendar::default());
        let app = app(calendar.clone(), dir.path());

        let response = app.oneshot(booking_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(body_text(response).await, "Fecha u hora inválida");
        assert!(calendar.events().is_empty(), "{body}");
    }
}

#[tokio::test]
async fn missing_fields_are_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let calendar = Arc::new(FakeCalendar::default());
    let app = app(calendar.clone(), dir.path());

    let response = app.oneshot(booking_request("nombre=Ana")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(calendar.events().is_empty());
}

#[tokio::test]
async fn calendar_failure_is_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let calendar = Arc::new(FakeCalendar {
        fail: true,
        ..FakeCalendar::default()
    });
    let app = app(calendar.clone(), dir.path());

    let response = app
        .oneshot(booking_request(
            "nombre=Ana&email=ana%40example.com&fecha=2025-03-10&hora=09%3A00",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Error al crear el evento");
    assert_eq!(calendar.events().len(), 1);
}

#[tokio::test]
async fn static_files_are_served_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("style.css"), "body { color: red; }\n").unwrap();
    let app = app(Arc::new(FakeCalendar::default()), dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/static/style.css")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css"
    );
    assert_eq!(body_text(response).await, "body { color: red; }\n");
}

#[tokio::test]
async fn unknown_static_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(Arc::new(FakeCalendar::default()), dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/static/missing.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
