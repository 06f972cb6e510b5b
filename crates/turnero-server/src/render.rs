//! HTML rendering of the booking page.
//!
//! Strict mode makes a template referencing a field the view does not
//! provide fail loudly instead of rendering blanks. Values are HTML-escaped,
//! so visitor input echoed on the confirmation cannot inject markup.

use std::path::Path;

use handlebars::{Handlebars, RenderError};
use serde::Serialize;

use turnero_core::BookingConfirmation;

use crate::error::ServerResult;

const INDEX_TEMPLATE: &str = "index";
const DEFAULT_INDEX: &str = include_str!("../templates/index.html");

/// Data handed to the page template.
#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
pub struct PageView {
    pub confirmed: bool,
    pub name: String,
    pub date: String,
    pub time: String,
}

impl PageView {
    /// The empty booking form.
    pub fn form() -> Self {
        Self::default()
    }

    /// The form with a confirmation banner.
    pub fn confirmed(confirmation: &BookingConfirmation) -> Self {
        Self {
            confirmed: true,
            name: confirmation.name.clone(),
            date: confirmation.date.clone(),
            time: confirmation.time.clone(),
        }
    }
}

/// Renders [`PageView`]s into HTML.
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Creates a renderer with the built-in page template.
    pub fn new() -> ServerResult<Self> {
        let mut registry = Self::registry();
        registry
            .register_template_string(INDEX_TEMPLATE, DEFAULT_INDEX)
            .map_err(Box::new)?;
        Ok(Self { registry })
    }

    /// Creates a renderer using the page template at `path`.
    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let mut registry = Self::registry();
        registry
            .register_template_file(INDEX_TEMPLATE, path)
            .map_err(Box::new)?;
        Ok(Self { registry })
    }

    /// Uses `path` when given, the built-in template otherwise.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::new(),
        }
    }

    fn registry() -> Handlebars<'static> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry
    }

    /// Renders the booking page.
    pub fn render_page(&self, view: &PageView) -> Result<String, RenderError> {
        self.registry.render(INDEX_TEMPLATE, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turnero_core::BookingRequest;

    #[test]
    fn form_has_booking_fields() {
        let html = Renderer::new().unwrap().render_page(&PageView::form()).unwrap();

        assert!(html.contains(r#"action="/reservar""#));
        for field in ["nombre", "email", "fecha", "hora"] {
            assert!(html.contains(&format!(r#"name="{field}""#)), "{field}");
        }
        assert!(!html.contains("Turno reservado para"));
    }

    #[test]
    fn confirmation_echoes_booking() {
        let request = BookingRequest::new("Ana", "ana@example.com", "2025-03-10", "09:00");
        let view = PageView::confirmed(&BookingConfirmation::new(&request, "evt-1"));

        let html = Renderer::new().unwrap().render_page(&view).unwrap();
        assert!(html.contains("<strong>Ana</strong>"));
        assert!(html.contains("2025-03-10"));
        assert!(html.contains("09:00"));
    }

    #[test]
    fn visitor_input_is_escaped() {
        let request = BookingRequest::new("<script>x</script>", "a@b", "2025-03-10", "09:00");
        let view = PageView::confirmed(&BookingConfirmation::new(&request, "evt-1"));

        let html = Renderer::new().unwrap().render_page(&view).unwrap();
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn template_override_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<p>{{#if confirmed}}ok {{name}}{{else}}form{{/if}}</p>").unwrap();

        let renderer = Renderer::load(Some(path.as_path())).unwrap();
        assert_eq!(renderer.render_page(&PageView::form()).unwrap(), "<p>form</p>");
    }

    #[test]
    fn strict_mode_rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<p>{{phone}}</p>").unwrap();

        let renderer = Renderer::from_file(&path).unwrap();
        assert!(renderer.render_page(&PageView::form()).is_err());
    }

    #[test]
    fn missing_template_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Renderer::from_file(&dir.path().join("missing.html")).is_err());
    }
}
