//! Helpers shared by the page modules.

pub mod forms;
pub mod validation;

use askama::Template;
use axum::response::Html;
use libris_http::AppResult;

/// Render a template into an HTML response body.
pub fn render<T: Template>(template: &T) -> AppResult<Html<String>> {
    Ok(Html(template.render()?))
}

