//! Error handling for the libris HTTP layer

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("template error: {0}")]
    Render(#[from] askama::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Render(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &str {
        match self {
            AppError::NotFound { code, .. } => code,
            AppError::Database(sqlx::Error::RowNotFound) => "not_found",
            AppError::Database(_) => "database_error",
            AppError::Render(_) => "render_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::NotFound { message, .. } => message.clone(),
            // Hide internal details from release builds.
            _ if cfg!(not(debug_assertions)) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage<'a> {
    status: u16,
    reason: &'a str,
    message: &'a str,
    trace_id: String,
    timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::now_v7();
        let timestamp = OffsetDateTime::now_utc().to_string();
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code = %self.code(),
                status_code = %status.as_u16(),
                error = %self,
                "Request error"
            );
        } else {
            tracing::info!(
                error_id = %error_id,
                error_code = %self.code(),
                status_code = %status.as_u16(),
                "Request error"
            );
        }

        let message = self.public_message();
        let page = ErrorPage {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error"),
            message: &message,
            trace_id: error_id.to_string(),
            timestamp,
        };

        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(_) => (status, message).into_response(),
        }
    }
}

/// Fallback handler for unmatched routes
pub async fn not_found() -> AppError {
    AppError::not_found("Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn not_found_renders_html_page() {
        let response = AppError::not_found("Author not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_text(response).await;
        assert!(body.contains("<h1>Author not found</h1>"));
        assert!(body.contains("404 Not Found"));
        assert!(body.contains("trace id"));
    }

    #[tokio::test]
    async fn trace_id_is_time_ordered_uuid() {
        let body = body_text(AppError::not_found("Book not found").into_response()).await;
        let trace_id = body
            .split("trace id ")
            .nth(1)
            .and_then(|rest| rest.split(' ').next())
            .unwrap();
        assert_eq!(Uuid::parse_str(trace_id).unwrap().get_version_num(), 7);
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let error = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error_mapping() {
        let internal_error = anyhow::anyhow!("Database connection failed");
        let error = AppError::Internal(internal_error);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn messages_are_escaped() {
        let response = AppError::not_found("<script>").into_response();
        let body = body_text(response).await;
        assert!(body.contains("&lt;script&gt;"));
        assert!(!body.contains("<script>"));
    }
}
