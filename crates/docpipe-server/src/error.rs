//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docpipe_renderer::RenderError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No project is configured under the given key.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Rendering a README failed.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::ProjectNotFound(key) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Project not found", "key": key}),
            ),
            Self::Render(e) => {
                tracing::error!(error = %e, "Render failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": e.to_string()}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
