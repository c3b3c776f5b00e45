//! Pagelet endpoints.
//!
//! Serve the page fragments on their own so clients can load or refresh one
//! part of a page.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Html;

use crate::error::ServerError;
use crate::state::AppState;
use crate::views;

/// Handle GET /pagelets/sidebar.
pub(crate) async fn get_sidebar(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(views::sidebar(state.site.sources()))
}

/// Handle GET /pagelets/projects/{key}.
pub(crate) async fn get_project(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ServerError> {
    let source = state.source(&key)?;
    let html = source.render()?;
    Ok(Html(views::project(source, &html)))
}
