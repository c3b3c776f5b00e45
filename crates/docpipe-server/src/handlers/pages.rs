//! Full page endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Html;

use crate::error::ServerError;
use crate::state::AppState;
use crate::views;

/// Site title on the index page.
const SITE_TITLE: &str = "BigPipe";

/// Handle GET /: every project on one page.
pub(crate) async fn get_index(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ServerError> {
    let sources = state.site.sources();
    let mut main = String::new();
    for source in sources {
        let html = source.render()?;
        main.push_str(&views::project(source, &html));
    }

    Ok(Html(views::document(
        SITE_TITLE,
        &views::sidebar(sources),
        &main,
    )))
}

/// Handle GET /projects/{key}.
pub(crate) async fn get_project(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ServerError> {
    let source = state.source(&key)?;
    let html = source.render()?;

    Ok(Html(views::document(
        source.name(),
        &views::sidebar(state.site.sources()),
        &views::project(source, &html),
    )))
}
