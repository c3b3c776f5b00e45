//! Projects API endpoints.
//!
//! Returns project metadata, and for a single project its table of contents
//! and rendered HTML.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use docpipe_renderer::TableOfContents;
use docpipe_site::Source;
use md5::{Digest, Md5};
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Project summary, as listed by GET /api/projects.
#[derive(Serialize)]
struct ProjectSummary<'a> {
    /// URL key.
    key: &'a str,
    /// Package name.
    name: &'a str,
    /// Package version.
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    /// One-line description.
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    /// Project homepage.
    #[serde(skip_serializing_if = "Option::is_none")]
    homepage: Option<&'a str>,
    /// License name.
    #[serde(skip_serializing_if = "Option::is_none")]
    license: Option<&'a str>,
}

impl<'a> From<&'a Source> for ProjectSummary<'a> {
    fn from(source: &'a Source) -> Self {
        let manifest = source.manifest();
        Self {
            key: source.key(),
            name: source.name(),
            version: manifest.version.as_deref(),
            description: manifest.description.as_deref(),
            homepage: manifest.homepage.as_deref(),
            license: manifest.license(),
        }
    }
}

/// Response for GET /api/projects.
#[derive(Serialize)]
struct ProjectsResponse<'a> {
    /// Projects in display order.
    projects: Vec<ProjectSummary<'a>>,
}

/// Response for GET /api/projects/{key}.
#[derive(Serialize)]
struct ProjectResponse<'a> {
    /// Project metadata.
    project: ProjectSummary<'a>,
    /// Table of contents.
    toc: &'a TableOfContents,
    /// Rendered README.
    html: String,
}

/// Handle GET /api/projects.
pub(crate) async fn get_projects(State(state): State<Arc<AppState>>) -> Response {
    let projects = state
        .site
        .sources()
        .iter()
        .map(ProjectSummary::from)
        .collect();
    Json(ProjectsResponse { projects }).into_response()
}

/// Handle GET /api/projects/{key}.
pub(crate) async fn get_project(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    let source = state.source(&key)?;
    let html = source.render()?;

    // Check If-None-Match header for conditional request
    let etag = compute_etag(&state.version, &html);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let response = ProjectResponse {
        project: ProjectSummary::from(source),
        toc: source.toc(),
        html,
    };

    Ok((
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        Json(response),
    )
        .into_response())
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
