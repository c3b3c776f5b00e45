//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let page_routes = Router::new()
        .route("/", get(handlers::pages::get_index))
        .route("/projects/{key}", get(handlers::pages::get_project));

    let pagelet_routes = Router::new()
        .route("/pagelets/sidebar", get(handlers::pagelets::get_sidebar))
        .route(
            "/pagelets/projects/{key}",
            get(handlers::pagelets::get_project),
        );

    let api_routes = Router::new()
        .route("/api/projects", get(handlers::api::get_projects))
        .route("/api/projects/{key}", get(handlers::api::get_project));

    Router::new()
        .merge(page_routes)
        .merge(pagelet_routes)
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use docpipe_cache::NullCacheBucket;
    use docpipe_renderer::{HtmlRenderer, RenderError, RenderOptions, Renderer};
    use docpipe_site::{PackageManifest, Site, Source, SourceConfig};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    const BIGPIPE_README: &str = "\
# BigPipe

BigPipe is a radical new web framework.

## Installation

npm install bigpipe

## Getting started

### Pagelets

Pagelets are <small> parts of a page.

## License

MIT
";

    const PAGELET_README: &str = "# Pagelet\n\n## Events\n\n### render\n";

    fn source(key: &str, manifest: &str, readme: &str, renderer: Arc<dyn Renderer>) -> Source {
        let config = SourceConfig {
            key: key.to_owned(),
            remove: vec!["installation".to_owned(), "license".to_owned()],
            ..Default::default()
        };
        Source::new(
            &config,
            PackageManifest::parse(manifest).unwrap(),
            readme,
            renderer,
            Box::new(NullCacheBucket),
        )
    }

    fn test_state() -> Arc<AppState> {
        let renderer: Arc<dyn Renderer> = Arc::new(HtmlRenderer);
        let site = Site::from_sources(vec![
            source(
                "bigpipe",
                r#"{ "name": "bigpipe", "version": "0.9.0", "description": "Pagelets & more", "license": "MIT" }"#,
                BIGPIPE_README,
                Arc::clone(&renderer),
            ),
            source(
                "pagelet",
                r#"{ "name": "pagelet", "version": "0.8.1" }"#,
                PAGELET_README,
                renderer,
            ),
        ]);
        Arc::new(AppState {
            site: Arc::new(site),
            version: "1.0.0".to_owned(),
        })
    }

    async fn get(state: Arc<AppState>, uri: &str) -> Response {
        create_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_index_lists_every_project() {
        let response = get(test_state(), "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>BigPipe</title>"));
        assert!(html.contains("<section class=\"project\" id=\"project-bigpipe\">"));
        assert!(html.contains("<section class=\"project\" id=\"project-pagelet\">"));
        assert!(html.contains("<p>Pagelets &amp; more</p>"));
        assert!(!html.contains("npm install bigpipe"));
    }

    #[tokio::test]
    async fn test_project_page() {
        let response = get(test_state(), "/projects/pagelet").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("<title>pagelet</title>"));
        assert!(html.contains("<a href=\"/projects/bigpipe\">bigpipe</a>"));
        assert!(html.contains("<h3 id=\"render\">render</h3>"));
        assert!(!html.contains("project-bigpipe"));
    }

    #[tokio::test]
    async fn test_unknown_project_is_404() {
        for uri in [
            "/projects/nope",
            "/pagelets/projects/nope",
            "/api/projects/nope",
        ] {
            let response = get(test_state(), uri).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(
                body_json(response).await,
                serde_json::json!({ "error": "Project not found", "key": "nope" })
            );
        }
    }

    #[tokio::test]
    async fn test_sidebar_pagelet() {
        let response = get(test_state(), "/pagelets/sidebar").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.starts_with("<nav class=\"sidebar\">"));
        assert!(html.contains("<span class=\"version\">0.8.1</span>"));
        assert!(!html.contains("<html"));
    }

    #[tokio::test]
    async fn test_project_pagelet_has_toc_and_readme() {
        let response = get(test_state(), "/pagelets/projects/bigpipe").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("<nav class=\"toc\">"));
        assert!(html.contains(
            "<li><a href=\"#getting-started\">Getting started</a><ul><li><a href=\"#pagelets\">Pagelets</a></li></ul></li>"
        ));
        assert!(!html.contains("#installation"));
        assert!(html.contains("<h2 id=\"getting-started\">Getting started</h2>"));
    }

    #[tokio::test]
    async fn test_api_projects() {
        let response = get(test_state(), "/api/projects").await;
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "projects": [
                    {
                        "key": "bigpipe",
                        "name": "bigpipe",
                        "version": "0.9.0",
                        "description": "Pagelets & more",
                        "license": "MIT"
                    },
                    { "key": "pagelet", "name": "pagelet", "version": "0.8.1" }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_api_project() {
        let response = get(test_state(), "/api/projects/pagelet").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::ETAG));

        let json = body_json(response).await;
        assert_eq!(json["project"]["key"], "pagelet");
        assert_eq!(
            json["toc"],
            serde_json::json!([
                {
                    "id": "events",
                    "name": "Events",
                    "sections": [{ "id": "render", "name": "render" }]
                }
            ])
        );
        assert!(json["html"].as_str().unwrap().contains("<h2 id=\"events\">Events</h2>"));
    }

    #[tokio::test]
    async fn test_api_project_not_modified() {
        let state = test_state();
        let response = get(Arc::clone(&state), "/api/projects/pagelet").await;
        let etag = response.headers()[header::ETAG].clone();

        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/projects/pagelet")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_security_headers() {
        let response = get(test_state(), "/pagelets/sidebar").await;
        let headers = response.headers();

        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert!(headers.contains_key("content-security-policy"));
    }

    /// Renderer that always fails, counting attempts.
    struct FailingRenderer(AtomicUsize);

    impl Renderer for FailingRenderer {
        fn render(&self, _markdown: &str, _options: &RenderOptions) -> Result<String, RenderError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(RenderError::Failed("renderer unavailable".to_owned()))
        }
    }

    #[tokio::test]
    async fn test_render_failure_is_500_and_retried() {
        let renderer = Arc::new(FailingRenderer(AtomicUsize::new(0)));
        let site = Site::from_sources(vec![source(
            "bigpipe",
            "{}",
            BIGPIPE_README,
            Arc::clone(&renderer) as Arc<dyn Renderer>,
        )]);
        let state = Arc::new(AppState {
            site: Arc::new(site),
            version: String::new(),
        });

        let response = get(Arc::clone(&state), "/api/projects/bigpipe").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "render failed: renderer unavailable" })
        );

        let response = get(state, "/projects/bigpipe").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(renderer.0.load(Ordering::SeqCst), 2);
    }
}
