//! HTTP server for the docpipe README site.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - Full HTML pages: the index with every project, and one page per project
//! - Pagelets: the sidebar and project HTML fragments on their own
//! - A JSON API for project metadata, table of contents and rendered HTML
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use docpipe_server::{ServerConfig, run_server};
//! use docpipe_site::{SiteConfig, SourceConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 8080,
//!         cache_dir: Some(PathBuf::from(".docpipe/cache")),
//!         site: SiteConfig {
//!             sources: vec![SourceConfig {
//!                 key: "pagelet".to_owned(),
//!                 dir: PathBuf::from("node_modules/pagelet"),
//!                 ..Default::default()
//!             }],
//!         },
//!         version: "1.0.0".to_owned(),
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (docpipe-server)
//!                        │
//!                        ├─► Pages and pagelets (HTML views)
//!                        ├─► API routes (JSON)
//!                        │       │
//!                        │       └─► Site ──► Source (render + toc, memoized)
//!                        │
//!                        └─► Security headers + request tracing
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod views;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use docpipe_config::Config;
use docpipe_renderer::{GithubRepo, HtmlRenderer, RenderOptions};
use docpipe_site::{Site, SiteConfig, SourceConfig, open_cache};
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Cache directory (`None` disables caching).
    pub cache_dir: Option<PathBuf>,
    /// Projects to serve.
    pub site: SiteConfig,
    /// Application version (for cache invalidation and `ETag`s).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            cache_dir: None,
            site: SiteConfig::default(),
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// Loads every project up front, then serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if a project cannot be loaded, the address is invalid,
/// or the listener fails to bind.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let cache = open_cache(config.cache_dir.as_deref(), &config.version);
    let site = Site::load(&config.site, Arc::new(HtmlRenderer), cache.as_ref())?;
    tracing::info!(projects = site.len(), "Site loaded");

    let state = Arc::new(AppState {
        site: Arc::new(site),
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from docpipe config.
///
/// # Arguments
///
/// * `config` - docpipe configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_config(config: &Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        cache_dir: config
            .cache_resolved
            .enabled
            .then(|| config.cache_resolved.dir.clone()),
        site: site_config_from_config(config),
        version,
    }
}

/// Build the site configuration for every configured project.
#[must_use]
pub fn site_config_from_config(config: &Config) -> SiteConfig {
    let sources = config
        .projects_resolved
        .iter()
        .map(|project| SourceConfig {
            key: project.key.clone(),
            dir: project.dir.clone(),
            remove: project.remove.clone(),
            options: RenderOptions {
                github: Some(
                    GithubRepo::new(&config.render.github_user, &project.repo)
                        .with_branch(&config.render.branch),
                ),
                limit: config.render.limit,
            },
        })
        .collect();

    SiteConfig { sources }
}
