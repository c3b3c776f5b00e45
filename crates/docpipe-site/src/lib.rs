//! README sources and the project registry for docpipe.
//!
//! This crate provides:
//! - [`Source`]: one package README with memoized HTML and table of contents
//! - [`Site`]: the ordered set of sources the server exposes
//! - [`PackageManifest`]: the `package.json` fields shown alongside a README
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use docpipe_renderer::HtmlRenderer;
//! use docpipe_site::{Site, SiteConfig, SourceConfig, open_cache};
//!
//! let config = SiteConfig {
//!     sources: vec![SourceConfig {
//!         key: "pagelet".to_owned(),
//!         dir: PathBuf::from("node_modules/pagelet"),
//!         remove: vec!["installation".to_owned()],
//!         ..Default::default()
//!     }],
//! };
//! let cache = open_cache(None, env!("CARGO_PKG_VERSION"));
//! let site = Site::load(&config, Arc::new(HtmlRenderer), cache.as_ref())?;
//!
//! let html = site.get("pagelet").unwrap().render()?;
//! # Ok(())
//! # }
//! ```

mod manifest;
mod site;
mod source;

use std::path::PathBuf;

pub use manifest::PackageManifest;
pub use site::{Site, SiteConfig, open_cache};
pub use source::{Source, SourceConfig};

// Re-export renderer types that appear in this crate's API
pub use docpipe_renderer::{RenderError, TableOfContents, TocEntry, TocSection};

/// Error returned when loading a source fails.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// A package file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// `package.json` is not valid JSON.
    #[error("Invalid package manifest {}: {source}", path.display())]
    Manifest {
        /// Manifest path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}
