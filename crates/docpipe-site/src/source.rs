//! A single README source.
//!
//! [`Source`] owns a package's README content and memoizes the two things
//! derived from it: the rendered HTML and the table of contents. Unwanted
//! sections are removed once, at construction, so both derivations see the
//! edited document.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use docpipe_cache::{Cache, CacheBucket, CacheBucketExt};
use docpipe_renderer::{RenderError, RenderOptions, Renderer, TableOfContents, build_toc, heading_tokens};
use docpipe_sections::remove_sections_from;
use md5::{Digest, Md5};

use crate::SiteError;
use crate::manifest::PackageManifest;

/// Cache bucket holding rendered README HTML.
pub(crate) const HTML_BUCKET: &str = "html";

const README: &str = "README.md";
const MANIFEST: &str = "package.json";

/// How to load and render one source.
#[derive(Clone, Debug, Default)]
pub struct SourceConfig {
    /// URL key (e.g., "client").
    pub key: String,
    /// Package directory holding `README.md` and `package.json`.
    pub dir: PathBuf,
    /// Sections removed before rendering (matched case-insensitively by substring).
    pub remove: Vec<String>,
    /// Options passed to the renderer.
    pub options: RenderOptions,
}

/// A package README with memoized HTML and table of contents.
pub struct Source {
    key: String,
    manifest: PackageManifest,
    readme_path: PathBuf,
    content: String,
    etag: String,
    options: RenderOptions,
    renderer: Arc<dyn Renderer>,
    bucket: Box<dyn CacheBucket>,
    html: RwLock<Option<String>>,
    toc: OnceLock<TableOfContents>,
}

impl Source {
    /// Read a package's README and manifest from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if either file is missing or unreadable, or if
    /// the manifest is not valid JSON.
    pub fn load(
        config: &SourceConfig,
        renderer: Arc<dyn Renderer>,
        cache: &dyn Cache,
    ) -> Result<Self, SiteError> {
        let manifest = PackageManifest::read(&config.dir.join(MANIFEST))?;
        let readme_path = config.dir.join(README);
        let readme = std::fs::read_to_string(&readme_path).map_err(|source| SiteError::Read {
            path: readme_path.clone(),
            source,
        })?;

        Ok(Self::new(
            config,
            manifest,
            &readme,
            renderer,
            cache.bucket(HTML_BUCKET),
        ))
    }

    /// Build a source from README text already in memory.
    ///
    /// Configured sections are removed immediately. HTML persisted by an
    /// earlier run for the same (edited) content is picked up from `bucket`.
    pub fn new(
        config: &SourceConfig,
        manifest: PackageManifest,
        readme: &str,
        renderer: Arc<dyn Renderer>,
        bucket: Box<dyn CacheBucket>,
    ) -> Self {
        let content = remove_sections_from(readme, &config.remove);
        let etag = content_etag(&content);
        let html = bucket
            .get_string(&cache_key(&config.key), &etag)
            .filter(|html| !html.is_empty());

        if html.is_some() {
            tracing::debug!(key = %config.key, "loaded rendered HTML from cache");
        }

        Self {
            key: config.key.clone(),
            manifest,
            readme_path: config.dir.join(README),
            content,
            etag,
            options: config.options.clone(),
            renderer,
            bucket,
            html: RwLock::new(html),
            toc: OnceLock::new(),
        }
    }

    /// URL key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display name: the manifest name, falling back to the key.
    pub fn name(&self) -> &str {
        if self.manifest.name.is_empty() {
            &self.key
        } else {
            &self.manifest.name
        }
    }

    /// Package manifest.
    pub fn manifest(&self) -> &PackageManifest {
        &self.manifest
    }

    /// Path the README was read from.
    pub fn readme_path(&self) -> &Path {
        &self.readme_path
    }

    /// README content after section removal.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether rendered HTML is already available without rendering.
    pub fn is_rendered(&self) -> bool {
        self.html
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Render the README to HTML.
    ///
    /// The first successful, non-empty render is persisted to the cache and
    /// memoized; later calls return it without rendering again. The lock is
    /// not held while rendering, so concurrent first calls each render.
    ///
    /// # Errors
    ///
    /// Returns the renderer's error unchanged. Nothing is memoized on failure,
    /// so the next call renders again.
    pub fn render(&self) -> Result<String, RenderError> {
        if let Some(html) = self
            .html
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            tracing::debug!(key = %self.key, "serving memoized HTML");
            return Ok(html.clone());
        }

        tracing::info!(key = %self.key, "rendering README");
        let html = self.renderer.render(&self.content, &self.options)?;

        if !html.is_empty() {
            self.bucket
                .set_string(&cache_key(&self.key), &self.etag, &html);
            *self.html.write().unwrap_or_else(PoisonError::into_inner) = Some(html.clone());
        }

        Ok(html)
    }

    /// Table of contents of the README, computed on first use.
    pub fn toc(&self) -> &TableOfContents {
        self.toc
            .get_or_init(|| build_toc(&heading_tokens(&self.content)))
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("key", &self.key)
            .field("readme_path", &self.readme_path)
            .field("rendered", &self.is_rendered())
            .finish_non_exhaustive()
    }
}

/// Cache entry name for a source: `{key}.html`.
fn cache_key(key: &str) -> String {
    format!("{key}.html")
}

/// Etag of README content (MD5 truncated to 64 bits).
fn content_etag(content: &str) -> String {
    let hash = Md5::digest(content.as_bytes());
    hex::encode(hash)[..16].to_owned()
}
