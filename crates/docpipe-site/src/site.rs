//! The project registry.
//!
//! [`Site`] loads every configured source once at startup and keeps them in
//! configuration order. Lookups by key are linear; a site holds a handful of
//! projects.

use std::path::Path;
use std::sync::Arc;

use docpipe_cache::{Cache, FileCache, NullCache};
use docpipe_renderer::Renderer;

use crate::SiteError;
use crate::source::{Source, SourceConfig};

/// Configuration for [`Site`].
#[derive(Clone, Debug, Default)]
pub struct SiteConfig {
    /// Sources in display order.
    pub sources: Vec<SourceConfig>,
}

/// Ordered collection of README sources.
#[derive(Debug, Default)]
pub struct Site {
    sources: Vec<Source>,
}

impl Site {
    /// Load every configured source.
    ///
    /// # Errors
    ///
    /// Fails on the first source whose files cannot be read.
    pub fn load(
        config: &SiteConfig,
        renderer: Arc<dyn Renderer>,
        cache: &dyn Cache,
    ) -> Result<Self, SiteError> {
        let sources = config
            .sources
            .iter()
            .map(|source| {
                let loaded = Source::load(source, Arc::clone(&renderer), cache)?;
                tracing::info!(
                    key = %loaded.key(),
                    readme = %loaded.readme_path().display(),
                    cached = loaded.is_rendered(),
                    "Loaded source"
                );
                Ok(loaded)
            })
            .collect::<Result<Vec<_>, SiteError>>()?;

        Ok(Self::from_sources(sources))
    }

    /// Build a site from sources already constructed.
    pub fn from_sources(sources: Vec<Source>) -> Self {
        Self { sources }
    }

    /// Look up a source by key.
    pub fn get(&self, key: &str) -> Option<&Source> {
        self.sources.iter().find(|source| source.key() == key)
    }

    /// All sources in configuration order.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the site has no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Open the rendered HTML cache.
///
/// Returns a [`FileCache`] rooted at `dir`, or a [`NullCache`] when caching
/// is disabled.
pub fn open_cache(dir: Option<&Path>, version: &str) -> Box<dyn Cache> {
    match dir {
        Some(dir) => Box::new(FileCache::new(dir.to_path_buf(), version)),
        None => Box::new(NullCache),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use docpipe_renderer::HtmlRenderer;
    use tempfile::TempDir;

    use super::*;

    fn write_package(root: &Path, name: &str, readme: &str) -> PathBuf {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("README.md"), readme).unwrap();
        std::fs::write(
            dir.join("package.json"),
            format!(r#"{{ "name": "{name}", "version": "1.0.0" }}"#),
        )
        .unwrap();
        dir
    }

    fn source_config(key: &str, dir: PathBuf) -> SourceConfig {
        SourceConfig {
            key: key.to_owned(),
            dir,
            ..Default::default()
        }
    }

    #[test]
    fn test_load_preserves_order() {
        let tmp = TempDir::new().unwrap();
        let config = SiteConfig {
            sources: vec![
                source_config("bigpipe", write_package(tmp.path(), "bigpipe", "# bigpipe\n")),
                source_config("pagelet", write_package(tmp.path(), "pagelet", "# pagelet\n")),
                source_config("client", write_package(tmp.path(), "pipe.js", "# pipe.js\n")),
            ],
        };

        let site = Site::load(&config, Arc::new(HtmlRenderer), &NullCache).unwrap();

        let keys: Vec<&str> = site.sources().iter().map(Source::key).collect();
        assert_eq!(keys, ["bigpipe", "pagelet", "client"]);
        assert_eq!(site.len(), 3);
        assert_eq!(site.get("client").unwrap().name(), "pipe.js");
        assert!(site.get("missing").is_none());
    }

    #[test]
    fn test_load_fails_on_missing_readme() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("empty");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("package.json"), "{}").unwrap();

        let config = SiteConfig {
            sources: vec![source_config("empty", dir)],
        };
        let err = Site::load(&config, Arc::new(HtmlRenderer), &NullCache).unwrap_err();
        assert!(err.to_string().contains("README.md"));
    }

    #[test]
    fn test_empty_site() {
        let site = Site::load(&SiteConfig::default(), Arc::new(HtmlRenderer), &NullCache).unwrap();
        assert!(site.is_empty());
    }

    #[test]
    fn test_open_cache_persists_between_loads() {
        let tmp = TempDir::new().unwrap();
        let config = SiteConfig {
            sources: vec![source_config(
                "pagelet",
                write_package(tmp.path(), "pagelet", "# pagelet\n\n## Events\n"),
            )],
        };
        let cache_dir = tmp.path().join("cache");

        let cache = open_cache(Some(&cache_dir), "1.0.0");
        let site = Site::load(&config, Arc::new(HtmlRenderer), cache.as_ref()).unwrap();
        site.get("pagelet").unwrap().render().unwrap();

        let cache = open_cache(Some(&cache_dir), "1.0.0");
        let site = Site::load(&config, Arc::new(HtmlRenderer), cache.as_ref()).unwrap();
        assert!(site.get("pagelet").unwrap().is_rendered());

        // A version change wipes the cache
        let cache = open_cache(Some(&cache_dir), "2.0.0");
        let site = Site::load(&config, Arc::new(HtmlRenderer), cache.as_ref()).unwrap();
        assert!(!site.get("pagelet").unwrap().is_rendered());
    }
}
