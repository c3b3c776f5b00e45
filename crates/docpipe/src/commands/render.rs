//! `docpipe render` command implementation.
//!
//! Renders one project's README (or its table of contents) to stdout, going
//! through the same cache and section removal as the server.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use docpipe_config::{CliSettings, Config};
use docpipe_renderer::HtmlRenderer;
use docpipe_server::site_config_from_config;
use docpipe_site::{Source, open_cache};

use crate::error::CliError;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Project key (e.g., "pagelet").
    key: String,

    /// Print the table of contents as JSON instead of HTML.
    #[arg(long)]
    toc: bool,

    /// Path to configuration file (default: auto-discover docpipe.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory packages are resolved in (overrides config).
    #[arg(long, env = "DOCPIPE_PACKAGES_DIR")]
    packages_dir: Option<PathBuf>,

    /// Disable caching.
    #[arg(long)]
    no_cache: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the project is unknown, its files cannot be read,
    /// or rendering fails.
    pub(crate) fn execute(self, version: &str, out: &mut impl Write) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            packages_dir: self.packages_dir,
            cache_enabled: self.no_cache.then_some(false),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let site_config = site_config_from_config(&config);
        let source_config = site_config
            .sources
            .iter()
            .find(|source| source.key == self.key)
            .ok_or_else(|| {
                let known: Vec<&str> = site_config.sources.iter().map(|s| s.key.as_str()).collect();
                CliError::Validation(format!(
                    "Unknown project \"{}\" (known: {})",
                    self.key,
                    known.join(", ")
                ))
            })?;

        let cache_dir = config
            .cache_resolved
            .enabled
            .then_some(config.cache_resolved.dir.as_path());
        let cache = open_cache(cache_dir, version);
        let source = Source::load(source_config, Arc::new(HtmlRenderer), cache.as_ref())?;

        if self.toc {
            serde_json::to_writer_pretty(&mut *out, source.toc())?;
            writeln!(out)?;
        } else {
            out.write_all(source.render()?.as_bytes())?;
        }

        Ok(())
    }
}
