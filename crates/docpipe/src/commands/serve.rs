//! `docpipe serve` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use docpipe_config::{CliSettings, Config};
use docpipe_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover docpipe.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory packages are resolved in (overrides config).
    #[arg(long, env = "DOCPIPE_PACKAGES_DIR")]
    packages_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (request and render logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable caching (default: enabled).
    #[arg(long)]
    cache: Option<bool>,

    /// Disable caching.
    #[arg(long, conflicts_with = "cache")]
    no_cache: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            cache_enabled: self.resolve_cache_enabled(),
            host: self.host,
            port: self.port,
            packages_dir: self.packages_dir,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Packages directory: {}",
            config.packages_dir().display()
        ));
        for project in &config.projects_resolved {
            output.info(&format!("  /projects/{} -> {}", project.key, project.dir.display()));
        }

        if config.cache_resolved.enabled {
            ensure_project_dir(&config.project_dir())?;
            output.info(&format!(
                "Cache directory: {}",
                config.cache_resolved.dir.display()
            ));
        } else {
            output.info("Cache: disabled");
        }

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Resolve `cache_enabled` from --cache/--no-cache flags.
    fn resolve_cache_enabled(&self) -> Option<bool> {
        self.no_cache.then_some(false).or(self.cache)
    }
}

/// Ensure the `.docpipe/` project directory exists with a `.gitignore`.
fn ensure_project_dir(project_dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(project_dir)
        .map_err(|e| CliError::Server(format!("Failed to create project directory: {e}")))?;

    let gitignore_path = project_dir.join(".gitignore");
    if !gitignore_path.exists() {
        let _ = std::fs::write(&gitignore_path, "# Automatically created by docpipe\n*\n");
    }

    Ok(())
}
