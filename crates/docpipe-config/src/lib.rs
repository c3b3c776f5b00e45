//! Configuration management for docpipe.
//!
//! Parses `docpipe.toml` with serde and provides auto-discovery of the config
//! file in parent directories. Without a config file the defaults describe
//! the BigPipe documentation site: `bigpipe`, `pagelet` and `pipe.js` read
//! from `node_modules`.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! packages_dir = "node_modules"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [cache]
//! enabled = true
//!
//! [render]
//! github_user = "bigpipe"
//!
//! [[projects]]
//! key = "client"
//! package = "pipe.js"
//! remove = ["installation", "license", "table of contents"]
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `${VAR}` and `${VAR:-default}` are expanded in `server.host`,
//! `packages_dir` and `render.github_user`.

mod expand;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the directory packages are resolved in.
    pub packages_dir: Option<PathBuf>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docpipe.toml";

/// Directory for docpipe's own data, next to the config file.
const PROJECT_DIR: &str = ".docpipe";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Directory packages are resolved in (relative to the config file).
    packages_dir: Option<String>,
    /// Cache configuration as written.
    cache: CacheConfigRaw,
    /// Projects as written (`None` selects the default component list).
    projects: Option<Vec<ProjectConfigRaw>>,

    /// Resolved cache configuration (set after loading).
    #[serde(skip)]
    pub cache_resolved: CacheConfig,
    /// Resolved projects in display order (set after loading).
    #[serde(skip)]
    pub projects_resolved: Vec<ProjectConfig>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
    /// Directory relative paths resolve against.
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// GitHub user owning the package repositories.
    pub github_user: String,
    /// Branch relative README links resolve against.
    pub branch: String,
    /// Maximum README size in bytes (`None` for unlimited).
    pub limit: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            github_user: "bigpipe".to_owned(),
            branch: "master".to_owned(),
            limit: None,
        }
    }
}

/// Raw cache configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
}

/// Resolved cache configuration with absolute paths.
#[derive(Debug, Default)]
pub struct CacheConfig {
    /// Whether rendered HTML is persisted.
    pub enabled: bool,
    /// Cache directory.
    pub dir: PathBuf,
}

/// Raw project entry as parsed from TOML.
#[derive(Debug, Deserialize, Clone)]
struct ProjectConfigRaw {
    key: String,
    package: Option<String>,
    path: Option<String>,
    repo: Option<String>,
    #[serde(default)]
    remove: Vec<String>,
}

impl ProjectConfigRaw {
    fn new(key: &str, package: &str, remove: &[&str]) -> Self {
        Self {
            key: key.to_owned(),
            package: Some(package.to_owned()),
            path: None,
            repo: None,
            remove: remove.iter().map(|&s| s.to_owned()).collect(),
        }
    }
}

/// A resolved project: one README shown on the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// URL key (e.g., "client").
    pub key: String,
    /// Package name (e.g., "pipe.js").
    pub package: String,
    /// Package directory holding `README.md` and `package.json`.
    pub dir: PathBuf,
    /// GitHub repository name for link resolution.
    pub repo: String,
    /// README sections removed before rendering.
    pub remove: Vec<String>,
}

/// The BigPipe component list.
fn default_projects() -> Vec<ProjectConfigRaw> {
    vec![
        ProjectConfigRaw::new("bigpipe", "bigpipe", &["license", "testing", "table of contents"]),
        ProjectConfigRaw::new(
            "pagelet",
            "pagelet",
            &["installation", "license", "table of contents"],
        ),
        ProjectConfigRaw::new(
            "client",
            "pipe.js",
            &["installation", "license", "table of contents"],
        ),
    ]
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`DOCS_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a project key usable as a single URL path segment.
fn require_url_key(key: &str) -> Result<(), ConfigError> {
    require_non_empty(key, "projects.key")?;
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(ConfigError::Validation(format!(
            "projects.key \"{key}\" may only contain letters, digits, '-', '_' and '.'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docpipe.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache_resolved.enabled = cache_enabled;
        }
        if let Some(packages_dir) = &settings.packages_dir {
            // CLI paths are relative to the working directory, not the config file
            let packages_dir = std::env::current_dir()
                .map(|cwd| cwd.join(packages_dir))
                .unwrap_or_else(|_| packages_dir.clone());
            self.packages_dir = Some(packages_dir.display().to_string());
            self.projects_resolved = self.resolve_projects();
        }
    }

    /// Look up a resolved project by key.
    pub fn project(&self, key: &str) -> Option<&ProjectConfig> {
        self.projects_resolved.iter().find(|p| p.key == key)
    }

    /// Directory packages are resolved in.
    #[must_use]
    pub fn packages_dir(&self) -> PathBuf {
        self.base_dir
            .join(self.packages_dir.as_deref().unwrap_or("node_modules"))
    }

    /// Directory for docpipe's own data (`.docpipe/` next to the config file).
    #[must_use]
    pub fn project_dir(&self) -> PathBuf {
        self.base_dir.join(PROJECT_DIR)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            server: ServerConfig::default(),
            render: RenderConfig::default(),
            packages_dir: None,
            cache: CacheConfigRaw::default(),
            projects: None,
            cache_resolved: CacheConfig::default(),
            projects_resolved: Vec::new(),
            config_path: None,
            base_dir: base.to_path_buf(),
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_render()?;
        self.validate_projects()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate render configuration.
    fn validate_render(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.render.github_user, "render.github_user")?;
        require_non_empty(&self.render.branch, "render.branch")?;
        if self.render.limit == Some(0) {
            return Err(ConfigError::Validation(
                "render.limit must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate project entries.
    fn validate_projects(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for project in &self.projects_resolved {
            require_url_key(&project.key)?;
            if !seen.insert(project.key.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate projects.key \"{}\"",
                    project.key
                )));
            }
            require_non_empty(&project.package, "projects.package")?;
            if project.remove.iter().any(String::is_empty) {
                return Err(ConfigError::Validation(format!(
                    "projects.remove for \"{}\" contains an empty section name",
                    project.key
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.render.github_user =
            expand::expand_env(&self.render.github_user, "render.github_user")?;
        expand::expand_optional(&mut self.packages_dir, "packages_dir")?;
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.base_dir = config_dir.to_path_buf();

        let project_dir = self.project_dir();
        self.cache_resolved = CacheConfig {
            enabled: self.cache.enabled.unwrap_or(true),
            dir: self
                .cache
                .dir
                .as_deref()
                .map_or_else(|| project_dir.join("cache"), |dir| config_dir.join(dir)),
        };

        self.projects_resolved = self.resolve_projects();
    }

    /// Resolve project entries, defaulting package, directory and repository.
    fn resolve_projects(&self) -> Vec<ProjectConfig> {
        let packages_dir = self.packages_dir();
        let raw = self.projects.clone().unwrap_or_else(default_projects);

        raw.into_iter()
            .map(|project| {
                let package = project.package.unwrap_or_else(|| project.key.clone());
                let dir = project.path.as_deref().map_or_else(
                    || packages_dir.join(&package),
                    |path| self.base_dir.join(path),
                );
                ProjectConfig {
                    repo: project.repo.unwrap_or_else(|| package.clone()),
                    key: project.key,
                    package,
                    dir,
                    remove: project.remove,
                }
            })
            .collect()
    }
}
