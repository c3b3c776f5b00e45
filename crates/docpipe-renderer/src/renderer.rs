//! The renderer seam.
//!
//! Documents render through the [`Renderer`] trait so the caching layer never
//! depends on a particular Markdown implementation.

/// A GitHub repository that relative README links point into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GithubRepo {
    /// Owning user or organization.
    pub user: String,
    /// Repository name.
    pub repo: String,
    /// Branch that relative links resolve against.
    pub branch: String,
}

impl GithubRepo {
    /// Repository on the default `master` branch.
    pub fn new(user: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            repo: repo.into(),
            branch: "master".to_owned(),
        }
    }

    /// Set the branch relative links resolve against.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Web URL for a repository-relative path.
    pub fn blob_url(&self, path: &str) -> String {
        format!(
            "https://github.com/{}/{}/blob/{}/{}",
            self.user,
            self.repo,
            self.branch,
            trim_relative(path)
        )
    }

    /// Raw content URL for a repository-relative path.
    pub fn raw_url(&self, path: &str) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}",
            self.user,
            self.repo,
            self.branch,
            trim_relative(path)
        )
    }
}

fn trim_relative(path: &str) -> &str {
    path.trim_start_matches("./").trim_start_matches('/')
}

/// Options passed to every render.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Repository used to resolve relative links and images.
    pub github: Option<GithubRepo>,
    /// Maximum source size in bytes (`None` for unlimited).
    pub limit: Option<usize>,
}

/// Error returned when rendering fails.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Source exceeds the configured size limit.
    #[error("source is {size} bytes, exceeding the {limit} byte render limit")]
    TooLarge {
        /// Source size in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },
    /// Renderer-specific failure.
    #[error("render failed: {0}")]
    Failed(String),
}

/// Converts Markdown into HTML.
pub trait Renderer: Send + Sync {
    /// Render `markdown` to an HTML fragment.
    fn render(&self, markdown: &str, options: &RenderOptions) -> Result<String, RenderError>;
}
