//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use docpipe_site::{Site, Source};

use crate::error::ServerError;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Loaded projects.
    pub(crate) site: Arc<Site>,
    /// Application version for `ETag` computation.
    pub(crate) version: String,
}

impl AppState {
    /// Look up a project, failing with a 404-mapped error.
    pub(crate) fn source(&self, key: &str) -> Result<&Source, ServerError> {
        self.site
            .get(key)
            .ok_or_else(|| ServerError::ProjectNotFound(key.to_owned()))
    }
}
