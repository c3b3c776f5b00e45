//! Rendered HTML cache for docpipe.
//!
//! Rendering a README is the only expensive thing the site does, so rendered
//! HTML is kept on disk between runs. Two traits decouple the site from the
//! storage mechanism:
//!
//! - [`Cache`]: Factory for named cache buckets
//! - [`CacheBucket`]: Key-value store with etag-based invalidation
//!
//! [`CacheBucketExt`] adds string accessors on top of the raw byte API.
//!
//! # Implementations
//!
//! - [`NullCache`] / [`NullCacheBucket`]: No-op implementations (always miss)
//! - [`FileCache`]: One file per entry under a versioned root directory
//!
//! # Example
//!
//! ```
//! use docpipe_cache::{Cache, CacheBucketExt, NullCache};
//!
//! let cache = NullCache;
//! let bucket = cache.bucket("html");
//! bucket.set_string("bigpipe.html", "v1", "<h1>BigPipe</h1>");
//! assert_eq!(bucket.get_string("bigpipe.html", "v1"), None); // NullCache always misses
//! ```

mod ext;
mod file;

pub use ext::CacheBucketExt;
pub use file::FileCache;

/// A named partition within a [`Cache`].
///
/// A hit requires both the key and the etag to match. The etag is opaque to
/// the cache; docpipe uses a hash of the Markdown source so that an edited
/// README never serves stale HTML.
pub trait CacheBucket: Send + Sync {
    /// Retrieve a cached value.
    ///
    /// Returns `None` on a miss or etag mismatch. An empty `etag` skips
    /// validation.
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>>;

    /// Store a value, replacing any existing entry for `key`.
    ///
    /// Best-effort: failures are swallowed.
    fn set(&self, key: &str, etag: &str, value: &[u8]);
}

/// Factory for named cache [`CacheBucket`]s.
pub trait Cache: Send + Sync {
    /// Open or create a named bucket (e.g., "html").
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// No-op [`CacheBucket`] that never stores or retrieves data.
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str, _etag: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _etag: &str, _value: &[u8]) {}
}

/// No-op [`Cache`] used when caching is disabled.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}
