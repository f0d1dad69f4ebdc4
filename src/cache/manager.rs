//! Cache manager for persisting service responses to disk
//!
//! Provides a `CacheManager` that stores each lookup's JSON response in its own
//! file, named after the sanitized lookup name. Entries never expire: presence
//! of the file alone counts as a hit.

use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Stem used when a name sanitizes to nothing usable
pub const FALLBACK_STEM: &str = "unnamed";

/// Errors that can occur while reading or writing cache entries
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem operation failed
    #[error("cache I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cache file content is not valid JSON, or the value could not be serialized
    #[error("invalid cache JSON at {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Turns a lookup name into a file stem safe to use inside the cache directory
///
/// Path separators (`/` and `\`) become `_` and surrounding whitespace is
/// trimmed. Names made only of separators and whitespace (including the
/// empty name) map to [`FALLBACK_STEM`]; underscores typed as part of a name
/// are kept.
pub fn sanitize_name(name: &str) -> String {
    let separators_only = name.chars().all(|c| c == '/' || c == '\\' || c.is_whitespace());
    if separators_only {
        return FALLBACK_STEM.to_string();
    }

    name.replace(['/', '\\'], "_").trim().to_string()
}

/// Manages reading and writing cached responses on disk
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager rooted at the given directory
    ///
    /// The directory is not touched until the first read or write.
    pub fn with_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn dir(&self) -> &std::path::Path {
        &self.cache_dir
    }

    /// Returns the path to the cache file for the given lookup name
    pub fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", sanitize_name(name)))
    }

    /// Ensures the cache directory exists
    pub fn ensure_dir(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir).map_err(|source| CacheError::Io {
            path: self.cache_dir.clone(),
            source,
        })
    }

    /// Reads the cached response for a name
    ///
    /// # Returns
    /// * `Ok(None)` if no cache file exists
    /// * `Ok(Some(value))` if the file exists and holds valid JSON
    /// * `Err(CacheError)` if the file cannot be read or parsed; a broken entry
    ///   is never treated as a miss
    pub fn read(&self, name: &str) -> Result<Option<Value>, CacheError> {
        let path = self.cache_path(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let value = serde_json::from_str(&content).map_err(|source| CacheError::Json {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "cache hit");
        Ok(Some(value))
    }

    /// Writes a response to the cache as pretty-printed JSON
    ///
    /// Uses 2-space indentation and keeps non-ASCII characters as-is.
    /// Returns the path of the written file.
    pub fn write(&self, name: &str, value: &Value) -> Result<PathBuf, CacheError> {
        self.ensure_dir()?;

        let path = self.cache_path(name);
        let json = serde_json::to_string_pretty(value).map_err(|source| CacheError::Json {
            path: path.clone(),
            source,
        })?;

        fs::write(&path, json).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "cache entry written");
        Ok(path)
    }
}
