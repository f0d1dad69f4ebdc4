//! Tax-income service client with a read-through disk cache
//!
//! Resolves a lookup name to the service's JSON response. A cached response is
//! returned without touching the network; otherwise one GET is issued and the
//! parsed body is written to the cache before being returned.

use crate::cache::{CacheError, CacheManager};
use crate::query::{QueryBuilder, DEFAULT_ENDPOINT};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// User-Agent sent with every request
pub const USER_AGENT: &str = "verokone-cli/0.1";

/// Errors that can occur when resolving a lookup name
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed or returned a non-success status
    #[error("failed to fetch tax info for '{name}': {source}")]
    Request {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body was not valid JSON
    #[error("invalid JSON from service for '{name}': {source}")]
    InvalidJson {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the cache entry failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The configured endpoint is not a valid URL
    #[error("invalid endpoint URL '{endpoint}': {source}")]
    Endpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

/// Client for looking up tax-income records through the local cache
#[derive(Debug, Clone)]
pub struct TaxInfoClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Cache manager for persisting responses
    cache_manager: CacheManager,
    /// Builds the query URL on a cache miss
    query: QueryBuilder,
}

impl TaxInfoClient {
    /// Creates a client against the public service endpoint
    pub fn new(cache_manager: CacheManager) -> Result<Self, FetchError> {
        Self::with_endpoint(DEFAULT_ENDPOINT, cache_manager)
    }

    /// Creates a client against a custom endpoint (for testing or mirrors)
    pub fn with_endpoint(endpoint: &str, cache_manager: CacheManager) -> Result<Self, FetchError> {
        let query = QueryBuilder::new(endpoint).map_err(|source| FetchError::Endpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            http_client,
            cache_manager,
            query,
        })
    }

    /// Returns the cache manager backing this client
    pub fn cache(&self) -> &CacheManager {
        &self.cache_manager
    }

    /// Resolves a name to its tax-info JSON
    ///
    /// # Behavior
    /// - Creates the cache directory if needed
    /// - Returns the cached value if a cache file exists, regardless of age;
    ///   unreadable or malformed cache content is an error, not a miss
    /// - Otherwise fetches from the service, writes the value to the cache and
    ///   returns it
    /// - Nothing is cached when the request or parsing fails
    pub async fn resolve(&self, name: &str) -> Result<Value, FetchError> {
        self.cache_manager.ensure_dir()?;

        if let Some(cached) = self.cache_manager.read(name)? {
            return Ok(cached);
        }

        debug!(name, "cache miss");
        let value = self.fetch_from_api(name).await?;
        self.cache_manager.write(name, &value)?;
        Ok(value)
    }

    /// Fetches and parses the service response for a name
    async fn fetch_from_api(&self, name: &str) -> Result<Value, FetchError> {
        let url = self.query.build(name);
        debug!(%url, "requesting tax info");

        let request_error = |source| FetchError::Request {
            name: name.to_string(),
            source,
        };

        let body = self
            .http_client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(request_error)?
            .error_for_status()
            .map_err(request_error)?
            .bytes()
            .await
            .map_err(request_error)?;

        serde_json::from_slice(&body).map_err(|source| FetchError::InvalidJson {
            name: name.to_string(),
            source,
        })
    }
}
