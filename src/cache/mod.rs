//! Cache module for storing service responses to disk
//!
//! Each lookup name gets one JSON file in the cache directory. Entries are
//! written once after a successful fetch and never expire, so any existing
//! file short-circuits the network request for that name.

mod manager;

pub use manager::{sanitize_name, CacheError, CacheManager, FALLBACK_STEM};
