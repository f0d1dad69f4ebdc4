//! verokone library
//!
//! Looks up tax-income records by name through a disk cache in front of the
//! query service, and renders one summary line per name.

pub mod cache;
pub mod cli;
pub mod client;
pub mod lookup;
pub mod names;
pub mod query;
pub mod summary;

pub use cache::{CacheError, CacheManager};
pub use client::{FetchError, TaxInfoClient};
pub use lookup::{lookup, report, LookupError, RunSummary};
pub use names::{read_names, ConfigError};
pub use summary::{format_summary, FormatError, TaxInfo};
