//! Command-line interface parsing for verokone
//!
//! Every flag has a default, so running the binary with no arguments reads
//! `names.txt` and caches into `cache/` in the working directory.

use clap::Parser;
use std::path::PathBuf;

use crate::query::DEFAULT_ENDPOINT;

/// verokone - Look up tax-income records for a list of names
#[derive(Parser, Debug)]
#[command(name = "verokone")]
#[command(about = "Tax-income lookups with a local response cache")]
#[command(version)]
pub struct Cli {
    /// File with one name per line
    #[arg(long, value_name = "FILE", default_value = "names.txt")]
    pub names: PathBuf,

    /// Directory where responses are cached, one JSON file per name
    #[arg(long, value_name = "DIR", default_value = "cache")]
    pub cache_dir: PathBuf,

    /// Query endpoint of the tax-income service
    #[arg(long, value_name = "URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}
