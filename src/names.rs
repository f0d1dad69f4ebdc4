//! Reading the list of names to look up

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a run before any lookup happens
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The names file does not exist
    #[error("Names file not found: {}", .0.display())]
    NamesFileNotFound(PathBuf),

    /// The names file exists but cannot be read as UTF-8 text
    #[error("Failed to read names file {}: {source}", path.display())]
    NamesFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads names from a file, one per line
///
/// Lines are trimmed and empty lines are skipped. Duplicates are kept.
pub fn read_names(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::NamesFileNotFound(path.to_path_buf()),
        _ => ConfigError::NamesFileUnreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;

    Ok(parse_names(&content))
}

fn parse_names(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
