//! Per-name lookup and the run loop
//!
//! Every name produces its own `Result`. The run loop writes successes to one
//! sink and failures to another, and always moves on to the next name.

use crate::client::{FetchError, TaxInfoClient};
use crate::summary::{format_summary, FormatError};
use std::io::{self, Write};
use thiserror::Error;
use tracing::debug;

/// Anything that can go wrong while looking up a single name
#[derive(Debug, Error)]
pub enum LookupError {
    /// Resolving the response failed (network, HTTP, cache or JSON)
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The response did not have the fields the summary needs
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Counts of how a run went
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Names that produced a summary line
    pub resolved: usize,
    /// Names that failed
    pub failed: usize,
}

/// Resolves a name and renders its summary line
pub async fn lookup(client: &TaxInfoClient, name: &str) -> Result<String, LookupError> {
    let tax_info = client.resolve(name).await?;
    Ok(format_summary(name, &tax_info)?)
}

/// Looks up each name in order, writing summaries to `out` and errors to `err`
///
/// A failing name never stops the run. Only a failure to write to either sink
/// is returned as an error.
pub async fn report<O, E>(
    client: &TaxInfoClient,
    names: &[String],
    out: &mut O,
    err: &mut E,
) -> io::Result<RunSummary>
where
    O: Write,
    E: Write,
{
    let mut summary = RunSummary::default();

    for name in names {
        match lookup(client, name).await {
            Ok(line) => {
                writeln!(out, "{}", line)?;
                summary.resolved += 1;
            }
            Err(e) => {
                debug!(name = %name, error = ?e, "lookup failed");
                writeln!(err, "{}: {}", name, e)?;
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
