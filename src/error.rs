use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures that abort a scrape run.
///
/// Missing or malformed listing fields are not errors; they fall back to empty
/// values inside the extractor.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("timed out after {}s waiting for {stage}", .waited.as_secs())]
    Timeout {
        stage: &'static str,
        waited: Duration,
    },

    #[error("failed to write CSV to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
