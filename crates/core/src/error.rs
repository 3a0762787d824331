//! Errors surfaced by the conversion pipeline.

use std::path::PathBuf;

/// Fatal errors for a conversion run.
///
/// Malformed messages are not errors: the pairer drops them and counts them in
/// [`crate::ConversionStats`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read transcript {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize training record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("No transcript files found under {0}")]
    NoTranscripts(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
