//! Error types for the data pipeline.
//!
//! Every failure aborts the run; nothing here is recovered internally.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fetching, aggregating or writing the dataset.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The Census API answered with a non-success status.
    #[error("Census API error {status}: {body}")]
    Fetch {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The request never produced a response (connect failure, timeout, ...).
    #[error("Failed to reach Census API: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected header + values table.
    #[error("Malformed Census response: {0}")]
    MalformedTable(String),

    /// A required column held something that isn't an integer.
    #[error("Value for {code} is not an integer: {value}")]
    Parse { code: String, value: String },

    /// A required variable code was absent.
    #[error("Missing required variable: {0}")]
    KeyMissing(String),

    /// Shares cannot be computed against a zero total.
    #[error("Total foreign-born population is zero; cannot compute shares")]
    DivideByZero,

    /// File system failure while writing output.
    #[error("Failed to write {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_missing_message_names_code() {
        let err = PipelineError::KeyMissing("B05006_160E".to_string());
        assert_eq!(err.to_string(), "Missing required variable: B05006_160E");
    }

    #[test]
    fn test_io_message_includes_path() {
        let err = PipelineError::Io {
            path: PathBuf::from("public/data.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = err.to_string();
        assert!(message.contains("public/data.json"));
        assert!(message.contains("denied"));
    }
}
