//! Error handling for the scoring service.

use thiserror::Error;

/// Main error type for the scoring service
#[derive(Debug, Error)]
pub enum Error {
    /// Explorer / ledger-query errors (network, non-success status,
    /// malformed payload). Never conflated with "address has no activity":
    /// an empty transaction list is a successful result, not an error.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Model schema drift: the scaler or aligner refers to a column the
    /// model does not declare (or vice versa).
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The model or scaler capability itself failed
    #[error("Scoring error: {0}")]
    Scoring(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Request errors
    #[error("Request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Other errors
    #[error("Error: {0}")]
    Other(String),
}

/// Result type for the scoring service
pub type Result<T> = std::result::Result<T, Error>;

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

// Allow automatic conversion from anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let fetch_error = Error::Fetch("etherscan returned NOTOK".to_string());
        assert_eq!(
            fetch_error.to_string(),
            "Fetch error: etherscan returned NOTOK"
        );

        let schema_error = Error::SchemaMismatch("unknown column".to_string());
        assert!(schema_error.to_string().contains("Schema mismatch"));

        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let wrapped_io_error = Error::from(io_error);
        assert!(wrapped_io_error.to_string().contains("I/O error"));

        let string_error = Error::from("custom error".to_string());
        assert_eq!(string_error.to_string(), "Error: custom error");
    }

    #[test]
    fn test_result_type() {
        fn might_fail() -> Result<()> {
            Ok(())
        }

        assert!(might_fail().is_ok());
    }
}
