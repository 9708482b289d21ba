//! Error types for gsurv-data
//!
//! Every variant here is an input problem the user can fix by supplying a
//! different file, so each one carries a message fit for display.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Dataset ingestion error type
#[derive(Debug, Error)]
pub enum Error {
    /// Content could not be decoded as a workbook
    #[error("failed to decode workbook: {0}")]
    Decode(String),

    /// Upload carried no bytes
    #[error("file is empty")]
    EmptyContent,

    /// Upload exceeds the configured size limit
    #[error("file is {size} bytes, limit is {limit} bytes")]
    TooLarge {
        /// Size of the rejected content
        size: usize,
        /// Configured maximum
        limit: usize,
    },

    /// Developer-mode path could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a decode error
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an I/O error for a path
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_error",
            Self::EmptyContent => "empty_content",
            Self::TooLarge { .. } => "too_large",
            Self::Io { .. } => "io_error",
        }
    }
}

impl From<calamine::XlsxError> for Error {
    fn from(err: calamine::XlsxError) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::decode("bad zip").code(), "decode_error");
        assert_eq!(Error::EmptyContent.code(), "empty_content");
        assert_eq!(
            Error::TooLarge {
                size: 10,
                limit: 5
            }
            .code(),
            "too_large"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::io(
            "data/missing.xlsx",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        let msg = err.to_string();
        assert!(msg.contains("data/missing.xlsx"));
        assert!(msg.contains("not found"));

        let err = Error::TooLarge {
            size: 2048,
            limit: 1024,
        };
        assert_eq!(err.to_string(), "file is 2048 bytes, limit is 1024 bytes");
    }
}
