//! Error types for gsurv-core

use thiserror::Error;
use uuid::Uuid;

use crate::mode::AppMode;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Startup configuration is inconsistent
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A mode was selected that the selector does not offer
    #[error("mode not available: {0}")]
    ModeNotOffered(AppMode),

    /// Unknown mode name
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// Session not found or expired
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// A workflow collaborator failed
    #[error("workflow error: {0}")]
    Workflow(String),
}

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a workflow error
    #[must_use]
    pub fn workflow(msg: impl Into<String>) -> Self {
        Self::Workflow(msg.into())
    }

    /// Get error code for API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::ModeNotOffered(_) => "mode_not_offered",
            Self::UnknownMode(_) => "unknown_mode",
            Self::SessionNotFound(_) => "session_not_found",
            Self::Workflow(_) => "workflow_error",
        }
    }

    /// Whether the error was caused by the request rather than the server
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::ModeNotOffered(_) | Self::UnknownMode(_) | Self::SessionNotFound(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
