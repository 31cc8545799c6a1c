//! Error types for the engine.

use feedsync_gateway::GatewayError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors an engine operation can return.
///
/// All variants reduce to the `{message, code?}` shape the presentation
/// layer consumes via [`EngineError::message`] and [`EngineError::code`].
/// Validation errors are detected before any state mutation or remote
/// call; remote errors may arrive after an optimistic apply, in which
/// case the engine has already rolled the collection back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Bad caller input, rejected before any state change.
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation's target is absent from the local collection.
    #[error("{what} {id} not found")]
    NotFound {
        /// Kind of the missing thing ("entry" or "comment").
        what: &'static str,
        /// The missing identifier.
        id: String,
    },

    /// The gateway call failed or returned no data.
    #[error("remote error: {message}")]
    Remote {
        /// The gateway's failure message.
        message: String,
        /// Optional provider-specific code.
        code: Option<String>,
    },
}

impl EngineError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not-found error.
    pub fn not_found(what: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            what,
            id: id.to_string(),
        }
    }

    /// The human-readable message for display.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The provider-specific code, if the failure carried one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Remote { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Returns true for errors caused by caller input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<GatewayError> for EngineError {
    fn from(err: GatewayError) -> Self {
        Self::Remote {
            message: err.message,
            code: err.code,
        }
    }
}
