//! Gateway error type.

use thiserror::Error;

/// Result type for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// A failed gateway call.
///
/// The engine does not interpret provider-specific codes beyond carrying
/// them through to the caller; the message is the primary surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("gateway error: {message}")]
pub struct GatewayError {
    /// Human-readable failure description.
    pub message: String,
    /// Optional provider-specific error code.
    pub code: Option<String>,
}

impl GatewayError {
    /// Creates an error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Attaches a provider-specific code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Creates a "row not found" error, the code most stores report when
    /// a filter predicate matches nothing.
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        Self::new(format!("{what} {id} not found")).with_code("not_found")
    }
}
