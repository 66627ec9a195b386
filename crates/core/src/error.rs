//! Domain error model.

use thiserror::Error;

/// Result type used across the domain and service layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant maps to exactly one externally visible failure kind. Transport layers
/// translate these into status codes; nothing below the transport knows about HTTP.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or missing required input (empty name, mismatched id, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A uniqueness rule was violated (duplicate product name on create).
    #[error("conflict: {0}")]
    Conflict(String),

    /// No record matched. Pure id lookups carry no message.
    #[error("not found{}", detail_suffix(.0))]
    NotFound(Option<String>),

    /// A write conflict that could not be resolved: the record still exists but changed
    /// underneath the caller.
    #[error("unresolved write conflict: {0}")]
    Fatal(String),

    /// The backing store failed for a reason unrelated to the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

fn detail_suffix(msg: &Option<String>) -> String {
    msg.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound(None)
    }

    pub fn not_found_with(msg: impl Into<String>) -> Self {
        Self::NotFound(Some(msg.into()))
    }

    pub fn fatal(msg: impl Into<String>) -> Self {
        Self::Fatal(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Human-readable detail without the kind prefix, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::InvalidArgument(m) | Self::Conflict(m) | Self::Fatal(m) | Self::Unavailable(m) => {
                Some(m)
            }
            Self::NotFound(m) => m.as_deref(),
        }
    }
}
