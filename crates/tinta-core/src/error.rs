//! Error types for the Tinta simulation engine.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for the entire Tinta application.
///
/// This provides typed, structured error variants with constructor helpers,
/// so that callers (and the UI layer above them) can distinguish the cases
/// that require different handling: validation problems, authentication
/// failures, exhausted AI credits, and recoverable remote errors.
#[derive(Error, Debug, Clone, Serialize)]
pub enum TintaError {
    /// A precondition on the caller's side was not met. No mutation and no
    /// network call happened.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote service rejected the request because the caller is not
    /// authenticated.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The account's AI credit balance is exhausted. Distinct from a generic
    /// remote failure so the UI can direct the user to purchase credits.
    #[error("Insufficient credits: {0}")]
    InsufficientCredits(String),

    /// A transient remote failure (network, non-2xx status, malformed
    /// payload). The affected operation returns to its last stable state.
    #[error("Remote service error: {0}")]
    Remote(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TintaError {
    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates an InsufficientCredits error
    pub fn insufficient_credits(message: impl Into<String>) -> Self {
        Self::InsufficientCredits(message.into())
    }

    /// Creates a Remote error
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates an Image error
    pub fn image(message: impl Into<String>) -> Self {
        Self::Image(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an Auth error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this is an InsufficientCredits error
    pub fn is_insufficient_credits(&self) -> bool {
        matches!(self, Self::InsufficientCredits(_))
    }

    /// Check if this is a Remote error
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for TintaError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for TintaError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: e.to_string(),
        }
    }
}

/// Convenience alias used throughout the core and application crates.
pub type Result<T> = std::result::Result<T, TintaError>;
