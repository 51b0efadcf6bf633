//! Authentication error taxonomy.
//!
//! Internal distinctions (service-bind vs. user-bind failure, zero vs.
//! multiple directory matches) are preserved in the variants so operators
//! can diagnose them, while [`AuthError::public_message`] collapses them
//! into messages safe to show an end user. Passwords never appear in any
//! variant payload.

use thiserror::Error;

/// Result type for directory authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors surfaced by a directory authentication backend.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The stored provider configuration is invalid.
    #[error("directory configuration error: {0}")]
    Configuration(String),

    /// No usable provider with the given identifier.
    #[error("directory provider not found: {0}")]
    ProviderNotFound(String),

    /// The directory server could not be reached, or the transport
    /// failed mid-operation. The only retryable kind, and only by the
    /// caller, with backoff.
    #[error("directory connection failed: {0}")]
    Connection(String),

    /// The service account bind was rejected. Indicates misconfigured
    /// service credentials, not a bad end-user credential.
    #[error("directory service bind failed: {0}")]
    ServiceBind(String),

    /// Zero or more than one directory entry matched the sign-in filter.
    /// The two cases are deliberately not distinguished here.
    #[error("user not found in directory")]
    UserNotFound,

    /// The user bind was rejected: the password is wrong. Must never be
    /// retried automatically.
    #[error("invalid directory credentials")]
    InvalidCredentials,

    /// The attribute re-query after verification did not return exactly
    /// one entry, or could not be completed.
    #[error("directory profile extraction failed: {0}")]
    Extraction(String),
}

impl AuthError {
    /// The message safe to show an end user.
    ///
    /// Everything except a connection failure collapses to a generic
    /// login failure so that directory population and configuration
    /// details do not leak.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::Connection(_) => "authentication service unavailable",
            _ => "login failed",
        }
    }

    /// Whether the directory could not be reached.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Whether the end-user credential itself was at fault.
    #[must_use]
    pub const fn is_credential_error(&self) -> bool {
        matches!(self, Self::UserNotFound | Self::InvalidCredentials)
    }

    /// Whether the caller may retry the operation (with backoff).
    ///
    /// Credential failures are never retryable; retrying risks directory
    /// account lockout policies.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.is_connection_error()
    }
}
