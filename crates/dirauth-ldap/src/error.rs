//! LDAP-specific error types.
//!
//! Error messages must not leak end-user passwords or the service
//! account password under any code path. Bind DNs and usernames are fair
//! game; operators need them.

use dirauth_federation::AuthError;
use thiserror::Error;

/// Result type for LDAP operations.
pub type LdapResult<T> = Result<T, LdapError>;

/// Errors raised while authenticating against an LDAP directory.
#[derive(Debug, Error)]
pub enum LdapError {
    /// Invalid provider configuration.
    #[error("LDAP configuration error: {0}")]
    Configuration(String),

    /// No usable provider with the given identifier.
    #[error("LDAP provider not found: {0}")]
    ProviderNotFound(String),

    /// Could not reach the directory server, or the transport failed
    /// mid-operation. Covers TCP and TLS failures as well as operations
    /// that exceeded their timeout bound.
    #[error("LDAP connection failed: {0}")]
    Connection(String),

    /// The service account bind was rejected by the server.
    #[error("LDAP service bind failed: {0}")]
    ServiceBind(String),

    /// The sign-in search matched zero entries, or more than one.
    #[error("user not found in directory")]
    UserNotFound,

    /// The user bind was rejected.
    #[error("invalid directory credentials")]
    InvalidCredentials,

    /// The attribute re-query did not return exactly one entry.
    #[error("LDAP profile extraction failed: {0}")]
    Extraction(String),

    /// The server returned a failure result code for a search.
    #[error("LDAP protocol error: {0}")]
    Protocol(String),
}

impl LdapError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an extraction error.
    #[must_use]
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Whether the directory could not be reached or stopped responding.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl From<LdapError> for AuthError {
    fn from(err: LdapError) -> Self {
        match err {
            LdapError::Configuration(msg) => Self::Configuration(msg),
            LdapError::ProviderNotFound(provider) => Self::ProviderNotFound(provider),
            LdapError::Connection(msg) => Self::Connection(msg),
            // A failure result code on a search means the directory did
            // not serve the request (bad base DN, server limits); the
            // caller treats it like an outage, the log keeps the detail.
            LdapError::Protocol(msg) => Self::Connection(msg),
            LdapError::ServiceBind(msg) => Self::ServiceBind(msg),
            LdapError::UserNotFound => Self::UserNotFound,
            LdapError::InvalidCredentials => Self::InvalidCredentials,
            LdapError::Extraction(msg) => Self::Extraction(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_classification() {
        assert!(LdapError::connection("refused").is_connection_error());
        assert!(LdapError::connection("operation timed out").is_connection_error());
        assert!(!LdapError::InvalidCredentials.is_connection_error());
        assert!(!LdapError::UserNotFound.is_connection_error());
    }

    #[test]
    fn connection_errors_keep_their_kind_across_the_boundary() {
        let err: AuthError = LdapError::connection("refused").into();
        assert!(err.is_connection_error());
    }

    #[test]
    fn credential_errors_keep_their_kind_across_the_boundary() {
        assert!(matches!(
            AuthError::from(LdapError::InvalidCredentials),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            AuthError::from(LdapError::UserNotFound),
            AuthError::UserNotFound
        ));
        assert!(matches!(
            AuthError::from(LdapError::ServiceBind("rc=49".to_string())),
            AuthError::ServiceBind(_)
        ));
    }
}
