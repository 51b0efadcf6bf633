//! The interface a directory authentication backend exposes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AuthResult;
use crate::profile::UserProfile;

/// Listing projection of a configured provider, for UI consumption.
///
/// Carries none of the provider's connection settings or credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSummary {
    /// Opaque stable provider identifier, unique per tenant.
    pub provider: String,

    /// Human-readable name shown on the sign-in page.
    pub display_name: String,

    /// Whether the provider is offered for sign-in.
    pub is_enabled: bool,
}

/// An external source of identities that can verify credentials and
/// produce user profiles.
///
/// Backends take their configuration-fetch collaborator as a constructor
/// parameter; there is no ambient registry. Implementations must be safe
/// to call concurrently: every call operates on its own connection.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Verifies `username`/`password` against the named provider and
    /// returns the normalized profile of the authenticated user.
    async fn authenticate(
        &self,
        provider: &str,
        username: &str,
        password: &str,
    ) -> AuthResult<UserProfile>;

    /// Checks that the provider's server is reachable and its service
    /// account can bind, without touching any user entry.
    ///
    /// Uses the same timeouts and TLS policy as [`authenticate`], so a
    /// passing test is a reliable predictor of runtime behavior.
    ///
    /// [`authenticate`]: IdentitySource::authenticate
    async fn test_connection(&self, provider: &str) -> AuthResult<()>;

    /// Lists configured providers, optionally restricted to enabled
    /// ones.
    async fn list_providers(&self, active_only: bool) -> AuthResult<Vec<ProviderSummary>>;
}
