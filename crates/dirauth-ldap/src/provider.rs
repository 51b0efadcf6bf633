//! The LDAP identity source.
//!
//! One authentication attempt is a single synchronous sequence against
//! one dedicated session: connect, service bind, locate the user,
//! user bind, service re-bind, attribute query. The session is closed
//! on every exit path. Configurations are fetched fresh per call.

use std::sync::Arc;

use async_trait::async_trait;
use dirauth_federation::{AuthResult, IdentitySource, ProviderSummary, UserProfile};

use crate::config::DirectoryConfig;
use crate::connection::{connect, DirectorySession};
use crate::error::{LdapError, LdapResult};
use crate::mapper::ProfileMapper;
use crate::search::LdapSearcher;
use crate::store::ConfigStore;

/// Authenticates users against tenant-configured LDAP directories.
///
/// Safe to share and call concurrently; every call opens its own
/// connection and no state is kept between calls.
pub struct LdapAuthenticator {
    store: Arc<dyn ConfigStore>,
}

impl LdapAuthenticator {
    /// Creates an authenticator over the given configuration store.
    #[must_use]
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    async fn fetch_config(&self, provider: &str) -> LdapResult<DirectoryConfig> {
        let config = self.store.get_config(provider).await?;
        config.validate()?;
        Ok(config)
    }

    async fn fetch_enabled_config(&self, provider: &str) -> LdapResult<DirectoryConfig> {
        let config = self.fetch_config(provider).await?;
        if !config.status.is_enabled() {
            tracing::warn!(provider, "sign-in attempt against disabled directory provider");
            return Err(LdapError::ProviderNotFound(provider.to_string()));
        }
        Ok(config)
    }
}

/// The bind/search/bind sequence, run against an already-open session.
/// The caller owns the session and closes it whatever happens here.
async fn verify_and_extract(
    session: &mut DirectorySession,
    config: &DirectoryConfig,
    username: &str,
    password: &str,
) -> LdapResult<UserProfile> {
    session.bind_service(config).await.map_err(|e| {
        tracing::warn!(
            provider = %config.provider,
            bind_username = %config.bind_username,
            error = %e,
            "service account bind failed"
        );
        e
    })?;

    let filter = config.user_filter(username);
    let user_dn = LdapSearcher::new(session, config)
        .locate_user(&filter)
        .await?;

    session.bind_user(&user_dn, password).await?;

    // The user bind changed the session's identity, and the end user may
    // lack read privileges; re-bind as the service account before the
    // attribute query.
    session.bind_service(config).await?;

    let entry = LdapSearcher::new(session, config)
        .fetch_user_entry(&filter)
        .await?;

    Ok(ProfileMapper::new(config).to_profile(&entry))
}

#[async_trait]
impl IdentitySource for LdapAuthenticator {
    async fn authenticate(
        &self,
        provider: &str,
        username: &str,
        password: &str,
    ) -> AuthResult<UserProfile> {
        let config = self.fetch_enabled_config(provider).await?;

        let mut session = connect(&config).await?;
        let outcome = verify_and_extract(&mut session, &config, username, password).await;
        session.close().await;

        let profile = outcome?;
        tracing::debug!(provider, username, "directory sign-in verified");
        Ok(profile)
    }

    async fn test_connection(&self, provider: &str) -> AuthResult<()> {
        // Disabled providers are still testable; configurations get
        // validated before they are enabled.
        let config = self.fetch_config(provider).await?;

        let mut session = connect(&config).await?;
        let outcome = session.bind_service(&config).await;
        session.close().await;

        outcome?;
        Ok(())
    }

    async fn list_providers(&self, active_only: bool) -> AuthResult<Vec<ProviderSummary>> {
        let configs = self.store.list_configs().await?;
        Ok(configs
            .into_iter()
            .filter(|config| !active_only || config.status.is_enabled())
            .map(|config| {
                let is_enabled = config.status.is_enabled();
                ProviderSummary {
                    provider: config.provider,
                    display_name: config.display_name,
                    is_enabled,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use dirauth_federation::AuthError;

    use crate::config::{Protocol, ProviderStatus, SearchScope};
    use crate::store::MemoryConfigStore;

    use super::*;

    fn config(provider: &str, status: ProviderStatus) -> DirectoryConfig {
        DirectoryConfig {
            provider: provider.to_string(),
            display_name: "Corporate directory".to_string(),
            status,
            protocol: Protocol::Plain,
            hostname: "ldap.example.org".to_string(),
            port: "389".to_string(),
            bind_username: "cn=readonly,dc=example,dc=org".to_string(),
            bind_password: "hunter2".to_string(),
            root_dn: "dc=example,dc=org".to_string(),
            scope: SearchScope::WholeSubtree,
            user_search_filter: "(objectClass=inetOrgPerson)".to_string(),
            username_attribute: "uid".to_string(),
            name_attribute: "displayName".to_string(),
            mail_attribute: "mail".to_string(),
            verify_certificates: true,
            connect_timeout: Duration::from_secs(1),
            read_timeout: Duration::from_secs(1),
        }
    }

    fn authenticator(configs: Vec<DirectoryConfig>) -> LdapAuthenticator {
        let store = MemoryConfigStore::new();
        for config in configs {
            store.insert(config);
        }
        LdapAuthenticator::new(Arc::new(store))
    }

    #[tokio::test]
    async fn authenticate_unknown_provider_fails_without_connecting() {
        let auth = authenticator(vec![]);
        let err = auth
            .authenticate("_missing", "developer", "secret")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ProviderNotFound(_)));
    }

    #[tokio::test]
    async fn authenticate_disabled_provider_looks_like_unknown() {
        let auth = authenticator(vec![config("_corp", ProviderStatus::Disabled)]);
        let err = auth
            .authenticate("_corp", "developer", "secret")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ProviderNotFound(_)));
    }

    #[tokio::test]
    async fn authenticate_rejects_invalid_stored_config() {
        let mut broken = config("_corp", ProviderStatus::Enabled);
        broken.root_dn = String::new();
        let auth = authenticator(vec![broken]);

        let err = auth
            .authenticate("_corp", "developer", "secret")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));
    }

    #[tokio::test]
    async fn list_providers_projects_summaries() {
        let auth = authenticator(vec![
            config("_corp", ProviderStatus::Enabled),
            config("_lab", ProviderStatus::Disabled),
        ]);

        let all = auth.list_providers(false).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].provider, "_corp");
        assert!(all[0].is_enabled);
        assert_eq!(all[1].provider, "_lab");
        assert!(!all[1].is_enabled);

        let active = auth.list_providers(true).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].provider, "_corp");
    }
}
