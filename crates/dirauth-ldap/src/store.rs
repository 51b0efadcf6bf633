//! The configuration-fetch collaborator.
//!
//! The authentication component takes its [`ConfigStore`] as a
//! constructor parameter; nothing registers itself with a process-wide
//! dispatcher. Configurations are fetched fresh on every call so that
//! rotated directory credentials take effect immediately.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::config::DirectoryConfig;
use crate::error::{LdapError, LdapResult};

/// Source of directory provider configurations, tenant-scoped by the
/// implementation.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetches the configuration for one provider.
    ///
    /// ## Errors
    ///
    /// Returns [`LdapError::ProviderNotFound`] if no provider with the
    /// given identifier exists.
    async fn get_config(&self, provider: &str) -> LdapResult<DirectoryConfig>;

    /// Fetches all configured providers.
    async fn list_configs(&self) -> LdapResult<Vec<DirectoryConfig>>;
}

/// In-memory configuration store, for tests and configuration tooling.
#[derive(Default)]
pub struct MemoryConfigStore {
    configs: RwLock<HashMap<String, DirectoryConfig>>,
}

impl MemoryConfigStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a provider configuration.
    pub fn insert(&self, config: DirectoryConfig) {
        self.configs
            .write()
            .insert(config.provider.clone(), config);
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get_config(&self, provider: &str) -> LdapResult<DirectoryConfig> {
        self.configs
            .read()
            .get(provider)
            .cloned()
            .ok_or_else(|| LdapError::ProviderNotFound(provider.to_string()))
    }

    async fn list_configs(&self) -> LdapResult<Vec<DirectoryConfig>> {
        let mut configs: Vec<DirectoryConfig> =
            self.configs.read().values().cloned().collect();
        configs.sort_by(|a, b| a.provider.cmp(&b.provider));
        Ok(configs)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::{Protocol, ProviderStatus, SearchScope};

    use super::*;

    fn config(provider: &str) -> DirectoryConfig {
        DirectoryConfig {
            provider: provider.to_string(),
            display_name: "Corporate directory".to_string(),
            status: ProviderStatus::Enabled,
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
            connect_timeout: Duration::from_secs(3),
            read_timeout: Duration::from_secs(10),
        }
    }

    #[tokio::test]
    async fn get_returns_inserted_config() {
        let store = MemoryConfigStore::new();
        store.insert(config("_corp"));

        let fetched = store.get_config("_corp").await.unwrap();
        assert_eq!(fetched.provider, "_corp");
    }

    #[tokio::test]
    async fn get_unknown_provider_is_not_found() {
        let store = MemoryConfigStore::new();
        let err = store.get_config("_missing").await.unwrap_err();
        assert!(matches!(err, LdapError::ProviderNotFound(_)));
    }

    #[tokio::test]
    async fn list_is_ordered_by_provider() {
        let store = MemoryConfigStore::new();
        store.insert(config("_b"));
        store.insert(config("_a"));

        let providers: Vec<String> = store
            .list_configs()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.provider)
            .collect();
        assert_eq!(providers, vec!["_a".to_string(), "_b".to_string()]);
    }

    #[tokio::test]
    async fn insert_replaces_existing_provider() {
        let store = MemoryConfigStore::new();
        store.insert(config("_corp"));

        let mut updated = config("_corp");
        updated.bind_password = "rotated".to_string();
        store.insert(updated);

        let fetched = store.get_config("_corp").await.unwrap();
        assert_eq!(fetched.bind_password, "rotated");
    }
}
