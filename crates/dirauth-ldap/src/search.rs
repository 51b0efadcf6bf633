//! User entry lookup.
//!
//! Both lookups here enforce the same result policy: exactly one entry.
//! Zero and multiple matches are logged distinctly for operators but
//! surface as a single error kind, so callers cannot learn anything
//! about directory population from the failure.

use std::collections::HashMap;

use ldap3::SearchEntry;

use crate::config::DirectoryConfig;
use crate::connection::{BoundIdentity, DirectorySession};
use crate::error::{LdapError, LdapResult};

/// A single directory entry: distinguished name plus attribute values.
///
/// Transient; exists only within one verification call.
#[derive(Debug, Clone)]
pub struct LdapEntry {
    /// Distinguished Name.
    pub dn: String,

    /// Attribute values (all attributes are multi-valued on the wire).
    pub attributes: HashMap<String, Vec<String>>,
}

impl LdapEntry {
    /// Parses a raw search result entry.
    #[must_use]
    pub fn construct(entry: ldap3::ResultEntry) -> Self {
        let entry = SearchEntry::construct(entry);
        Self {
            dn: entry.dn,
            attributes: entry.attrs,
        }
    }

    /// First value of an attribute, if present.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Runs the sign-in searches for one authentication attempt.
pub struct LdapSearcher<'a> {
    session: &'a mut DirectorySession,
    config: &'a DirectoryConfig,
}

impl<'a> LdapSearcher<'a> {
    /// Creates a searcher over the given session.
    pub fn new(session: &'a mut DirectorySession, config: &'a DirectoryConfig) -> Self {
        Self { session, config }
    }

    /// Locates the single entry matching the sign-in filter and returns
    /// its DN. Only the DN is requested; attributes come later, after
    /// the credential has been proven.
    pub async fn locate_user(&mut self, filter: &str) -> LdapResult<String> {
        let mut entries = self
            .session
            .search(
                &self.config.root_dn,
                self.config.scope.to_ldap3(),
                filter,
                vec!["dn"],
            )
            .await?;

        match entries.len() {
            1 => Ok(entries.remove(0).dn),
            0 => {
                tracing::warn!(
                    provider = %self.config.provider,
                    filter = %filter,
                    "no directory entry matched the sign-in filter"
                );
                Err(LdapError::UserNotFound)
            }
            n => {
                tracing::warn!(
                    provider = %self.config.provider,
                    filter = %filter,
                    matches = n,
                    "multiple directory entries matched the sign-in filter"
                );
                Err(LdapError::UserNotFound)
            }
        }
    }

    /// Re-queries the verified entry for the three configured profile
    /// attributes.
    ///
    /// Requires the session to be bound as the service account: the end
    /// user's own identity may lack read privileges, and running this
    /// while user-bound would mean the re-bind step was skipped. The
    /// directory may have changed since [`locate_user`], so anything
    /// other than exactly one result is a hard extraction failure, not
    /// a retry.
    ///
    /// [`locate_user`]: LdapSearcher::locate_user
    pub async fn fetch_user_entry(&mut self, filter: &str) -> LdapResult<LdapEntry> {
        if self.session.bound_as() != BoundIdentity::Service {
            return Err(LdapError::extraction(
                "attribute query attempted without service bind",
            ));
        }

        let mut entries = self
            .session
            .search(
                &self.config.root_dn,
                self.config.scope.to_ldap3(),
                filter,
                vec![
                    self.config.username_attribute.as_str(),
                    self.config.name_attribute.as_str(),
                    self.config.mail_attribute.as_str(),
                ],
            )
            .await
            .map_err(|e| match e {
                LdapError::Protocol(msg) => LdapError::Extraction(msg),
                other => other,
            })?;

        match entries.len() {
            1 => Ok(entries.remove(0)),
            n => {
                tracing::warn!(
                    provider = %self.config.provider,
                    filter = %filter,
                    matches = n,
                    "attribute re-query did not return exactly one entry"
                );
                Err(LdapError::extraction(format!(
                    "expected exactly one entry, got {n}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with(attrs: &[(&str, &[&str])]) -> LdapEntry {
        let attributes = attrs
            .iter()
            .map(|(name, values)| {
                (
                    (*name).to_string(),
                    values.iter().map(|v| (*v).to_string()).collect(),
                )
            })
            .collect();
        LdapEntry {
            dn: "uid=developer,dc=example,dc=org".to_string(),
            attributes,
        }
    }

    #[test]
    fn get_attr_returns_first_value() {
        let entry = entry_with(&[("mail", &["dev@example.org", "alias@example.org"])]);
        assert_eq!(entry.get_attr("mail"), Some("dev@example.org"));
    }

    #[test]
    fn get_attr_misses_are_none() {
        let entry = entry_with(&[("uid", &["developer"])]);
        assert_eq!(entry.get_attr("mail"), None);
        assert_eq!(entry.get_attr("displayName"), None);
    }
}
