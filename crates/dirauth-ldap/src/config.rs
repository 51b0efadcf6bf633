//! Directory provider configuration.
//!
//! One [`DirectoryConfig`] record exists per provider. Records are owned
//! by the configuration store and fetched fresh on every authentication
//! attempt, since directory credentials may rotate.
//!
//! Stored enumerants for protocol, scope, and status are 1-based; the
//! typed enums here define the single canonical mapping between those
//! values and the wire-level constants.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LdapError, LdapResult};

/// Transport protocol used to reach the directory server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Protocol {
    /// Plain LDAP, no encryption.
    Plain,

    /// Plain connection upgraded in place via STARTTLS.
    StartTls,

    /// TLS from connection start (LDAPS).
    Ldaps,
}

impl Protocol {
    /// Decodes the stored 1-based enumerant.
    pub fn from_config_value(value: i64) -> LdapResult<Self> {
        match value {
            1 => Ok(Self::Plain),
            2 => Ok(Self::StartTls),
            3 => Ok(Self::Ldaps),
            other => Err(LdapError::config(format!("invalid protocol value: {other}"))),
        }
    }

    /// The stored 1-based enumerant.
    #[must_use]
    pub const fn as_config_value(self) -> i64 {
        match self {
            Self::Plain => 1,
            Self::StartTls => 2,
            Self::Ldaps => 3,
        }
    }

    /// URL scheme for this protocol. STARTTLS begins as plain LDAP and
    /// upgrades after connecting, so it shares the `ldap` scheme.
    #[must_use]
    pub const fn scheme(self) -> &'static str {
        match self {
            Self::Plain | Self::StartTls => "ldap",
            Self::Ldaps => "ldaps",
        }
    }
}

/// How deep a search traverses from its base entry.
///
/// Configuration stores 1-based values while the protocol constants are
/// 0-based; [`SearchScope::to_ldap3`] is the one place that offset is
/// applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchScope {
    /// The base entry only.
    BaseObject,

    /// Immediate children of the base entry.
    SingleLevel,

    /// The entire subtree under the base entry.
    WholeSubtree,
}

impl SearchScope {
    /// Decodes the stored 1-based enumerant.
    pub fn from_config_value(value: i64) -> LdapResult<Self> {
        match value {
            1 => Ok(Self::BaseObject),
            2 => Ok(Self::SingleLevel),
            3 => Ok(Self::WholeSubtree),
            other => Err(LdapError::config(format!("invalid scope value: {other}"))),
        }
    }

    /// The stored 1-based enumerant.
    #[must_use]
    pub const fn as_config_value(self) -> i64 {
        match self {
            Self::BaseObject => 1,
            Self::SingleLevel => 2,
            Self::WholeSubtree => 3,
        }
    }

    /// Converts to the ldap3 scope constant.
    #[must_use]
    pub const fn to_ldap3(self) -> ldap3::Scope {
        match self {
            Self::BaseObject => ldap3::Scope::Base,
            Self::SingleLevel => ldap3::Scope::OneLevel,
            Self::WholeSubtree => ldap3::Scope::Subtree,
        }
    }
}

/// Whether a provider is offered for sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderStatus {
    /// Configured but not offered for sign-in.
    Disabled,

    /// Offered for sign-in.
    Enabled,
}

impl ProviderStatus {
    /// Decodes the stored enumerant.
    pub fn from_config_value(value: i64) -> LdapResult<Self> {
        match value {
            1 => Ok(Self::Disabled),
            2 => Ok(Self::Enabled),
            other => Err(LdapError::config(format!("invalid status value: {other}"))),
        }
    }

    /// The stored enumerant.
    #[must_use]
    pub const fn as_config_value(self) -> i64 {
        match self {
            Self::Disabled => 1,
            Self::Enabled => 2,
        }
    }

    /// Whether the provider is enabled.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

fn default_verify_certificates() -> bool {
    true
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(3)
}

fn default_read_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Configuration of one directory provider.
///
/// The bind password is skipped on serialization, and the `Debug` impl
/// redacts it; neither may ever reach a log line or an API response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Opaque stable provider identifier, unique per tenant.
    pub provider: String,

    /// Human-readable name shown on the sign-in page.
    pub display_name: String,

    /// Whether the provider is offered for sign-in.
    pub status: ProviderStatus,

    /// Transport protocol.
    pub protocol: Protocol,

    /// Directory server hostname.
    pub hostname: String,

    /// Directory server port, a positive integer encoded as a numeric
    /// string.
    pub port: String,

    /// Service account bind DN or username.
    pub bind_username: String,

    /// Service account password. Never serialized, never logged.
    #[serde(skip_serializing)]
    pub bind_password: String,

    /// Search base DN.
    pub root_dn: String,

    /// Search scope under the base DN.
    pub scope: SearchScope,

    /// Filter fragment selecting user entries, e.g.
    /// `(objectClass=inetOrgPerson)`.
    pub user_search_filter: String,

    /// Attribute holding the stable user identifier.
    pub username_attribute: String,

    /// Attribute holding the display name.
    pub name_attribute: String,

    /// Attribute holding the email address.
    pub mail_attribute: String,

    /// Whether to validate the server certificate. Defaults to true;
    /// switching it off is an explicit per-deployment decision for
    /// directories behind private CAs.
    #[serde(default = "default_verify_certificates")]
    pub verify_certificates: bool,

    /// Bound on establishing the connection (and TLS handshake).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,

    /// Bound on each bind and search round trip.
    #[serde(default = "default_read_timeout")]
    pub read_timeout: Duration,
}

impl DirectoryConfig {
    /// The connection target, `scheme://hostname:port`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol.scheme(), self.hostname, self.port)
    }

    /// The compound sign-in filter: logical AND of the configured user
    /// filter and an equality clause on the username attribute.
    ///
    /// The username is untrusted input and is escaped before
    /// interpolation so it cannot smuggle filter metacharacters.
    #[must_use]
    pub fn user_filter(&self, username: &str) -> String {
        format!(
            "(&{}({}={}))",
            self.user_search_filter,
            self.username_attribute,
            ldap_escape(username)
        )
    }

    /// Validates field presence and bounds.
    pub fn validate(&self) -> LdapResult<()> {
        require("provider", &self.provider, 100)?;
        require("display_name", &self.display_name, 50)?;
        require("hostname", &self.hostname, 300)?;
        require("port", &self.port, 10)?;
        if self.port.parse::<u16>().map_or(true, |p| p == 0) {
            return Err(LdapError::config("port must be an integer between 1 and 65535"));
        }
        require("bind_username", &self.bind_username, 100)?;
        require("bind_password", &self.bind_password, 100)?;
        require("root_dn", &self.root_dn, 250)?;
        require("user_search_filter", &self.user_search_filter, 500)?;
        require("username_attribute", &self.username_attribute, 100)?;
        require("name_attribute", &self.name_attribute, 100)?;
        require("mail_attribute", &self.mail_attribute, 100)?;
        Ok(())
    }
}

impl fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("provider", &self.provider)
            .field("display_name", &self.display_name)
            .field("status", &self.status)
            .field("protocol", &self.protocol)
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("bind_username", &self.bind_username)
            .field("bind_password", &"<redacted>")
            .field("root_dn", &self.root_dn)
            .field("scope", &self.scope)
            .field("user_search_filter", &self.user_search_filter)
            .field("username_attribute", &self.username_attribute)
            .field("name_attribute", &self.name_attribute)
            .field("mail_attribute", &self.mail_attribute)
            .field("verify_certificates", &self.verify_certificates)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

fn require(field: &str, value: &str, max_len: usize) -> LdapResult<()> {
    if value.is_empty() {
        return Err(LdapError::config(format!("{field} is required")));
    }
    if value.len() > max_len {
        return Err(LdapError::config(format!(
            "{field} must have at most {max_len} characters"
        )));
    }
    Ok(())
}

/// Escapes filter metacharacters in an assertion value (RFC 4515).
fn ldap_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\5c"),
            '*' => escaped.push_str("\\2a"),
            '(' => escaped.push_str("\\28"),
            ')' => escaped.push_str("\\29"),
            '\0' => escaped.push_str("\\00"),
            _ => escaped.push(c),
        }
    }
    escaped
}
