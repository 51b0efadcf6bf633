//! # dirauth-ldap
//!
//! LDAP authentication bridge: verifies username/password pairs against
//! tenant-configured LDAP/LDAPS directories via the search-and-bind
//! sequence and extracts a normalized user profile, using `ldap3`.
//!
//! The entry point is [`LdapAuthenticator`], which implements the
//! [`dirauth_federation::IdentitySource`] trait over an injected
//! [`ConfigStore`].

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod connection;
pub mod error;
pub mod mapper;
pub mod provider;
pub mod search;
pub mod store;

pub use config::{DirectoryConfig, Protocol, ProviderStatus, SearchScope};
pub use connection::{connect, BoundIdentity, DirectorySession};
pub use error::{LdapError, LdapResult};
pub use mapper::ProfileMapper;
pub use provider::LdapAuthenticator;
pub use search::{LdapEntry, LdapSearcher};
pub use store::{ConfigStore, MemoryConfigStore};
