//! Maps directory entries to normalized user profiles.

use dirauth_federation::UserProfile;

use crate::config::DirectoryConfig;
use crate::search::LdapEntry;

/// Maps a verified entry's attributes to a [`UserProfile`] using the
/// provider's configured attribute names.
#[derive(Debug, Clone, Copy)]
pub struct ProfileMapper<'a> {
    config: &'a DirectoryConfig,
}

impl<'a> ProfileMapper<'a> {
    /// Creates a mapper for the given provider configuration.
    #[must_use]
    pub const fn new(config: &'a DirectoryConfig) -> Self {
        Self { config }
    }

    /// Builds the profile. Missing attributes become empty strings, not
    /// errors; the caller decides whether an empty email is acceptable.
    #[must_use]
    pub fn to_profile(&self, entry: &LdapEntry) -> UserProfile {
        UserProfile::new(
            entry.get_attr(&self.config.username_attribute).unwrap_or(""),
            entry.get_attr(&self.config.name_attribute).unwrap_or(""),
            entry.get_attr(&self.config.mail_attribute).unwrap_or(""),
        )
    }
}
