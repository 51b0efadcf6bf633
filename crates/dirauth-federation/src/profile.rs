//! Normalized user profile.

use serde::{Deserialize, Serialize};

/// The profile extracted from a directory entry after a successful
/// sign-in.
///
/// This is the only value handed to the identity-reconciliation layer;
/// it carries no directory-internal state (no DN, no raw attributes) and
/// has no lifecycle beyond the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable identifier within the provider, from the configured
    /// username attribute.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Email address, lowercased. Empty when the directory entry has no
    /// mail attribute; the caller decides whether that is acceptable.
    pub email: String,
}

impl UserProfile {
    /// Builds a profile from raw attribute values, normalizing as it
    /// goes: identifier and name are trimmed of surrounding whitespace,
    /// the email is lowercased.
    #[must_use]
    pub fn new(id: &str, name: &str, email: &str) -> Self {
        Self {
            id: id.trim().to_string(),
            name: name.trim().to_string(),
            email: email.to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_id_and_name() {
        let profile = UserProfile::new("  developer ", " Jane Doe\t", "jane@example.org");
        assert_eq!(profile.id, "developer");
        assert_eq!(profile.name, "Jane Doe");
    }

    #[test]
    fn lowercases_email() {
        let profile = UserProfile::new("developer", "Jane", "Jane.Doe@Example.ORG");
        assert_eq!(profile.email, "jane.doe@example.org");
    }

    #[test]
    fn missing_attributes_become_empty_strings() {
        let profile = UserProfile::new("developer", "", "");
        assert_eq!(profile.name, "");
        assert_eq!(profile.email, "");
    }

    #[test]
    fn serializes_all_fields() {
        let profile = UserProfile::new("developer", "Jane", "jane@example.org");
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "developer",
                "name": "Jane",
                "email": "jane@example.org",
            })
        );
    }
}
