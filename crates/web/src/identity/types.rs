//! Wire types for the identity provider's backend API.

use serde::Deserialize;
use skymates_core::{Email, EmailError, Identity, UserId};

/// A sign-in session.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSession {
    pub id: String,
    pub user_id: UserId,
    pub status: String,
}

impl ProviderSession {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// One of a user's email addresses.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    pub id: String,
    pub email_address: String,
}

/// A user profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    pub id: UserId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub primary_email_address_id: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
}

impl ProviderUser {
    /// The primary email address, falling back to the first one listed.
    #[must_use]
    pub fn primary_email(&self) -> Option<&str> {
        let primary = self.primary_email_address_id.as_deref();
        self.email_addresses
            .iter()
            .find(|address| Some(address.id.as_str()) == primary)
            .or_else(|| self.email_addresses.first())
            .map(|address| address.email_address.as_str())
    }

    /// Convert into the identity the rest of the site works with.
    ///
    /// Returns `Ok(None)` when the user has no email address at all.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError`] if the primary address is malformed.
    pub fn into_identity(self) -> Result<Option<Identity>, EmailError> {
        let Some(email) = self.primary_email().map(Email::parse).transpose()? else {
            return Ok(None);
        };
        Ok(Some(Identity {
            user_id: self.id,
            first_name: self.first_name.filter(|n| !n.trim().is_empty()),
            username: self.username.filter(|n| !n.trim().is_empty()),
            email,
        }))
    }
}

/// A short-lived session token.
#[derive(Deserialize)]
pub struct SessionToken {
    pub jwt: String,
}

/// Error body (`{"errors": [{"message": ..., "long_message": ...}]}`).
#[derive(Debug, Default, Deserialize)]
pub struct ProviderErrors {
    #[serde(default)]
    pub errors: Vec<ProviderErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderErrorEntry {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub long_message: Option<String>,
}

impl ProviderErrors {
    /// First error's most descriptive message, if any.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        let entry = self.errors.first()?;
        entry
            .long_message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(Some(entry.message.as_str()))
            .filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(json: serde_json::Value) -> ProviderUser {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_primary_email_is_selected_by_id() {
        let user = user(serde_json::json!({
            "id": "user_2a",
            "first_name": "Maya",
            "primary_email_address_id": "idn_2",
            "email_addresses": [
                {"id": "idn_1", "email_address": "old@example.com"},
                {"id": "idn_2", "email_address": "maya@example.com"}
            ]
        }));
        assert_eq!(user.primary_email(), Some("maya@example.com"));

        let identity = user.into_identity().unwrap().unwrap();
        assert_eq!(identity.email.as_str(), "maya@example.com");
        assert_eq!(identity.first_name.as_deref(), Some("Maya"));
        assert_eq!(identity.username, None);
    }

    #[test]
    fn test_user_without_email_has_no_identity() {
        let user = user(serde_json::json!({"id": "user_2b", "username": "traveler"}));
        assert!(user.into_identity().unwrap().is_none());
    }

    #[test]
    fn test_blank_names_are_dropped() {
        let user = user(serde_json::json!({
            "id": "user_2c",
            "first_name": "",
            "username": "gita",
            "email_addresses": [{"id": "idn_9", "email_address": "gita@example.com"}]
        }));
        let identity = user.into_identity().unwrap().unwrap();
        assert_eq!(identity.first_name, None);
        assert_eq!(identity.greeting_name(), "gita");
    }

    #[test]
    fn test_provider_error_message() {
        let errors: ProviderErrors = serde_json::from_value(serde_json::json!({
            "errors": [{"message": "not found", "long_message": "Session not found"}]
        }))
        .unwrap();
        assert_eq!(errors.first_message(), Some("Session not found"));
        assert_eq!(ProviderErrors::default().first_message(), None);
    }
}
