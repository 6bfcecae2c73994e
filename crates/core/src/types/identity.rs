//! Signed-in identity as seen by the listing core.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;

/// The signed-in user, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub first_name: Option<String>,
    pub username: Option<String>,
    /// Primary email address; attached to every submission.
    pub email: Email,
}

impl Identity {
    /// Name used in the footer greeting: first name, else username, else
    /// the email address.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.username.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| self.email.as_str())
    }
}

/// Read-only session context handed to everything that depends on who is
/// looking at the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    identity: Option<Identity>,
}

impl SessionContext {
    /// Context for an anonymous viewer.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }

    /// Context for a signed-in viewer.
    #[must_use]
    pub const fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }
}

impl From<Option<Identity>> for SessionContext {
    fn from(identity: Option<Identity>) -> Self {
        Self { identity }
    }
}
