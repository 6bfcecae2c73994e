//! Overlay state and user notices for a page session.

use serde::{Deserialize, Serialize};

/// Why the sign-in modal was opened. Selects the modal's prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignInReason {
    AddPassenger,
    General,
}

impl SignInReason {
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::AddPassenger | Self::General => "Please sign in to add a new travel mate.",
        }
    }
}

/// The overlay currently shown over the page. At most one at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiMode {
    #[default]
    None,
    SignInModal(SignInReason),
    ContactPopup,
}

impl UiMode {
    #[must_use]
    pub const fn sign_in_reason(self) -> Option<SignInReason> {
        match self {
            Self::SignInModal(reason) => Some(reason),
            Self::None | Self::ContactPopup => None,
        }
    }

    #[must_use]
    pub const fn is_contact_popup(self) -> bool {
        matches!(self, Self::ContactPopup)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message shown to the user on the next render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.level, NoticeLevel::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_prompts() {
        assert_eq!(
            SignInReason::AddPassenger.prompt(),
            "Please sign in to add a new travel mate."
        );
        assert_eq!(
            SignInReason::General.prompt(),
            SignInReason::AddPassenger.prompt()
        );
    }

    #[test]
    fn test_modes_are_exclusive() {
        let mode = UiMode::SignInModal(SignInReason::AddPassenger);
        assert_eq!(mode.sign_in_reason(), Some(SignInReason::AddPassenger));
        assert!(!mode.is_contact_popup());
        assert_eq!(UiMode::ContactPopup.sign_in_reason(), None);
    }
}
