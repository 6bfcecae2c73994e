//! Session-related types.
//!
//! Each browser session carries its own page session (draft, filter,
//! overlay, notices) and, once signed in, the provider session and identity
//! it belongs to. A browser that has done nothing yet gets no session at all.

use serde::{Deserialize, Serialize};
use skymates_core::{Identity, PageSession, SessionContext, SessionId};
use tower_sessions::Session;

/// Session-stored sign-in state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInUser {
    /// Provider session; tokens are issued against it.
    pub session_id: SessionId,
    pub identity: Identity,
}

impl SignedInUser {
    #[must_use]
    pub fn context(&self) -> SessionContext {
        SessionContext::signed_in(self.identity.clone())
    }
}

/// Session keys.
pub mod keys {
    /// Key for the viewer's page session.
    pub const PAGE: &str = "page";

    /// Key for the signed-in user.
    pub const SIGNED_IN_USER: &str = "signed_in_user";

    /// Key for the state value of a sign-in in progress.
    pub const SIGN_IN_STATE: &str = "sign_in_state";
}

/// Load the page session, starting a fresh one if there is none.
///
/// A stored page that no longer deserializes is discarded rather than
/// failing every request for that browser.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load_page(session: &Session) -> Result<PageSession, tower_sessions::session::Error> {
    match session.get::<PageSession>(keys::PAGE).await {
        Ok(page) => Ok(page.unwrap_or_default()),
        Err(tower_sessions::session::Error::SerdeJson(e)) => {
            tracing::warn!(error = %e, "Discarding unreadable page session");
            Ok(PageSession::default())
        }
        Err(e) => Err(e),
    }
}

/// Store the page session.
///
/// A pristine page is removed instead, so a session holding nothing else is
/// never written to the store.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_page(
    session: &Session,
    page: &PageSession,
) -> Result<(), tower_sessions::session::Error> {
    if page.is_pristine() {
        session.remove_value(keys::PAGE).await?;
        return Ok(());
    }
    session.insert(keys::PAGE, page).await
}
