//! Identity extractors.
//!
//! Handlers never look identity up on their own: they take one of these
//! extractors and pass the resulting [`SessionContext`] down explicitly.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use skymates_core::SessionContext;
use tower_sessions::Session;

use crate::models::{SignedInUser, session_keys};

/// Extractor that optionally gets the signed-in user.
///
/// Does not reject anonymous viewers.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(viewer: OptionalUser) -> impl IntoResponse {
///     let context = viewer.context();
///     // ...
/// }
/// ```
pub struct OptionalUser(pub Option<SignedInUser>);

impl OptionalUser {
    /// The session context for this viewer.
    #[must_use]
    pub fn context(&self) -> SessionContext {
        self.0
            .as_ref()
            .map_or_else(SessionContext::anonymous, SignedInUser::context)
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<SignedInUser>(session_keys::SIGNED_IN_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Extractor that requires a signed-in user.
///
/// Anonymous page requests are sent back to the board.
pub struct RequireUser(pub SignedInUser);

/// Error returned when a signed-in user is required but absent.
pub enum AuthRejection {
    /// Back to the board (for page requests).
    RedirectHome,
    /// Session layer missing.
    Unavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectHome => Redirect::to("/").into_response(),
            Self::Unavailable => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unavailable)?;

        session
            .get::<SignedInUser>(session_keys::SIGNED_IN_USER)
            .await
            .ok()
            .flatten()
            .map(Self)
            .ok_or(AuthRejection::RedirectHome)
    }
}

/// Helper to set the signed-in user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_signed_in_user(
    session: &Session,
    user: &SignedInUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::SIGNED_IN_USER, user).await
}

/// Helper to clear the signed-in user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_signed_in_user(
    session: &Session,
) -> Result<Option<SignedInUser>, tower_sessions::session::Error> {
    session
        .remove::<SignedInUser>(session_keys::SIGNED_IN_USER)
        .await
}
