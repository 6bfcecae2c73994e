//! Sign-in handlers.
//!
//! Sign-in and sign-up happen on the identity provider's hosted pages. Before
//! leaving, the browser's session gets a one-time state value that is also
//! carried in the callback URL. The provider sends the browser back to
//! `/auth/callback?state=...&session_id=...`; the callback is only honored
//! when the state matches the one this browser was given, and the provider
//! session is then verified server-side.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use skymates_core::{Notice, SessionId};
use tower_sessions::Session;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireUser, clear_signed_in_user, set_signed_in_user};
use crate::models::{SignedInUser, load_page, save_page, session_keys as keys};
use crate::state::AppState;

/// Shown when the provider's redirect cannot be turned into a signed-in user.
pub const SIGN_IN_FAILED_NOTICE: &str = "Sign in failed. Please try again.";

/// Query parameters of the provider's redirect back to the site.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub state: Option<String>,
    pub session_id: Option<String>,
}

/// Give this browser a fresh sign-in state and return the callback URL that
/// carries it. Starting again replaces any earlier state.
async fn begin_sign_in(state: &AppState, session: &Session) -> Result<String> {
    let nonce = Uuid::new_v4().simple().to_string();
    session.insert(keys::SIGN_IN_STATE, &nonce).await?;
    Ok(format!("{}?state={nonce}", state.config().callback_url()))
}

/// Whether the callback's state is the one this browser was given.
///
/// The stored state is consumed either way, so a callback URL works once.
async fn take_sign_in_state(session: &Session, returned: Option<&str>) -> Result<bool> {
    let expected = session.remove::<String>(keys::SIGN_IN_STATE).await?;
    Ok(matches!((expected, returned), (Some(expected), Some(returned)) if expected == returned))
}

/// Redirect to the hosted sign-in page.
#[instrument(skip_all)]
pub async fn sign_in(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let callback = begin_sign_in(&state, &session).await?;
    let url = state.identity().sign_in_url(&callback)?;
    Ok(Redirect::to(&url))
}

/// Redirect to the hosted sign-up page.
#[instrument(skip_all)]
pub async fn sign_up(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let callback = begin_sign_in(&state, &session).await?;
    let url = state.identity().sign_up_url(&callback)?;
    Ok(Redirect::to(&url))
}

/// Finish sign-in.
///
/// A callback this browser did not start, or a missing or unusable provider
/// session, leaves the viewer as they were with a notice; it is not an error
/// page.
#[instrument(skip_all)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect> {
    let mut page = load_page(&session).await?;

    if !take_sign_in_state(&session, query.state.as_deref()).await? {
        warn!("Sign-in callback without this browser's state");
        page.notify(Notice::error(SIGN_IN_FAILED_NOTICE));
        save_page(&session, &page).await?;
        return Ok(Redirect::to("/"));
    }

    let Some(session_id) = query
        .session_id
        .filter(|id| !id.trim().is_empty())
        .map(SessionId::new)
    else {
        warn!("Sign-in callback without a session id");
        page.notify(Notice::error(SIGN_IN_FAILED_NOTICE));
        save_page(&session, &page).await?;
        return Ok(Redirect::to("/"));
    };

    match state.identity().resolve_identity(&session_id).await {
        Ok(identity) => {
            // New cookie ID on privilege change
            session.cycle_id().await?;

            set_sentry_user(&identity.user_id, Some(identity.email.as_str()));
            add_breadcrumb("auth", "Signed in");
            info!(user_id = %identity.user_id, "Signed in");

            set_signed_in_user(
                &session,
                &SignedInUser {
                    session_id,
                    identity,
                },
            )
            .await?;
            page.close_overlay();
        }
        Err(e) => {
            warn!(error = %e, "Could not resolve provider session");
            page.notify(Notice::error(SIGN_IN_FAILED_NOTICE));
        }
    }

    save_page(&session, &page).await?;
    Ok(Redirect::to("/"))
}

/// Sign out.
///
/// Ends the provider session as well; the site session is cleared even if
/// the provider call fails. The draft and filter survive.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> Result<Redirect> {
    if let Err(e) = state.identity().revoke_session(&user.session_id).await {
        warn!(error = %e, "Could not revoke provider session");
    }

    clear_signed_in_user(&session).await?;
    clear_sentry_user();
    add_breadcrumb("auth", "Signed out");
    info!(user_id = %user.identity.user_id, "Signed out");

    let mut page = load_page(&session).await?;
    page.close_overlay();
    save_page(&session, &page).await?;

    Ok(Redirect::to("/"))
}
