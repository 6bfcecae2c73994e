//! Overlay handlers: the sign-in modal and the contact popup.
//!
//! Each one changes the page session's overlay and sends the browser back to
//! the board.

use axum::response::Redirect;
use skymates_core::SignInReason;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::OptionalUser;
use crate::models::{load_page, save_page};

/// "Add a travel mate".
///
/// Signed-in viewers land on the form with the listing type pre-selected;
/// anonymous viewers get the sign-in modal.
#[instrument(skip_all)]
pub async fn add_passenger(session: Session, viewer: OptionalUser) -> Result<Redirect> {
    let mut page = load_page(&session).await?;
    let show_form = page.start_add_passenger(&viewer.context());
    save_page(&session, &page).await?;

    Ok(Redirect::to(if show_form { "/#add-passenger" } else { "/" }))
}

/// A card's "Contact" button.
#[instrument(skip_all)]
pub async fn contact(session: Session) -> Result<Redirect> {
    let mut page = load_page(&session).await?;
    page.open_contact();
    save_page(&session, &page).await?;

    Ok(Redirect::to("/"))
}

/// The header's "Sign In" button.
#[instrument(skip_all)]
pub async fn sign_in(session: Session) -> Result<Redirect> {
    let mut page = load_page(&session).await?;
    page.open_sign_in(SignInReason::General);
    save_page(&session, &page).await?;

    Ok(Redirect::to("/"))
}

#[instrument(skip_all)]
pub async fn close(session: Session) -> Result<Redirect> {
    let mut page = load_page(&session).await?;
    page.close_overlay();
    save_page(&session, &page).await?;

    Ok(Redirect::to("/"))
}
