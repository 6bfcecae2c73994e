//! Passenger submission and refresh handlers.

use axum::{Form, extract::State, response::Redirect};
use skymates_core::{DraftField, FieldChange, InputEvent, PageSession, SignInReason};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result};
use crate::middleware::OptionalUser;
use crate::models::{load_page, save_page};
use crate::state::AppState;

/// Copy the posted form controls into the draft.
///
/// The phone control goes through the pair path, everything else through
/// the input event path. Unknown controls are dropped.
fn apply_form(page: &mut PageSession, fields: Vec<(String, String)>) {
    for (name, value) in fields {
        let change = if name == DraftField::Phone.name() {
            FieldChange::Pair { name, value }
        } else {
            FieldChange::Event(InputEvent { name, value })
        };
        if let Err(e) = page.update_field(change) {
            warn!(error = %e, "Ignoring form control");
        }
    }
}

/// Submit the draft.
///
/// Anonymous viewers keep what they typed and get the sign-in modal.
/// Signed-in submissions run on their own task so a client that goes away
/// mid-request does not cancel the store write; the result lands in the
/// page session either way.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    viewer: OptionalUser,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Redirect> {
    let mut page = load_page(&session).await?;
    apply_form(&mut page, fields);

    let Some(user) = viewer.0 else {
        page.open_sign_in(SignInReason::AddPassenger);
        save_page(&session, &page).await?;
        return Ok(Redirect::to("/"));
    };

    // Keep the typed values even if the task below never finishes.
    save_page(&session, &page).await?;

    let store = state.store().clone();
    let tokens = state.tokens_for(user.session_id.clone());
    let context = user.context();
    let task_session = session.clone();

    let submitted = tokio::spawn(async move {
        let submitted = page.submit(&store, &tokens, &context).await.is_ok();
        if let Err(e) = save_page(&task_session, &page).await {
            warn!(error = %e, "Could not record submission result");
        } else if let Err(e) = task_session.save().await {
            warn!(error = %e, "Could not persist submission result");
        }
        submitted
    })
    .await
    .map_err(|e| AppError::Internal(format!("Submission task failed: {e}")))?;

    Ok(Redirect::to(if submitted {
        "/#board"
    } else {
        "/#add-passenger"
    }))
}

/// Re-fetch the collection.
///
/// The board reloads the collection whenever it renders, so this only has to
/// send the browser back to it.
#[instrument]
pub async fn refresh() -> Redirect {
    info!("Passenger list refresh requested");
    Redirect::to("/#board")
}

#[cfg(test)]
mod tests {
    use skymates_core::AgeInput;

    use super::*;

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn test_apply_form_fills_draft() {
        let mut page = PageSession::default();
        apply_form(
            &mut page,
            vec![
                pair("type", "needFriend"),
                pair("name", "Ram Bahadur"),
                pair("age", "72"),
                pair("phone", "7144859360"),
                pair("csrf", "ignored"),
            ],
        );

        let draft = page.draft();
        assert_eq!(draft.name, "Ram Bahadur");
        assert_eq!(draft.age, AgeInput::Number(72));
        assert_eq!(draft.phone, "(714) 485-9360");
        assert_eq!(draft.kind.map(|k| k.as_str()), Some("needFriend"));
    }
}
