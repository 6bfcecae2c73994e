//! Board page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use skymates_core::info::{CONTACT_EMAIL, CONTACT_PHONE, CONTACT_PHONE_DIAL, FAQ, FaqEntry};
use skymates_core::{BoardView, FormDraft, Notice, PageSession, PassengerType, SessionContext};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::{load_page, save_page};
use crate::state::AppState;

/// One radio button of the listing type choice.
pub struct KindChoice {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

/// The draft as form control values.
pub struct DraftForm {
    pub choices: Vec<KindChoice>,
    pub name: String,
    pub age: String,
    pub date: String,
    pub from_city: String,
    pub to_city: String,
    pub phone: String,
    pub airlines: String,
    pub comments: String,
}

impl From<&FormDraft> for DraftForm {
    fn from(draft: &FormDraft) -> Self {
        Self {
            choices: PassengerType::CHOICES
                .into_iter()
                .map(|kind| KindChoice {
                    value: kind.as_str(),
                    label: kind.choice_label(),
                    checked: draft.kind == Some(kind),
                })
                .collect(),
            name: draft.name.clone(),
            age: draft.age.form_value(),
            date: draft.date.clone(),
            from_city: draft.from_city.clone(),
            to_city: draft.to_city.clone(),
            phone: draft.phone.clone(),
            airlines: draft.airlines.clone(),
            comments: draft.comments.clone(),
        }
    }
}

/// Board page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Footer greeting; `None` when anonymous.
    pub viewer_name: Option<String>,
    /// Notices queued since the last render.
    pub notices: Vec<Notice>,
    pub board: BoardView,
    pub form: DraftForm,
    /// Date picker values (`YYYY-MM-DD` or blank).
    pub filter_start: String,
    pub filter_end: String,
    /// Set while the sign-in modal is open.
    pub sign_in_prompt: Option<&'static str>,
    pub contact_open: bool,
    pub faq: &'static [FaqEntry],
    pub contact_email: &'static str,
    pub contact_phone: &'static str,
    pub contact_phone_dial: &'static str,
}

impl HomeTemplate {
    /// Render state for one viewer.
    #[must_use]
    pub fn new(page: &PageSession, context: &SessionContext, notices: Vec<Notice>) -> Self {
        let mode = page.mode();
        Self {
            viewer_name: context
                .identity()
                .map(|identity| identity.greeting_name().to_owned()),
            notices,
            board: page.view(context),
            form: DraftForm::from(page.draft()),
            filter_start: page.filter().start.map_or_else(String::new, |d| d.to_string()),
            filter_end: page.filter().end.map_or_else(String::new, |d| d.to_string()),
            sign_in_prompt: mode.sign_in_reason().map(|reason| reason.prompt()),
            contact_open: mode.is_contact_popup(),
            faq: &FAQ,
            contact_email: CONTACT_EMAIL,
            contact_phone: CONTACT_PHONE,
            contact_phone_dial: CONTACT_PHONE_DIAL,
        }
    }
}

/// Display the board.
///
/// Every render mounts the page, so the collection is fetched fresh each time.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    viewer: OptionalUser,
) -> Result<HomeTemplate> {
    let context = viewer.context();
    let mut page = load_page(&session).await?;

    page.ensure_loaded(state.store()).await;
    let notices = page.take_notices();
    save_page(&session, &page).await?;

    Ok(HomeTemplate::new(&page, &context, notices))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use skymates_core::{Email, Identity, SignInReason, UserId};

    use super::*;

    fn signed_in() -> SessionContext {
        SessionContext::signed_in(Identity {
            user_id: UserId::new("user_1"),
            first_name: Some("Sita".to_string()),
            username: None,
            email: Email::parse("sita@example.org").unwrap(),
        })
    }

    #[test]
    fn test_anonymous_board_prompts_for_sign_in() {
        let page = PageSession::default();
        let html = HomeTemplate::new(&page, &SessionContext::anonymous(), Vec::new())
            .render()
            .unwrap();

        assert!(html.contains("No passengers available in this category."));
        assert!(html.contains("Please sign in to add a new travel mate."));
        assert!(!html.contains("Add New Travel Mate"));
        assert!(html.contains("Login"));
    }

    #[test]
    fn test_signed_in_board_shows_form_and_greeting() {
        let mut page = PageSession::default();
        assert!(page.start_add_passenger(&signed_in()));

        let html = HomeTemplate::new(&page, &signed_in(), Vec::new())
            .render()
            .unwrap();

        assert!(html.contains("Add New Travel Mate"));
        assert!(html.contains("Hello, Sita"));
        assert!(html.contains(r#"value="beFriend" checked"#));
    }

    #[test]
    fn test_overlays_and_notices() {
        let mut page = PageSession::default();
        page.open_sign_in(SignInReason::AddPassenger);
        let html = HomeTemplate::new(
            &page,
            &SessionContext::anonymous(),
            vec![Notice::error("Something broke")],
        )
        .render()
        .unwrap();
        assert!(html.contains("Sign In to SkyMates.co"));
        assert!(html.contains("Something broke"));

        page.open_contact();
        let html = HomeTemplate::new(&page, &SessionContext::anonymous(), Vec::new())
            .render()
            .unwrap();
        assert!(html.contains("Please contact us to get connected to this passenger."));
        assert!(!html.contains("Sign In to SkyMates.co"));
    }
}
