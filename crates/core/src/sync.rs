//! Page session: the passenger collection, the draft, the filter and the
//! overlay state owned by one viewer, plus the two operations that talk to
//! the outside world (`refresh` and `submit`).
//!
//! Only the viewer's own input survives serialization. The collection is
//! shared data and is fetched again whenever the page is mounted.
//!
//! The remote passenger store and the identity provider's token endpoint are
//! reached only through the [`PassengerStore`] and [`TokenSource`] traits, so
//! everything here runs the same against HTTP clients or in-memory fakes.

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::draft::{DraftError, DraftField, FieldChange, FormDraft, PayloadError};
use crate::filter::DateRangeFilter;
use crate::types::{NewPassenger, PassengerRecord, PassengerType, SessionContext};
use crate::ui::{Notice, SignInReason, UiMode};
use crate::view::{BoardView, compose};

/// Notice shown when the list cannot be loaded.
pub const LOAD_FAILED_NOTICE: &str = "Failed to load passengers. Please try again later.";

/// Notice shown after a successful submission.
pub const SUBMITTED_NOTICE: &str = "Passenger added successfully!";

/// Bearer token issued by the identity provider for one request.
///
/// `Debug` is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// Failures talking to the passenger store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The request never got an HTTP response.
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-success status. `details` is the store's own explanation when it
    /// sent one.
    #[error("{details}")]
    Rejected { status: u16, details: String },

    /// Success status with a body that is not what the store promises.
    #[error("Unexpected response from passenger store: {0}")]
    Decode(String),
}

/// Failures obtaining a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("no active session")]
    NoSession,

    #[error("{0}")]
    Provider(String),
}

/// The remote passenger store.
pub trait PassengerStore {
    /// Fetch the full list, in store order.
    fn list(&self) -> impl Future<Output = Result<Vec<PassengerRecord>, StoreError>> + Send;

    /// Create a listing on behalf of the token's holder.
    fn create(
        &self,
        passenger: &NewPassenger,
        token: &BearerToken,
    ) -> impl Future<Output = Result<PassengerRecord, StoreError>> + Send;
}

/// Where submission gets its bearer token from.
pub trait TokenSource {
    fn get_token(&self) -> impl Future<Output = Result<BearerToken, TokenError>> + Send;
}

/// Why a submission did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("You must be signed in to add a passenger")]
    MissingIdentity,

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("Could not get a session token: {0}")]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// State of the listing page for one viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSession {
    #[serde(skip)]
    passengers: Vec<PassengerRecord>,
    #[serde(skip)]
    loaded: bool,
    draft: FormDraft,
    filter: DateRangeFilter,
    mode: UiMode,
    notices: Vec<Notice>,
}

impl PageSession {
    /// The passenger collection, in store order.
    #[must_use]
    pub fn passengers(&self) -> &[PassengerRecord] {
        &self.passengers
    }

    /// Whether the collection has been fetched since this page was mounted.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Nothing here the viewer typed, chose or still has to be told.
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        self.draft.is_empty()
            && self.filter == DateRangeFilter::default()
            && self.mode == UiMode::None
            && self.notices.is_empty()
    }

    #[must_use]
    pub const fn draft(&self) -> &FormDraft {
        &self.draft
    }

    #[must_use]
    pub const fn filter(&self) -> &DateRangeFilter {
        &self.filter
    }

    pub const fn filter_mut(&mut self) -> &mut DateRangeFilter {
        &mut self.filter
    }

    #[must_use]
    pub const fn mode(&self) -> UiMode {
        self.mode
    }

    /// Load the collection unless this mount already has it.
    pub async fn ensure_loaded<S>(&mut self, store: &S)
    where
        S: PassengerStore + Sync,
    {
        if !self.loaded {
            // Failure is already reported through a notice.
            self.refresh(store).await.ok();
        }
    }

    /// Replace the collection with the store's current list.
    ///
    /// On failure the collection becomes empty, never stale, and a notice is
    /// queued. Returns the number of records loaded.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] that caused the collection to be emptied.
    pub async fn refresh<S>(&mut self, store: &S) -> Result<usize, StoreError>
    where
        S: PassengerStore + Sync,
    {
        self.loaded = true;
        match store.list().await {
            Ok(passengers) => {
                self.passengers = passengers;
                Ok(self.passengers.len())
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch passengers");
                self.passengers.clear();
                self.notify(Notice::error(LOAD_FAILED_NOTICE));
                Err(e)
            }
        }
    }

    /// Apply one form field change to the draft.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownField`] if the field does not exist; the
    /// draft is left as it was.
    pub fn update_field(&mut self, change: FieldChange) -> Result<DraftField, DraftError> {
        self.draft.update_field(change)
    }

    /// Send the draft to the store.
    ///
    /// Requires a signed-in viewer; callers are expected to have opened the
    /// sign-in modal instead of calling this for anonymous viewers, and an
    /// anonymous call is rejected before anything is sent.
    ///
    /// On success the collection is refreshed, the draft reset and a success
    /// notice queued. On failure the draft is left untouched, an error notice
    /// with the failure detail is queued, and the collection is not
    /// refreshed. Nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns the [`SubmitError`] that stopped the submission.
    pub async fn submit<S, T>(
        &mut self,
        store: &S,
        tokens: &T,
        context: &SessionContext,
    ) -> Result<PassengerRecord, SubmitError>
    where
        S: PassengerStore + Sync,
        T: TokenSource + Sync,
    {
        let result = self.try_submit(store, tokens, context).await;
        if let Err(e) = &result {
            warn!(error = %e, "Failed to add passenger");
            self.notify(Notice::error(format!("Error: {e}")));
        }
        result
    }

    async fn try_submit<S, T>(
        &mut self,
        store: &S,
        tokens: &T,
        context: &SessionContext,
    ) -> Result<PassengerRecord, SubmitError>
    where
        S: PassengerStore + Sync,
        T: TokenSource + Sync,
    {
        let identity = context.identity().ok_or(SubmitError::MissingIdentity)?;
        let payload = self.draft.to_payload(identity.email.clone())?;
        let token = tokens.get_token().await?;
        let created = store.create(&payload, &token).await?;

        info!(
            passenger_id = ?created.id,
            kind = payload.kind.as_str(),
            "Passenger added"
        );

        if self.refresh(store).await.is_err() {
            warn!("Passenger list could not be reloaded after submission");
        }
        self.draft.reset();
        self.notify(Notice::success(SUBMITTED_NOTICE));
        Ok(created)
    }

    /// The listing page as this viewer should see it.
    #[must_use]
    pub fn view(&self, context: &SessionContext) -> BoardView {
        compose(&self.passengers, &self.filter, context)
    }

    /// "Add a travel mate" was clicked.
    ///
    /// Anonymous viewers get the sign-in modal. Signed-in viewers get the
    /// draft pre-set to offering companionship; returns true in that case so
    /// the caller can bring the form into view.
    pub fn start_add_passenger(&mut self, context: &SessionContext) -> bool {
        if context.is_signed_in() {
            self.draft.kind = Some(PassengerType::BeFriend);
            self.mode = UiMode::None;
            true
        } else {
            self.mode = UiMode::SignInModal(SignInReason::AddPassenger);
            false
        }
    }

    pub const fn open_sign_in(&mut self, reason: SignInReason) {
        self.mode = UiMode::SignInModal(reason);
    }

    pub const fn open_contact(&mut self) {
        self.mode = UiMode::ContactPopup;
    }

    pub const fn close_overlay(&mut self) {
        self.mode = UiMode::None;
    }

    /// Queue a notice for the next render. A notice identical to one still
    /// pending is dropped.
    pub fn notify(&mut self, notice: Notice) {
        if !self.notices.contains(&notice) {
            self.notices.push(notice);
        }
    }

    /// Notices queued since the last render, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::draft::{AgeInput, InputEvent};
    use crate::types::{Email, Identity, PassengerId, UserId};
    use crate::ui::NoticeLevel;

    #[derive(Default)]
    struct FakeStore {
        records: Mutex<Vec<PassengerRecord>>,
        list_status: Mutex<Option<u16>>,
        create_rejection: Mutex<Option<StoreError>>,
        list_calls: AtomicUsize,
        created: Mutex<Vec<(NewPassenger, String)>>,
    }

    impl FakeStore {
        fn with(records: Vec<PassengerRecord>) -> Self {
            let store = Self::default();
            *store.records.lock().unwrap() = records;
            store
        }

        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }
    }

    impl PassengerStore for FakeStore {
        async fn list(&self) -> Result<Vec<PassengerRecord>, StoreError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = *self.list_status.lock().unwrap() {
                return Err(StoreError::Rejected {
                    status,
                    details: "Network response was not ok".to_string(),
                });
            }
            Ok(self.records.lock().unwrap().clone())
        }

        async fn create(
            &self,
            passenger: &NewPassenger,
            token: &BearerToken,
        ) -> Result<PassengerRecord, StoreError> {
            if let Some(err) = self.create_rejection.lock().unwrap().clone() {
                return Err(err);
            }
            self.created
                .lock()
                .unwrap()
                .push((passenger.clone(), token.expose().to_string()));

            let mut records = self.records.lock().unwrap();
            let id = PassengerId::new(format!("p{}", records.len() + 1));
            let record = passenger.clone().into_record(Some(id));
            records.push(record.clone());
            Ok(record)
        }
    }

    struct FakeTokens(Result<BearerToken, TokenError>);

    impl TokenSource for FakeTokens {
        async fn get_token(&self) -> Result<BearerToken, TokenError> {
            self.0.clone()
        }
    }

    fn tokens() -> FakeTokens {
        FakeTokens(Ok(BearerToken::new("jwt-123")))
    }

    fn signed_in() -> SessionContext {
        SessionContext::signed_in(Identity {
            user_id: UserId::new("user_1"),
            first_name: Some("Maya".to_string()),
            username: Some("maya".to_string()),
            email: Email::parse("maya@example.com").unwrap(),
        })
    }

    fn listing(kind: &str, name: &str) -> PassengerRecord {
        serde_json::from_value(serde_json::json!({
            "id": name,
            "type": kind,
            "name": name,
            "age": 40,
            "date": "2024-06-01",
        }))
        .unwrap()
    }

    fn fill(page: &mut PageSession) {
        for (name, value) in [
            ("type", "beFriend"),
            ("name", "Maya Gurung"),
            ("age", "29"),
            ("date", "2024-11-20"),
            ("fromCity", "Seattle"),
            ("toCity", "Kathmandu"),
            ("airlines", "Korean Air"),
        ] {
            page.update_field(FieldChange::Event(InputEvent {
                name: name.to_string(),
                value: value.to_string(),
            }))
            .unwrap();
        }
        page.update_field(FieldChange::Pair {
            name: "phone".to_string(),
            value: "2065550199".to_string(),
        })
        .unwrap();
    }

    #[tokio::test]
    async fn test_refresh_preserves_store_order() {
        let store = FakeStore::with(vec![
            listing("needFriend", "b"),
            listing("beFriend", "a"),
            listing("needFriend", "c"),
        ]);
        let mut page = PageSession::default();

        assert_eq!(page.refresh(&store).await.unwrap(), 3);
        let names: Vec<_> = page.passengers().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert!(page.is_loaded());
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let store = FakeStore::with(vec![listing("beFriend", "a"), listing("needFriend", "b")]);
        let mut page = PageSession::default();

        page.refresh(&store).await.unwrap();
        let first = page.passengers().to_vec();
        page.refresh(&store).await.unwrap();
        assert_eq!(page.passengers(), first.as_slice());
        assert!(page.take_notices().is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_empties_collection_and_notifies() {
        let store = FakeStore::with(vec![listing("beFriend", "a")]);
        let mut page = PageSession::default();
        page.refresh(&store).await.unwrap();
        assert_eq!(page.passengers().len(), 1);

        *store.list_status.lock().unwrap() = Some(500);
        let err = page.refresh(&store).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected { status: 500, .. }));
        assert!(page.passengers().is_empty());

        let notices = page.take_notices();
        assert_eq!(notices, vec![Notice::error(LOAD_FAILED_NOTICE)]);

        let view = page.view(&SessionContext::anonymous());
        for category in &view.categories {
            assert!(category.is_empty());
            assert_eq!(
                category.empty_message,
                "No passengers available in this category."
            );
        }
    }

    #[tokio::test]
    async fn test_ensure_loaded_fetches_once() {
        let store = FakeStore::default();
        let mut page = PageSession::default();
        page.ensure_loaded(&store).await;
        page.ensure_loaded(&store).await;
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_successful_submit_resets_draft_and_refreshes_once() {
        let store = FakeStore::default();
        let mut page = PageSession::default();
        page.ensure_loaded(&store).await;
        fill(&mut page);

        let created = page.submit(&store, &tokens(), &signed_in()).await.unwrap();
        assert_eq!(created.id, Some(PassengerId::new("p1")));

        assert_eq!(store.list_calls(), 2, "one mount load plus one refresh");
        assert!(page.draft().is_empty());
        assert_eq!(page.draft().age, AgeInput::Empty);
        assert_eq!(page.take_notices(), vec![Notice::success(SUBMITTED_NOTICE)]);
        assert_eq!(page.passengers().len(), 1);
        assert_eq!(page.passengers()[0].name, "Maya Gurung");

        let created = store.created.lock().unwrap();
        let (payload, token) = &created[0];
        assert_eq!(payload.email.as_str(), "maya@example.com");
        assert_eq!(payload.age, 29);
        assert_eq!(payload.phone, "(206) 555-0199");
        assert_eq!(token, "jwt-123");
    }

    #[tokio::test]
    async fn test_submit_without_identity_sends_nothing() {
        let store = FakeStore::default();
        let mut page = PageSession::default();
        fill(&mut page);
        let before = page.draft().clone();

        let err = page
            .submit(&store, &tokens(), &SessionContext::anonymous())
            .await
            .unwrap_err();
        assert_eq!(err, SubmitError::MissingIdentity);
        assert!(store.created.lock().unwrap().is_empty());
        assert_eq!(store.list_calls(), 0);
        assert_eq!(page.draft(), &before);
        assert!(page.take_notices()[0].is_error());
    }

    #[tokio::test]
    async fn test_rejected_submit_keeps_draft_and_reports_details() {
        let store = FakeStore::default();
        *store.create_rejection.lock().unwrap() = Some(StoreError::Rejected {
            status: 400,
            details: "Phone number already listed".to_string(),
        });
        let mut page = PageSession::default();
        fill(&mut page);
        let before = page.draft().clone();

        let err = page.submit(&store, &tokens(), &signed_in()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Store(_)));
        assert_eq!(page.draft(), &before);
        assert_eq!(store.list_calls(), 0);

        let notices = page.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "Error: Phone number already listed");
    }

    #[tokio::test]
    async fn test_token_failure_keeps_draft() {
        let store = FakeStore::default();
        let mut page = PageSession::default();
        fill(&mut page);

        let err = page
            .submit(
                &store,
                &FakeTokens(Err(TokenError::Provider("session expired".to_string()))),
                &signed_in(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Token(_)));
        assert!(!page.draft().is_empty());
        assert!(store.created.lock().unwrap().is_empty());
        assert_eq!(
            page.take_notices()[0].message,
            "Error: Could not get a session token: session expired"
        );
    }

    #[tokio::test]
    async fn test_invalid_age_is_rejected_locally() {
        let store = FakeStore::default();
        let mut page = PageSession::default();
        fill(&mut page);
        page.update_field(FieldChange::Event(InputEvent {
            name: "age".to_string(),
            value: "abc".to_string(),
        }))
        .unwrap();

        let err = page.submit(&store, &tokens(), &signed_in()).await.unwrap_err();
        assert_eq!(
            err,
            SubmitError::Payload(PayloadError::InvalidAge("abc".to_string()))
        );
        assert!(store.created.lock().unwrap().is_empty());
    }

    #[test]
    fn test_add_passenger_gating() {
        let mut page = PageSession::default();
        assert!(!page.start_add_passenger(&SessionContext::anonymous()));
        assert_eq!(
            page.mode(),
            UiMode::SignInModal(SignInReason::AddPassenger)
        );
        assert_eq!(page.draft().kind, None);

        assert!(page.start_add_passenger(&signed_in()));
        assert_eq!(page.mode(), UiMode::None);
        assert_eq!(page.draft().kind, Some(PassengerType::BeFriend));
    }

    #[test]
    fn test_overlays_replace_each_other() {
        let mut page = PageSession::default();
        page.open_contact();
        assert_eq!(page.mode(), UiMode::ContactPopup);
        page.open_sign_in(SignInReason::General);
        assert_eq!(page.mode(), UiMode::SignInModal(SignInReason::General));
        page.close_overlay();
        assert_eq!(page.mode(), UiMode::None);
    }

    #[test]
    fn test_bearer_token_debug_is_redacted() {
        let token = BearerToken::new("very-secret");
        assert!(!format!("{token:?}").contains("very-secret"));
    }

    #[test]
    fn test_page_session_survives_serialization() {
        let mut page = PageSession::default();
        page.notify(Notice::success("saved"));
        page.open_contact();
        let json = serde_json::to_string(&page).unwrap();
        let back: PageSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, page);
    }

    #[tokio::test]
    async fn test_collection_is_not_serialized() {
        let store = FakeStore::with(vec![listing("beFriend", "a")]);
        let mut page = PageSession::default();
        page.ensure_loaded(&store).await;
        assert!(page.is_pristine());

        let json = serde_json::to_string(&page).unwrap();
        assert!(!json.contains("passengers"));

        let mut back: PageSession = serde_json::from_str(&json).unwrap();
        assert!(!back.is_loaded());
        assert!(back.passengers().is_empty());

        back.ensure_loaded(&store).await;
        assert_eq!(store.list_calls(), 2);
        assert_eq!(back.passengers().len(), 1);
    }

    #[test]
    fn test_pristine_until_the_viewer_does_something() {
        let mut page = PageSession::default();
        assert!(page.is_pristine());

        page.open_contact();
        assert!(!page.is_pristine());
        page.close_overlay();
        assert!(page.is_pristine());

        page.filter_mut().start = chrono::NaiveDate::from_ymd_opt(2024, 6, 1);
        assert!(!page.is_pristine());
        *page.filter_mut() = DateRangeFilter::default();

        page.notify(Notice::error(LOAD_FAILED_NOTICE));
        assert!(!page.is_pristine());
        page.take_notices();

        fill(&mut page);
        assert!(!page.is_pristine());
    }

    #[test]
    fn test_identical_pending_notice_is_dropped() {
        let mut page = PageSession::default();
        page.notify(Notice::error(LOAD_FAILED_NOTICE));
        page.notify(Notice::error(LOAD_FAILED_NOTICE));
        page.notify(Notice::success(SUBMITTED_NOTICE));
        assert_eq!(page.take_notices().len(), 2);

        page.notify(Notice::error(LOAD_FAILED_NOTICE));
        assert_eq!(page.take_notices().len(), 1);
    }
}
