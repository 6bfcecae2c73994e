//! Integration tests for adding a passenger.

#![allow(clippy::indexing_slicing)]

use skymates_core::SUBMITTED_NOTICE;
use skymates_integration_tests::{ACTIVE_SESSION, FakeStore, TEST_EMAIL, TestApp, full_form};

#[tokio::test]
async fn test_anonymous_submission_opens_sign_in_and_sends_nothing() {
    let app = TestApp::spawn(FakeStore::default()).await;

    let html = app.post_form("/passengers", &full_form("Ram Bahadur")).await;

    assert!(html.contains("Sign In to SkyMates.co"));
    assert!(app.store.lock().created.is_empty());
    assert!(app.store.lock().authorizations.is_empty());
}

#[tokio::test]
async fn test_signed_in_submission_creates_and_refreshes() {
    let app = TestApp::spawn(FakeStore::default()).await;
    app.sign_in().await;
    assert_eq!(app.store.lock().list_calls, 1);

    let html = app.post_form("/passengers", &full_form("Ram Bahadur")).await;

    assert!(html.contains(SUBMITTED_NOTICE));
    assert!(html.contains("Ram Bahadur"));
    // Draft was reset
    assert!(!html.contains(r#"value="Ram Bahadur""#));

    let store = app.store.lock();
    // One refresh after the create, then the board's own load
    assert_eq!(store.list_calls, 3);
    assert_eq!(store.created.len(), 1);
    assert_eq!(
        store.authorizations,
        vec![format!("Bearer jwt-for-{ACTIVE_SESSION}")]
    );

    let created = &store.created[0];
    assert_eq!(created["email"], TEST_EMAIL);
    assert_eq!(created["age"], 74);
    assert_eq!(created["type"], "needFriend");
    assert_eq!(created["phone"], "(714) 485-9360");
    assert_eq!(created["comments"], "Wheelchair at Doha");
}

#[tokio::test]
async fn test_rejected_submission_keeps_draft_and_shows_details() {
    let store = FakeStore::default();
    store.lock().reject_create = Some("Phone already listed".to_string());
    let app = TestApp::spawn(store).await;
    app.sign_in().await;

    let html = app.post_form("/passengers", &full_form("Ram Bahadur")).await;

    assert!(html.contains("Error: Phone already listed"));
    assert!(html.contains(r#"value="Ram Bahadur""#));
    assert!(!html.contains(SUBMITTED_NOTICE));
    // No refresh after a failed submission, only the board's own load
    assert_eq!(app.store.lock().list_calls, 2);
}

#[tokio::test]
async fn test_incomplete_submission_is_refused_locally() {
    let app = TestApp::spawn(FakeStore::default()).await;
    app.sign_in().await;

    let form: Vec<_> = full_form("Ram Bahadur")
        .into_iter()
        .filter(|(name, _)| *name != "airlines")
        .collect();
    let html = app.post_form("/passengers", &form).await;

    assert!(html.contains("Error: Airlines is required"));
    assert!(app.store.lock().created.is_empty());
}

#[tokio::test]
async fn test_unreadable_age_is_refused_locally() {
    let app = TestApp::spawn(FakeStore::default()).await;
    app.sign_in().await;

    let form: Vec<_> = full_form("Ram Bahadur")
        .into_iter()
        .map(|(name, value)| {
            if name == "age" {
                (name, "seventy".to_string())
            } else {
                (name, value)
            }
        })
        .collect();
    let html = app.post_form("/passengers", &form).await;

    assert!(html.contains("Error: Age must be a whole number of years"));
    assert!(html.contains(r#"value="seventy""#));
    assert!(app.store.lock().created.is_empty());
}

#[tokio::test]
async fn test_partial_phone_is_refused_locally() {
    let app = TestApp::spawn(FakeStore::default()).await;
    app.sign_in().await;

    let form: Vec<_> = full_form("Ram Bahadur")
        .into_iter()
        .map(|(name, value)| {
            if name == "phone" {
                (name, "71448".to_string())
            } else {
                (name, value)
            }
        })
        .collect();
    let html = app.post_form("/passengers", &form).await;

    assert!(html.contains("Error: Phone number must have 10 digits"));
    assert!(app.store.lock().created.is_empty());
    assert!(app.store.lock().authorizations.is_empty());
}

#[tokio::test]
async fn test_add_passenger_button_preselects_offering_help() {
    let app = TestApp::spawn(FakeStore::default()).await;

    let html = app.click("/ui/add-passenger").await;
    assert!(html.contains("Sign In to SkyMates.co"));

    app.sign_in().await;
    let html = app.click("/ui/add-passenger").await;
    assert!(!html.contains("Sign In to SkyMates.co"));
    assert!(html.contains(r#"value="beFriend" checked"#));
}
