//! HTTP route handlers.
//!
//! Every state change is a plain form POST answered with a redirect back to
//! the board; the board then renders from the page session.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Board: lists, filter, form, FAQ
//! GET  /contact                - Contact page
//! GET  /health                 - Health check
//!
//! # Passengers
//! POST /passengers             - Submit the draft
//! POST /passengers/refresh     - Back to the board, which reloads the collection
//!
//! # Filter
//! POST /filter                 - Set the travel date range
//! POST /filter/clear           - Clear the travel date range
//!
//! # Overlays
//! POST /ui/add-passenger       - "Add a travel mate"
//! POST /ui/contact             - Open the contact popup
//! POST /ui/sign-in             - Open the sign-in modal
//! POST /ui/close               - Close whatever overlay is open
//!
//! # Auth
//! GET  /auth/sign-in           - Redirect to hosted sign-in
//! GET  /auth/sign-up           - Redirect to hosted sign-up
//! GET  /auth/callback          - Finish sign-in (?session_id=)
//! POST /auth/logout            - Sign out
//! ```

pub mod auth;
pub mod contact;
pub mod filter;
pub mod home;
pub mod passengers;
pub mod ui;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the overlay routes router.
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/add-passenger", post(ui::add_passenger))
        .route("/contact", post(ui::contact))
        .route("/sign-in", post(ui::sign_in))
        .route("/close", post(ui::close))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-in", get(auth::sign_in))
        .route("/sign-up", get(auth::sign_up))
        .route("/callback", get(auth::callback))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/contact", get(contact::contact))
        .route("/passengers", post(passengers::submit))
        .route("/passengers/refresh", post(passengers::refresh))
        .route("/filter", post(filter::apply))
        .route("/filter/clear", post(filter::clear))
        .nest("/ui", ui_routes())
        .nest("/auth", auth_routes())
}
