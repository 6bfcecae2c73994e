//! Request errors and the Sentry context that goes with them.
//!
//! Failures the viewer is meant to see (a list that did not load, a rejected
//! submission, a sign-in that did not finish) never come through here: they
//! become notices on the page. What is left is either the client's fault
//! (a malformed filter date) or ours, and ours goes to Sentry.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use skymates_core::FilterError;
use thiserror::Error;

use crate::identity::IdentityError;

#[derive(Debug, Error)]
pub enum AppError {
    /// The identity provider's hosted page URL could not be built.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Reading or writing the site session failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Identity(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<FilterError> for AppError {
    fn from(err: FilterError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if let Self::BadRequest(_) = self {
            self.to_string()
        } else {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
            // Details stay in the logs
            status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string()
        };

        (status, message).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Attach the signed-in user to Sentry events from here on.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Record a user action so later Sentry events show how the viewer got there.
pub fn add_breadcrumb(category: &str, message: &str) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_filter_date_is_a_client_error() {
        let err = AppError::from(FilterError("06/01/2024".to_string()));
        assert_eq!(
            err.to_string(),
            "Bad request: invalid date \"06/01/2024\", expected YYYY-MM-DD"
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let response = AppError::Internal("task panicked".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::Identity(IdentityError::InvalidId("a/b".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
