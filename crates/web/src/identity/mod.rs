//! Identity provider client (Clerk-compatible backend API).
//!
//! # Flow
//!
//! 1. `GET /auth/sign-in` redirects the browser to the hosted sign-in page
//!    with `redirect_url={base_url}/auth/callback`.
//! 2. The provider sends the browser back with `?session_id=...`.
//! 3. The callback verifies the session is active, loads the user profile and
//!    stores the resulting [`Identity`] in the site session.
//! 4. Each submission asks the provider for a fresh session token
//!    ([`SessionTokens`]); sign-out revokes the provider session.
//!
//! Every backend call authenticates with the secret key as a bearer token.

pub mod types;

use std::future::Future;
use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use skymates_core::{
    BearerToken, EmailError, Identity, SessionId, TokenError, TokenSource, UserId,
};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::IdentityConfig;
use types::{ProviderErrors, ProviderSession, ProviderUser, SessionToken};

/// Errors that can occur when talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The session exists but is not active (ended, revoked, expired).
    #[error("Session is {0}")]
    InactiveSession(String),

    /// An identifier that cannot be used as a path segment.
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// The user has no email address to attach to submissions.
    #[error("User {0} has no email address")]
    MissingEmail(UserId),

    /// The user's primary email address is malformed.
    #[error("Invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),

    /// A configured URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Client for the identity provider's backend API.
#[derive(Clone)]
pub struct IdentityClient {
    inner: Arc<IdentityClientInner>,
}

struct IdentityClientInner {
    client: reqwest::Client,
    api_url: String,
    secret_key: SecretString,
    sign_in_url: String,
    sign_up_url: String,
}

impl IdentityClient {
    /// Create a new identity provider client.
    #[must_use]
    pub fn new(config: &IdentityConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing connection pool.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &IdentityConfig) -> Self {
        Self {
            inner: Arc::new(IdentityClientInner {
                client,
                api_url: config.api_url.trim_end_matches('/').to_string(),
                secret_key: config.secret_key.clone(),
                sign_in_url: config.sign_in_url.clone(),
                sign_up_url: config.sign_up_url.clone(),
            }),
        }
    }

    /// Hosted sign-in page that returns to `redirect_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured sign-in URL cannot be parsed.
    pub fn sign_in_url(&self, redirect_url: &str) -> Result<String, IdentityError> {
        with_redirect(&self.inner.sign_in_url, redirect_url)
    }

    /// Hosted sign-up page that returns to `redirect_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured sign-up URL cannot be parsed.
    pub fn sign_up_url(&self, redirect_url: &str) -> Result<String, IdentityError> {
        with_redirect(&self.inner.sign_up_url, redirect_url)
    }

    /// Look up a session and require it to be active.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InactiveSession`] if the session is not
    /// active, or an API/HTTP error.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn verify_session(
        &self,
        session_id: &SessionId,
    ) -> Result<ProviderSession, IdentityError> {
        let url = format!("{}/sessions/{}", self.inner.api_url, segment(session_id.as_str())?);
        let session: ProviderSession = self.send(self.inner.client.get(url)).await?;
        if !session.is_active() {
            return Err(IdentityError::InactiveSession(session.status));
        }
        Ok(session)
    }

    /// Fetch a user profile.
    ///
    /// # Errors
    ///
    /// Returns an API/HTTP error.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_user(&self, user_id: &UserId) -> Result<ProviderUser, IdentityError> {
        let url = format!("{}/users/{}", self.inner.api_url, segment(user_id.as_str())?);
        self.send(self.inner.client.get(url)).await
    }

    /// Resolve a returning sign-in session into an [`Identity`].
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not active, the profile cannot be
    /// loaded, or the user has no usable email address.
    pub async fn resolve_identity(&self, session_id: &SessionId) -> Result<Identity, IdentityError> {
        let session = self.verify_session(session_id).await?;
        let user = self.get_user(&session.user_id).await?;
        let user_id = user.id.clone();
        user.into_identity()?
            .ok_or(IdentityError::MissingEmail(user_id))
    }

    /// Issue a short-lived token for the session.
    ///
    /// # Errors
    ///
    /// Returns an API/HTTP error, e.g. when the session has ended.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn session_token(&self, session_id: &SessionId) -> Result<BearerToken, IdentityError> {
        let url = format!(
            "{}/sessions/{}/tokens",
            self.inner.api_url,
            segment(session_id.as_str())?
        );
        let token: SessionToken = self.send(self.inner.client.post(url)).await?;
        Ok(BearerToken::new(token.jwt))
    }

    /// End the session at the provider.
    ///
    /// # Errors
    ///
    /// Returns an API/HTTP error.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn revoke_session(&self, session_id: &SessionId) -> Result<(), IdentityError> {
        let url = format!(
            "{}/sessions/{}/revoke",
            self.inner.api_url,
            segment(session_id.as_str())?
        );
        let _: serde_json::Value = self.send(self.inner.client.post(url)).await?;
        Ok(())
    }

    /// Send an authenticated request and decode a JSON success body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, IdentityError> {
        let response = request
            .bearer_auth(self.inner.secret_key.expose_secret())
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let errors: ProviderErrors = serde_json::from_slice(&body).unwrap_or_default();
            let message = errors
                .first_message()
                .map_or_else(|| default_message(status), String::from);
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

/// Token source bound to one provider session.
///
/// Owns everything it needs, so a submission holding it can outlive the
/// request that started it.
#[derive(Clone)]
pub struct SessionTokens {
    client: IdentityClient,
    session_id: SessionId,
}

impl SessionTokens {
    #[must_use]
    pub const fn new(client: IdentityClient, session_id: SessionId) -> Self {
        Self { client, session_id }
    }
}

impl TokenSource for SessionTokens {
    fn get_token(&self) -> impl Future<Output = Result<BearerToken, TokenError>> + Send {
        async move {
            self.client
                .session_token(&self.session_id)
                .await
                .map_err(|e| match e {
                    IdentityError::InactiveSession(_) => TokenError::NoSession,
                    IdentityError::Api { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
                        TokenError::NoSession
                    }
                    other => TokenError::Provider(other.to_string()),
                })
        }
    }
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("unexpected status")
        .to_string()
}

/// Provider identifiers are opaque but never contain URL syntax.
fn segment(id: &str) -> Result<&str, IdentityError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(id)
    } else {
        Err(IdentityError::InvalidId(id.to_string()))
    }
}

fn with_redirect(page: &str, redirect_url: &str) -> Result<String, IdentityError> {
    let mut url = Url::parse(page)?;
    url.query_pairs_mut()
        .append_pair("redirect_url", redirect_url);
    Ok(url.into())
}
