//! Application state shared across handlers.

use std::sync::Arc;

use skymates_core::SessionId;

use crate::config::SkymatesConfig;
use crate::identity::{IdentityClient, SessionTokens};
use crate::store::PassengerStoreClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration and the two upstream API clients. It holds no per-viewer
/// data: page sessions live in the session store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SkymatesConfig,
    store: PassengerStoreClient,
    identity: IdentityClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Both upstream clients share one connection pool.
    #[must_use]
    pub fn new(config: SkymatesConfig) -> Self {
        let http = reqwest::Client::new();
        let store = PassengerStoreClient::with_client(http.clone(), &config.store_url);
        let identity = IdentityClient::with_client(http, &config.identity);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                identity,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SkymatesConfig {
        &self.inner.config
    }

    /// Get a reference to the passenger store client.
    #[must_use]
    pub fn store(&self) -> &PassengerStoreClient {
        &self.inner.store
    }

    /// Get a reference to the identity provider client.
    #[must_use]
    pub fn identity(&self) -> &IdentityClient {
        &self.inner.identity
    }

    /// Token source for one provider session.
    #[must_use]
    pub fn tokens_for(&self, session_id: SessionId) -> SessionTokens {
        SessionTokens::new(self.inner.identity.clone(), session_id)
    }
}
