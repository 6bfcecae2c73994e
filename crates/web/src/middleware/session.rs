//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. Page sessions are
//! per-browser scratch state and are never persisted beyond the process.
//! `MemoryStore` does not sweep expired records, so a record is only created
//! once a browser has something worth keeping (see `save_page`).

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::SkymatesConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "skymates_session";

/// Session expiry time in seconds (1 day).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &SkymatesConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
