//! Passenger store API client.
//!
//! # Endpoints
//!
//! - `GET {base}/passengers` - the full list, in store order
//! - `POST {base}/passengers` - create a listing (`Authorization: Bearer`)
//!
//! The store validates and authorizes; this client only moves JSON and
//! turns failures into [`StoreError`]. There is no caching and no retry: every
//! call goes to the store.

use std::future::Future;
use std::sync::Arc;

use serde::Deserialize;
use skymates_core::{BearerToken, NewPassenger, PassengerRecord, PassengerStore, StoreError};
use tracing::{debug, instrument};

/// Message used when the store rejects a list request.
const LIST_REJECTED: &str = "Network response was not ok";

/// Message used when the store rejects a create request without saying why.
const CREATE_REJECTED: &str = "Failed to add passenger";

/// Error body returned by the store on non-success statuses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    details: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn parse(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    fn into_message(self) -> Option<String> {
        self.details
            .or(self.error)
            .filter(|message| !message.trim().is_empty())
    }
}

/// Client for the passenger store.
#[derive(Clone)]
pub struct PassengerStoreClient {
    inner: Arc<PassengerStoreClientInner>,
}

struct PassengerStoreClientInner {
    client: reqwest::Client,
    passengers_url: String,
}

impl PassengerStoreClient {
    /// Create a client for the store at `base_url` (no trailing slash).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing connection pool.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            inner: Arc::new(PassengerStoreClientInner {
                client,
                passengers_url: format!("{}/passengers", base_url.trim_end_matches('/')),
            }),
        }
    }

    /// Fetch every listing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure, a non-success status, or
    /// a body that is not a JSON array of passenger records.
    #[instrument(skip(self))]
    pub async fn list_passengers(&self) -> Result<Vec<PassengerRecord>, StoreError> {
        let response = self
            .inner
            .client
            .get(&self.inner.passengers_url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %String::from_utf8_lossy(&body).chars().take(500).collect::<String>(),
                "Passenger store returned non-success status"
            );
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                details: LIST_REJECTED.to_string(),
            });
        }

        let passengers: Vec<PassengerRecord> =
            serde_json::from_slice(&body).map_err(|e| StoreError::Decode(e.to_string()))?;
        debug!(count = passengers.len(), "Fetched passengers");
        Ok(passengers)
    }

    /// Create a listing on behalf of the token's holder.
    ///
    /// A success response whose body is not a passenger record still counts
    /// as created; the returned record is then rebuilt from the request.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] carrying the store's `details` (or
    /// `error`) message on a non-success status, and
    /// [`StoreError::Transport`] if the request never got a response.
    #[instrument(skip(self, passenger, token), fields(kind = passenger.kind.as_str()))]
    pub async fn create_passenger(
        &self,
        passenger: &NewPassenger,
        token: &BearerToken,
    ) -> Result<PassengerRecord, StoreError> {
        let response = self
            .inner
            .client
            .post(&self.inner.passengers_url)
            .bearer_auth(token.expose())
            .json(passenger)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;

        if !status.is_success() {
            let details = ErrorBody::parse(&body)
                .into_message()
                .unwrap_or_else(|| CREATE_REJECTED.to_string());
            tracing::warn!(status = %status, details = %details, "Passenger store rejected create");
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                details,
            });
        }

        match serde_json::from_slice::<PassengerRecord>(&body) {
            Ok(record) => Ok(record),
            Err(e) => {
                debug!(error = %e, "Create response is not a passenger record");
                Ok(passenger.clone().into_record(None))
            }
        }
    }
}

impl PassengerStore for PassengerStoreClient {
    fn list(&self) -> impl Future<Output = Result<Vec<PassengerRecord>, StoreError>> + Send {
        self.list_passengers()
    }

    fn create(
        &self,
        passenger: &NewPassenger,
        token: &BearerToken,
    ) -> impl Future<Output = Result<PassengerRecord, StoreError>> + Send {
        self.create_passenger(passenger, token)
    }
}

fn transport(e: reqwest::Error) -> StoreError {
    StoreError::Transport(e.to_string())
}
