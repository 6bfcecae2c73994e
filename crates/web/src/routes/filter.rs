//! Travel date filter handlers.

use axum::{Form, response::Redirect};
use serde::Deserialize;
use skymates_core::DateRangeFilter;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::{load_page, save_page};

/// Date range form data. Blank bounds are open.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilterForm {
    pub start: String,
    pub end: String,
}

/// Set the travel date range.
///
/// A start after the end is accepted and simply matches nothing.
#[instrument(skip_all, fields(start = %form.start, end = %form.end))]
pub async fn apply(session: Session, Form(form): Form<FilterForm>) -> Result<Redirect> {
    let start = DateRangeFilter::parse_bound(&form.start)?;
    let end = DateRangeFilter::parse_bound(&form.end)?;

    let mut page = load_page(&session).await?;
    let filter = page.filter_mut();
    filter.set_start(start);
    filter.set_end(end);
    save_page(&session, &page).await?;

    Ok(Redirect::to("/#board"))
}

/// Clear the travel date range.
#[instrument(skip_all)]
pub async fn clear(session: Session) -> Result<Redirect> {
    let mut page = load_page(&session).await?;
    page.filter_mut().clear();
    save_page(&session, &page).await?;

    Ok(Redirect::to("/#board"))
}
