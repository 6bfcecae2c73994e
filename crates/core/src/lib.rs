//! Skymates core: the listing board's state and rules.
//!
//! This crate holds everything about the passenger board that does not need a
//! web server to express:
//! - the passenger record and the create request ([`types`])
//! - the form draft and its validation ([`draft`])
//! - the travel-date filter ([`filter`])
//! - the page session, with fetch/refresh and submission ([`sync`])
//! - what a given viewer sees, including surname masking ([`view`])
//! - overlay state and notices ([`ui`]), and static contact content ([`info`])
//!
//! # Architecture
//!
//! No HTTP clients live here. The remote passenger store and the identity
//! provider's token endpoint are traits ([`PassengerStore`], [`TokenSource`])
//! implemented by the web crate, so the page logic can be tested against
//! in-memory fakes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod draft;
pub mod filter;
pub mod info;
pub mod sync;
pub mod types;
pub mod ui;
pub mod view;

pub use draft::{AgeInput, DraftError, DraftField, FieldChange, FormDraft, InputEvent, PayloadError};
pub use filter::{DateRangeFilter, FilterError};
pub use sync::{
    BearerToken, LOAD_FAILED_NOTICE, PageSession, PassengerStore, SUBMITTED_NOTICE, StoreError,
    SubmitError, TokenError, TokenSource,
};
pub use types::*;
pub use ui::{Notice, NoticeLevel, SignInReason, UiMode};
pub use view::{BoardView, CategoryView, PassengerCard, compose, display_name};
