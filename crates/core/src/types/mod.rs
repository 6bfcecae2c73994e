//! Core types for Skymates.
//!
//! Type-safe wrappers for the records exchanged with the passenger store and
//! the identity provider.

pub mod email;
pub mod id;
pub mod identity;
pub mod passenger;
pub mod phone;

pub use email::{Email, EmailError};
pub use id::*;
pub use identity::{Identity, SessionContext};
pub use passenger::{NewPassenger, PassengerRecord, PassengerType, parse_calendar_date};
pub use phone::{is_complete_phone, mask_phone};
