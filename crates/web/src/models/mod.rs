//! Types the site keeps in the session store.

pub mod session;

pub use session::{SignedInUser, keys as session_keys, load_page, save_page};
