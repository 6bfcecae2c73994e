//! Contact page route handler.

use askama::Template;
use askama_web::WebTemplate;
use skymates_core::info::{CONTACT_EMAIL, CONTACT_PHONE, CONTACT_PHONE_DIAL};

use crate::filters;
use crate::middleware::OptionalUser;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    /// Footer greeting; `None` when anonymous.
    pub viewer_name: Option<String>,
    pub contact_email: &'static str,
    pub contact_phone: &'static str,
    pub contact_phone_dial: &'static str,
}

/// Display the contact page.
pub async fn contact(viewer: OptionalUser) -> ContactTemplate {
    ContactTemplate {
        viewer_name: viewer
            .0
            .map(|user| user.identity.greeting_name().to_owned()),
        contact_email: CONTACT_EMAIL,
        contact_phone: CONTACT_PHONE,
        contact_phone_dial: CONTACT_PHONE_DIAL,
    }
}
