//! Static informational content: contact details and FAQ.

/// Public contact email.
pub const CONTACT_EMAIL: &str = "skymatesco@gmail.com";

/// Public contact phone, as displayed.
pub const CONTACT_PHONE: &str = "+1 714-485-9360";

/// Public contact phone, as dialed (`tel:` link).
pub const CONTACT_PHONE_DIAL: &str = "+17144859360";

/// A question and its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

/// Frequently asked questions, in display order.
pub const FAQ: [FaqEntry; 5] = [
    FaqEntry {
        question: "Who are the companions?",
        answer: "Our companions are trusted members of the Nepali community who are verified and share a commitment to helping elders travel comfortably.",
    },
    FaqEntry {
        question: "How does Skymates ensure safety?",
        answer: "We conduct verification checks and provide profiles for you to review. We also encourage post-trip feedback to maintain high standards.",
    },
    FaqEntry {
        question: "What if no companion is available for my travel dates?",
        answer: "We'll do our best to find a match. If we're unable to connect you with a companion, we'll provide a full refund of the service fee.",
    },
    FaqEntry {
        question: "Can I communicate with the companion before the trip?",
        answer: "Yes, once a match is made, you can contact the companion to discuss details and get acquainted.",
    },
    FaqEntry {
        question: "What's included in the service?",
        answer: "Our service includes matching you with a verified companion, assistance with check-in, navigation, and companionship during the flight. The $100 goes directly to your companion as appreciation for their time and support.",
    },
];
