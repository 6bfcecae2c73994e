//! The listing being composed in the submission form.
//!
//! Edits are purely local: a draft only leaves the page session when it is
//! turned into a [`NewPassenger`] at submission time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Email, NewPassenger, PassengerType, is_complete_phone, mask_phone};

/// A field of the submission form, named as in the form markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Type,
    Name,
    Age,
    Date,
    FromCity,
    ToCity,
    Phone,
    Airlines,
    Comments,
}

impl DraftField {
    /// Fields that must be filled in before a draft can be submitted, in
    /// form order.
    pub const REQUIRED: [Self; 8] = [
        Self::Type,
        Self::Name,
        Self::Age,
        Self::Date,
        Self::FromCity,
        Self::ToCity,
        Self::Phone,
        Self::Airlines,
    ];

    /// Look a field up by its form control name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "type" => Self::Type,
            "name" => Self::Name,
            "age" => Self::Age,
            "date" => Self::Date,
            "fromCity" => Self::FromCity,
            "toCity" => Self::ToCity,
            "phone" => Self::Phone,
            "airlines" => Self::Airlines,
            "comments" => Self::Comments,
            _ => return None,
        })
    }

    /// Form control name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Name => "name",
            Self::Age => "age",
            Self::Date => "date",
            Self::FromCity => "fromCity",
            Self::ToCity => "toCity",
            Self::Phone => "phone",
            Self::Airlines => "airlines",
            Self::Comments => "comments",
        }
    }

    /// Human-readable label (the form placeholder).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Type => "Listing type",
            Self::Name => "Full Name",
            Self::Age => "Age",
            Self::Date => "Date",
            Self::FromCity => "Departure City",
            Self::ToCity => "Arrival City",
            Self::Phone => "Phone",
            Self::Airlines => "Airlines",
            Self::Comments => "Comments",
        }
    }
}

/// Age as typed into the form.
///
/// `Empty` means "not entered yet" and is distinct from `Number(0)`.
/// Unparsable text is kept as `Invalid` so the form can show it back and the
/// submission can refuse it with a precise message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AgeInput {
    #[default]
    Empty,
    Number(i64),
    Invalid(String),
}

impl AgeInput {
    /// Normalize raw input: blank stays empty, anything else becomes a number
    /// if it parses as one.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Invalid(raw.to_owned()), Self::Number)
    }

    /// Value to put back into the form control.
    #[must_use]
    pub fn form_value(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(n) => n.to_string(),
            Self::Invalid(raw) => raw.clone(),
        }
    }
}

/// A change event from a plain form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub name: String,
    pub value: String,
}

/// The two shapes a field change arrives in.
///
/// Plain inputs report a whole [`InputEvent`]; the masked phone input reports
/// an explicit `(name, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Event(InputEvent),
    Pair { name: String, value: String },
}

impl FieldChange {
    fn into_parts(self) -> (String, String) {
        match self {
            Self::Event(InputEvent { name, value }) | Self::Pair { name, value } => (name, value),
        }
    }
}

/// Errors applying a field change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("unknown form field: {0}")]
    UnknownField(String),
}

/// Reasons a draft cannot be turned into a create request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("{} is required", .0.label())]
    MissingField(DraftField),

    #[error("Age must be a whole number of years (got \"{0}\")")]
    InvalidAge(String),

    #[error("Phone number must have 10 digits (got \"{0}\")")]
    IncompletePhone(String),
}

/// Draft of a new listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDraft {
    pub kind: Option<PassengerType>,
    pub name: String,
    pub age: AgeInput,
    pub date: String,
    pub from_city: String,
    pub to_city: String,
    pub phone: String,
    pub airlines: String,
    pub comments: String,
}

impl FormDraft {
    /// Apply one field change.
    ///
    /// Only type coercion happens here: `age` is normalized through
    /// [`AgeInput::parse`], `phone` through the phone mask, `type` through
    /// [`PassengerType::from_form`]. Everything else is stored as given.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownField`] and leaves the draft untouched if
    /// the change names a field the form does not have.
    pub fn update_field(&mut self, change: FieldChange) -> Result<DraftField, DraftError> {
        let (name, value) = change.into_parts();
        let field = DraftField::from_name(&name).ok_or(DraftError::UnknownField(name))?;
        self.set(field, &value);
        Ok(field)
    }

    /// Set a single field from raw input.
    pub fn set(&mut self, field: DraftField, raw: &str) {
        match field {
            DraftField::Type => self.kind = PassengerType::from_form(raw),
            DraftField::Name => raw.clone_into(&mut self.name),
            DraftField::Age => self.age = AgeInput::parse(raw),
            DraftField::Date => raw.clone_into(&mut self.date),
            DraftField::FromCity => raw.clone_into(&mut self.from_city),
            DraftField::ToCity => raw.clone_into(&mut self.to_city),
            DraftField::Phone => self.phone = mask_phone(raw),
            DraftField::Airlines => raw.clone_into(&mut self.airlines),
            DraftField::Comments => raw.clone_into(&mut self.comments),
        }
    }

    /// Back to the empty defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether every field is at its empty default.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Build the create request for this draft.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::MissingField`] for the first required field
    /// left blank, [`PayloadError::InvalidAge`] if the age is not a
    /// non-negative whole number, or [`PayloadError::IncompletePhone`] if the
    /// phone does not fill the mask.
    pub fn to_payload(&self, email: Email) -> Result<NewPassenger, PayloadError> {
        for field in DraftField::REQUIRED {
            if self.is_blank(field) {
                return Err(PayloadError::MissingField(field));
            }
        }

        let age = match &self.age {
            AgeInput::Number(n) if *n >= 0 => *n,
            AgeInput::Number(n) => return Err(PayloadError::InvalidAge(n.to_string())),
            AgeInput::Invalid(raw) => return Err(PayloadError::InvalidAge(raw.clone())),
            AgeInput::Empty => return Err(PayloadError::MissingField(DraftField::Age)),
        };
        let kind = self
            .kind
            .ok_or(PayloadError::MissingField(DraftField::Type))?;
        if !is_complete_phone(&self.phone) {
            return Err(PayloadError::IncompletePhone(self.phone.clone()));
        }

        Ok(NewPassenger {
            name: self.name.clone(),
            age,
            kind,
            date: self.date.clone(),
            from_city: self.from_city.clone(),
            to_city: self.to_city.clone(),
            phone: self.phone.clone(),
            email,
            airlines: self.airlines.clone(),
            comments: self.comments.clone(),
        })
    }

    fn is_blank(&self, field: DraftField) -> bool {
        match field {
            DraftField::Type => self.kind.is_none(),
            DraftField::Age => self.age == AgeInput::Empty,
            DraftField::Name => self.name.trim().is_empty(),
            DraftField::Date => self.date.trim().is_empty(),
            DraftField::FromCity => self.from_city.trim().is_empty(),
            DraftField::ToCity => self.to_city.trim().is_empty(),
            DraftField::Phone => self.phone.trim().is_empty(),
            DraftField::Airlines => self.airlines.trim().is_empty(),
            DraftField::Comments => self.comments.trim().is_empty(),
        }
    }
}
