//! Passenger listings as exchanged with the remote passenger store.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::email::Email;
use super::id::PassengerId;

/// Which side of a match a listing is on.
///
/// The wire values (`needFriend` / `beFriend`) are fixed by the passenger
/// store. Anything else deserializes to [`PassengerType::Unknown`] so a single
/// odd record cannot fail a whole list refresh; unknown records are kept in
/// the collection but never shown in either category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassengerType {
    /// An elder looking for a travel companion.
    #[serde(rename = "needFriend")]
    NeedFriend,
    /// A traveler willing to be a companion.
    #[serde(rename = "beFriend")]
    BeFriend,
    /// Any value the store returns that is not one of the above.
    #[serde(other)]
    Unknown,
}

impl PassengerType {
    /// Categories in page order.
    pub const LISTED: [Self; 2] = [Self::BeFriend, Self::NeedFriend];

    /// Categories in the order the submission form offers them.
    pub const CHOICES: [Self; 2] = [Self::NeedFriend, Self::BeFriend];

    /// Wire / form value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NeedFriend => "needFriend",
            Self::BeFriend => "beFriend",
            Self::Unknown => "",
        }
    }

    /// Parse a form value. Empty or unrecognized input yields `None`.
    #[must_use]
    pub fn from_form(value: &str) -> Option<Self> {
        match value {
            "needFriend" => Some(Self::NeedFriend),
            "beFriend" => Some(Self::BeFriend),
            _ => None,
        }
    }

    /// Heading of the category list.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::BeFriend => "Ready to Be a Travel Mate",
            Self::NeedFriend => "Looking for a Travel Mate",
            Self::Unknown => "Other",
        }
    }

    /// Label of the radio button in the submission form.
    #[must_use]
    pub const fn choice_label(self) -> &'static str {
        match self {
            Self::NeedFriend => "Looking for a friend",
            Self::BeFriend => "Willing to be a friend",
            Self::Unknown => "",
        }
    }
}

/// A single listing returned by the passenger store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerRecord {
    /// Assigned by the store; absent before creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PassengerId>,
    #[serde(rename = "type")]
    pub kind: PassengerType,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    /// `None` when the store holds no usable age (e.g. a `null` written by an
    /// older client).
    #[serde(default)]
    pub age: Option<i64>,
    /// ISO 8601 travel date as sent by the store.
    #[serde(default, deserialize_with = "nullable_string")]
    pub date: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub from_city: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub to_city: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub airlines: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl PassengerRecord {
    /// The travel date as a calendar date.
    ///
    /// Only the leading `YYYY-MM-DD` is read, so both plain dates and full
    /// RFC 3339 timestamps are accepted; the time and offset are ignored.
    #[must_use]
    pub fn travel_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }
}

/// Parse the leading `YYYY-MM-DD` of an ISO 8601 string.
#[must_use]
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let day = value.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Body of a create request.
///
/// Built from a completed draft at submission time; `email` comes from the
/// signed-in identity, never from user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPassenger {
    pub name: String,
    pub age: i64,
    #[serde(rename = "type")]
    pub kind: PassengerType,
    pub date: String,
    pub from_city: String,
    pub to_city: String,
    pub phone: String,
    pub email: Email,
    pub airlines: String,
    pub comments: String,
}

impl NewPassenger {
    /// The record this request describes, as the store would list it.
    #[must_use]
    pub fn into_record(self, id: Option<PassengerId>) -> PassengerRecord {
        PassengerRecord {
            id,
            kind: self.kind,
            name: self.name,
            age: Some(self.age),
            date: self.date,
            from_city: self.from_city,
            to_city: self.to_city,
            phone: self.phone,
            airlines: self.airlines,
            comments: Some(self.comments),
            email: Some(self.email.into()),
        }
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_store_record() {
        let json = r#"{
            "id": "66a1f0",
            "type": "beFriend",
            "name": "Ram Bahadur",
            "age": 34,
            "date": "2024-07-14",
            "fromCity": "Kathmandu",
            "toCity": "Los Angeles",
            "phone": "(714) 485-9360",
            "airlines": "Qatar",
            "comments": null,
            "email": "ram@example.com"
        }"#;

        let record: PassengerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, Some(PassengerId::new("66a1f0")));
        assert_eq!(record.kind, PassengerType::BeFriend);
        assert_eq!(record.from_city, "Kathmandu");
        assert_eq!(record.comments, None);
        assert_eq!(
            record.travel_date(),
            NaiveDate::from_ymd_opt(2024, 7, 14)
        );
    }

    #[test]
    fn test_unknown_type_and_nulls_do_not_fail() {
        let json = r#"{"type": "chaperone", "name": null, "age": null, "date": "soon"}"#;
        let record: PassengerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, PassengerType::Unknown);
        assert_eq!(record.name, "");
        assert_eq!(record.age, None);
        assert_eq!(record.travel_date(), None);
    }

    #[test]
    fn test_travel_date_ignores_time_component() {
        assert_eq!(
            parse_calendar_date("2024-12-31T23:30:00.000Z"),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
        assert_eq!(parse_calendar_date("2024-02-30"), None);
        assert_eq!(parse_calendar_date(""), None);
    }

    #[test]
    fn test_new_passenger_wire_shape() {
        let payload = NewPassenger {
            name: "Sita Sharma".to_string(),
            age: 72,
            kind: PassengerType::NeedFriend,
            date: "2024-09-01".to_string(),
            from_city: "Dallas".to_string(),
            to_city: "Kathmandu".to_string(),
            phone: "(214) 555-0101".to_string(),
            email: Email::parse("sita@example.com").unwrap(),
            airlines: "Emirates".to_string(),
            comments: String::new(),
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "needFriend");
        assert_eq!(value["age"], 72);
        assert_eq!(value["fromCity"], "Dallas");
        assert_eq!(value["toCity"], "Kathmandu");
        assert_eq!(value["email"], "sita@example.com");
        assert_eq!(value["comments"], "");
    }

    #[test]
    fn test_form_values() {
        assert_eq!(
            PassengerType::from_form("beFriend"),
            Some(PassengerType::BeFriend)
        );
        assert_eq!(PassengerType::from_form(""), None);
        assert_eq!(PassengerType::NeedFriend.as_str(), "needFriend");
    }
}
