//! View composition: what the listing page shows for a given collection,
//! filter and viewer.
//!
//! Everything here is a pure function of its inputs and is recomputed on
//! every render.

use crate::filter::DateRangeFilter;
use crate::types::{PassengerRecord, PassengerType, SessionContext};

/// Character used to hide surnames from anonymous viewers.
pub const MASK_CHAR: char = '*';

/// Placeholder for blank record fields.
pub const NOT_AVAILABLE: &str = "N/A";

const EMPTY_CATEGORY: &str = "No passengers available in this category.";
const EMPTY_CATEGORY_FILTERED: &str =
    "No passengers available for the selected date range in this category.";

/// Name as shown to the given viewer.
///
/// Signed-in viewers see names unmodified. Anonymous viewers see the first
/// space-delimited word as is, followed by one [`MASK_CHAR`] per character of
/// everything after the first space; a single-word name is shown unmasked.
/// This is a courtesy, not a privacy guarantee: the character count leaks.
///
/// ```
/// use skymates_core::{SessionContext, display_name};
///
/// let anon = SessionContext::anonymous();
/// assert_eq!(display_name("John Smith Doe", &anon), "John *********");
/// assert_eq!(display_name("Cher", &anon), "Cher");
/// ```
#[must_use]
pub fn display_name(name: &str, context: &SessionContext) -> String {
    if context.is_signed_in() {
        return name.to_owned();
    }
    match name.split_once(' ') {
        Some((first, rest)) => {
            let mut masked = String::with_capacity(name.len());
            masked.push_str(first);
            masked.push(' ');
            masked.extend(std::iter::repeat_n(MASK_CHAR, rest.chars().count()));
            masked
        }
        None => name.to_owned(),
    }
}

/// Records of one category that pass the filter, in collection order.
pub fn in_category<'a>(
    records: &'a [PassengerRecord],
    kind: PassengerType,
    filter: &'a DateRangeFilter,
) -> impl Iterator<Item = &'a PassengerRecord> + 'a {
    records
        .iter()
        .filter(move |record| record.kind == kind)
        .filter(move |record| filter.matches(record))
}

/// One listing card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassengerCard {
    pub id: Option<String>,
    pub display_name: String,
    /// Shown after the name; zero and missing ages are not shown.
    pub age: Option<i64>,
    pub date: String,
    pub from_city: String,
    pub to_city: String,
    pub airlines: String,
}

impl PassengerCard {
    fn new(record: &PassengerRecord, context: &SessionContext) -> Self {
        Self {
            id: record.id.as_ref().map(ToString::to_string),
            display_name: display_name(or_not_available(&record.name), context),
            age: record.age.filter(|age| *age != 0),
            date: or_not_available(&record.date).to_owned(),
            from_city: or_not_available(&record.from_city).to_owned(),
            to_city: or_not_available(&record.to_city).to_owned(),
            airlines: or_not_available(&record.airlines).to_owned(),
        }
    }
}

/// One category list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub kind: PassengerType,
    pub heading: &'static str,
    pub cards: Vec<PassengerCard>,
    /// Shown instead of the cards when there are none.
    pub empty_message: &'static str,
}

impl CategoryView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Anchor / element id for the list.
    #[must_use]
    pub const fn anchor(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Everything the listing page derives from the page session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// `beFriend` first, then `needFriend`.
    pub categories: Vec<CategoryView>,
    /// Form shown when true, sign-in prompt otherwise.
    pub can_submit: bool,
    /// Banner text while a filter is active.
    pub filter_summary: Option<String>,
}

/// Derive the page from the collection, the filter and the viewer.
#[must_use]
pub fn compose(
    records: &[PassengerRecord],
    filter: &DateRangeFilter,
    context: &SessionContext,
) -> BoardView {
    let empty_message = if filter.is_active() {
        EMPTY_CATEGORY_FILTERED
    } else {
        EMPTY_CATEGORY
    };

    let categories = PassengerType::LISTED
        .into_iter()
        .map(|kind| CategoryView {
            kind,
            heading: kind.heading(),
            cards: in_category(records, kind, filter)
                .map(|record| PassengerCard::new(record, context))
                .collect(),
            empty_message,
        })
        .collect();

    BoardView {
        categories,
        can_submit: context.is_signed_in(),
        filter_summary: filter.summary(),
    }
}

fn or_not_available(value: &str) -> &str {
    if value.is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}
