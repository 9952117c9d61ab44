//! Calendar month names as used by payment entries.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month, serialized by its full English name (e.g. `"January"`),
/// which is the form the payment entries carry in the interchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

serde_plain::derive_display_from_serialize!(Month);
serde_plain::derive_fromstr_from_deserialize!(Month);

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

impl Month {
    /// Returns the month for a one-based calendar index (1 = January).
    pub fn from_index(index: u32) -> Option<Month> {
        MONTHS.get(index.checked_sub(1)? as usize).copied()
    }

    /// The one-based calendar index of this month (January = 1).
    pub fn index(self) -> u32 {
        MONTHS.iter().position(|m| *m == self).unwrap_or(0) as u32 + 1
    }

    /// The month of the given date.
    pub fn from_date(date: NaiveDate) -> Month {
        // `NaiveDate::month()` is always in 1..=12
        Month::from_index(date.month()).unwrap_or(Month::January)
    }
}
