use crate::model::{Amount, Month};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The age categories a player can belong to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum Category {
    U7,
    U9,
    U11,
    U13,
    U15,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

/// One monthly dues entry in a player's payment history.
///
/// The payments list is kept in insertion order, which is also chronological
/// order: entries are appended as months are opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub month: Month,
    pub year: i32,
    pub paid: bool,
    pub amount: Amount,
    /// The day the entry was marked paid. Absent while the entry is unpaid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl Payment {
    /// Creates an unpaid entry for the given month.
    pub fn unpaid(month: Month, year: i32, amount: Amount) -> Self {
        Self {
            month,
            year,
            paid: false,
            amount,
            date: None,
        }
    }
}

/// A roster entry: identity, attributes and the embedded payment history.
///
/// Serialized field names follow the historical JSON interchange format
/// (camelCase), so data files exported by earlier versions import cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Unique, stable identity. Assigned as `max existing id + 1`.
    pub id: u32,
    pub name: String,
    pub position: String,
    pub jersey_number: u32,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl Player {
    /// The most recent payment entry. Payment-status filtering and the CSV
    /// summary are keyed on this entry alone, not on "any unpaid month".
    pub fn last_payment(&self) -> Option<&Payment> {
        self.payments.last()
    }

    /// True if the player already has an entry for the given month.
    pub fn has_payment_for(&self, month: Month, year: i32) -> bool {
        self.payments
            .iter()
            .any(|p| p.month == month && p.year == year)
    }
}

/// The caller-supplied fields of a new player; the id and the seeded payment
/// history are assigned by the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDraft {
    pub name: String,
    pub position: String,
    pub jersey_number: u32,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A partial update applied to a player with shallow-merge semantics: fields
/// left as `None` keep their current value. Neither the category nor jersey
/// uniqueness is validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub position: Option<String>,
    pub jersey_number: Option<u32>,
    pub category: Option<Category>,
    pub date_of_birth: Option<NaiveDate>,
    pub image_url: Option<String>,
}

impl PlayerUpdate {
    /// Applies the populated fields to `player`.
    pub fn apply(&self, player: &mut Player) {
        if let Some(name) = &self.name {
            player.name = name.clone();
        }
        if let Some(position) = &self.position {
            player.position = position.clone();
        }
        if let Some(jersey_number) = self.jersey_number {
            player.jersey_number = jersey_number;
        }
        if let Some(category) = self.category {
            player.category = category;
        }
        if let Some(date_of_birth) = self.date_of_birth {
            player.date_of_birth = Some(date_of_birth);
        }
        if let Some(image_url) = &self.image_url {
            player.image_url = Some(image_url.clone());
        }
    }
}
