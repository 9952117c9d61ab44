//! Types that represent the core data model, such as `Player` and
//! `AttendanceRecord`.
mod amount;
mod attendance;
mod month;
mod player;

pub use amount::{Amount, AmountError};
pub use attendance::AttendanceRecord;
pub use month::Month;
pub use player::{Category, Payment, Player, PlayerDraft, PlayerUpdate};
use serde::{Deserialize, Serialize};

/// The full persisted snapshot: everything the record store holds, in the
/// shape used for export and import.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamData {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    /// ISO-8601 timestamp of the last successful player save, or null.
    #[serde(default)]
    pub last_sync: Option<String>,
}
