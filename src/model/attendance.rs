use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One presence entry for a `(player, date)` pair.
///
/// Records are unique per `(player_id, date)`; a later write for the same
/// pair overwrites the earlier one. Records are never cascaded when the
/// player is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub player_id: u32,
    pub date: NaiveDate,
    pub present: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AttendanceRecord {
    /// The composite key the record is unique by.
    pub fn key(&self) -> (u32, NaiveDate) {
        (self.player_id, self.date)
    }
}
