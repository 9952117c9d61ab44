//! The record store: read/write/merge functions over the persisted blobs.
//!
//! Everything lives under three fixed keys in a key-value [`Storage`]
//! backend: the JSON-encoded player array, the JSON-encoded attendance
//! array, and an ISO-8601 last-sync timestamp. The [`RecordStore`] owns the
//! keys and the encoding; the backend only moves strings.

mod file;
mod memory;

use crate::model::{AttendanceRecord, Player, TeamData};
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, error};

pub use file::FileStore;
pub use memory::MemStore;

/// Key holding the JSON-encoded player array.
pub const PLAYERS_KEY: &str = "players";
/// Key holding the ISO-8601 timestamp of the last successful player save.
pub const LAST_SYNC_KEY: &str = "last-sync";
/// Key holding the JSON-encoded attendance array.
pub const ATTENDANCE_KEY: &str = "attendance";

/// A minimal key-value storage backend. Implemented by [`FileStore`] for
/// production and [`MemStore`] for tests and dry runs.
pub trait Storage {
    /// Returns the value for `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Writes `value` under `key`, replacing any existing value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// The lenient import shape: both collections are optional, and only the
/// ones present in the document are replaced.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportPayload {
    players: Option<Vec<Player>>,
    attendance: Option<Vec<AttendanceRecord>>,
}

/// Pure read/write functions over the persisted blob, generic over the
/// storage backend so tests can inject a double.
#[derive(Debug, Clone)]
pub struct RecordStore<S: Storage> {
    storage: S,
}

impl<S: Storage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Loads the player array, or `None` when it has never been saved.
    pub fn load_players(&self) -> Result<Option<Vec<Player>>> {
        match self.storage.get(PLAYERS_KEY)? {
            Some(json) => {
                let players = serde_json::from_str(&json)
                    .context("The persisted player array could not be parsed")?;
                Ok(Some(players))
            }
            None => Ok(None),
        }
    }

    /// Saves the player array and stamps the last-sync timestamp.
    pub fn save_players(&mut self, players: &[Player]) -> Result<()> {
        let json =
            serde_json::to_string(players).context("Unable to serialize the player array")?;
        self.storage.set(PLAYERS_KEY, &json)?;
        self.storage
            .set(LAST_SYNC_KEY, &Utc::now().to_rfc3339())?;
        Ok(())
    }

    /// The timestamp of the last successful player save. An unreadable or
    /// malformed stamp is treated as absent.
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        let raw = match self.storage.get(LAST_SYNC_KEY) {
            Ok(value) => value?,
            Err(e) => {
                debug!("Unable to read the last-sync stamp: {e:#}");
                return None;
            }
        };
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                debug!("Ignoring malformed last-sync stamp '{raw}': {e}");
                None
            }
        }
    }

    /// Loads the attendance array; an absent key yields an empty list.
    pub fn load_attendance(&self) -> Result<Vec<AttendanceRecord>> {
        match self.storage.get(ATTENDANCE_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .context("The persisted attendance array could not be parsed"),
            None => Ok(Vec::new()),
        }
    }

    /// Replaces the attendance array wholesale.
    pub fn save_attendance(&mut self, records: &[AttendanceRecord]) -> Result<()> {
        let json =
            serde_json::to_string(records).context("Unable to serialize the attendance array")?;
        self.storage.set(ATTENDANCE_KEY, &json)
    }

    /// Upserts one attendance record by its `(player_id, date)` key: an
    /// existing record for the pair is overwritten, otherwise the record is
    /// appended.
    pub fn save_attendance_record(&mut self, record: AttendanceRecord) -> Result<()> {
        let mut records = self.load_attendance()?;
        match records.iter_mut().find(|r| r.key() == record.key()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.save_attendance(&records)
    }

    /// Builds the full snapshot in the export shape.
    pub fn snapshot(&self) -> Result<TeamData> {
        Ok(TeamData {
            players: self.load_players()?.unwrap_or_default(),
            attendance: self.load_attendance()?,
            last_sync: self.last_sync().map(|ts| ts.to_rfc3339()),
        })
    }

    /// Serializes the full snapshot as pretty-printed JSON.
    pub fn export_all(&self) -> Result<String> {
        let snapshot = self.snapshot()?;
        serde_json::to_string_pretty(&snapshot).context("Unable to serialize the data snapshot")
    }

    /// Imports a JSON document in the export shape, wholesale-replacing the
    /// players and attendance collections that are present in it. There is
    /// no merge and no schema validation beyond the JSON parse. Returns
    /// `false` on parse or write failure, with nothing partially applied on
    /// a parse failure.
    pub fn import_all(&mut self, json: &str) -> bool {
        let payload: ImportPayload = match serde_json::from_str(json) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Import failed, the document could not be parsed: {e}");
                return false;
            }
        };
        if let Some(players) = payload.players {
            if let Err(e) = self.save_players(&players) {
                error!("Import failed while writing players: {e:#}");
                return false;
            }
        }
        if let Some(attendance) = payload.attendance {
            if let Err(e) = self.save_attendance(&attendance) {
                error!("Import failed while writing attendance: {e:#}");
                return false;
            }
        }
        true
    }

    /// Removes all three keys.
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(PLAYERS_KEY)?;
        self.storage.remove(LAST_SYNC_KEY)?;
        self.storage.remove(ATTENDANCE_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Category, Month, Payment};
    use chrono::NaiveDate;

    fn store() -> RecordStore<MemStore> {
        RecordStore::new(MemStore::new())
    }

    fn player(id: u32, name: &str) -> Player {
        Player {
            id,
            name: name.to_string(),
            position: "Midfielder".to_string(),
            jersey_number: id,
            category: Category::U11,
            date_of_birth: None,
            image_url: None,
            payments: vec![Payment::unpaid(Month::March, 2024, Amount::from_euros(25))],
        }
    }

    #[test]
    fn test_load_players_absent_is_none() {
        let store = store();
        assert_eq!(store.load_players().unwrap(), None);
    }

    #[test]
    fn test_save_players_stamps_last_sync() {
        let mut store = store();
        assert!(store.last_sync().is_none());
        store.save_players(&[player(1, "One")]).unwrap();
        assert!(store.last_sync().is_some());
        let loaded = store.load_players().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "One");
    }

    #[test]
    fn test_load_attendance_absent_is_empty() {
        let store = store();
        assert!(store.load_attendance().unwrap().is_empty());
    }

    #[test]
    fn test_attendance_upsert_last_write_wins() {
        let mut store = store();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        store
            .save_attendance_record(AttendanceRecord {
                player_id: 3,
                date,
                present: true,
                note: None,
            })
            .unwrap();
        store
            .save_attendance_record(AttendanceRecord {
                player_id: 3,
                date,
                present: false,
                note: Some("injured".to_string()),
            })
            .unwrap();

        let records = store.load_attendance().unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].present);
        assert_eq!(records[0].note.as_deref(), Some("injured"));
    }

    #[test]
    fn test_attendance_upsert_distinct_keys_append() {
        let mut store = store();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        for player_id in [3, 4] {
            store
                .save_attendance_record(AttendanceRecord {
                    player_id,
                    date,
                    present: true,
                    note: None,
                })
                .unwrap();
        }
        assert_eq!(store.load_attendance().unwrap().len(), 2);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut store = store();
        store
            .save_players(&[player(1, "One"), player(2, "Two")])
            .unwrap();
        store
            .save_attendance_record(AttendanceRecord {
                player_id: 1,
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                present: true,
                note: None,
            })
            .unwrap();
        let exported = store.export_all().unwrap();

        let mut other = RecordStore::new(MemStore::new());
        assert!(other.import_all(&exported));
        assert_eq!(
            other.load_players().unwrap(),
            store.load_players().unwrap()
        );
        assert_eq!(
            other.load_attendance().unwrap(),
            store.load_attendance().unwrap()
        );
    }

    #[test]
    fn test_import_garbage_fails_without_side_effects() {
        let mut store = store();
        store.save_players(&[player(1, "One")]).unwrap();
        assert!(!store.import_all("{ not json"));
        // Existing data is untouched
        assert_eq!(store.load_players().unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_import_with_missing_sections_replaces_only_present_ones() {
        let mut store = store();
        store.save_players(&[player(1, "One")]).unwrap();
        store
            .save_attendance_record(AttendanceRecord {
                player_id: 1,
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                present: true,
                note: None,
            })
            .unwrap();

        // Only players present: attendance must survive
        assert!(store.import_all(r#"{ "players": [] }"#));
        assert!(store.load_players().unwrap().unwrap().is_empty());
        assert_eq!(store.load_attendance().unwrap().len(), 1);
    }

    #[test]
    fn test_export_shape_uses_interchange_names() {
        let mut store = store();
        store.save_players(&[player(1, "One")]).unwrap();
        let exported = store.export_all().unwrap();
        assert!(exported.contains("\"players\""));
        assert!(exported.contains("\"attendance\""));
        assert!(exported.contains("\"lastSync\""));
        assert!(exported.contains("\"jerseyNumber\""));
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut store = store();
        store.save_players(&[player(1, "One")]).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load_players().unwrap(), None);
        assert!(store.last_sync().is_none());
    }
}
