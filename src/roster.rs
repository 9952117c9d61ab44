//! The application state container.
//!
//! `Roster` holds the in-memory copy of the players and attendance lists and
//! re-persists after every mutation through an injected [`RecordStore`]. A
//! persistence failure is logged and treated as a no-op so the application
//! always remains usable against its last good in-memory state; writes never
//! block reads.

use crate::model::{
    Amount, AttendanceRecord, Category, Month, Payment, Player, PlayerDraft, PlayerUpdate,
};
use crate::store::{RecordStore, Storage};
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// The payment-status filter applied by [`Roster::search_players`].
///
/// The filter is evaluated against only the *last* payment entry in each
/// player's list, not "any unpaid month" and not "this month".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFilter {
    #[default]
    All,
    Paid,
    Unpaid,
}

serde_plain::derive_display_from_serialize!(PaymentFilter);
serde_plain::derive_fromstr_from_deserialize!(PaymentFilter);

/// Filters applied by [`Roster::search_players`] in addition to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchFilters {
    /// `None` means all categories.
    pub category: Option<Category>,
    pub payment_status: PaymentFilter,
}

/// Owns the in-memory player and attendance lists and the injected store.
///
/// There is exactly one writer (the running process); two concurrent
/// processes sharing a store can silently overwrite each other's writes
/// (last-write-wins, no detection).
pub struct Roster<S: Storage> {
    store: RecordStore<S>,
    players: Vec<Player>,
    attendance: Vec<AttendanceRecord>,
}

impl<S: Storage> Roster<S> {
    /// Loads the roster from the store. A read failure is logged and yields
    /// an empty roster rather than an error.
    pub fn load(store: RecordStore<S>) -> Self {
        let players = match store.load_players() {
            Ok(players) => players.unwrap_or_default(),
            Err(e) => {
                error!("Unable to load players, starting empty: {e:#}");
                Vec::new()
            }
        };
        let attendance = match store.load_attendance() {
            Ok(records) => records,
            Err(e) => {
                error!("Unable to load attendance, starting empty: {e:#}");
                Vec::new()
            }
        };
        Self {
            store,
            players,
            attendance,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.store.last_sync()
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RecordStore<S> {
        &mut self.store
    }

    /// Adds a player: assigns the next id (`max + 1`, or 1 when the roster
    /// is empty) and seeds a single unpaid payment entry for the current
    /// calendar month at `monthly_dues`. Returns the assigned id.
    pub fn add_player(&mut self, draft: PlayerDraft, monthly_dues: Amount) -> u32 {
        self.add_player_on(draft, monthly_dues, Local::now().date_naive())
    }

    /// `add_player` with an explicit "today", so the seeded month is
    /// deterministic under test.
    pub fn add_player_on(
        &mut self,
        draft: PlayerDraft,
        monthly_dues: Amount,
        today: NaiveDate,
    ) -> u32 {
        let id = self.players.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let seeded = Payment::unpaid(Month::from_date(today), today.year(), monthly_dues);
        self.players.push(Player {
            id,
            name: draft.name,
            position: draft.position,
            jersey_number: draft.jersey_number,
            category: draft.category,
            date_of_birth: draft.date_of_birth,
            image_url: draft.image_url,
            payments: vec![seeded],
        });
        self.persist();
        id
    }

    /// Shallow-merges the populated update fields into the player. An
    /// unknown id is a silent no-op; returns whether a player was updated.
    pub fn update_player(&mut self, id: u32, update: &PlayerUpdate) -> bool {
        match self.players.iter_mut().find(|p| p.id == id) {
            Some(player) => {
                update.apply(player);
                self.persist();
                true
            }
            None => {
                debug!("update_player: no player with id {id}");
                false
            }
        }
    }

    /// Removes the player by id and returns it. Attendance records for the
    /// player are intentionally left in place.
    pub fn delete_player(&mut self, id: u32) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        let removed = self.players.remove(index);
        self.persist();
        Some(removed)
    }

    /// Marks the payment at `payment_index` in the player's list as paid,
    /// stamping today's date. Idempotent: an entry that is already paid is
    /// left untouched, so a second call never moves the date. An unknown
    /// player or an out-of-range index is a silent no-op; returns whether a
    /// payment was (or already had been) marked.
    pub fn record_payment(&mut self, player_id: u32, payment_index: usize) -> bool {
        self.record_payment_on(player_id, payment_index, Local::now().date_naive())
    }

    /// `record_payment` with an explicit "today".
    pub fn record_payment_on(
        &mut self,
        player_id: u32,
        payment_index: usize,
        today: NaiveDate,
    ) -> bool {
        let Some(player) = self.players.iter_mut().find(|p| p.id == player_id) else {
            debug!("record_payment: no player with id {player_id}");
            return false;
        };
        let Some(payment) = player.payments.get_mut(payment_index) else {
            debug!("record_payment: player {player_id} has no payment at index {payment_index}");
            return false;
        };
        if payment.paid {
            return true;
        }
        payment.paid = true;
        payment.date = Some(today);
        self.persist();
        true
    }

    /// Marks the payment entry for `(month, year)` as paid. This is the
    /// keyed alternative to the positional [`Roster::record_payment`];
    /// returns `false` when the player has no entry for that month.
    pub fn record_payment_for_month(&mut self, player_id: u32, month: Month, year: i32) -> bool {
        let Some(player) = self.player(player_id) else {
            debug!("record_payment_for_month: no player with id {player_id}");
            return false;
        };
        let Some(index) = player
            .payments
            .iter()
            .position(|p| p.month == month && p.year == year)
        else {
            debug!("record_payment_for_month: player {player_id} has no entry for {month} {year}");
            return false;
        };
        self.record_payment(player_id, index)
    }

    /// Appends an unpaid entry for `(month, year)` to every player that does
    /// not already have one, preserving chronological insertion order.
    /// Returns the number of entries added.
    pub fn open_month(&mut self, month: Month, year: i32, amount: Amount) -> usize {
        let mut added = 0;
        for player in &mut self.players {
            if !player.has_payment_for(month, year) {
                player.payments.push(Payment::unpaid(month, year, amount));
                added += 1;
            }
        }
        if added > 0 {
            self.persist();
        }
        added
    }

    /// Upserts an attendance record by its `(player_id, date)` key, in
    /// memory and in the store.
    pub fn record_attendance(&mut self, record: AttendanceRecord) {
        match self
            .attendance
            .iter_mut()
            .find(|r| r.key() == record.key())
        {
            Some(existing) => *existing = record.clone(),
            None => self.attendance.push(record.clone()),
        }
        if let Err(e) = self.store.save_attendance_record(record) {
            error!("Unable to persist the attendance record: {e:#}");
        }
    }

    /// Case-insensitive substring search over name, position and the jersey
    /// number rendered as a string, combined with the category and
    /// payment-status filters. An empty query with all-pass filters returns
    /// the full list in its original order.
    pub fn search_players(&self, query: &str, filters: &SearchFilters) -> Vec<&Player> {
        let needle = query.trim().to_lowercase();
        self.players
            .iter()
            .filter(|player| {
                matches_query(player, &needle)
                    && filters.category.map_or(true, |c| player.category == c)
                    && matches_payment_status(player, filters.payment_status)
            })
            .collect()
    }

    /// Re-reads players and attendance from the store, dropping any
    /// in-memory state. This is the local "sync" operation; it is a no-op
    /// unless the store changed underneath us. A read failure is logged and
    /// leaves the last good in-memory state in place.
    pub fn reload(&mut self) {
        match self.store.load_players() {
            Ok(players) => self.players = players.unwrap_or_default(),
            Err(e) => error!("Reload failed while reading players: {e:#}"),
        }
        match self.store.load_attendance() {
            Ok(records) => self.attendance = records,
            Err(e) => error!("Reload failed while reading attendance: {e:#}"),
        }
    }

    /// Re-persists the player list, logging (not raising) on failure.
    fn persist(&mut self) {
        if let Err(e) = self.store.save_players(&self.players) {
            error!("Unable to persist the player list: {e:#}");
        }
    }
}

fn matches_query(player: &Player, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    player.name.to_lowercase().contains(needle)
        || player.position.to_lowercase().contains(needle)
        || player.jersey_number.to_string().contains(needle)
}

fn matches_payment_status(player: &Player, filter: PaymentFilter) -> bool {
    let last_paid = player.last_payment().map(|p| p.paid).unwrap_or(false);
    match filter {
        PaymentFilter::All => true,
        PaymentFilter::Paid => last_paid,
        PaymentFilter::Unpaid => !last_paid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemStore, ATTENDANCE_KEY, PLAYERS_KEY};

    fn dues() -> Amount {
        Amount::from_euros(25)
    }

    fn empty_roster() -> Roster<MemStore> {
        Roster::load(RecordStore::new(MemStore::new()))
    }

    fn draft(name: &str, position: &str, jersey_number: u32, category: Category) -> PlayerDraft {
        PlayerDraft {
            name: name.to_string(),
            position: position.to_string(),
            jersey_number,
            category,
            date_of_birth: None,
            image_url: None,
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_first_player_gets_id_one() {
        let mut roster = empty_roster();
        let id = roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), date(2024, 3, 15));
        assert_eq!(id, 1);
    }

    #[test]
    fn test_assigned_id_is_max_plus_one() {
        let mut roster = empty_roster();
        let today = date(2024, 3, 15);
        roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), today);
        roster.add_player_on(draft("B", "Defender", 4, Category::U9), dues(), today);
        // Delete the first player: ids never shift or get reused downward
        roster.delete_player(1);
        let id = roster.add_player_on(draft("C", "Forward", 9, Category::U11), dues(), today);
        assert_eq!(id, 3);
    }

    #[test]
    fn test_add_seeds_one_unpaid_entry_for_the_current_month() {
        let mut roster = empty_roster();
        let id = roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), date(2024, 3, 15));
        let player = roster.player(id).unwrap();
        assert_eq!(player.payments.len(), 1);
        let payment = &player.payments[0];
        assert_eq!(payment.month, Month::March);
        assert_eq!(payment.year, 2024);
        assert!(!payment.paid);
        assert_eq!(payment.amount, dues());
        assert_eq!(payment.date, None);
    }

    #[test]
    fn test_add_persists_immediately() {
        let mut roster = empty_roster();
        roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), date(2024, 3, 15));
        assert_eq!(roster.store().load_players().unwrap().unwrap().len(), 1);
        assert!(roster.last_sync().is_some());
    }

    #[test]
    fn test_update_unknown_player_is_a_no_op() {
        let mut roster = empty_roster();
        let update = PlayerUpdate {
            name: Some("X".to_string()),
            ..PlayerUpdate::default()
        };
        assert!(!roster.update_player(42, &update));
    }

    #[test]
    fn test_update_shallow_merges() {
        let mut roster = empty_roster();
        let id = roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), date(2024, 3, 15));
        let update = PlayerUpdate {
            jersey_number: Some(12),
            ..PlayerUpdate::default()
        };
        assert!(roster.update_player(id, &update));
        let player = roster.player(id).unwrap();
        assert_eq!(player.jersey_number, 12);
        assert_eq!(player.name, "A");
    }

    #[test]
    fn test_delete_does_not_cascade_to_attendance() {
        let mut roster = empty_roster();
        let today = date(2024, 3, 15);
        let id = roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), today);
        roster.record_attendance(AttendanceRecord {
            player_id: id,
            date: today,
            present: true,
            note: None,
        });
        let removed = roster.delete_player(id).unwrap();
        assert_eq!(removed.name, "A");
        // The attendance row survives as an acknowledged orphan
        assert_eq!(roster.attendance().len(), 1);
        assert_eq!(roster.store().load_attendance().unwrap().len(), 1);
    }

    #[test]
    fn test_record_payment_is_idempotent() {
        let mut roster = empty_roster();
        let id = roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), date(2024, 3, 15));

        assert!(roster.record_payment_on(id, 0, date(2024, 3, 20)));
        let first = roster.player(id).unwrap().payments[0].clone();
        assert!(first.paid);
        assert_eq!(first.date, Some(date(2024, 3, 20)));

        // A later second call must not move the date
        assert!(roster.record_payment_on(id, 0, date(2024, 4, 2)));
        let second = roster.player(id).unwrap().payments[0].clone();
        assert_eq!(second, first);
    }

    #[test]
    fn test_record_payment_out_of_range_is_a_no_op() {
        let mut roster = empty_roster();
        let id = roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), date(2024, 3, 15));
        assert!(!roster.record_payment_on(id, 5, date(2024, 3, 20)));
        assert!(!roster.record_payment_on(99, 0, date(2024, 3, 20)));
        assert!(!roster.player(id).unwrap().payments[0].paid);
    }

    #[test]
    fn test_record_payment_for_month() {
        let mut roster = empty_roster();
        let id = roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), date(2024, 3, 15));
        roster.open_month(Month::April, 2024, dues());

        assert!(roster.record_payment_for_month(id, Month::April, 2024));
        let player = roster.player(id).unwrap();
        assert!(player.payments[1].paid);
        assert!(!player.payments[0].paid);
        assert!(!roster.record_payment_for_month(id, Month::December, 2024));
    }

    #[test]
    fn test_open_month_skips_existing_entries() {
        let mut roster = empty_roster();
        let today = date(2024, 3, 15);
        roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), today);
        roster.add_player_on(draft("B", "Defender", 4, Category::U9), dues(), today);

        // Both already have March seeded at add time
        assert_eq!(roster.open_month(Month::March, 2024, dues()), 0);
        assert_eq!(roster.open_month(Month::April, 2024, dues()), 2);
        assert_eq!(roster.open_month(Month::April, 2024, dues()), 0);
        for player in roster.players() {
            assert_eq!(player.payments.len(), 2);
            assert_eq!(player.payments[1].month, Month::April);
        }
    }

    #[test]
    fn test_search_empty_query_returns_all_in_order() {
        let mut roster = empty_roster();
        let today = date(2024, 3, 15);
        roster.add_player_on(draft("Burim Hoxha", "Midfielder", 8, Category::U11), dues(), today);
        roster.add_player_on(draft("Valon Gashi", "Forward", 10, Category::U13), dues(), today);
        roster.add_player_on(draft("Adnan Haliti", "Goalkeeper", 12, Category::U11), dues(), today);

        let all = roster.search_players("", &SearchFilters::default());
        let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Burim Hoxha", "Valon Gashi", "Adnan Haliti"]);
    }

    #[test]
    fn test_search_matches_name_position_and_jersey() {
        let mut roster = empty_roster();
        let today = date(2024, 3, 15);
        roster.add_player_on(draft("Burim Hoxha", "Midfielder", 8, Category::U11), dues(), today);
        roster.add_player_on(draft("Valon Gashi", "Forward", 10, Category::U13), dues(), today);

        let by_name = roster.search_players("hoxha", &SearchFilters::default());
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Burim Hoxha");

        let by_position = roster.search_players("FORWARD", &SearchFilters::default());
        assert_eq!(by_position.len(), 1);
        assert_eq!(by_position[0].name, "Valon Gashi");

        let by_jersey = roster.search_players("10", &SearchFilters::default());
        assert_eq!(by_jersey.len(), 1);
        assert_eq!(by_jersey[0].name, "Valon Gashi");
    }

    #[test]
    fn test_search_category_filter() {
        let mut roster = empty_roster();
        let today = date(2024, 3, 15);
        roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), today);
        roster.add_player_on(draft("B", "Defender", 4, Category::U9), dues(), today);

        let filters = SearchFilters {
            category: Some(Category::U9),
            payment_status: PaymentFilter::All,
        };
        let found = roster.search_players("", &filters);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "B");
    }

    #[test]
    fn test_unpaid_filter_is_keyed_on_the_last_entry_only() {
        let mut roster = empty_roster();
        let today = date(2024, 3, 15);
        // Player 1: March unpaid, April paid — an earlier unpaid entry with
        // a later paid one must be excluded from the unpaid view.
        let first = roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), today);
        // Player 2: March paid, April unpaid.
        let second = roster.add_player_on(draft("B", "Defender", 4, Category::U7), dues(), today);
        roster.open_month(Month::April, 2024, dues());
        roster.record_payment_for_month(first, Month::April, 2024);
        roster.record_payment_for_month(second, Month::March, 2024);

        let unpaid = roster.search_players(
            "",
            &SearchFilters {
                category: None,
                payment_status: PaymentFilter::Unpaid,
            },
        );
        let names: Vec<&str> = unpaid.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B"]);

        let paid = roster.search_players(
            "",
            &SearchFilters {
                category: None,
                payment_status: PaymentFilter::Paid,
            },
        );
        let names: Vec<&str> = paid.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn test_attendance_upsert_in_memory_and_store() {
        let mut roster = empty_roster();
        let id = roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), date(2024, 3, 15));
        let day = date(2024, 3, 1);
        roster.record_attendance(AttendanceRecord {
            player_id: id,
            date: day,
            present: true,
            note: None,
        });
        roster.record_attendance(AttendanceRecord {
            player_id: id,
            date: day,
            present: false,
            note: None,
        });
        assert_eq!(roster.attendance().len(), 1);
        assert!(!roster.attendance()[0].present);
        let stored = roster.store().load_attendance().unwrap();
        assert_eq!(stored.len(), 1);
        assert!(!stored[0].present);
    }

    #[test]
    fn test_load_with_a_corrupt_store_starts_empty() {
        let mut storage = MemStore::new();
        storage.seed(PLAYERS_KEY, "{ not json");
        storage.seed(ATTENDANCE_KEY, "also not json");
        let mut roster = Roster::load(RecordStore::new(storage));
        assert!(roster.players().is_empty());
        assert!(roster.attendance().is_empty());

        // The store stays writable: the next mutation replaces the blob
        let id = roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), date(2024, 3, 15));
        assert_eq!(id, 1);
        assert_eq!(roster.store().load_players().unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_mutations_survive_a_failing_store() {
        // Write failures are logged no-ops: the in-memory state stays
        // usable and reads keep working.
        let mut roster = Roster::load(RecordStore::new(MemStore::read_only()));
        let id = roster.add_player_on(draft("A", "Goalkeeper", 1, Category::U7), dues(), date(2024, 3, 15));
        assert_eq!(roster.players().len(), 1);
        assert!(roster.record_payment_on(id, 0, date(2024, 3, 20)));
        assert!(roster.player(id).unwrap().payments[0].paid);
    }

    #[test]
    fn test_reload_rereads_the_store() {
        let mut store = RecordStore::new(MemStore::new());
        store
            .save_players(&[Player {
                id: 7,
                name: "Seeded".to_string(),
                position: "Forward".to_string(),
                jersey_number: 11,
                category: Category::U15,
                date_of_birth: None,
                image_url: None,
                payments: vec![Payment::unpaid(Month::March, 2024, dues())],
            }])
            .unwrap();
        let mut roster = Roster::load(store);
        assert_eq!(roster.players().len(), 1);

        // Replace the store contents underneath the roster
        roster.store_mut().save_players(&[]).unwrap();
        assert_eq!(roster.players().len(), 1);
        roster.reload();
        assert!(roster.players().is_empty());
    }
}
