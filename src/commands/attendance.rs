use crate::args::AttendanceArgs;
use crate::commands::{load_roster, Out};
use crate::model::AttendanceRecord;
use crate::{Config, Result};
use anyhow::bail;
use chrono::Local;

/// Record a player's attendance for a training day. Recording the same
/// player and day again overwrites the earlier record.
pub fn attendance(config: &Config, args: &AttendanceArgs) -> Result<Out<AttendanceRecord>> {
    let mut roster = load_roster(config)?;
    let player_id = args.player_id();
    let Some(player) = roster.player(player_id) else {
        bail!("There is no player with id {player_id}");
    };
    let name = player.name.clone();

    let record = AttendanceRecord {
        player_id,
        date: args.date().unwrap_or_else(|| Local::now().date_naive()),
        present: !args.absent(),
        note: args.note().map(String::from),
    };
    let verdict = if record.present { "present" } else { "absent" };
    let message = format!("Marked '{name}' {verdict} on {}", record.date);
    roster.record_attendance(record.clone());
    Ok(Out::new(message, record))
}
