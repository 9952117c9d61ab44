//! The CSV roster summary: one row per player, with the payment status of
//! the last entry only. The full JSON snapshot lives in the record store;
//! this is the flattened view for spreadsheets.

use crate::model::Player;
use crate::Result;
use anyhow::Context;
use serde::Serialize;

/// One CSV row. The field order is the column order.
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    id: u32,
    name: &'a str,
    category: String,
    position: &'a str,
    jersey: u32,
    date_of_birth: String,
    last_payment_status: &'static str,
}

impl<'a> SummaryRow<'a> {
    fn new(player: &'a Player) -> Self {
        let last_payment_status = match player.last_payment() {
            Some(payment) if payment.paid => "paid",
            // No payment history at all reads as unpaid
            _ => "unpaid",
        };
        Self {
            id: player.id,
            name: &player.name,
            category: player.category.to_string(),
            position: &player.position,
            jersey: player.jersey_number,
            date_of_birth: player
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            last_payment_status,
        }
    }
}

/// Renders the player list as a CSV document with a header row. An empty
/// roster yields just the header.
pub fn players_to_csv(players: &[Player]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    // Serializing a row emits the header automatically, so with no rows the
    // header must be written by hand
    if players.is_empty() {
        writer
            .write_record([
                "id",
                "name",
                "category",
                "position",
                "jersey",
                "date_of_birth",
                "last_payment_status",
            ])
            .context("Unable to write the CSV header")?;
    }
    for player in players {
        writer
            .serialize(SummaryRow::new(player))
            .with_context(|| format!("Unable to write the CSV row for player {}", player.id))?;
    }
    let bytes = writer
        .into_inner()
        .context("Unable to flush the CSV writer")?;
    String::from_utf8(bytes).context("The CSV output was not valid UTF-8")
}
