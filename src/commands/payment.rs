use crate::args::{BillArgs, PayArgs};
use crate::commands::{load_roster, Out};
use crate::model::{Month, Player};
use crate::{Config, Result};
use anyhow::bail;
use chrono::{Datelike, Local};

/// Mark a player's dues entry as paid. The entry is selected by `--month`
/// (and optionally `--year`), by `--index`, or defaults to the player's most
/// recent entry.
pub fn pay(config: &Config, args: &PayArgs) -> Result<Out<Player>> {
    let mut roster = load_roster(config)?;
    let player_id = args.player_id();
    let Some(player) = roster.player(player_id) else {
        bail!("There is no player with id {player_id}");
    };

    let marked = match (args.month(), args.index()) {
        (Some(month), _) => {
            let year = args.year().unwrap_or_else(|| Local::now().year());
            if !roster.record_payment_for_month(player_id, month, year) {
                bail!("Player {player_id} has no dues entry for {month} {year}");
            }
            format!("{month} {year}")
        }
        (None, Some(index)) => {
            let Some(payment) = player.payments.get(index) else {
                bail!("Player {player_id} has no dues entry at index {index}");
            };
            let label = format!("{} {}", payment.month, payment.year);
            roster.record_payment(player_id, index);
            label
        }
        (None, None) => {
            let Some(payment) = player.last_payment() else {
                bail!("Player {player_id} has no dues entries");
            };
            let label = format!("{} {}", payment.month, payment.year);
            let index = player.payments.len() - 1;
            roster.record_payment(player_id, index);
            label
        }
    };

    let Some(player) = roster.player(player_id).cloned() else {
        bail!("There is no player with id {player_id}");
    };
    Ok(Out::new(
        format!("Marked {marked} as paid for '{}'", player.name),
        player,
    ))
}

/// Open a dues month: append an unpaid entry to every player that does not
/// already have one for that month.
pub fn bill(config: &Config, args: &BillArgs) -> Result<Out<()>> {
    let mut roster = load_roster(config)?;
    let today = Local::now().date_naive();
    let month = args.month().unwrap_or_else(|| Month::from_date(today));
    let year = args.year().unwrap_or_else(|| today.year());
    let amount = args.amount().unwrap_or_else(|| config.monthly_dues());

    let added = roster.open_month(month, year, amount);
    Ok(Out::new_message(format!(
        "Opened {month} {year} at {amount}: added {added} dues entr{} across {} player(s)",
        if added == 1 { "y" } else { "ies" },
        roster.players().len()
    )))
}
