//! Derived statistics over the roster. Everything here is a pure function of
//! the player list; nothing reads the store.

use crate::model::{Amount, Month, Player};
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

/// Aggregate payment figures across the whole roster, counting every payment
/// entry ever recorded (not just the current month).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    pub total_players: usize,
    /// Sum of the amounts of all paid entries.
    pub total_collected: Amount,
    /// Sum of the amounts of all unpaid entries.
    pub total_due: Amount,
    pub paid_count: usize,
    pub overdue_count: usize,
    /// `round(100 * paid / (paid + overdue))`, or 0 when there are no
    /// entries at all.
    pub paid_percentage: u32,
}

/// Per-month paid/unpaid tallies for one calendar month. Both counts are
/// keyed on the roster: a player with no entry for the month counts as
/// unpaid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStatus {
    pub month: Month,
    pub year: i32,
    /// Players whose entry for the month is paid.
    pub paid_count: usize,
    /// The rest of the roster, including players with no entry at all.
    pub unpaid_count: usize,
    /// `round(100 * paid / total players)`, or 0 for an empty roster.
    pub percentage: u32,
}

/// Computes the aggregate payment figures.
pub fn payment_stats(players: &[Player]) -> PaymentStats {
    let mut total_collected = Amount::default();
    let mut total_due = Amount::default();
    let mut paid_count = 0;
    let mut overdue_count = 0;
    for payment in players.iter().flat_map(|p| p.payments.iter()) {
        if payment.paid {
            total_collected += payment.amount;
            paid_count += 1;
        } else {
            total_due += payment.amount;
            overdue_count += 1;
        }
    }
    PaymentStats {
        total_players: players.len(),
        total_collected,
        total_due,
        paid_count,
        overdue_count,
        paid_percentage: percentage(paid_count, paid_count + overdue_count),
    }
}

/// Tallies the rolling five-month window ending at the month of `today`,
/// oldest month first.
pub fn monthly_status(players: &[Player], today: NaiveDate) -> Vec<MonthlyStatus> {
    // The first of the month keeps the subtraction free of day clamping
    let current = today.with_day(1).unwrap_or(today);
    (0..5)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .map(|date| month_status(players, Month::from_date(date), date.year()))
        .collect()
}

fn month_status(players: &[Player], month: Month, year: i32) -> MonthlyStatus {
    let paid_count = players
        .iter()
        .filter(|p| {
            p.payments
                .iter()
                .any(|e| e.month == month && e.year == year && e.paid)
        })
        .count();
    MonthlyStatus {
        month,
        year,
        paid_count,
        unpaid_count: players.len() - paid_count,
        percentage: percentage(paid_count, players.len()),
    }
}

fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}
