use crate::commands::{load_roster, Out};
use crate::stats::{monthly_status, payment_stats, MonthlyStatus, PaymentStats};
use crate::{Config, Result};
use chrono::Local;
use serde::Serialize;

/// The combined output of the `stats` command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub payments: PaymentStats,
    pub monthly: Vec<MonthlyStatus>,
}

/// Show payment statistics and the recent monthly collection rates.
pub fn stats(config: &Config) -> Result<Out<StatsReport>> {
    let roster = load_roster(config)?;
    let payments = payment_stats(roster.players());
    let monthly = monthly_status(roster.players(), Local::now().date_naive());

    let mut lines = vec![
        format!("{} player(s)", payments.total_players),
        format!(
            "Collected {} across {} paid entr{}",
            payments.total_collected,
            payments.paid_count,
            if payments.paid_count == 1 { "y" } else { "ies" }
        ),
        format!(
            "Outstanding {} across {} overdue entr{}",
            payments.total_due,
            payments.overdue_count,
            if payments.overdue_count == 1 { "y" } else { "ies" }
        ),
        format!("Overall collection rate {}%", payments.paid_percentage),
    ];
    for status in &monthly {
        lines.push(format!(
            "{} {}: {} paid, {} unpaid ({}%)",
            status.month, status.year, status.paid_count, status.unpaid_count, status.percentage
        ));
    }

    Ok(Out::new(
        lines.join("\n"),
        StatsReport { payments, monthly },
    ))
}
