use crate::args::{AddArgs, ListArgs, RemoveArgs, UpdateArgs};
use crate::commands::{load_roster, Out};
use crate::model::{Player, PlayerDraft, PlayerUpdate};
use crate::roster::SearchFilters;
use crate::{Config, Result};
use anyhow::bail;

/// Add a player to the roster, seeding one unpaid dues entry for the
/// current month.
pub fn add(config: &Config, args: &AddArgs) -> Result<Out<Player>> {
    let mut roster = load_roster(config)?;
    let draft = PlayerDraft {
        name: args.name().to_string(),
        position: args.position().to_string(),
        jersey_number: args.jersey(),
        category: args.category(),
        date_of_birth: args.birth_date(),
        image_url: args.image_url().map(String::from),
    };
    let id = roster.add_player(draft, config.monthly_dues());
    let Some(player) = roster.player(id).cloned() else {
        bail!("The player could not be added");
    };
    Ok(Out::new(
        format!("Added player '{}' with id {id}", player.name),
        player,
    ))
}

/// Update fields of an existing player.
pub fn update(config: &Config, args: &UpdateArgs) -> Result<Out<Player>> {
    let mut roster = load_roster(config)?;
    let changes = PlayerUpdate {
        name: args.name().map(String::from),
        position: args.position().map(String::from),
        jersey_number: args.jersey(),
        category: args.category(),
        date_of_birth: args.birth_date(),
        image_url: args.image_url().map(String::from),
    };
    if changes == PlayerUpdate::default() {
        bail!("Nothing to update, pass at least one field");
    }
    let id = args.id();
    if !roster.update_player(id, &changes) {
        bail!("There is no player with id {id}");
    }
    let Some(player) = roster.player(id).cloned() else {
        bail!("There is no player with id {id}");
    };
    Ok(Out::new(
        format!("Updated player '{}' (id {id})", player.name),
        player,
    ))
}

/// Remove a player from the roster. Attendance records are kept.
pub fn remove(config: &Config, args: &RemoveArgs) -> Result<Out<Player>> {
    let mut roster = load_roster(config)?;
    let id = args.id();
    match roster.delete_player(id) {
        Some(player) => Ok(Out::new(
            format!("Removed player '{}' (id {id})", player.name),
            player,
        )),
        None => bail!("There is no player with id {id}"),
    }
}

/// List players matching the query and filters.
pub fn list(config: &Config, args: &ListArgs) -> Result<Out<Vec<Player>>> {
    let roster = load_roster(config)?;
    let filters = SearchFilters {
        category: args.category(),
        payment_status: args.status(),
    };
    let found: Vec<Player> = roster
        .search_players(args.query(), &filters)
        .into_iter()
        .cloned()
        .collect();
    let mut lines = vec![format!("{} player(s)", found.len())];
    for player in &found {
        let status = match player.last_payment() {
            Some(payment) if payment.paid => "paid",
            _ => "unpaid",
        };
        lines.push(format!(
            "{:>4}  #{:<3} {} ({}, {}) [{status}]",
            player.id, player.jersey_number, player.name, player.category, player.position
        ));
    }
    Ok(Out::new(lines.join("\n"), found))
}
