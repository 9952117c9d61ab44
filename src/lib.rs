//! A local roster and dues-tracking ledger for a single team.
//!
//! Players, their monthly dues entries and attendance records are held in a
//! key-value record store on disk and mutated through the [`Roster`] state
//! container. Data can be exported and imported wholesale as JSON, and a
//! flattened per-player summary can be exported as CSV.

pub mod args;
mod backup;
pub mod commands;
mod config;
mod error;
pub mod export;
pub mod model;
pub mod roster;
pub mod stats;
pub mod store;
mod utils;

pub use config::Config;
pub use error::{Error, Result};
pub use roster::{PaymentFilter, Roster, SearchFilters};
