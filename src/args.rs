//! These structs provide the CLI interface for the roster CLI.

use crate::model::{Amount, Category, Month};
use crate::roster::PaymentFilter;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// roster: A command-line tool for managing a single team's roster.
///
/// The purpose of this program is to keep a local record of your team's
/// players, their monthly dues payments and their training attendance. All
/// data is stored as JSON files inside the roster home directory and can be
/// exported to and imported from a single JSON document, or summarized as
/// CSV for spreadsheets.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command you should run. Decide what directory you
    /// want to store data in and pass it as --roster-home; by default it
    /// will be $HOME/roster.
    Init(InitArgs),
    /// Add a player to the roster.
    Add(AddArgs),
    /// Update fields of an existing player.
    Update(UpdateArgs),
    /// Remove a player from the roster.
    Remove(RemoveArgs),
    /// List players, optionally filtered by a query, category or payment status.
    List(ListArgs),
    /// Mark a player's dues entry as paid.
    Pay(PayArgs),
    /// Open a dues month: add an unpaid entry for every player that lacks one.
    Bill(BillArgs),
    /// Record a player's attendance for a training day.
    Attendance(AttendanceArgs),
    /// Show payment statistics and the recent monthly collection rates.
    Stats,
    /// Export the full data set as JSON, or a CSV roster summary.
    Export(ExportArgs),
    /// Import a JSON document previously produced by export, replacing the
    /// stored data. A backup is taken first.
    Import(ImportArgs),
    /// Write a rotating snapshot backup of the current data set.
    Backup,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where roster data and configuration is held. Defaults to ~/roster
    #[arg(long, env = "ROSTER_HOME", default_value_t = default_roster_home())]
    roster_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, roster_home: PathBuf) -> Self {
        Self {
            log_level,
            roster_home: roster_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn roster_home(&self) -> &DisplayPath {
        &self.roster_home
    }
}

#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The dues amount for one month, e.g. "25" or "€25". Defaults to €25.
    #[arg(long)]
    monthly_dues: Option<Amount>,
}

impl InitArgs {
    pub fn monthly_dues(&self) -> Option<Amount> {
        self.monthly_dues
    }
}

#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The player's full name.
    name: String,

    /// The playing position, e.g. "Goalkeeper".
    #[arg(long)]
    position: String,

    /// The jersey number. Uniqueness is not enforced.
    #[arg(long)]
    jersey: u32,

    /// The age category.
    #[arg(long, value_enum)]
    category: Category,

    /// The date of birth, e.g. 2012-06-30.
    #[arg(long)]
    birth_date: Option<NaiveDate>,

    /// A URL to the player's photo.
    #[arg(long)]
    image_url: Option<String>,
}

impl AddArgs {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn jersey(&self) -> u32 {
        self.jersey
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct UpdateArgs {
    /// The id of the player to update.
    id: u32,

    /// A new name.
    #[arg(long)]
    name: Option<String>,

    /// A new position.
    #[arg(long)]
    position: Option<String>,

    /// A new jersey number.
    #[arg(long)]
    jersey: Option<u32>,

    /// A new age category.
    #[arg(long, value_enum)]
    category: Option<Category>,

    /// A new date of birth.
    #[arg(long)]
    birth_date: Option<NaiveDate>,

    /// A new photo URL.
    #[arg(long)]
    image_url: Option<String>,
}

impl UpdateArgs {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    pub fn jersey(&self) -> Option<u32> {
        self.jersey
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct RemoveArgs {
    /// The id of the player to remove.
    id: u32,
}

impl RemoveArgs {
    pub fn id(&self) -> u32 {
        self.id
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// A case-insensitive substring matched against name, position and
    /// jersey number. An empty query matches everyone.
    #[arg(long, default_value = "")]
    query: String,

    /// Filter by the status of each player's most recent dues entry.
    #[arg(long, value_enum, default_value_t = PaymentFilter::All)]
    status: PaymentFilter,

    /// Filter by age category.
    #[arg(long, value_enum)]
    category: Option<Category>,
}

impl ListArgs {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> PaymentFilter {
        self.status
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }
}

#[derive(Debug, Parser, Clone)]
pub struct PayArgs {
    /// The id of the player who paid.
    player_id: u32,

    /// The zero-based position of the dues entry in the player's payment
    /// history. Defaults to the most recent entry when --month is not given.
    #[arg(long, conflicts_with = "month")]
    index: Option<usize>,

    /// The month of the dues entry to mark, e.g. "March".
    #[arg(long)]
    month: Option<Month>,

    /// The year of the dues entry to mark. Defaults to the current year when
    /// --month is given.
    #[arg(long, requires = "month")]
    year: Option<i32>,
}

impl PayArgs {
    pub fn player_id(&self) -> u32 {
        self.player_id
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn month(&self) -> Option<Month> {
        self.month
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }
}

#[derive(Debug, Parser, Clone)]
pub struct BillArgs {
    /// The month to open, e.g. "April". Defaults to the current month.
    #[arg(long)]
    month: Option<Month>,

    /// The year of the month to open. Defaults to the current year.
    #[arg(long)]
    year: Option<i32>,

    /// The dues amount for the new entries. Defaults to the configured
    /// monthly dues.
    #[arg(long)]
    amount: Option<Amount>,
}

impl BillArgs {
    pub fn month(&self) -> Option<Month> {
        self.month
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }
}

#[derive(Debug, Parser, Clone)]
pub struct AttendanceArgs {
    /// The id of the player.
    player_id: u32,

    /// The training day, e.g. 2024-03-01. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Mark the player absent instead of present.
    #[arg(long)]
    absent: bool,

    /// An optional note, e.g. "injured".
    #[arg(long)]
    note: Option<String>,
}

impl AttendanceArgs {
    pub fn player_id(&self) -> u32 {
        self.player_id
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn absent(&self) -> bool {
        self.absent
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// The full data set as a JSON document that import accepts back.
    #[default]
    Json,
    /// A one-row-per-player CSV summary.
    Csv,
}

serde_plain::derive_display_from_serialize!(ExportFormat);
serde_plain::derive_fromstr_from_deserialize!(ExportFormat);

#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// The output format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    format: ExportFormat,

    /// Write to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

impl ExportArgs {
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn out(&self) -> Option<&Path> {
        self.out.as_deref()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The JSON document to import.
    file: PathBuf,
}

impl ImportArgs {
    pub fn file(&self) -> &Path {
        &self.file
    }
}

fn default_roster_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("roster"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --roster-home or ROSTER_HOME instead of relying on the default \
                roster home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("roster")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
