//! Configuration file handling.
//!
//! The configuration file is stored at `$ROSTER_HOME/config.json` and holds
//! the monthly dues amount and the backup settings. The data directory and
//! the backups directory live alongside it.

use crate::backup::Backup;
use crate::model::Amount;
use crate::store::FileStore;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "roster";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const DATA: &str = "data";
const CONFIG_JSON: &str = "config.json";

/// The default monthly dues when `init` is not given an amount.
fn default_monthly_dues() -> Amount {
    Amount::from_euros(25)
}

/// The `Config` object represents the configuration of the app. You
/// instantiate it by providing the path to `$ROSTER_HOME` and from there it
/// loads `$ROSTER_HOME/config.json`. It provides the paths to the data and
/// backups directories inside the roster home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    data: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the roster home directory, its subdirectories and an initial
    /// `config.json` with default settings. `monthly_dues` defaults to €25.
    pub fn create(dir: impl Into<PathBuf>, monthly_dues: Option<Amount>) -> Result<Self> {
        // Create the directory if it does not exist
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .context("Unable to create the roster home directory")?;

        // Canonicalize the directory path
        let root = utils::canonicalize(&maybe_relative)?;

        // Create the subdirectories
        let backups_dir = root.join(BACKUPS);
        utils::make_dir(&backups_dir)?;
        let data_dir = root.join(DATA);
        utils::make_dir(&data_dir)?;

        // Create and save the initial ConfigFile
        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            monthly_dues: monthly_dues.unwrap_or_else(default_monthly_dues),
            backup_copies: BACKUP_COPIES,
        };
        config_file.save(&config_path)?;

        Ok(Self {
            root,
            data: data_dir,
            backups: backups_dir,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the `roster_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the backups and data directories exist
    /// - return the loaded configuration object
    pub fn load(roster_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = roster_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .context("Roster home is missing, run 'roster init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path)?;

        let config = Self {
            root: root.clone(),
            data: root.join(DATA),
            backups: root.join(BACKUPS),
            config_path,
            config_file,
        };
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        if !config.data.is_dir() {
            bail!("The data directory is missing '{}'", config.data.display())
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn data(&self) -> &Path {
        &self.data
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn monthly_dues(&self) -> Amount {
        self.config_file.monthly_dues
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }

    /// Opens the file-backed record store in the data directory.
    pub fn file_store(&self) -> Result<FileStore> {
        FileStore::open(&self.data)
    }
}

/// Represents the serialization and deserialization format of the
/// configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "roster",
///   "config_version": 1,
///   "monthly_dues": 25.0,
///   "backup_copies": 5
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "roster"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The dues amount seeded onto new payment entries
    monthly_dues: Amount,

    /// Number of backup copies to keep
    backup_copies: u32,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            monthly_dues: default_monthly_dues(),
            backup_copies: BACKUP_COPIES,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path, validating the app name.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path.as_ref(), &data).context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("roster_home");

        let config = Config::create(&home_dir, Some(Amount::from_euros(30))).unwrap();

        assert_eq!(config.monthly_dues(), Amount::from_euros(30));
        assert_eq!(config.backup_copies(), BACKUP_COPIES);
        assert!(config.backups().is_dir());
        assert!(config.data().is_dir());
        assert!(config.config_path().is_file());
    }

    #[test]
    fn test_config_create_then_load() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("roster_home");
        Config::create(&home_dir, None).unwrap();

        let config = Config::load(&home_dir).unwrap();
        assert_eq!(config.monthly_dues(), Amount::from_euros(25));
    }

    #[test]
    fn test_load_missing_home_fails() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_config_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "monthly_dues": 25,
            "backup_copies": 5
        }"#;
        utils::write(&config_path, json).unwrap();

        let result = ConfigFile::load(&config_path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[test]
    fn test_config_file_save_and_load() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");

        let original = ConfigFile {
            monthly_dues: Amount::from_euros(40),
            backup_copies: 7,
            ..ConfigFile::default()
        };
        original.save(&config_path).unwrap();

        let loaded = ConfigFile::load(&config_path).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_file_store_opens_in_the_data_dir() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path().join("home"), None).unwrap();
        let store = config.file_store().unwrap();
        assert_eq!(store.dir(), config.data());
    }
}
