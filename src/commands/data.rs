use crate::args::{ExportArgs, ExportFormat, ImportArgs};
use crate::backup::{PRE_IMPORT, SNAPSHOT};
use crate::commands::Out;
use crate::export::players_to_csv;
use crate::store::RecordStore;
use crate::{utils, Config, Result};
use anyhow::bail;
use tracing::debug;

/// Export the full data set as JSON, or a CSV roster summary. The document
/// goes to `--out` when given, otherwise to stdout.
pub fn export(config: &Config, args: &ExportArgs) -> Result<Out<()>> {
    let store = RecordStore::new(config.file_store()?);
    let document = match args.format() {
        ExportFormat::Json => store.export_all()?,
        ExportFormat::Csv => players_to_csv(&store.load_players()?.unwrap_or_default())?,
    };

    match args.out() {
        Some(path) => {
            utils::write(path, &document)?;
            Ok(Out::new_message(format!(
                "Exported {} to '{}'",
                args.format(),
                path.display()
            )))
        }
        None => {
            // Logs go to stderr, so stdout carries only the document
            println!("{document}");
            Ok(Out::new_message(format!("Exported {}", args.format())))
        }
    }
}

/// Import a JSON document previously produced by export, replacing the
/// stored players and attendance. A pre-import backup is taken first.
pub fn import(config: &Config, args: &ImportArgs) -> Result<Out<()>> {
    let mut store = RecordStore::new(config.file_store()?);

    let backup_path = config.backup().save_json(PRE_IMPORT, &store.snapshot()?)?;
    debug!("Saved pre-import backup to {}", backup_path.display());

    let document = utils::read(args.file())?;
    if !store.import_all(&document) {
        bail!(
            "The import failed and nothing was replaced; the pre-import backup is at '{}'",
            backup_path.display()
        );
    }

    let players = store.load_players()?.unwrap_or_default();
    Ok(Out::new_message(format!(
        "Imported {} player(s) and {} attendance record(s) from '{}'",
        players.len(),
        store.load_attendance()?.len(),
        args.file().display()
    )))
}

/// Write a rotating snapshot backup of the current data set.
pub fn backup(config: &Config) -> Result<Out<()>> {
    let store = RecordStore::new(config.file_store()?);
    let path = config.backup().save_json(SNAPSHOT, &store.snapshot()?)?;
    Ok(Out::new_message(format!(
        "Saved snapshot backup to '{}'",
        path.display()
    )))
}
