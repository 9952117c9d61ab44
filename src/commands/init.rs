use crate::commands::Out;
use crate::model::Amount;
use crate::{Config, Result};
use std::path::Path;

/// Create the roster home directory and its initial configuration.
pub fn init(home: &Path, monthly_dues: Option<Amount>) -> Result<Out<()>> {
    let config = Config::create(home, monthly_dues)?;
    Ok(Out::new_message(format!(
        "Initialized roster home at '{}' with monthly dues of {}",
        config.root().display(),
        config.monthly_dues()
    )))
}
