use crate::Result;
use anyhow::Context;
use std::path::Path;

/// Write a file.
pub(crate) fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, contents)
        .with_context(|| format!("Unable to write to {}", path.display()))
}

/// Read a file to a `String`.
pub(crate) fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Canonicalize a path. Fails if the path does not exist.
pub(crate) fn canonicalize(path: &Path) -> Result<std::path::PathBuf> {
    std::fs::canonicalize(path)
        .with_context(|| format!("Unable to canonicalize {}", path.display()))
}

/// Create a directory and any missing parents.
pub(crate) fn make_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Unable to create directory at {}", path.display()))
}

/// Delete a file.
pub(crate) fn remove(path: &Path) -> Result<()> {
    std::fs::remove_file(path)
        .with_context(|| format!("Unable to remove file at {}", path.display()))
}
