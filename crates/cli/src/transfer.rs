//! Export to and import from snapshot files.

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use readtrack_core::{Document, Time};
use readtrack_storage::{BookStore, DocumentStore};
use tracing::info;

/// Prefix of exported snapshot file names.
pub const EXPORT_PREFIX: &str = "reading-tracker-";

/// `reading-tracker-<YYYY-MM-DD>.json` for the UTC date of `at`.
pub fn export_file_name(at: Time) -> String {
    format!("{}{}.json", EXPORT_PREFIX, at.format("%Y-%m-%d"))
}

/// Write the full data set, pretty-printed, to `path`.
pub fn export_to<S: DocumentStore>(store: &BookStore<S>, path: &Path) -> Result<()> {
    let json = store.export_json()?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "Exported snapshot");
    Ok(())
}

/// Export into `dir` under the dated file name. Returns the written path.
pub fn export_into<S: DocumentStore>(
    store: &BookStore<S>,
    dir: &Path,
    at: Time,
) -> Result<PathBuf> {
    let path = dir.join(export_file_name(at));
    export_to(store, &path)?;
    Ok(path)
}

/// Replace the whole data set with the snapshot stored at `path`.
pub fn import_from<S: DocumentStore>(store: &mut BookStore<S>, path: &Path) -> Result<Document> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(store.import_json(&json)?)
}
