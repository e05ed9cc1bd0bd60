//! Local filesystem input.

use super::{EntryKind, SourceEntry, SourceFs};
use crate::error::{ImportError, Result};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reads images from the local filesystem.
#[derive(Debug, Default, Clone)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl SourceFs for LocalFs {
    fn describe(&self) -> &'static str {
        "local FS"
    }

    async fn walk(&self, root: &str) -> Result<Vec<SourceEntry>> {
        let root = PathBuf::from(root);

        // walkdir is blocking; keep it off the runtime threads
        tokio::task::spawn_blocking(move || walk_sorted(&root))
            .await
            .map_err(|e| io::Error::other(format!("Directory walk task panicked: {e}")))?
    }

    async fn read(&self, entry: &SourceEntry) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&entry.path).await?)
    }
}

fn walk_sorted(root: &Path) -> Result<Vec<SourceEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let Some(path) = dangling_path(&err).map(Path::to_path_buf) else {
                    return Err(ImportError::Walk(err));
                };
                log::debug!("{} does not resolve to a file or directory", path.display());
                entries.push(source_entry(&path, EntryKind::Other));
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        let kind = if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        entries.push(source_entry(entry.path(), kind));
    }

    Ok(entries)
}

/// Path of a missing root or a symlink whose target is gone.
fn dangling_path(err: &walkdir::Error) -> Option<&Path> {
    let not_found = err
        .io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound);
    if not_found { err.path() } else { None }
}

fn source_entry(path: &Path, kind: EntryKind) -> SourceEntry {
    let display = path.to_string_lossy().into_owned();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| display.clone());

    SourceEntry {
        path: display.clone(),
        location: display,
        name,
        kind,
    }
}
