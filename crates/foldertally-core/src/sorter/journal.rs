/// Undo journal for sort runs.
///
/// Each non-dry-run move is recorded as a `from`/`to` pair in
/// `.sort_backup.json` inside the sort target. Later runs extend the
/// journal; `undo` replays it newest-first and then deletes it.
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Journal file name, written directly inside the sort target.
pub const JOURNAL_FILE: &str = ".sort_backup.json";

/// Where a journal that cannot be parsed is moved before a fresh one is
/// started.
pub const UNREADABLE_JOURNAL_FILE: &str = ".sort_backup.unreadable.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Original location.
    pub from: PathBuf,
    /// Location after sorting.
    pub to: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    pub moves: Vec<JournalEntry>,
}

pub fn journal_path(target: &Path) -> PathBuf {
    target.join(JOURNAL_FILE)
}

fn journal_err(path: &Path, source: std::io::Error) -> Error {
    Error::Journal {
        path: path.to_path_buf(),
        source,
    }
}

impl Journal {
    /// Load the journal in `target`, or `None` if there is none.
    pub fn load(target: &Path) -> Result<Option<Self>> {
        let path = journal_path(target);
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(journal_err(&path, e)),
        };
        let journal = serde_json::from_str(&text).map_err(|e| journal_err(&path, e.into()))?;
        Ok(Some(journal))
    }

    /// Write the journal into `target`, replacing any previous one.
    pub fn save(&self, target: &Path) -> Result<()> {
        let path = journal_path(target);
        let text = serde_json::to_string_pretty(self).map_err(|e| journal_err(&path, e.into()))?;
        fs::write(&path, text).map_err(|e| journal_err(&path, e))?;
        debug!("Journal with {} move(s) written to {}", self.moves.len(), path.display());
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Append `moves` to the journal in `target`.
///
/// If the existing journal cannot be loaded it is renamed to
/// [`UNREADABLE_JOURNAL_FILE`] and `moves` start a fresh journal, so the
/// files just moved stay undoable. The load error is still returned.
pub fn record_moves(target: &Path, moves: Vec<JournalEntry>) -> Result<()> {
    match Journal::load(target) {
        Ok(existing) => {
            let mut journal = existing.unwrap_or_default();
            journal.moves.extend(moves);
            journal.save(target)
        }
        Err(load_err) => {
            let path = journal_path(target);
            let aside = target.join(UNREADABLE_JOURNAL_FILE);
            fs::rename(&path, &aside).map_err(|e| journal_err(&path, e))?;
            warn!(
                "Journal {} is unreadable; kept as {} and started a new one",
                path.display(),
                aside.display()
            );
            Journal { moves }.save(target)?;
            Err(load_err)
        }
    }
}

/// Restore every file recorded in the journal of `target`.
///
/// Entries are replayed newest-first. A file whose sorted copy is gone, or
/// whose original location is occupied again, is skipped with a warning.
/// Folders emptied by the restore are removed. Returns the number of files
/// restored.
pub fn undo_sort(target: &Path) -> Result<usize> {
    let journal = Journal::load(target)?.ok_or_else(|| Error::NothingToUndo(target.to_path_buf()))?;

    let mut restored = 0usize;
    for entry in journal.moves.iter().rev() {
        if !entry.to.exists() {
            warn!("Cannot restore {}: file is gone", entry.to.display());
            continue;
        }
        if entry.from.exists() {
            warn!(
                "Cannot restore {}: {} already exists",
                entry.to.display(),
                entry.from.display()
            );
            continue;
        }
        if let Some(parent) = entry.from.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::SortFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        super::move_file(&entry.to, &entry.from)?;
        restored += 1;

        if let Some(folder) = entry.to.parent() {
            // Only succeeds once the folder is empty.
            let _ = fs::remove_dir(folder);
        }
    }

    let path = journal_path(target);
    fs::remove_file(&path).map_err(|e| journal_err(&path, e))?;
    tracing::info!("Restored {restored} file(s) in {}", target.display());
    Ok(restored)
}
