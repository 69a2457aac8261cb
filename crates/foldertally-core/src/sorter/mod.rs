/// Extension sorter: move (or copy) files into per-extension folders.
///
/// Sorting is split into a read-only [`plan_sort`] and [`apply_plan`],
/// which performs the moves and records them in the undo journal. A dry
/// run stops after planning.
///
/// Name collisions get a numeric suffix (`photo_1.jpg`, `photo_2.jpg`, ...)
/// so nothing is ever overwritten.
pub mod extensions;
pub mod journal;

pub use extensions::{SortScope, NO_EXTENSION_FOLDER};
pub use journal::{undo_sort, Journal, JournalEntry, JOURNAL_FILE, UNREADABLE_JOURNAL_FILE};

use crate::error::{Error, Result};
use compact_str::CompactString;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct SortOptions {
    pub scope: SortScope,
    /// Also sort files in subdirectories (destination folders excluded).
    pub recursive: bool,
    /// Copy instead of move. Copies are not journalled.
    pub copy: bool,
    /// Plan only; touch nothing.
    pub dry_run: bool,
}

/// One planned file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub from: PathBuf,
    pub to: PathBuf,
    /// Destination folder name (directly under the target).
    pub folder: CompactString,
    pub size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SortPlan {
    pub target: PathBuf,
    pub moves: Vec<PlannedMove>,
}

impl SortPlan {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Files per destination folder, in first-seen order.
    pub fn folder_counts(&self) -> Vec<(CompactString, usize)> {
        let mut counts: Vec<(CompactString, usize)> = Vec::new();
        for mv in &self.moves {
            match counts.iter_mut().find(|(f, _)| *f == mv.folder) {
                Some((_, n)) => *n += 1,
                None => counts.push((mv.folder.clone(), 1)),
            }
        }
        counts
    }

    pub fn total_bytes(&self) -> u64 {
        self.moves.iter().map(|m| m.size).sum()
    }
}

/// What [`apply_plan`] did.
#[derive(Debug, Clone, Default)]
pub struct SortReport {
    pub files: usize,
    pub bytes: u64,
    pub folders: Vec<(CompactString, usize)>,
    pub copied: bool,
    pub dry_run: bool,
}

/// Work out where every eligible file under `target` would go.
///
/// Reads the filesystem only. The journal files are never planned. In a
/// recursive run, folders directly under `target` that are destinations
/// (named for a file in this run, or recorded in the journal) are left
/// alone, so earlier results are not sorted a second time.
pub fn plan_sort(target: &Path, opts: &SortOptions) -> Result<SortPlan> {
    let files = if opts.recursive {
        let files = collect_files_recursive(target)?;
        let destinations = destination_folders(target, &files, opts.scope);
        files
            .into_iter()
            .filter(|(path, _)| !in_destination_folder(target, path, &destinations))
            .collect()
    } else {
        collect_files_flat(target)?
    };

    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut moves = Vec::new();

    for (path, size) in files {
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if path.parent() == Some(target) && is_journal_file(file_name) {
            continue;
        }
        let Some(folder) = extensions::destination_folder(&path, opts.scope) else {
            debug!("Skipping {}: no destination", path.display());
            continue;
        };

        let dest = unique_path(&target.join(folder.as_str()).join(file_name), &claimed);
        if dest == path {
            continue;
        }
        debug!("Plan {} -> {}", path.display(), dest.display());
        claimed.insert(dest.clone());
        moves.push(PlannedMove {
            from: path,
            to: dest,
            folder,
            size,
        });
    }

    info!(
        "Planned {} file(s) for sorting in {}",
        moves.len(),
        target.display()
    );
    Ok(SortPlan {
        target: target.to_path_buf(),
        moves,
    })
}

/// Carry out a plan.
///
/// Moves are journalled so [`undo_sort`] can reverse them. If an operation
/// fails, the moves completed so far are still journalled before the error
/// is returned.
pub fn apply_plan(plan: &SortPlan, opts: &SortOptions) -> Result<SortReport> {
    let mut report = SortReport {
        folders: plan.folder_counts(),
        copied: opts.copy,
        dry_run: opts.dry_run,
        ..Default::default()
    };

    if opts.dry_run {
        report.files = plan.moves.len();
        report.bytes = plan.total_bytes();
        return Ok(report);
    }

    let mut done: Vec<JournalEntry> = Vec::new();
    let mut outcome = Ok(());
    for mv in &plan.moves {
        if let Err(e) = apply_one(mv, opts.copy) {
            outcome = Err(e);
            break;
        }
        if !opts.copy {
            done.push(JournalEntry {
                from: mv.from.clone(),
                to: mv.to.clone(),
            });
        }
        report.files += 1;
        report.bytes += mv.size;
    }

    if !done.is_empty() {
        journal::record_moves(&plan.target, done)?;
    }
    outcome?;

    info!(
        "{} {} file(s) in {}",
        if opts.copy { "Copied" } else { "Moved" },
        report.files,
        plan.target.display()
    );
    Ok(report)
}

/// Plan and apply in one step.
pub fn sort_folder(target: &Path, opts: &SortOptions) -> Result<(SortPlan, SortReport)> {
    let plan = plan_sort(target, opts)?;
    let report = apply_plan(&plan, opts)?;
    Ok((plan, report))
}

fn apply_one(mv: &PlannedMove, copy: bool) -> Result<()> {
    if let Some(parent) = mv.to.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::SortFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    if copy {
        fs::copy(&mv.from, &mv.to).map_err(|source| Error::SortFailed {
            path: mv.from.clone(),
            source,
        })?;
        Ok(())
    } else {
        move_file(&mv.from, &mv.to)
    }
}

/// Rename `from` to `to`, falling back to copy-and-delete when a rename is
/// not possible (e.g. across filesystems).
pub(crate) fn move_file(from: &Path, to: &Path) -> Result<()> {
    let failed = |source| Error::SortFailed {
        path: from.to_path_buf(),
        source,
    };
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            debug!("rename {} failed ({rename_err}); copying instead", from.display());
            fs::copy(from, to).map_err(failed)?;
            fs::remove_file(from).map_err(failed)
        }
    }
}

/// First free variant of `path`: the path itself, then `stem_1.ext`,
/// `stem_2.ext`, ... A candidate is free when it neither exists nor has
/// already been claimed by this plan.
pub fn unique_path(path: &Path, claimed: &HashSet<PathBuf>) -> PathBuf {
    let taken = |p: &Path| p.exists() || claimed.contains(p);
    if !taken(path) {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 1u64;
    loop {
        let name = match &ext {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        };
        let candidate = parent.join(name);
        if !taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn collect_files_flat(target: &Path) -> Result<Vec<(PathBuf, u64)>> {
    let unreadable = |source| Error::DirectoryUnreadable {
        path: target.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(target).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let file_type = entry.file_type().map_err(unreadable)?;
        if !file_type.is_file() {
            continue;
        }
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        files.push((entry.path(), size));
    }
    Ok(files)
}

fn collect_files_recursive(target: &Path) -> Result<Vec<(PathBuf, u64)>> {
    // jwalk reports an unreadable root as an entry error; check it up front
    // so the caller gets a hard failure instead of an empty plan.
    fs::read_dir(target).map_err(|source| Error::DirectoryUnreadable {
        path: target.to_path_buf(),
        source,
    })?;

    let walker = jwalk::WalkDir::new(target)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()));

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("Skipping unreadable entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let size = fs::symlink_metadata(&path).map(|m| m.len()).unwrap_or(0);
        files.push((path, size));
    }
    Ok(files)
}

fn is_journal_file(name: &OsStr) -> bool {
    name == JOURNAL_FILE || name == UNREADABLE_JOURNAL_FILE
}

/// Names of the folders directly under `target` that hold sorted files:
/// the destination of every file found, plus every folder the journal
/// has moved files into.
fn destination_folders(
    target: &Path,
    files: &[(PathBuf, u64)],
    scope: SortScope,
) -> HashSet<CompactString> {
    let mut folders: HashSet<CompactString> = files
        .iter()
        .filter_map(|(path, _)| extensions::destination_folder(path, scope))
        .collect();

    match Journal::load(target) {
        Ok(Some(journal)) => {
            for entry in &journal.moves {
                if let Some(name) = top_level_folder(target, &entry.to) {
                    folders.insert(CompactString::new(name.to_string_lossy()));
                }
            }
        }
        Ok(None) => {}
        Err(e) => warn!("Ignoring journal while planning: {e}"),
    }
    folders
}

/// The first component of `path` below `target`, if `path` is nested
/// inside a folder directly under `target`.
fn top_level_folder<'a>(target: &Path, path: &'a Path) -> Option<&'a OsStr> {
    let mut components = path.strip_prefix(target).ok()?.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(first)), Some(_)) => Some(first),
        _ => None,
    }
}

/// Whether `path` sits (at any depth) inside one of `destinations`.
fn in_destination_folder(target: &Path, path: &Path, destinations: &HashSet<CompactString>) -> bool {
    top_level_folder(target, path)
        .is_some_and(|first| destinations.contains(first.to_string_lossy().as_ref()))
}
