/// Scanner module: list the immediate subdirectories of a root and append
/// them to the log as one session.
///
/// - [`scan`] only reads the directory.
/// - [`scan_and_append`] scans, then appends; a failed scan never touches
///   the log.
/// - [`batch`] scans several roots on a bounded worker pool and appends the
///   sessions in argument order once every worker has finished.
pub mod batch;

use crate::error::{Error, Result};
use crate::logfile;
use crate::model::Session;
use compact_str::CompactString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

pub use batch::{scan_many, scan_many_and_append};

/// Outcome of one scan-and-append, for display.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub root: PathBuf,
    pub log_path: PathBuf,
    pub session: Session,
}

impl ScanSummary {
    /// Number of folders recorded.
    pub fn folder_count(&self) -> usize {
        self.session.len()
    }
}

/// List the directories directly under `root` in enumeration order.
///
/// Symbolic links are not followed, so a link pointing at a directory is
/// not recorded. Names that are not valid UTF-8 are converted lossily.
/// Any error while listing fails the whole scan.
pub fn scan(root: &Path) -> Result<Session> {
    let unreadable = |source| Error::DirectoryUnreadable {
        path: root.to_path_buf(),
        source,
    };

    let start = Instant::now();
    let mut names: Vec<CompactString> = Vec::new();

    for entry in std::fs::read_dir(root).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let file_type = entry.file_type().map_err(unreadable)?;
        if !file_type.is_dir() {
            continue;
        }
        let name = entry.file_name();
        names.push(CompactString::new(name.to_string_lossy()));
    }

    info!(
        "Scanned {}: {} folders in {:?}",
        root.display(),
        names.len(),
        start.elapsed()
    );
    Ok(Session::new(names))
}

/// Scan `root` and append the session to `log_path`.
pub fn scan_and_append(root: &Path, log_path: &Path) -> Result<ScanSummary> {
    let session = scan(root)?;
    logfile::append_session(log_path, &session)?;
    info!(
        "Saved {} folders to {}",
        session.len(),
        log_path.display()
    );
    Ok(ScanSummary {
        root: root.to_path_buf(),
        log_path: log_path.to_path_buf(),
        session,
    })
}
