/// The on-disk log format.
///
/// ```text
/// <existing content>
///
///
///
/// ===========================
/// <folder name 1>
/// <folder name 2>
/// ```
///
/// The three blank lines before the separator are only written when the
/// log already has content. Names are written verbatim, one per line.
///
/// Concurrent appends from several processes to the same log are not
/// supported; their interleaving is whatever the filesystem's append
/// semantics produce.
use crate::error::{Error, Result};
use crate::model::Session;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// The session separator line (27 `=` characters).
pub const SEPARATOR: &str = "===========================";

/// Written before the separator when the log is non-empty.
pub const SESSION_GAP: &str = "\n\n\n";

/// Default log file name, relative to the working directory.
pub const DEFAULT_LOG_NAME: &str = "list.txt";

/// Whether a line marks a session boundary.
///
/// Any line containing the separator token counts, so a separator with
/// trailing whitespace or a folder literally named after it is read as a
/// boundary too.
#[inline]
pub fn is_separator(line: &str) -> bool {
    line.contains(SEPARATOR)
}

/// Render a session block exactly as it is appended to the log.
pub fn render_session(session: &Session, log_has_content: bool) -> String {
    let body: usize = session.names.iter().map(|n| n.len() + 1).sum();
    let mut out = String::with_capacity(SESSION_GAP.len() + SEPARATOR.len() + 1 + body);
    if log_has_content {
        out.push_str(SESSION_GAP);
    }
    out.push_str(SEPARATOR);
    out.push('\n');
    for name in &session.names {
        out.push_str(name);
        out.push('\n');
    }
    out
}

/// Append `session` to the log at `log_path`, creating the file if needed.
pub fn append_session(log_path: &Path, session: &Session) -> Result<()> {
    append_sessions(log_path, std::slice::from_ref(session))
}

/// Append several sessions, in order, with one write.
///
/// Every block is rendered first and handed to a single `write_all`, so
/// an open or metadata failure leaves the file untouched.
pub fn append_sessions(log_path: &Path, sessions: &[Session]) -> Result<()> {
    let unwritable = |source| Error::LogUnwritable {
        path: log_path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(unwritable)?;

    let mut has_content = file.metadata().map_err(unwritable)?.len() > 0;
    let mut block = String::new();
    for session in sessions {
        block.push_str(&render_session(session, has_content));
        has_content = true;
    }

    file.write_all(block.as_bytes()).map_err(unwritable)?;
    file.flush().map_err(unwritable)?;

    debug!(
        "Appended {} session(s), {} bytes to {}",
        sessions.len(),
        block.len(),
        log_path.display()
    );
    Ok(())
}
