/// Log analysis: count sessions and tally folder names.
///
/// The parser does not validate the log. Any line that is neither a
/// separator nor empty is a folder-name observation, so a hand-edited or
/// truncated log changes the counts without raising an error. Counts are
/// line occurrences, which equal per-session counts for logs written by
/// the scanner.
pub mod report;
pub mod stats;

pub use stats::{directory_stats, DirectoryStats, ExtensionCount};

use crate::error::{Error, Result};
use crate::logfile::is_separator;
use crate::model::Analysis;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Analyse the log at `log_path`. Never modifies the file.
pub fn analyze(log_path: &Path) -> Result<Analysis> {
    let start = Instant::now();
    let file = File::open(log_path).map_err(|source| Error::LogNotFound {
        path: log_path.to_path_buf(),
        source,
    })?;

    let analysis = analyze_reader(BufReader::new(file)).map_err(|source| Error::LogUnreadable {
        path: log_path.to_path_buf(),
        source,
    })?;

    info!(
        "Analysed {}: {} sessions, {} unique folders in {:?}",
        log_path.display(),
        analysis.session_count,
        analysis.unique_count(),
        start.elapsed()
    );
    Ok(analysis)
}

/// Parse a log from any buffered reader.
///
/// Line terminators (`\n`, and a `\r` before it) are stripped, never
/// interpreted. Bytes that are not valid UTF-8 are replaced lossily so a
/// log written under another code page still parses.
pub fn analyze_reader<R: BufRead>(mut reader: R) -> std::io::Result<Analysis> {
    let mut analysis = Analysis::new();
    let mut buf: Vec<u8> = Vec::with_capacity(256);

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = strip_line_ending(&buf);
        let line = String::from_utf8_lossy(line);

        if is_separator(&line) {
            analysis.record_separator();
        } else if !line.is_empty() {
            analysis.observe(&line);
        }
    }

    Ok(analysis)
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Analysis {
        analyze_reader(Cursor::new(text.as_bytes())).unwrap()
    }

    #[test]
    fn counts_sessions_and_names() {
        let a = parse("===========================\na\nb\n\n\n\n===========================\nb\nc\n");
        assert_eq!(a.session_count, 2);
        let got: Vec<(&str, u64)> = a.entries.iter().map(|e| (e.name.as_str(), e.count)).collect();
        assert_eq!(got, vec![("a", 1), ("b", 2), ("c", 1)]);
    }

    #[test]
    fn empty_input() {
        let a = parse("");
        assert_eq!(a.session_count, 0);
        assert!(a.entries.is_empty());
    }

    #[test]
    fn crlf_is_stripped() {
        let a = parse("===========================\r\nphotos\r\n");
        assert_eq!(a.session_count, 1);
        assert_eq!(a.count_of("photos"), Some(1));
    }

    #[test]
    fn last_line_without_newline_counts() {
        let a = parse("===========================\nlast");
        assert_eq!(a.count_of("last"), Some(1));
    }

    #[test]
    fn whitespace_lines_are_data() {
        let a = parse("===========================\n  \n");
        assert_eq!(a.count_of("  "), Some(1));
    }

    #[test]
    fn repeated_name_in_one_session_counts_each_line() {
        let a = parse("===========================\nx\nx\n");
        assert_eq!(a.session_count, 1);
        assert_eq!(a.count_of("x"), Some(2));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let bytes: &[u8] = b"===========================\nna\xffme\n";
        let a = analyze_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(a.unique_count(), 1);
        assert!(a.entries[0].name.contains('\u{fffd}'));
    }
}
