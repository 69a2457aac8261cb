/// Runtime settings resolved from arguments and the environment.
///
/// There is no configuration file. The only environment input is
/// `COLUMNS`, which overrides the detected terminal width for menu layout.
use foldertally_core::logfile::DEFAULT_LOG_NAME;
use std::path::PathBuf;

/// Width used when neither `COLUMNS` nor the terminal reports one.
pub const DEFAULT_TERM_WIDTH: usize = 80;

/// Environment variable overriding the terminal width.
pub const COLUMNS_ENV: &str = "COLUMNS";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Log file scanned into and analysed.
    pub log_path: PathBuf,
    /// Directory whose subfolders the menu's scan records.
    pub root: PathBuf,
    /// Columns available for menu rendering.
    pub term_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_NAME),
            root: PathBuf::from("."),
            term_width: DEFAULT_TERM_WIDTH,
        }
    }
}

impl Settings {
    pub fn new(log_path: PathBuf, root: PathBuf) -> Self {
        Self {
            log_path,
            root,
            term_width: terminal_width(),
        }
    }
}

/// Resolve the terminal width: `COLUMNS` if it is a positive integer,
/// otherwise the attached terminal's width, otherwise 80.
pub fn terminal_width() -> usize {
    let env = std::env::var(COLUMNS_ENV).ok();
    let detected = console::Term::stdout()
        .size_checked()
        .map(|(_rows, cols)| cols as usize);
    resolve_width(env.as_deref(), detected)
}

/// Pure part of [`terminal_width`].
pub fn resolve_width(env: Option<&str>, detected: Option<usize>) -> usize {
    env.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&w| w > 0)
        .or(detected.filter(|&w| w > 0))
        .unwrap_or(DEFAULT_TERM_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins() {
        assert_eq!(resolve_width(Some("120"), Some(90)), 120);
    }

    #[test]
    fn invalid_env_falls_back_to_detected() {
        assert_eq!(resolve_width(Some("wide"), Some(90)), 90);
        assert_eq!(resolve_width(Some("0"), Some(90)), 90);
        assert_eq!(resolve_width(Some("-5"), Some(90)), 90);
    }

    #[test]
    fn default_when_nothing_known() {
        assert_eq!(resolve_width(None, None), DEFAULT_TERM_WIDTH);
        assert_eq!(resolve_width(None, Some(0)), DEFAULT_TERM_WIDTH);
    }

    #[test]
    fn defaults_point_at_list_txt() {
        let s = Settings::default();
        assert_eq!(s.log_path, PathBuf::from("list.txt"));
        assert_eq!(s.root, PathBuf::from("."));
    }
}
