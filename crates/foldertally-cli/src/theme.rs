/// Terminal colour scheme and the stdout transcript.
///
/// Transcript lines carry a status prefix (`[>]`, `[+]`, `[!]`,
/// `[DRY-RUN]`); the prefix alone decides the colour, so the core crate
/// stays free of any styling.
use console::{style, StyledObject, Term};
use foldertally_core::transcript::Transcript;

/// Semantic role of a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Progress,
    Success,
    Error,
    DryRun,
    Heading,
    Plain,
}

/// Classify a line by its prefix.
pub fn classify(line: &str) -> LineKind {
    if line.starts_with("[!]") {
        LineKind::Error
    } else if line.starts_with("[+]") {
        LineKind::Success
    } else if line.starts_with("[>]") {
        LineKind::Progress
    } else if line.starts_with("[DRY-RUN]") {
        LineKind::DryRun
    } else if line.starts_with("==========") {
        LineKind::Heading
    } else {
        LineKind::Plain
    }
}

/// Apply the palette to one line.
pub fn styled(line: &str) -> StyledObject<&str> {
    let s = style(line);
    match classify(line) {
        LineKind::Progress => s.cyan(),
        LineKind::Success => s.green(),
        LineKind::Error => s.red().bold(),
        LineKind::DryRun => s.yellow(),
        LineKind::Heading => s.magenta().bold(),
        LineKind::Plain => s,
    }
}

/// Writes transcript lines to stdout, coloured when stdout is a terminal.
///
/// Output errors (closed pipe) are ignored; the transcript is display only.
pub struct StdoutTranscript {
    term: Term,
}

impl StdoutTranscript {
    pub fn new() -> Self {
        Self { term: Term::stdout() }
    }
}

impl Default for StdoutTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript for StdoutTranscript {
    fn line(&self, text: &str) {
        let _ = self.term.write_line(&styled(text).to_string());
    }

    fn clear(&self) {
        let _ = self.term.clear_screen();
    }
}
