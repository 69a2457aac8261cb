/// Interactive terminal menu.
///
/// Draws a boxed menu centred on the terminal, reads one choice per line
/// from stdin, and runs it through [`AppState`]. Output from the running
/// task is printed as it arrives.
use crate::settings::Settings;
use crate::state::{AppState, MenuAction};
use crate::theme;
use console::{style, Term};
use std::io::{self, BufRead};
use std::time::Duration;

const TITLE: &str = "FOLDER TALLY";
const BOX_WIDTH: usize = 40;
const PUMP_INTERVAL: Duration = Duration::from_millis(20);

/// Left padding that centres a block of `content` columns in `total`.
pub fn center_pad(total: usize, content: usize) -> usize {
    total.saturating_sub(content) / 2
}

/// The menu box as plain lines, each already padded for `term_width`.
pub fn render_menu(term_width: usize, status: &str) -> Vec<String> {
    let inner = BOX_WIDTH - 2;
    let pad = " ".repeat(center_pad(term_width, BOX_WIDTH));
    let border = format!("{pad}+{}+", "-".repeat(inner));
    let row = |text: &str| {
        let text: String = text.chars().take(inner - 2).collect();
        format!("{pad}| {text:<width$} |", width = inner - 2)
    };

    let mut lines = vec![border.clone()];
    let title_pad = center_pad(inner - 2, TITLE.len());
    lines.push(row(&format!("{}{TITLE}", " ".repeat(title_pad))));
    lines.push(border.clone());
    for action in MenuAction::ALL {
        lines.push(row(action.label()));
    }
    lines.push(border);
    lines.push(format!("{pad}{status}"));
    lines
}

/// Run the menu until the user quits or stdin closes.
pub fn run(settings: Settings) -> io::Result<()> {
    let term = Term::stdout();
    let mut state = AppState::new(settings);
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        for line in render_menu(state.settings.term_width, &state.status_line()) {
            term.write_line(&line)?;
        }
        term.write_str("Select an option: ")?;
        term.flush()?;

        let mut choice = String::new();
        if input.read_line(&mut choice)? == 0 {
            term.write_line("")?;
            return Ok(());
        }

        match MenuAction::parse(&choice) {
            Some(MenuAction::Scan) => {
                state.start_scan();
                follow(&term, &mut state)?;
            }
            Some(MenuAction::Analyze) => {
                state.start_analyze();
                follow(&term, &mut state)?;
            }
            Some(MenuAction::Clear) => {
                state.clear();
                term.clear_screen()?;
            }
            Some(MenuAction::Quit) => return Ok(()),
            None => {
                term.write_line(&style("Invalid option.").red().to_string())?;
            }
        }
    }
}

/// Pump the state until the running task finishes, printing its lines.
fn follow(term: &Term, state: &mut AppState) -> io::Result<()> {
    follow_with(state, |line| term.write_line(&theme::styled(line).to_string()))
}

/// Pump the state until the running task finishes, handing every line the
/// task produces to `emit` exactly once.
pub fn follow_with<F>(state: &mut AppState, mut emit: F) -> io::Result<()>
where
    F: FnMut(&str) -> io::Result<()>,
{
    loop {
        state.process_messages();
        for line in state.take_new_lines() {
            emit(&line)?;
        }
        if !state.is_running() {
            return Ok(());
        }
        std::thread::sleep(PUMP_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MAX_TRANSCRIPT_LINES;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn padding_centres_and_saturates() {
        assert_eq!(center_pad(80, 40), 20);
        assert_eq!(center_pad(41, 40), 0);
        assert_eq!(center_pad(20, 40), 0);
    }

    #[test]
    fn menu_lines_share_width() {
        let lines = render_menu(80, "Log: list.txt");
        let boxed = &lines[..lines.len() - 1];
        assert!(boxed.iter().all(|l| l.chars().count() == 20 + BOX_WIDTH));
        assert!(lines.iter().any(|l| l.contains(TITLE)));
        assert!(lines.iter().any(|l| l.contains("1. Scan folders")));
        assert!(lines.iter().any(|l| l.contains("q. Quit")));
        assert_eq!(lines.last().unwrap().trim(), "Log: list.txt");
    }

    #[test]
    fn narrow_terminal_has_no_padding() {
        let lines = render_menu(10, "");
        assert!(lines[0].starts_with('+'));
    }

    #[test]
    fn follow_prints_each_task_once_with_a_full_transcript() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        for i in 0..40 {
            fs::create_dir_all(root.join(format!("dir{i:02}"))).unwrap();
        }
        let settings = Settings {
            log_path: tmp.path().join("list.txt"),
            root,
            term_width: 80,
        };
        let mut state = AppState::new(settings);
        state.transcript = (0..MAX_TRANSCRIPT_LINES).map(|i| format!("OLD{i}")).collect();

        let mut printed: Vec<String> = Vec::new();
        for _ in 0..2 {
            state.start_scan();
            follow_with(&mut state, |line| {
                printed.push(line.to_owned());
                Ok(())
            })
            .unwrap();
        }

        assert!(!printed.iter().any(|l| l.starts_with("OLD")));
        let headers = printed
            .iter()
            .filter(|l| l.starts_with("[>] Scanning folders in "))
            .count();
        let saved = printed
            .iter()
            .filter(|l| l.starts_with("[+] Saved 40 folders"))
            .count();
        assert_eq!(headers, 2);
        assert_eq!(saved, 2);
        assert_eq!(printed.iter().filter(|l| l.as_str() == "    - dir07").count(), 2);
        // header, 40 folders, saved line, blank line; twice
        assert_eq!(printed.len(), 2 * 43);
        assert_eq!(state.transcript.len(), MAX_TRANSCRIPT_LINES);
    }
}
