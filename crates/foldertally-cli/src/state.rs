/// Menu state machine.
///
/// Centralises everything the interactive menu reads and writes. Actions
/// run on a background thread and report through a `ChannelTranscript`;
/// `process_messages()` drains that channel into the visible transcript
/// and notices when the task has finished. The frontend decides how often
/// to pump (the terminal menu pumps until the task is done).
use crate::settings::Settings;
use crossbeam_channel::{Receiver, TryRecvError};
use foldertally_core::actions;
use foldertally_core::transcript::{ChannelTranscript, TranscriptEvent};
use std::thread;

/// The current phase of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// Nothing has run yet, or the transcript was cleared.
    Idle,
    /// A scan or analysis is running on the worker thread.
    Running,
    /// The last task finished; its output is in the transcript.
    Finished,
}

/// Menu choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Scan,
    Analyze,
    Clear,
    Quit,
}

impl MenuAction {
    /// Parse a menu selection: the option number, or its name.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "scan" | "s" => Some(Self::Scan),
            "2" | "analyze" | "analyse" | "a" => Some(Self::Analyze),
            "3" | "clear" | "c" => Some(Self::Clear),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Scan => "1. Scan folders",
            Self::Analyze => "2. Analyze log",
            Self::Clear => "3. Clear",
            Self::Quit => "q. Quit",
        }
    }

    pub const ALL: [MenuAction; 4] = [Self::Scan, Self::Analyze, Self::Clear, Self::Quit];
}

/// Result summary of a finished task, for the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Scanned { folders: usize },
    Analysed { sessions: u64, unique: usize },
    Failed { message: String },
}

/// A task running on the worker thread.
struct TaskHandle {
    events: Receiver<TranscriptEvent>,
    done: Receiver<TaskOutcome>,
    _thread: thread::JoinHandle<()>,
}

/// Maximum transcript events drained per `process_messages()` call.
///
/// Keeps one pump bounded when a large scan floods the channel; the next
/// call picks up the rest.
const MAX_MESSAGES_PER_PUMP: usize = 500;

/// Maximum transcript lines retained. Older lines are dropped first.
pub const MAX_TRANSCRIPT_LINES: usize = 10_000;

pub struct AppState {
    pub settings: Settings,
    pub phase: AppPhase,
    /// Visible transcript lines, oldest first.
    pub transcript: Vec<String>,
    /// Outcome of the most recent finished task.
    pub last_outcome: Option<TaskOutcome>,
    /// Lines of the current task not yet handed out by `take_new_lines()`.
    unseen: Vec<String>,
    task: Option<TaskHandle>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            phase: AppPhase::Idle,
            transcript: Vec::new(),
            last_outcome: None,
            unseen: Vec::new(),
            task: None,
        }
    }

    /// Start scanning the configured root into the configured log.
    ///
    /// Ignored while another task is running.
    pub fn start_scan(&mut self) {
        let root = self.settings.root.clone();
        let log = self.settings.log_path.clone();
        self.spawn_task("foldertally-scan", move |t| {
            match actions::scan_folders(&root, &log, t) {
                Ok(summary) => TaskOutcome::Scanned {
                    folders: summary.folder_count(),
                },
                Err(e) => TaskOutcome::Failed {
                    message: e.to_string(),
                },
            }
        });
    }

    /// Start analysing the configured log.
    ///
    /// Ignored while another task is running.
    pub fn start_analyze(&mut self) {
        let log = self.settings.log_path.clone();
        self.spawn_task("foldertally-analyze", move |t| {
            match actions::analyze_list(&log, t) {
                Ok(a) => TaskOutcome::Analysed {
                    sessions: a.session_count,
                    unique: a.unique_count(),
                },
                Err(e) => TaskOutcome::Failed {
                    message: e.to_string(),
                },
            }
        });
    }

    /// Empty the transcript. Does nothing while a task is running.
    pub fn clear(&mut self) {
        if self.phase == AppPhase::Running {
            return;
        }
        self.transcript.clear();
        self.unseen.clear();
        self.last_outcome = None;
        self.phase = AppPhase::Idle;
    }

    /// Lines pushed since the current task started (or since the last
    /// call), oldest first. Unaffected by the transcript cap.
    pub fn take_new_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.unseen)
    }

    pub fn is_running(&self) -> bool {
        self.phase == AppPhase::Running
    }

    fn spawn_task<F>(&mut self, name: &str, work: F)
    where
        F: FnOnce(&ChannelTranscript) -> TaskOutcome + Send + 'static,
    {
        if self.is_running() {
            tracing::warn!("Ignoring {name}: a task is already running");
            return;
        }
        self.unseen.clear();

        let (transcript, events) = ChannelTranscript::new();
        let (done_tx, done_rx) = crossbeam_channel::bounded::<TaskOutcome>(1);

        let spawned = thread::Builder::new()
            .name(name.into())
            .spawn(move || {
                let outcome = work(&transcript);
                let _ = done_tx.send(outcome);
            });

        match spawned {
            Ok(handle) => {
                self.phase = AppPhase::Running;
                self.task = Some(TaskHandle {
                    events,
                    done: done_rx,
                    _thread: handle,
                });
            }
            Err(e) => {
                let message = format!("cannot start {name}: {e}");
                self.push_line(format!("[!] Error: {message}"));
                self.last_outcome = Some(TaskOutcome::Failed { message });
                self.phase = AppPhase::Finished;
            }
        }
    }

    fn push_line(&mut self, line: String) {
        cap_push(&mut self.unseen, line.clone());
        cap_push(&mut self.transcript, line);
    }

    /// Drain pending transcript events and check for task completion.
    ///
    /// Returns `true` if anything changed. The task only counts as
    /// finished once its transcript channel is fully drained, so no line
    /// is lost between the last event and the outcome.
    pub fn process_messages(&mut self) -> bool {
        let Some(task) = self.task.as_ref() else {
            return false;
        };

        let mut events = Vec::new();
        let mut disconnected = false;
        while events.len() < MAX_MESSAGES_PER_PUMP {
            match task.events.try_recv() {
                Ok(ev) => events.push(ev),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        let outcome = if disconnected {
            task.done.try_recv().ok()
        } else {
            None
        };

        let changed = !events.is_empty() || disconnected;
        for ev in events {
            match ev {
                TranscriptEvent::Line(line) => self.push_line(line),
                TranscriptEvent::Clear => {
                    self.transcript.clear();
                    self.unseen.clear();
                }
            }
        }

        if disconnected {
            self.task = None;
            self.phase = AppPhase::Finished;
            self.last_outcome = Some(outcome.unwrap_or_else(|| TaskOutcome::Failed {
                message: "task ended without a result".into(),
            }));
        }
        changed
    }

    /// One-line status summary for the menu footer.
    pub fn status_line(&self) -> String {
        match (&self.phase, &self.last_outcome) {
            (AppPhase::Running, _) => "Working...".into(),
            (_, Some(TaskOutcome::Scanned { folders })) => format!("Last scan: {folders} folders"),
            (_, Some(TaskOutcome::Analysed { sessions, unique })) => {
                format!("Last analysis: {sessions} sessions, {unique} unique folders")
            }
            (_, Some(TaskOutcome::Failed { message })) => format!("Last task failed: {message}"),
            (_, None) => format!("Log: {}", self.settings.log_path.display()),
        }
    }
}

/// Push onto a line buffer, dropping the oldest lines past the cap.
fn cap_push(lines: &mut Vec<String>, line: String) {
    if lines.len() >= MAX_TRANSCRIPT_LINES {
        let excess = lines.len() + 1 - MAX_TRANSCRIPT_LINES;
        lines.drain(..excess);
    }
    lines.push(line);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_menu_choices() {
        assert_eq!(MenuAction::parse("1"), Some(MenuAction::Scan));
        assert_eq!(MenuAction::parse(" Analyze \n"), Some(MenuAction::Analyze));
        assert_eq!(MenuAction::parse("3"), Some(MenuAction::Clear));
        assert_eq!(MenuAction::parse("Q"), Some(MenuAction::Quit));
        assert_eq!(MenuAction::parse("9"), None);
        assert_eq!(MenuAction::parse(""), None);
    }

    #[test]
    fn transcript_is_capped() {
        let mut state = AppState::new(Settings::default());
        for i in 0..MAX_TRANSCRIPT_LINES + 5 {
            state.push_line(i.to_string());
        }
        assert_eq!(state.transcript.len(), MAX_TRANSCRIPT_LINES);
        assert_eq!(state.transcript[0], "5");
        let fresh = state.take_new_lines();
        assert_eq!(fresh.len(), MAX_TRANSCRIPT_LINES);
        assert!(state.take_new_lines().is_empty());
    }

    #[test]
    fn process_without_task_is_noop() {
        let mut state = AppState::new(Settings::default());
        assert!(!state.process_messages());
        assert_eq!(state.phase, AppPhase::Idle);
    }
}
