/// Transcript sinks: where action handlers write their user-facing lines.
///
/// Handlers take a `&dyn Transcript` instead of reaching for a global
/// output handle, so the same handler can print to a terminal, fill an
/// in-memory buffer, or feed another thread through a channel.
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

/// An append-only line sink.
pub trait Transcript: Send + Sync {
    /// Append one line (without a trailing newline).
    fn line(&self, text: &str);

    /// Discard everything written so far, where the sink supports it.
    fn clear(&self) {}
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemoryTranscript {
    lines: Mutex<Vec<String>>,
}

impl MemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// All lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.lock().join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl Transcript for MemoryTranscript {
    fn line(&self, text: &str) {
        self.lines.lock().push(text.to_owned());
    }

    fn clear(&self) {
        self.lines.lock().clear();
    }
}

/// Events produced by a [`ChannelTranscript`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    Line(String),
    Clear,
}

/// Forwards lines over a crossbeam channel.
///
/// Sends are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelTranscript {
    tx: Sender<TranscriptEvent>,
}

/// Maximum number of undelivered transcript events.
pub const TRANSCRIPT_CHANNEL_CAPACITY: usize = 1_024;

impl ChannelTranscript {
    /// Create a transcript and the receiver that drains it.
    pub fn new() -> (Self, Receiver<TranscriptEvent>) {
        let (tx, rx) = crossbeam_channel::bounded(TRANSCRIPT_CHANNEL_CAPACITY);
        (Self { tx }, rx)
    }
}

impl Transcript for ChannelTranscript {
    fn line(&self, text: &str) {
        let _ = self.tx.send(TranscriptEvent::Line(text.to_owned()));
    }

    fn clear(&self) {
        let _ = self.tx.send(TranscriptEvent::Clear);
    }
}
