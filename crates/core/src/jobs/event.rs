//! Stream events and the line-to-event translation.

use serde::{Deserialize, Serialize};

/// Discriminant of a [`JobEvent`], serialized as the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobEventKind {
    Start,
    Progress,
    Error,
    Complete,
}

/// One frame of the progress stream: `{"type": "...", "message": "..."}`.
///
/// Events are produced, serialized and dropped immediately; nothing retains
/// them after they are handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobEvent {
    #[serde(rename = "type")]
    pub kind: JobEventKind,
    pub message: String,
}

impl JobEvent {
    pub fn start(message: impl Into<String>) -> Self {
        Self::new(JobEventKind::Start, message)
    }

    pub fn progress(message: impl Into<String>) -> Self {
        Self::new(JobEventKind::Progress, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(JobEventKind::Error, message)
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(JobEventKind::Complete, message)
    }

    fn new(kind: JobEventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// `error` and `complete` close the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, JobEventKind::Error | JobEventKind::Complete)
    }
}

/// Translate one complete stdout line into a progress event.
///
/// The line is trimmed and otherwise passed through untouched. Blank lines
/// produce nothing.
pub fn translate_line(line: &str) -> Option<JobEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(JobEvent::progress(trimmed))
    }
}

/// Destination for the events of one job.
///
/// Implementations must not block for long: the sink is called from the
/// loop that reads the child's pipes.
pub trait EventSink: Send {
    fn emit(&mut self, event: JobEvent);
}

impl EventSink for Vec<JobEvent> {
    fn emit(&mut self, event: JobEvent) {
        self.push(event);
    }
}
