//! Job lifecycle and terminal event resolution.

use std::fmt;

use super::event::JobEvent;
use super::kind::JobKind;
use super::multiplexer::{ProcessExit, ProcessOutcome};

/// Lifecycle phase of one job.
///
/// ```text
/// NotStarted -> Launched -> Running -> Resolved -> Closed
///      \____________________________________________/   (rejected or failed to launch)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    NotStarted,
    Launched,
    Running,
    Resolved,
    Closed,
}

impl JobPhase {
    pub fn can_transition_to(self, next: JobPhase) -> bool {
        use JobPhase::*;
        matches!(
            (self, next),
            (NotStarted, Launched)
                | (NotStarted, Closed)
                | (Launched, Running)
                | (Running, Resolved)
                | (Resolved, Closed)
        )
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not_started",
            Self::Launched => "launched",
            Self::Running => "running",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal job transition {from} -> {to}")]
pub struct InvalidTransition {
    pub from: JobPhase,
    pub to: JobPhase,
}

/// Tracks the phase of a job and rejects out-of-order transitions.
#[derive(Debug)]
pub struct Lifecycle {
    phase: JobPhase,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            phase: JobPhase::NotStarted,
        }
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn advance(&mut self, next: JobPhase) -> Result<(), InvalidTransition> {
        if !self.phase.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }
}

/// Human-readable reason for a failed run.
///
/// Buffered stderr wins; an empty stderr falls back to the exit status.
pub fn failure_detail(exit: ProcessExit, stderr: &[String]) -> String {
    let joined = stderr.join("\n");
    let joined = joined.trim();
    if !joined.is_empty() {
        return joined.to_string();
    }
    match exit {
        ProcessExit::Code(code) => format!("Process exited with code {code}"),
        ProcessExit::Signal(Some(signal)) => format!("Process terminated by signal {signal}"),
        ProcessExit::Signal(None) => "Process terminated abnormally".to_string(),
    }
}

/// The single terminal event for a finished process.
pub fn resolve(kind: &JobKind, outcome: &ProcessOutcome) -> JobEvent {
    if outcome.exit.success() {
        JobEvent::complete(kind.success_message())
    } else {
        JobEvent::error(kind.failure_message(&failure_detail(outcome.exit, &outcome.stderr)))
    }
}
