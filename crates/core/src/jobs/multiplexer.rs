//! Concurrent reading of a job's stdout and stderr.
//!
//! One reader task per pipe pulls raw chunks and forwards them, in read
//! order, over a bounded channel. The owning loop assembles lines and waits
//! on the child at the same time, so neither a chatty pipe nor a silent one
//! can stall the other, and there is no fixed polling interval.

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::launcher::JobProcess;
use super::line_buffer::LineBuffer;

/// Size of a single pipe read.
const READ_CHUNK_BYTES: usize = 8 * 1024;

/// Chunks in flight between a reader task and the owning loop.
const CHANNEL_CAPACITY: usize = 64;

/// Maximum stderr retained for the failure message (1 MiB).
///
/// Past this limit the oldest lines are dropped; the last ones name the
/// cause.
const MAX_STDERR_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipe {
    Stdout,
    Stderr,
}

impl Pipe {
    fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl fmt::Display for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum PipeMessage {
    Chunk(Pipe, Vec<u8>),
    Closed(Pipe),
    Failed(Pipe, io::Error),
}

/// How the child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    /// Normal exit with a status code.
    Code(i32),
    /// Terminated by a signal (Unix), if known.
    Signal(Option<i32>),
}

impl ProcessExit {
    pub fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => Self::Code(code),
            None => Self::Signal(signal_of(status)),
        }
    }

    pub fn success(self) -> bool {
        self == Self::Code(0)
    }
}

#[cfg(unix)]
fn signal_of(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal_of(_status: ExitStatus) -> Option<i32> {
    None
}

/// What the multiplexer observed once the process ended and the pipes
/// were drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub exit: ProcessExit,
    /// Trimmed, non-empty stderr lines in the order they were written.
    pub stderr: Vec<String>,
    /// Number of stdout lines forwarded to the caller.
    pub progress_lines: usize,
    /// `false` when the drain grace period expired with a pipe still open.
    pub drained: bool,
}

/// Reads both pipes of a [`JobProcess`] until it exits.
#[derive(Debug, Clone)]
pub struct Multiplexer {
    drain_grace: Duration,
}

impl Multiplexer {
    /// `drain_grace` bounds how long the pipes are read after the process
    /// has exited. A grandchild that inherited a pipe could otherwise keep
    /// the job open forever.
    pub fn new(drain_grace: Duration) -> Self {
        Self { drain_grace }
    }

    /// Forward every trimmed, non-empty stdout line to `on_line` in
    /// production order and collect stderr until the process exits.
    ///
    /// The process handle and both pipes are released before returning.
    pub async fn run<F>(&self, process: JobProcess, on_line: F) -> io::Result<ProcessOutcome>
    where
        F: FnMut(String),
    {
        let JobProcess {
            mut child,
            stdout,
            stderr,
            pid,
        } = process;

        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
        let readers = [
            spawn_reader(Pipe::Stdout, stdout, tx.clone()),
            spawn_reader(Pipe::Stderr, stderr, tx),
        ];

        let mut collector = Collector::new(on_line);
        let mut open_pipes = 2usize;

        let status = loop {
            tokio::select! {
                message = rx.recv(), if open_pipes > 0 => match message {
                    Some(message) => open_pipes -= collector.absorb(message),
                    None => open_pipes = 0,
                },
                status = child.wait() => break status?,
            }
        };
        let exit = ProcessExit::from_status(status);
        tracing::debug!(?pid, ?exit, "Job process exited, draining pipes");

        let deadline = Instant::now() + self.drain_grace;
        while open_pipes > 0 {
            match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(Some(message)) => open_pipes -= collector.absorb(message),
                Ok(None) => open_pipes = 0,
                Err(_) => {
                    tracing::warn!(
                        ?pid,
                        open_pipes,
                        grace_ms = self.drain_grace.as_millis() as u64,
                        "Job pipes still open after exit, abandoning drain"
                    );
                    break;
                }
            }
        }
        let drained = open_pipes == 0;
        for reader in &readers {
            reader.abort();
        }

        // A fragment is a partial write if the process was killed or a
        // pipe was still being written when the drain was abandoned.
        let keep_partial = matches!(exit, ProcessExit::Code(_)) && drained;
        Ok(collector.finish(exit, keep_partial, drained))
    }
}

fn spawn_reader<R>(pipe: Pipe, reader: R, tx: mpsc::Sender<PipeMessage>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(pump(pipe, reader, tx))
}

async fn pump<R>(pipe: Pipe, mut reader: R, tx: mpsc::Sender<PipeMessage>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_CHUNK_BYTES];
    loop {
        let message = match reader.read(&mut buf).await {
            Ok(0) => PipeMessage::Closed(pipe),
            Ok(n) => PipeMessage::Chunk(pipe, buf[..n].to_vec()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => PipeMessage::Failed(pipe, e),
        };
        let last = !matches!(message, PipeMessage::Chunk(..));
        if tx.send(message).await.is_err() || last {
            return;
        }
    }
}

/// Line assembly and routing for both pipes.
struct Collector<F> {
    stdout: LineBuffer,
    stderr: LineBuffer,
    stderr_lines: VecDeque<String>,
    stderr_bytes: usize,
    stderr_dropped: usize,
    progress_lines: usize,
    on_line: F,
}

impl<F: FnMut(String)> Collector<F> {
    fn new(on_line: F) -> Self {
        Self {
            stdout: LineBuffer::new(),
            stderr: LineBuffer::new(),
            stderr_lines: VecDeque::new(),
            stderr_bytes: 0,
            stderr_dropped: 0,
            progress_lines: 0,
            on_line,
        }
    }

    /// Handle one message; returns how many pipes it closed (0 or 1).
    fn absorb(&mut self, message: PipeMessage) -> usize {
        match message {
            PipeMessage::Chunk(Pipe::Stdout, bytes) => {
                for line in self.stdout.push(&bytes) {
                    self.stdout_line(&line);
                }
                0
            }
            PipeMessage::Chunk(Pipe::Stderr, bytes) => {
                for line in self.stderr.push(&bytes) {
                    self.stderr_line(&line);
                }
                0
            }
            PipeMessage::Closed(_) => 1,
            PipeMessage::Failed(pipe, err) => {
                tracing::warn!(%pipe, error = %err, "Failed reading job output");
                1
            }
        }
    }

    fn stdout_line(&mut self, line: &str) {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            self.progress_lines += 1;
            (self.on_line)(trimmed.to_string());
        }
    }

    fn stderr_line(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        self.stderr_bytes += trimmed.len();
        self.stderr_lines.push_back(trimmed.to_string());
        while self.stderr_bytes > MAX_STDERR_BYTES && self.stderr_lines.len() > 1 {
            if let Some(oldest) = self.stderr_lines.pop_front() {
                self.stderr_bytes -= oldest.len();
                self.stderr_dropped += 1;
            }
        }
    }

    fn finish(mut self, exit: ProcessExit, keep_partial: bool, drained: bool) -> ProcessOutcome {
        if let Some(line) = self.stdout.finish(keep_partial) {
            self.stdout_line(&line);
        }
        if let Some(line) = self.stderr.finish(keep_partial) {
            self.stderr_line(&line);
        }
        if self.stderr_dropped > 0 {
            tracing::warn!(
                dropped = self.stderr_dropped,
                "Job stderr exceeded retention limit, kept the most recent lines"
            );
        }
        let clipped = self.stdout.clipped_lines() + self.stderr.clipped_lines();
        if clipped > 0 {
            tracing::warn!(clipped, "Job printed overlong lines, kept their tails");
        }
        ProcessOutcome {
            exit,
            stderr: self.stderr_lines.into(),
            progress_lines: self.progress_lines,
            drained,
        }
    }
}
