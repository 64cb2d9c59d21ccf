//! External job execution with live progress streaming.
//!
//! A job is one run of an external script tied to one client request:
//!
//! 1. [`request`] validates the caller and the target into a [`request::JobRequest`].
//! 2. [`launcher`] resolves the interpreter and spawns the process with
//!    stdin closed and both output pipes captured.
//! 3. [`multiplexer`] reads both pipes concurrently, assembling lines with a
//!    [`line_buffer::LineBuffer`] per pipe, and detects process exit.
//! 4. [`event`] turns stdout lines into progress events.
//! 5. [`outcome`] turns the exit status and buffered stderr into exactly one
//!    terminal event.
//!
//! [`runner::run_job`] wires the steps together against an
//! [`event::EventSink`]. Nothing here knows about HTTP.

pub mod event;
pub mod kind;
pub mod launcher;
pub mod line_buffer;
pub mod multiplexer;
pub mod outcome;
pub mod request;
pub mod runner;
