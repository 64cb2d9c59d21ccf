//! HTTP side of the job subsystem: the SSE transport and the service that
//! spawns one detached task per accepted job.

pub mod service;
pub mod sse;

pub use service::JobService;
