use std::sync::Arc;

use axum::response::Response;
use scrapedesk_core::jobs::multiplexer::Multiplexer;
use scrapedesk_core::jobs::request::JobRequest;
use scrapedesk_core::jobs::runner::run_job;
use tracing::Instrument;

use super::sse::progress_channel;
use crate::config::JobConfig;

/// Starts accepted jobs.
///
/// Every job gets its own task, process and stream. Nothing is shared
/// between jobs and nothing tracks them after they finish.
#[derive(Debug, Clone)]
pub struct JobService {
    config: Arc<JobConfig>,
    multiplexer: Multiplexer,
}

impl JobService {
    pub fn new(config: JobConfig) -> Self {
        let multiplexer = Multiplexer::new(config.drain_grace);
        Self {
            config: Arc::new(config),
            multiplexer,
        }
    }

    /// Spawn the job and return its SSE response.
    ///
    /// The task is detached from the request: a client that disconnects
    /// stops receiving events but the process runs to completion.
    pub fn start(&self, request: JobRequest) -> Response {
        let (response, mut sink) = progress_channel();
        let plan = self.config.plan(&request.kind);
        let multiplexer = self.multiplexer.clone();

        let span = tracing::info_span!(
            "job",
            job = request.kind.name(),
            user_id = request.actor.id,
        );

        tokio::spawn(
            async move {
                let report = run_job(&request.kind, &plan, &multiplexer, &mut sink).await;
                tracing::debug!(
                    lines = report.progress_lines,
                    terminal = ?report.terminal.kind,
                    client_gone = sink.is_disconnected(),
                    "Job task finished"
                );
            }
            .instrument(span),
        );

        response
    }
}
