//! Handlers for the streamed admin jobs.
//!
//! Validation failures are plain JSON errors; once a job is accepted the
//! response is an SSE stream and every later failure is an `error` event.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Response;
use scrapedesk_core::jobs::kind::JobKind;
use scrapedesk_core::jobs::request::{self, RecategorizeQuery};

use crate::error::AppResult;
use crate::middleware::auth::CurrentActor;
use crate::state::AppState;

/// GET /api/v1/admin/jobs/recategorize/stream?category_id={id}
///
/// A query string that does not deserialize (unknown or repeated keys) is
/// treated as a missing id, so the caller is still authorized first.
pub async fn stream_recategorize(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    query: Result<Query<RecategorizeQuery>, QueryRejection>,
) -> AppResult<Response> {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected recategorize query string");
            RecategorizeQuery::default()
        }
    };

    let job = request::recategorize(state.categories.as_ref(), actor, &query).await?;

    if let JobKind::Recategorize {
        category_id,
        category_name,
    } = &job.kind
    {
        tracing::info!(
            user_id = job.actor.id,
            category_id,
            category = %category_name,
            "Recategorization requested"
        );
    }

    Ok(state.jobs.start(job))
}

/// GET /api/v1/admin/jobs/scrape/stream
pub async fn stream_scrape(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> AppResult<Response> {
    let job = request::scrape(actor)?;
    tracing::info!(user_id = job.actor.id, "Scrape requested");
    Ok(state.jobs.start(job))
}

/// GET /api/v1/admin/jobs/summarize/stream
///
/// Completes once the wrapper script has detached the summarizer.
pub async fn stream_summarize(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> AppResult<Response> {
    let job = request::summarize(actor)?;
    tracing::info!(user_id = job.actor.id, "Summarizer requested");
    Ok(state.jobs.start(job))
}
