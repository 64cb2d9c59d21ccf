//! Route definitions for the streamed admin jobs.
//!
//! Both endpoints require an admin session.

use axum::routing::get;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/admin/jobs`.
///
/// ```text
/// GET    /recategorize/stream?category_id=   -> stream_recategorize
/// GET    /scrape/stream                      -> stream_scrape
/// GET    /summarize/stream                   -> stream_summarize
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recategorize/stream", get(jobs::stream_recategorize))
        .route("/scrape/stream", get(jobs::stream_scrape))
        .route("/summarize/stream", get(jobs::stream_summarize))
}
