pub mod categories;
pub mod health;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                                 list (authenticated)
///
/// /admin/jobs/recategorize/stream             SSE (admin)
/// /admin/jobs/scrape/stream                   SSE (admin)
/// /admin/jobs/summarize/stream                SSE (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", categories::router())
        .nest("/admin/jobs", jobs::router())
}
