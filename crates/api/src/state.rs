use std::sync::Arc;

use scrapedesk_core::store::{ActorResolver, CategoryStore};

use crate::jobs::JobService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Collaborators are injected as trait objects so the server can run against
/// PostgreSQL in production and in-memory stores in tests. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Session token -> actor resolution.
    pub actors: Arc<dyn ActorResolver>,
    /// Category lookups for job validation and listing.
    pub categories: Arc<dyn CategoryStore>,
    /// Launches external jobs and streams their progress.
    pub jobs: Arc<JobService>,
}
