//! The authenticated caller as seen by the job subsystem.

use serde::Serialize;

use crate::types::DbId;

/// Capability snapshot of the user behind a session token.
///
/// Resolved once per request by an [`ActorResolver`](crate::store::ActorResolver)
/// and never refreshed while a job is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub id: DbId,
    pub username: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn can_run_jobs(&self) -> bool {
        self.is_admin
    }
}
