//! Session lookup model.

use scrapedesk_core::actor::Actor;
use scrapedesk_core::types::DbId;
use sqlx::FromRow;

/// The user behind an active session, joined from `user_sessions` and `users`.
#[derive(Debug, Clone, FromRow)]
pub struct SessionActor {
    pub user_id: DbId,
    pub username: String,
    pub is_admin: bool,
}

impl From<SessionActor> for Actor {
    fn from(row: SessionActor) -> Self {
        Actor {
            id: row.user_id,
            username: row.username,
            is_admin: row.is_admin,
        }
    }
}
