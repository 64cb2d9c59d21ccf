//! Repository for the `user_sessions` table.

use sqlx::PgPool;

use crate::models::session::SessionActor;

/// Session lookups used by actor resolution.
pub struct SessionRepo;

impl SessionRepo {
    /// Find the active user behind a session token digest.
    ///
    /// Only returns sessions that are not revoked, not expired, and belong to
    /// an active user.
    pub async fn find_actor_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<SessionActor>, sqlx::Error> {
        sqlx::query_as::<_, SessionActor>(
            "SELECT u.id AS user_id, u.username, u.is_admin
             FROM user_sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token_hash = $1
               AND s.is_revoked = false
               AND s.expires_at > NOW()
               AND u.is_active = true",
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Record activity on a session. Returns `true` if the row was updated.
    pub async fn touch(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET last_seen_at = NOW() WHERE token_hash = $1 AND is_revoked = false",
        )
        .bind(token_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
