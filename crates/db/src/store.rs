//! [`PgStore`]: the PostgreSQL implementation of the core collaborator traits.

use async_trait::async_trait;
use scrapedesk_core::actor::Actor;
use scrapedesk_core::category::Category;
use scrapedesk_core::error::CoreError;
use scrapedesk_core::hashing::hash_session_token;
use scrapedesk_core::store::{ActorResolver, CategoryStore};
use scrapedesk_core::types::DbId;

use crate::repositories::{CategoryRepo, SessionRepo};
use crate::DbPool;

/// Store handle injected into application state.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn internal(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(err.to_string())
}

#[async_trait]
impl ActorResolver for PgStore {
    async fn resolve_actor(&self, token: &str) -> Result<Option<Actor>, CoreError> {
        let hash = hash_session_token(token);
        let actor = SessionRepo::find_actor_by_token_hash(&self.pool, &hash)
            .await
            .map_err(internal)?;

        if actor.is_some() {
            if let Err(err) = SessionRepo::touch(&self.pool, &hash).await {
                tracing::warn!(error = %err, "Failed to record session activity");
            }
        }
        Ok(actor.map(Actor::from))
    }
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn find_level_one(&self, id: DbId) -> Result<Option<Category>, CoreError> {
        let row = CategoryRepo::find_level_one(&self.pool, id)
            .await
            .map_err(internal)?;
        Ok(row.map(Category::from))
    }

    async fn list(&self) -> Result<Vec<Category>, CoreError> {
        let rows = CategoryRepo::list(&self.pool).await.map_err(internal)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(internal)
    }
}
