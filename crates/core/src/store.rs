//! Collaborator seams consumed by the API layer.
//!
//! The job subsystem never touches the database directly. Handlers receive
//! these traits through application state, so the PostgreSQL implementation
//! and in-memory test doubles are interchangeable.

use async_trait::async_trait;

use crate::actor::Actor;
use crate::category::Category;
use crate::error::CoreError;
use crate::types::DbId;

/// Resolves an opaque client session token into an [`Actor`].
#[async_trait]
pub trait ActorResolver: Send + Sync {
    /// Returns `Ok(None)` for unknown, expired, or deactivated sessions.
    async fn resolve_actor(&self, token: &str) -> Result<Option<Actor>, CoreError>;
}

/// Read access to categories.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Find a category by id, only if it is a level-1 category.
    async fn find_level_one(&self, id: DbId) -> Result<Option<Category>, CoreError>;

    /// All categories ordered by level, parent, then name.
    async fn list(&self) -> Result<Vec<Category>, CoreError>;

    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> Result<(), CoreError>;
}
