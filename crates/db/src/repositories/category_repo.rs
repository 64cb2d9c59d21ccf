//! Repository for the `categories` table.

use scrapedesk_core::category::LEVEL_ONE;
use scrapedesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::CategoryRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, level, parent_id, created_at";

/// Read operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Find a category by id, only if it sits at level 1.
    pub async fn find_level_one(pool: &PgPool, id: DbId) -> Result<Option<CategoryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 AND level = $2");
        sqlx::query_as::<_, CategoryRow>(&query)
            .bind(id)
            .bind(LEVEL_ONE)
            .fetch_optional(pool)
            .await
    }

    /// List all categories ordered by level, then parent, then name.
    pub async fn list(pool: &PgPool) -> Result<Vec<CategoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             ORDER BY level ASC, parent_id ASC NULLS FIRST, name ASC"
        );
        sqlx::query_as::<_, CategoryRow>(&query).fetch_all(pool).await
    }
}
