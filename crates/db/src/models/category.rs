//! Category entity model.

use scrapedesk_core::category::Category;
use scrapedesk_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full row from the `categories` table.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub level: i32,
    pub parent_id: Option<DbId>,
    pub created_at: Timestamp,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            description: row.description,
            level: row.level,
            parent_id: row.parent_id,
        }
    }
}
