//! Article category model shared by the store and the recategorization job.

use serde::Serialize;

use crate::types::DbId;

/// Top-level categories; only these can be recategorized.
pub const LEVEL_ONE: i32 = 1;

/// A row of the two-level category hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub level: i32,
    pub parent_id: Option<DbId>,
}

impl Category {
    pub fn is_level_one(&self) -> bool {
        self.level == LEVEL_ONE
    }
}
