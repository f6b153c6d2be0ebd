//! Category entity model and DTOs.

use serde::Serialize;
use skilltrack_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub icon: String,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// A category together with the number of skills filed under it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryWithSkillCount {
    pub id: DbId,
    pub name: String,
    pub icon: String,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub skill_count: i64,
}

/// DTO for creating a category. `icon` is already resolved to a value.
#[derive(Debug)]
pub struct CreateCategory {
    pub user_id: DbId,
    pub name: String,
    pub icon: String,
}

/// DTO for updating a category. `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub icon: Option<String>,
}
