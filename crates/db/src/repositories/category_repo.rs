//! Repository for the `categories` table.

use skilltrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, CategoryWithSkillCount, CreateCategory, UpdateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, icon, user_id, created_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, icon, user_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.icon)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a category by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's categories with the number of skills in each.
    pub async fn list_with_skill_count(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CategoryWithSkillCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryWithSkillCount>(
            "SELECT c.id, c.name, c.icon, c.user_id, c.created_at, COUNT(s.id) AS skill_count
             FROM categories c
             LEFT JOIN skills s ON s.category_id = c.id
             WHERE c.user_id = $1
             GROUP BY c.id
             ORDER BY c.name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Update a category. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                icon = COALESCE($3, icon)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.icon)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Its skills survive with `category_id = NULL`.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
