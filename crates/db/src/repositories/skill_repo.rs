//! Repository for the `skills` table.
//!
//! `total_xp` and `current_level` are written in exactly one place,
//! [`SkillRepo::set_xp_and_level`], and only ever with values produced by
//! the progression engine from a row-locked read.

use skilltrack_core::progression::{SkillProgress, XpChange};
use skilltrack_core::types::{DbId, Level, Xp};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::error::LedgerError;
use crate::models::skill::{CreateSkill, Skill, SkillStats, UpdateSkill};

/// Column list for skill read queries; expects `skills s` and a
/// `LEFT JOIN categories c`.
const COLUMNS: &str = "s.id, s.name, s.description, s.current_level, s.target_level, \
                       s.total_xp, s.category_id, s.user_id, s.created_at, s.updated_at, \
                       c.name AS category_name";

/// Provides CRUD operations and the XP mutation for skills.
pub struct SkillRepo;

impl SkillRepo {
    /// Insert a new skill at level 1 with 0 XP, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSkill) -> Result<Skill, sqlx::Error> {
        let query = format!(
            "WITH s AS (
                INSERT INTO skills (name, description, target_level, category_id, user_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
             )
             SELECT {COLUMNS} FROM s
             LEFT JOIN categories c ON c.id = s.category_id"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.target_level)
            .bind(input.category_id)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a skill by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Skill>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM skills s
             LEFT JOIN categories c ON c.id = s.category_id
             WHERE s.id = $1"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's skills ordered by name.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM skills s
             LEFT JOIN categories c ON c.id = s.category_id
             WHERE s.user_id = $1
             ORDER BY s.name"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List a user's skills filed under one category, ordered by name.
    pub async fn list_by_category(
        pool: &PgPool,
        user_id: DbId,
        category_id: DbId,
    ) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM skills s
             LEFT JOIN categories c ON c.id = s.category_id
             WHERE s.user_id = $1 AND s.category_id = $2
             ORDER BY s.name"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(user_id)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Update skill metadata. Only non-`None` fields in `input` are applied;
    /// an empty `description` clears it.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSkill,
    ) -> Result<Option<Skill>, sqlx::Error> {
        let query = format!(
            "WITH s AS (
                UPDATE skills SET
                    name = COALESCE($2, name),
                    description = NULLIF(COALESCE($3, description), ''),
                    target_level = COALESCE($4, target_level),
                    category_id = COALESCE($5, category_id)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM s
             LEFT JOIN categories c ON c.id = s.category_id"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.target_level)
            .bind(input.category_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a skill. Its practice sessions are removed with it.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Aggregate skill figures for a user.
    pub async fn stats_by_user(pool: &PgPool, user_id: DbId) -> Result<SkillStats, sqlx::Error> {
        sqlx::query_as::<_, SkillStats>(
            "SELECT
                COUNT(*) AS total_skills,
                COALESCE(SUM(total_xp), 0)::BIGINT AS total_xp,
                ROUND(COALESCE(AVG(current_level), 0), 1)::FLOAT8 AS avg_level,
                COALESCE(MAX(current_level), 0) AS max_level
             FROM skills
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // XP mutation
    // -----------------------------------------------------------------------

    /// Apply a signed XP delta to a skill and recompute its level, in one
    /// transaction.
    ///
    /// Returns `None` if the skill does not exist. A delta that would push
    /// the total past the ceiling rolls back with a validation error.
    pub async fn apply_xp_delta(
        pool: &PgPool,
        id: DbId,
        delta: Xp,
    ) -> Result<Option<XpChange>, LedgerError> {
        let mut tx = pool.begin().await?;
        let change = Self::apply_xp_delta_in(&mut *tx, id, None, delta).await?;
        tx.commit().await?;
        Ok(change)
    }

    /// Persist `total_xp` and `current_level` together.
    ///
    /// Returns `true` if the row was updated.
    pub async fn set_xp_and_level<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        total_xp: Xp,
        current_level: Level,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE skills SET total_xp = $2, current_level = $3 WHERE id = $1")
            .bind(id)
            .bind(total_xp)
            .bind(current_level)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Row-lock a skill, apply `delta` through the progression engine, and
    /// write the result back on the same connection.
    ///
    /// When `owner` is given, a skill belonging to anyone else is treated as
    /// absent. Returns `None` if no matching skill exists.
    pub(crate) async fn apply_xp_delta_in(
        conn: &mut PgConnection,
        id: DbId,
        owner: Option<DbId>,
        delta: Xp,
    ) -> Result<Option<XpChange>, LedgerError> {
        let Some(mut progress) = Self::lock_progress(&mut *conn, id, owner).await? else {
            return Ok(None);
        };

        let change = progress.apply_delta(delta)?;
        Self::set_xp_and_level(&mut *conn, id, progress.total_xp, progress.current_level).await?;

        tracing::debug!(
            skill_id = id,
            delta,
            old_level = change.old_level,
            new_level = change.new_level,
            total_xp = change.total_xp,
            "Applied XP delta",
        );
        Ok(Some(change))
    }

    async fn lock_progress(
        conn: &mut PgConnection,
        id: DbId,
        owner: Option<DbId>,
    ) -> Result<Option<SkillProgress>, sqlx::Error> {
        let row: Option<(Xp, Level)> = sqlx::query_as(
            "SELECT total_xp, current_level FROM skills
             WHERE id = $1 AND ($2::BIGINT IS NULL OR user_id = $2)
             FOR UPDATE",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(|(total_xp, current_level)| SkillProgress {
            total_xp,
            current_level,
        }))
    }
}
