//! Repository for the `practice_sessions` table (the XP ledger).
//!
//! Entries are never inserted, re-valued, or deleted on their own: each of
//! those writes is paired with the matching XP mutation on the owning skill
//! inside a single transaction. Dropping the transaction on an early return
//! rolls both halves back.

use skilltrack_core::error::CoreError;
use skilltrack_core::ledger;
use skilltrack_core::progression::XpChange;
use skilltrack_core::types::{DbId, Xp};
use sqlx::{PgConnection, PgPool};

use crate::error::LedgerError;
use crate::models::practice_session::{
    CreatePracticeSession, LedgerAdjustment, LedgerReceipt, PracticeSession,
    PracticeSessionStats, UpdatePracticeSession,
};
use crate::repositories::SkillRepo;

/// Column list for session read queries; expects `practice_sessions p` and a
/// `JOIN skills sk`.
const COLUMNS: &str = "p.id, p.skill_id, p.date, p.duration_minutes, p.xp_gained, p.notes, \
                       p.user_id, p.created_at, sk.name AS skill_name";

/// Provides ledger operations and listings for practice sessions.
pub struct PracticeSessionRepo;

impl PracticeSessionRepo {
    // -----------------------------------------------------------------------
    // Ledger operations
    // -----------------------------------------------------------------------

    /// Log a session and grant its XP to the skill in one transaction.
    ///
    /// Returns `None` if the skill does not exist or belongs to another user.
    pub async fn create_with_grant(
        pool: &PgPool,
        input: &CreatePracticeSession,
    ) -> Result<Option<LedgerReceipt>, LedgerError> {
        ledger::validate_entry(input.duration_minutes, input.xp_gained)?;
        let delta = ledger::grant_delta(input.xp_gained)?;

        let mut tx = pool.begin().await?;

        let Some(xp_change) =
            SkillRepo::apply_xp_delta_in(&mut *tx, input.skill_id, Some(input.user_id), delta)
                .await?
        else {
            return Ok(None);
        };

        let session = Self::insert_in(&mut *tx, input).await?;
        tx.commit().await?;

        tracing::info!(
            session_id = session.id,
            skill_id = session.skill_id,
            xp_gained = session.xp_gained,
            level_up = xp_change.level_up,
            "Practice session logged",
        );
        Ok(Some(LedgerReceipt { session, xp_change }))
    }

    /// Edit a session. A changed `xp_gained` is reconciled against the skill
    /// in the same transaction.
    ///
    /// Returns `None` if the session does not exist or belongs to another user.
    pub async fn update_with_reconciliation(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdatePracticeSession,
    ) -> Result<Option<LedgerAdjustment>, LedgerError> {
        let mut tx = pool.begin().await?;

        let Some(stored) = Self::lock_entry(&mut *tx, id, user_id).await? else {
            return Ok(None);
        };

        let duration_minutes = input.duration_minutes.unwrap_or(stored.duration_minutes);
        let xp_gained = input.xp_gained.unwrap_or(stored.xp_gained);
        ledger::validate_entry(duration_minutes, xp_gained)?;

        let delta = ledger::reconciliation_delta(stored.xp_gained, xp_gained);
        let xp_change = if delta != 0 {
            let change =
                SkillRepo::apply_xp_delta_in(&mut *tx, stored.skill_id, Some(user_id), delta)
                    .await?
                    .ok_or_else(|| orphaned_entry(id, stored.skill_id))?;
            Some(change)
        } else {
            None
        };

        let query = format!(
            "WITH p AS (
                UPDATE practice_sessions SET
                    date = COALESCE($2, date),
                    duration_minutes = $3,
                    xp_gained = $4,
                    notes = NULLIF(COALESCE($5, notes), '')
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM p
             JOIN skills sk ON sk.id = p.skill_id"
        );
        let session = sqlx::query_as::<_, PracticeSession>(&query)
            .bind(id)
            .bind(input.date)
            .bind(duration_minutes)
            .bind(xp_gained)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        if let Some(change) = &xp_change {
            tracing::info!(
                session_id = id,
                skill_id = stored.skill_id,
                delta,
                total_xp = change.total_xp,
                "Practice session XP reconciled",
            );
        }
        Ok(Some(LedgerAdjustment { session, xp_change }))
    }

    /// Reverse a session's stored XP and then delete it, in one transaction.
    ///
    /// Returns `None` if the session does not exist or belongs to another user.
    pub async fn delete_with_reversal(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<XpChange>, LedgerError> {
        let mut tx = pool.begin().await?;

        let Some(stored) = Self::lock_entry(&mut *tx, id, user_id).await? else {
            return Ok(None);
        };

        let delta = ledger::reversal_delta(stored.xp_gained);
        let xp_change =
            SkillRepo::apply_xp_delta_in(&mut *tx, stored.skill_id, Some(user_id), delta)
                .await?
                .ok_or_else(|| orphaned_entry(id, stored.skill_id))?;

        let removed = sqlx::query("DELETE FROM practice_sessions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed != 1 {
            return Err(CoreError::InvariantViolation(format!(
                "reversal for practice session {id} removed {removed} rows"
            ))
            .into());
        }

        tx.commit().await?;

        tracing::info!(
            session_id = id,
            skill_id = stored.skill_id,
            reversed_xp = stored.xp_gained,
            total_xp = xp_change.total_xp,
            "Practice session deleted and XP reversed",
        );
        Ok(Some(xp_change))
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a session by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PracticeSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM practice_sessions p
             JOIN skills sk ON sk.id = p.skill_id
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, PracticeSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's sessions, newest first, optionally limited.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<PracticeSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM practice_sessions p
             JOIN skills sk ON sk.id = p.skill_id
             WHERE p.user_id = $1
             ORDER BY p.date DESC, p.created_at DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, PracticeSession>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// List every session logged against a skill, newest first.
    pub async fn list_by_skill(
        pool: &PgPool,
        skill_id: DbId,
    ) -> Result<Vec<PracticeSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM practice_sessions p
             JOIN skills sk ON sk.id = p.skill_id
             WHERE p.skill_id = $1
             ORDER BY p.date DESC, p.created_at DESC"
        );
        sqlx::query_as::<_, PracticeSession>(&query)
            .bind(skill_id)
            .fetch_all(pool)
            .await
    }

    /// List a user's sessions dated within the last `days` days.
    pub async fn list_recent(
        pool: &PgPool,
        user_id: DbId,
        days: i32,
    ) -> Result<Vec<PracticeSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM practice_sessions p
             JOIN skills sk ON sk.id = p.skill_id
             WHERE p.user_id = $1 AND p.date >= CURRENT_DATE - $2::INT
             ORDER BY p.date DESC, p.created_at DESC"
        );
        sqlx::query_as::<_, PracticeSession>(&query)
            .bind(user_id)
            .bind(days)
            .fetch_all(pool)
            .await
    }

    /// Aggregate session figures for a user.
    pub async fn stats_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<PracticeSessionStats, sqlx::Error> {
        sqlx::query_as::<_, PracticeSessionStats>(
            "SELECT
                COUNT(*) AS total_sessions,
                COALESCE(SUM(duration_minutes), 0)::BIGINT AS total_minutes,
                ROUND(COALESCE(SUM(duration_minutes), 0) / 60.0, 1)::FLOAT8 AS total_hours,
                COALESCE(SUM(xp_gained), 0)::BIGINT AS total_xp_gained,
                ROUND(COALESCE(AVG(duration_minutes), 0))::FLOAT8 AS avg_duration
             FROM practice_sessions
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Transaction-scoped helpers
    // -----------------------------------------------------------------------

    async fn insert_in(
        conn: &mut PgConnection,
        input: &CreatePracticeSession,
    ) -> Result<PracticeSession, sqlx::Error> {
        let query = format!(
            "WITH p AS (
                INSERT INTO practice_sessions
                    (skill_id, user_id, date, duration_minutes, xp_gained, notes)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
             )
             SELECT {COLUMNS} FROM p
             JOIN skills sk ON sk.id = p.skill_id"
        );
        sqlx::query_as::<_, PracticeSession>(&query)
            .bind(input.skill_id)
            .bind(input.user_id)
            .bind(input.date)
            .bind(input.duration_minutes)
            .bind(input.xp_gained)
            .bind(&input.notes)
            .fetch_one(conn)
            .await
    }

    /// Row-lock an entry owned by `user_id` and read the fields the ledger
    /// rules depend on.
    async fn lock_entry(
        conn: &mut PgConnection,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<StoredEntry>, sqlx::Error> {
        let row: Option<(DbId, Xp, i32)> = sqlx::query_as(
            "SELECT skill_id, xp_gained, duration_minutes FROM practice_sessions
             WHERE id = $1 AND user_id = $2
             FOR UPDATE",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(|(skill_id, xp_gained, duration_minutes)| StoredEntry {
            skill_id,
            xp_gained,
            duration_minutes,
        }))
    }
}

/// Ledger fields read under lock before a paired mutation.
struct StoredEntry {
    skill_id: DbId,
    xp_gained: Xp,
    duration_minutes: i32,
}

fn orphaned_entry(session_id: DbId, skill_id: DbId) -> CoreError {
    CoreError::InvariantViolation(format!(
        "practice session {session_id} references skill {skill_id} outside its owner's skills"
    ))
}
