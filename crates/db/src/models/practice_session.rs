//! Practice-session (ledger entry) model and DTOs.

use chrono::NaiveDate;
use serde::Serialize;
use skilltrack_core::progression::XpChange;
use skilltrack_core::types::{DbId, Timestamp, Xp};
use sqlx::FromRow;

/// A practice-session row joined with its skill name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PracticeSession {
    pub id: DbId,
    pub skill_id: DbId,
    pub date: NaiveDate,
    pub duration_minutes: i32,
    pub xp_gained: Xp,
    pub notes: Option<String>,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub skill_name: String,
}

/// DTO for logging a session. Its XP is granted in the same transaction.
#[derive(Debug)]
pub struct CreatePracticeSession {
    pub skill_id: DbId,
    pub user_id: DbId,
    pub date: NaiveDate,
    pub duration_minutes: i32,
    pub xp_gained: Xp,
    pub notes: Option<String>,
}

/// DTO for editing a session. `None` keeps the stored value; empty `notes`
/// clears them. A changed `xp_gained` is reconciled against the skill.
#[derive(Debug, Default)]
pub struct UpdatePracticeSession {
    pub date: Option<NaiveDate>,
    pub duration_minutes: Option<i32>,
    pub xp_gained: Option<Xp>,
    pub notes: Option<String>,
}

/// Result of logging a session: the stored entry and the XP it granted.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerReceipt {
    pub session: PracticeSession,
    pub xp_change: XpChange,
}

/// Result of editing a session. `xp_change` is `None` when `xp_gained` was
/// left untouched.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerAdjustment {
    pub session: PracticeSession,
    pub xp_change: Option<XpChange>,
}

/// Aggregate session figures for one user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PracticeSessionStats {
    pub total_sessions: i64,
    pub total_minutes: i64,
    /// Rounded to one decimal place.
    pub total_hours: f64,
    pub total_xp_gained: Xp,
    /// Rounded to whole minutes.
    pub avg_duration: f64,
}
