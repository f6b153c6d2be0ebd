//! Skill entity model and DTOs.
//!
//! `total_xp` and `current_level` never appear in a create or update DTO:
//! they change only through `SkillRepo::apply_xp_delta` and the ledger
//! operations in `PracticeSessionRepo`.

use serde::Serialize;
use skilltrack_core::progression::ProgressSummary;
use skilltrack_core::types::{DbId, Level, Timestamp, Xp};
use sqlx::FromRow;

/// A skill row joined with its category name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Skill {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub current_level: Level,
    pub target_level: Level,
    pub total_xp: Xp,
    pub category_id: Option<DbId>,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// `NULL` when the skill is uncategorized.
    pub category_name: Option<String>,
}

impl Skill {
    pub fn progress_summary(&self) -> ProgressSummary {
        ProgressSummary::compute(self.total_xp, self.current_level, self.target_level)
    }
}

/// DTO for creating a skill. New skills start at level 1 with 0 XP.
#[derive(Debug)]
pub struct CreateSkill {
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub target_level: Level,
    pub category_id: Option<DbId>,
}

/// DTO for updating skill metadata. `None` keeps the stored value; an empty
/// `description` clears it.
#[derive(Debug, Default)]
pub struct UpdateSkill {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_level: Option<Level>,
    pub category_id: Option<DbId>,
}

/// Aggregate skill figures for one user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SkillStats {
    pub total_skills: i64,
    pub total_xp: Xp,
    /// Rounded to one decimal place.
    pub avg_level: f64,
    pub max_level: Level,
}
