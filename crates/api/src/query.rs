//! Shared query parameter types for API handlers.

use serde::Deserialize;
use skilltrack_core::ledger::DEFAULT_RECENT_DAYS;
use skilltrack_core::types::DbId;

/// Optional result cap (`?limit=`). Absent means unlimited.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// Window for recent-session listings (`?days=`).
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    #[serde(default = "default_recent_days")]
    pub days: i32,
}

fn default_recent_days() -> i32 {
    DEFAULT_RECENT_DAYS
}

/// Filter for skill listings (`?category_id=`).
#[derive(Debug, Deserialize)]
pub struct SkillListParams {
    pub category_id: Option<DbId>,
}
