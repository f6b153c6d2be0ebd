//! Handler for the per-user dashboard.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use skilltrack_core::ledger::DEFAULT_RECENT_DAYS;
use skilltrack_db::models::category::CategoryWithSkillCount;
use skilltrack_db::models::practice_session::PracticeSessionStats;
use skilltrack_db::models::skill::SkillStats;
use skilltrack_db::repositories::{CategoryRepo, PracticeSessionRepo, SkillRepo};

use crate::error::AppResult;
use crate::handlers::session::SessionView;
use crate::handlers::skill::SkillView;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Everything the dashboard renders in one payload.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub skills: Vec<SkillView>,
    pub skill_stats: SkillStats,
    pub session_stats: PracticeSessionStats,
    pub recent_sessions: Vec<SessionView>,
    pub categories: Vec<CategoryWithSkillCount>,
}

/// GET /api/v1/dashboard
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let pool = &state.pool;
    let user_id = auth.user_id;

    let skills = SkillRepo::list_by_user(pool, user_id).await?;
    let skill_stats = SkillRepo::stats_by_user(pool, user_id).await?;
    let session_stats = PracticeSessionRepo::stats_by_user(pool, user_id).await?;
    let recent = PracticeSessionRepo::list_recent(pool, user_id, DEFAULT_RECENT_DAYS).await?;
    let categories = CategoryRepo::list_with_skill_count(pool, user_id).await?;

    Ok(Json(DataResponse {
        data: Dashboard {
            skills: skills.into_iter().map(SkillView::from).collect(),
            skill_stats,
            session_stats,
            recent_sessions: recent.into_iter().map(SessionView::from).collect(),
            categories,
        },
    }))
}
