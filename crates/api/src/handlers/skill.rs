//! Handlers for the `/skills` resource.
//!
//! `total_xp` and `current_level` are read-only here; they move only through
//! the session ledger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use skilltrack_core::error::CoreError;
use skilltrack_core::ownership::require_owned;
use skilltrack_core::progression::{ProgressSummary, DEFAULT_TARGET_LEVEL};
use skilltrack_core::skill::{normalize_name, normalize_optional_text, validate_target_level};
use skilltrack_core::types::{DbId, Level};
use skilltrack_db::models::skill::{CreateSkill, Skill, UpdateSkill};
use skilltrack_db::repositories::{CategoryRepo, PracticeSessionRepo, SkillRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::session::SessionView;
use crate::middleware::auth::AuthUser;
use crate::query::SkillListParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /skills`.
#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    pub name: String,
    pub description: Option<String>,
    pub target_level: Option<Level>,
    pub category_id: Option<DbId>,
}

/// Request body for `PUT /skills/{id}`. Omitted fields are left unchanged;
/// an empty `description` clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateSkillRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_level: Option<Level>,
    pub category_id: Option<DbId>,
}

/// A skill with its derived progress figures.
#[derive(Debug, Serialize)]
pub struct SkillView {
    #[serde(flatten)]
    pub skill: Skill,
    #[serde(flatten)]
    pub progress: ProgressSummary,
}

impl From<Skill> for SkillView {
    fn from(skill: Skill) -> Self {
        let progress = skill.progress_summary();
        Self { skill, progress }
    }
}

/// `GET /skills/{id}` payload: the skill and its ledger.
#[derive(Debug, Serialize)]
pub struct SkillDetail {
    #[serde(flatten)]
    pub skill: SkillView,
    pub sessions: Vec<SessionView>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/skills
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateSkillRequest>,
) -> AppResult<(StatusCode, Json<SkillView>)> {
    let name = normalize_name(&input.name, "Skill name")?;
    let target_level = input.target_level.unwrap_or(DEFAULT_TARGET_LEVEL);
    validate_target_level(target_level)?;
    if let Some(category_id) = input.category_id {
        ensure_category_owned(&state, auth.user_id, category_id).await?;
    }

    let skill = SkillRepo::create(
        &state.pool,
        &CreateSkill {
            user_id: auth.user_id,
            name,
            description: normalize_optional_text(input.description.as_deref()),
            target_level,
            category_id: input.category_id,
        },
    )
    .await?;

    tracing::info!(user_id = auth.user_id, skill_id = skill.id, "Skill created");
    Ok((StatusCode::CREATED, Json(skill.into())))
}

/// GET /api/v1/skills
///
/// Optional `?category_id=` restricts the listing to one category.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SkillListParams>,
) -> AppResult<Json<DataResponse<Vec<SkillView>>>> {
    let skills = match params.category_id {
        Some(category_id) => {
            SkillRepo::list_by_category(&state.pool, auth.user_id, category_id).await?
        }
        None => SkillRepo::list_by_user(&state.pool, auth.user_id).await?,
    };
    Ok(Json(DataResponse {
        data: skills.into_iter().map(SkillView::from).collect(),
    }))
}

/// GET /api/v1/skills/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<SkillDetail>> {
    let skill = load_owned_skill(&state, auth.user_id, id).await?;
    let sessions = PracticeSessionRepo::list_by_skill(&state.pool, id).await?;

    Ok(Json(SkillDetail {
        skill: skill.into(),
        sessions: sessions.into_iter().map(SessionView::from).collect(),
    }))
}

/// GET /api/v1/skills/{id}/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<SessionView>>>> {
    load_owned_skill(&state, auth.user_id, id).await?;
    let sessions = PracticeSessionRepo::list_by_skill(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: sessions.into_iter().map(SessionView::from).collect(),
    }))
}

/// PUT /api/v1/skills/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSkillRequest>,
) -> AppResult<Json<SkillView>> {
    load_owned_skill(&state, auth.user_id, id).await?;

    let name = input
        .name
        .as_deref()
        .map(|n| normalize_name(n, "Skill name"))
        .transpose()?;
    if let Some(target_level) = input.target_level {
        validate_target_level(target_level)?;
    }
    if let Some(category_id) = input.category_id {
        ensure_category_owned(&state, auth.user_id, category_id).await?;
    }

    let update = UpdateSkill {
        name,
        // Keep `Some("")` so the store clears the description.
        description: input.description.map(|d| d.trim().to_string()),
        target_level: input.target_level,
        category_id: input.category_id,
    };
    let skill = SkillRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| skill_not_found(id))?;

    tracing::info!(user_id = auth.user_id, skill_id = id, "Skill updated");
    Ok(Json(skill.into()))
}

/// DELETE /api/v1/skills/{id}
///
/// Removes the skill together with its practice sessions.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned_skill(&state, auth.user_id, id).await?;

    if !SkillRepo::delete(&state.pool, id).await? {
        return Err(skill_not_found(id));
    }
    tracing::info!(user_id = auth.user_id, skill_id = id, "Skill deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a skill owned by `user_id`; anything else is a 404.
pub(crate) async fn load_owned_skill(
    state: &AppState,
    user_id: DbId,
    id: DbId,
) -> AppResult<Skill> {
    let found = SkillRepo::find_by_id(&state.pool, id).await?;
    Ok(require_owned(found, |s| s.user_id, user_id, "Skill", id)?)
}

async fn ensure_category_owned(
    state: &AppState,
    user_id: DbId,
    category_id: DbId,
) -> AppResult<()> {
    let found = CategoryRepo::find_by_id(&state.pool, category_id).await?;
    require_owned(found, |c| c.user_id, user_id, "Category", category_id)?;
    Ok(())
}

fn skill_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Skill",
        id,
    })
}
