//! Handlers for the `/sessions` resource (the XP ledger).
//!
//! Every write goes through a paired ledger operation in
//! `PracticeSessionRepo`, so the owning skill's XP always matches its
//! sessions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use skilltrack_core::error::CoreError;
use skilltrack_core::ledger::{
    duration_hours, format_duration, has_notes, level_up_notice, validate_recent_days,
};
use skilltrack_core::ownership::require_owned;
use skilltrack_core::progression::XpChange;
use skilltrack_core::skill::normalize_optional_text;
use skilltrack_core::types::{DbId, Xp};
use skilltrack_db::models::practice_session::{
    CreatePracticeSession, PracticeSession, UpdatePracticeSession,
};
use skilltrack_db::repositories::PracticeSessionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{LimitParams, RecentParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /sessions`. `xp_gained` defaults to 0.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub skill_id: DbId,
    pub date: NaiveDate,
    pub duration_minutes: i32,
    #[serde(default)]
    pub xp_gained: Xp,
    pub notes: Option<String>,
}

/// Request body for `PUT /sessions/{id}`. Omitted fields are left unchanged;
/// empty `notes` clears them. The skill cannot be changed.
#[derive(Debug, Deserialize)]
pub struct UpdateSessionRequest {
    pub date: Option<NaiveDate>,
    pub duration_minutes: Option<i32>,
    pub xp_gained: Option<Xp>,
    pub notes: Option<String>,
}

/// A session with its display figures.
#[derive(Debug, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: PracticeSession,
    pub duration_hours: f64,
    pub duration_display: String,
    pub has_notes: bool,
}

impl From<PracticeSession> for SessionView {
    fn from(session: PracticeSession) -> Self {
        Self {
            duration_hours: duration_hours(session.duration_minutes),
            duration_display: format_duration(session.duration_minutes),
            has_notes: has_notes(session.notes.as_deref()),
            session,
        }
    }
}

/// `POST /sessions` payload.
#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session: SessionView,
    pub xp_change: XpChange,
    /// Present only when the grant raised the skill's level.
    pub notice: Option<String>,
}

/// `PUT /sessions/{id}` payload. `xp_change` is `null` when `xp_gained` was
/// left as it was.
#[derive(Debug, Serialize)]
pub struct SessionUpdated {
    pub session: SessionView,
    pub xp_change: Option<XpChange>,
}

/// `DELETE /sessions/{id}` payload: the reversal applied to the skill.
#[derive(Debug, Serialize)]
pub struct SessionDeleted {
    pub id: DbId,
    pub xp_change: XpChange,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions
///
/// Log a session and grant its XP to the skill.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateSessionRequest>,
) -> AppResult<(StatusCode, Json<SessionCreated>)> {
    let receipt = PracticeSessionRepo::create_with_grant(
        &state.pool,
        &CreatePracticeSession {
            skill_id: input.skill_id,
            user_id: auth.user_id,
            date: input.date,
            duration_minutes: input.duration_minutes,
            xp_gained: input.xp_gained,
            notes: normalize_optional_text(input.notes.as_deref()),
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Skill",
        id: input.skill_id,
    }))?;

    let notice = level_up_notice(&receipt.session.skill_name, &receipt.xp_change);
    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            session: receipt.session.into(),
            xp_change: receipt.xp_change,
            notice,
        }),
    ))
}

/// GET /api/v1/sessions
///
/// Newest first; `?limit=` caps the result.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<SessionView>>>> {
    if params.limit.is_some_and(|l| l < 1) {
        return Err(AppError::BadRequest("limit must be at least 1".into()));
    }
    let sessions =
        PracticeSessionRepo::list_by_user(&state.pool, auth.user_id, params.limit).await?;
    Ok(Json(DataResponse {
        data: sessions.into_iter().map(SessionView::from).collect(),
    }))
}

/// GET /api/v1/sessions/recent
///
/// Sessions dated within the last `?days=` days (default 7).
pub async fn recent(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<RecentParams>,
) -> AppResult<Json<DataResponse<Vec<SessionView>>>> {
    validate_recent_days(params.days)?;
    let sessions =
        PracticeSessionRepo::list_recent(&state.pool, auth.user_id, params.days).await?;
    Ok(Json(DataResponse {
        data: sessions.into_iter().map(SessionView::from).collect(),
    }))
}

/// GET /api/v1/sessions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<SessionView>> {
    let found = PracticeSessionRepo::find_by_id(&state.pool, id).await?;
    let session = require_owned(found, |s| s.user_id, auth.user_id, "PracticeSession", id)?;
    Ok(Json(session.into()))
}

/// PUT /api/v1/sessions/{id}
///
/// A changed `xp_gained` is reconciled against the skill.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSessionRequest>,
) -> AppResult<Json<SessionUpdated>> {
    let update = UpdatePracticeSession {
        date: input.date,
        duration_minutes: input.duration_minutes,
        xp_gained: input.xp_gained,
        notes: input.notes.map(|n| n.trim().to_string()),
    };
    let adjustment =
        PracticeSessionRepo::update_with_reconciliation(&state.pool, id, auth.user_id, &update)
            .await?
            .ok_or_else(|| session_not_found(id))?;

    Ok(Json(SessionUpdated {
        session: adjustment.session.into(),
        xp_change: adjustment.xp_change,
    }))
}

/// DELETE /api/v1/sessions/{id}
///
/// Reverses the session's stored XP, then removes it.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<SessionDeleted>> {
    let xp_change = PracticeSessionRepo::delete_with_reversal(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(SessionDeleted { id, xp_change }))
}

fn session_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "PracticeSession",
        id,
    })
}
