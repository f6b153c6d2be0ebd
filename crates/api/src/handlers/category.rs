//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use skilltrack_core::category::resolve_icon;
use skilltrack_core::error::CoreError;
use skilltrack_core::ownership::require_owned;
use skilltrack_core::skill::normalize_name;
use skilltrack_core::types::DbId;
use skilltrack_db::models::category::{
    Category, CategoryWithSkillCount, CreateCategory, UpdateCategory,
};
use skilltrack_db::repositories::{CategoryRepo, SkillRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::skill::SkillView;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /categories`. A missing or blank icon falls back
/// to the default.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub icon: Option<String>,
}

/// Request body for `PUT /categories/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub icon: Option<String>,
}

/// `GET /categories/{id}` payload.
#[derive(Debug, Serialize)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub skills: Vec<SkillView>,
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = CategoryRepo::create(
        &state.pool,
        &CreateCategory {
            user_id: auth.user_id,
            name: normalize_name(&input.name, "Category name")?,
            icon: resolve_icon(input.icon.as_deref()),
        },
    )
    .await?;

    tracing::info!(user_id = auth.user_id, category_id = category.id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/v1/categories
///
/// Each category carries the number of skills filed under it.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<CategoryWithSkillCount>>>> {
    let categories = CategoryRepo::list_with_skill_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<CategoryDetail>> {
    let category = load_owned_category(&state, auth.user_id, id).await?;
    let skills = SkillRepo::list_by_category(&state.pool, auth.user_id, id).await?;

    Ok(Json(CategoryDetail {
        category,
        skills: skills.into_iter().map(SkillView::from).collect(),
    }))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategoryRequest>,
) -> AppResult<Json<Category>> {
    load_owned_category(&state, auth.user_id, id).await?;

    let update = UpdateCategory {
        name: input
            .name
            .as_deref()
            .map(|n| normalize_name(n, "Category name"))
            .transpose()?,
        icon: input.icon.as_deref().map(|i| resolve_icon(Some(i))),
    };
    let category = CategoryRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| category_not_found(id))?;
    Ok(Json(category))
}

/// DELETE /api/v1/categories/{id}
///
/// Skills in the category stay, uncategorized.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned_category(&state, auth.user_id, id).await?;

    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(category_not_found(id));
    }
    tracing::info!(user_id = auth.user_id, category_id = id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn load_owned_category(state: &AppState, user_id: DbId, id: DbId) -> AppResult<Category> {
    let found = CategoryRepo::find_by_id(&state.pool, id).await?;
    Ok(require_owned(found, |c| c.user_id, user_id, "Category", id)?)
}

fn category_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}
