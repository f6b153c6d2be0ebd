//! Route definitions for the `/skills` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::skill;
use crate::state::AppState;

/// Routes mounted at `/skills`.
///
/// ```text
/// GET    /               -> list (?category_id=)
/// POST   /               -> create
/// GET    /{id}           -> get_by_id (with sessions)
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// GET    /{id}/sessions  -> list_sessions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(skill::list).post(skill::create))
        .route(
            "/{id}",
            get(skill::get_by_id)
                .put(skill::update)
                .delete(skill::delete),
        )
        .route("/{id}/sessions", get(skill::list_sessions))
}
