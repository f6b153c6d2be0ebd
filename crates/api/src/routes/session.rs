//! Route definitions for the `/sessions` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET    /         -> list (?limit=)
/// POST   /         -> create (grants XP)
/// GET    /recent   -> recent (?days=, default 7)
/// GET    /{id}     -> get_by_id
/// PUT    /{id}     -> update (reconciles XP)
/// DELETE /{id}     -> delete (reverses XP)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(session::list).post(session::create))
        .route("/recent", get(session::recent))
        .route(
            "/{id}",
            get(session::get_by_id)
                .put(session::update)
                .delete(session::delete),
        )
}
