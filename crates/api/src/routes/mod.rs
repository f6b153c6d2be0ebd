pub mod auth;
pub mod category;
pub mod health;
pub mod session;
pub mod skill;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Everything except register, login, and refresh requires a Bearer token.
///
/// ```text
/// /auth/register                  register (public)
/// /auth/login                     login (public)
/// /auth/refresh                   refresh (public)
/// /auth/logout                    logout
/// /auth/me                        current user
///
/// /skills                         list, create
/// /skills/{id}                    get, update, delete
/// /skills/{id}/sessions           ledger of one skill
///
/// /sessions                       list, create (grants XP)
/// /sessions/recent                last N days
/// /sessions/{id}                  get, update (reconciles), delete (reverses)
///
/// /categories                     list (with skill counts), create
/// /categories/{id}                get, update, delete
///
/// /dashboard                      aggregate view
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/skills", skill::router())
        .nest("/sessions", session::router())
        .nest("/categories", category::router())
        .route("/dashboard", get(handlers::dashboard::get))
}
