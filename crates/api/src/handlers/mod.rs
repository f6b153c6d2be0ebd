//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource. Every
//! per-user handler takes an [`AuthUser`](crate::middleware::auth::AuthUser)
//! and treats rows owned by other users as missing.

pub mod auth;
pub mod category;
pub mod dashboard;
pub mod session;
pub mod skill;
