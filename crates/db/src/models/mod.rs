//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row (plus joined names)
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches

pub mod auth_session;
pub mod category;
pub mod practice_session;
pub mod skill;
pub mod user;
