//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod auth_session_repo;
pub mod category_repo;
pub mod practice_session_repo;
pub mod skill_repo;
pub mod user_repo;

pub use auth_session_repo::AuthSessionRepo;
pub use category_repo::CategoryRepo;
pub use practice_session_repo::PracticeSessionRepo;
pub use skill_repo::SkillRepo;
pub use user_repo::UserRepo;
