//! Owner checks shared by every per-user resource.
//!
//! A resource owned by someone else is reported exactly like a missing one,
//! so callers cannot discover ids that belong to other users.

use crate::error::CoreError;
use crate::types::DbId;

/// Resolve an optional lookup into an owned entity or `NotFound`.
pub fn require_owned<T>(
    found: Option<T>,
    owner_of: impl Fn(&T) -> DbId,
    requester: DbId,
    entity: &'static str,
    id: DbId,
) -> Result<T, CoreError> {
    match found {
        Some(item) if owner_of(&item) == requester => Ok(item),
        _ => Err(CoreError::NotFound { entity, id }),
    }
}
