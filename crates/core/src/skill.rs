//! Skill input normalization and validation.

use crate::error::CoreError;
use crate::progression::MIN_LEVEL;
use crate::types::Level;

/// Maximum length of a skill or category name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Trim a required name and reject it when empty or too long.
pub fn normalize_name(name: &str, field: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text; blank input becomes `None`.
pub fn normalize_optional_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Target levels follow the same floor as current levels.
pub fn validate_target_level(target_level: Level) -> Result<(), CoreError> {
    if target_level < MIN_LEVEL {
        return Err(CoreError::Validation(format!(
            "target_level must be at least {MIN_LEVEL}"
        )));
    }
    Ok(())
}
