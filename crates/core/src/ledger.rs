//! Practice-session ledger rules.
//!
//! Each ledger entry is paired with exactly one XP mutation on its skill:
//!
//! - creation applies `+xp_gained`
//! - deletion applies `-stored_xp_gained`, before the row is removed
//! - an edit that changes `xp_gained` applies `new - old`
//!
//! The persistence layer runs each pair inside one transaction; this module
//! only decides the deltas and validates entry input.

use crate::error::CoreError;
use crate::progression::XpChange;
use crate::types::Xp;

/// Minimum duration of a practice session, in minutes.
pub const MIN_DURATION_MINUTES: i32 = 1;

/// Largest `xp_gained` a single session may carry.
pub const MAX_XP_PER_SESSION: Xp = 1_000_000;

/// Default window for the "recent sessions" listing.
pub const DEFAULT_RECENT_DAYS: i32 = 7;

/// Maximum window accepted for the "recent sessions" listing.
pub const MAX_RECENT_DAYS: i32 = 366;

/// Delta to apply when a ledger entry is created.
pub fn grant_delta(xp_gained: Xp) -> Result<Xp, CoreError> {
    if xp_gained < 0 {
        return Err(CoreError::Validation(
            "xp_gained cannot be negative".to_string(),
        ));
    }
    if xp_gained > MAX_XP_PER_SESSION {
        return Err(CoreError::Validation(format!(
            "xp_gained cannot exceed {MAX_XP_PER_SESSION}"
        )));
    }
    Ok(xp_gained)
}

/// Delta to apply when a ledger entry is deleted. Always computed from the
/// entry's stored amount, never from caller-supplied input.
pub fn reversal_delta(stored_xp_gained: Xp) -> Xp {
    -stored_xp_gained
}

/// Delta to apply when an entry's `xp_gained` is edited from `old` to `new`.
pub fn reconciliation_delta(old_xp_gained: Xp, new_xp_gained: Xp) -> Xp {
    new_xp_gained - old_xp_gained
}

/// Validate the editable numeric fields of a ledger entry.
pub fn validate_entry(duration_minutes: i32, xp_gained: Xp) -> Result<(), CoreError> {
    if duration_minutes < MIN_DURATION_MINUTES {
        return Err(CoreError::Validation(format!(
            "duration_minutes must be at least {MIN_DURATION_MINUTES}"
        )));
    }
    grant_delta(xp_gained).map(|_| ())
}

/// Validate the `days` window for recent-session listings.
pub fn validate_recent_days(days: i32) -> Result<(), CoreError> {
    if !(1..=MAX_RECENT_DAYS).contains(&days) {
        return Err(CoreError::Validation(format!(
            "days must be between 1 and {MAX_RECENT_DAYS}, got {days}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Duration in hours as a decimal (90 minutes -> 1.5).
pub fn duration_hours(duration_minutes: i32) -> f64 {
    f64::from(duration_minutes) / 60.0
}

/// Human-readable duration: `"1h 30m"`, `"2h"`, `"45m"`.
pub fn format_duration(duration_minutes: i32) -> String {
    let hours = duration_minutes / 60;
    let minutes = duration_minutes % 60;
    match (hours, minutes) {
        (h, m) if h > 0 && m > 0 => format!("{h}h {m}m"),
        (h, _) if h > 0 => format!("{h}h"),
        (_, m) => format!("{m}m"),
    }
}

/// Celebration text for a grant that raised the skill's level.
pub fn level_up_notice(skill_name: &str, change: &XpChange) -> Option<String> {
    change.level_up.then(|| {
        format!(
            "Congratulations! {skill_name} reached level {}!",
            change.new_level
        )
    })
}

/// Whether the entry carries non-blank notes.
pub fn has_notes(notes: Option<&str>) -> bool {
    notes.is_some_and(|n| !n.trim().is_empty())
}
