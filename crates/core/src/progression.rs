//! XP-to-level progression engine.
//!
//! Advancing *from* level `L` to `L + 1` costs `L * 100` XP, so the
//! cumulative XP required to reach level `L` is `50 * L * (L - 1)`:
//!
//! ```text
//! level 1:    0 ..  100
//! level 2:  100 ..  300
//! level 3:  300 ..  600
//! level 4:  600 .. 1000
//! ```
//!
//! Every function here is pure. The only mutating entry point is
//! [`SkillProgress::apply_delta`], which the persistence layer wraps in a
//! single row-locked update so `total_xp` and `current_level` always change
//! together.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Level, Xp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// XP cost multiplier: leaving level `L` costs `L * XP_PER_LEVEL_STEP`.
pub const XP_PER_LEVEL_STEP: Xp = 100;

/// Every skill starts here.
pub const MIN_LEVEL: Level = 1;

/// Default target level for a new skill when none is supplied.
pub const DEFAULT_TARGET_LEVEL: Level = 10;

/// Ceiling on a skill's accumulated XP (level 141_421).
pub const MAX_TOTAL_XP: Xp = 1_000_000_000_000;

// ---------------------------------------------------------------------------
// Threshold arithmetic
// ---------------------------------------------------------------------------

/// XP needed to advance from `level` to `level + 1`.
pub fn xp_for_next_level(level: Level) -> Xp {
    Xp::from(level.max(MIN_LEVEL)) * XP_PER_LEVEL_STEP
}

/// Cumulative XP required to reach `level`, starting from level 1 at 0 XP.
pub fn cumulative_threshold(level: Level) -> Xp {
    let level = Xp::from(level.max(MIN_LEVEL));
    XP_PER_LEVEL_STEP / 2 * level * (level - 1)
}

/// The largest level whose cumulative threshold does not exceed `total_xp`.
///
/// Negative totals (possible transiently while a reversal is applied) clamp
/// to [`MIN_LEVEL`]. The square-root estimate only seeds the search; the
/// result is settled against exact thresholds, so it equals level-by-level
/// accumulation for every `Xp`, `Xp::MAX` included.
pub fn level_for_total_xp(total_xp: Xp) -> Level {
    if total_xp < xp_for_next_level(MIN_LEVEL) {
        return MIN_LEVEL;
    }

    let estimate = 0.5 + (0.25 + total_xp as f64 / (XP_PER_LEVEL_STEP / 2) as f64).sqrt();
    let mut level = (estimate as Level).max(MIN_LEVEL);
    while level > MIN_LEVEL && !reaches_level(total_xp, level) {
        level -= 1;
    }
    while reaches_level(total_xp, level + 1) {
        level += 1;
    }
    level
}

/// Whether `total_xp` covers the cumulative threshold of `level`. A threshold
/// too large for `Xp` is never reached.
fn reaches_level(total_xp: Xp, level: Level) -> bool {
    let level = Xp::from(level);
    (XP_PER_LEVEL_STEP / 2)
        .checked_mul(level)
        .and_then(|t| t.checked_mul(level - 1))
        .is_some_and(|threshold| threshold <= total_xp)
}

/// XP accumulated inside `current_level`, clamped to zero for display.
pub fn xp_within_current_level(total_xp: Xp, current_level: Level) -> Xp {
    (total_xp - cumulative_threshold(current_level)).max(0)
}

/// XP still missing before `current_level` rolls over.
pub fn xp_remaining_to_next_level(total_xp: Xp, current_level: Level) -> Xp {
    (xp_for_next_level(current_level) - xp_within_current_level(total_xp, current_level)).max(0)
}

/// Progress toward the target level as a percentage in `[0, 100]`.
///
/// Returns `0.0` when `target_level` is zero.
pub fn progress_percentage(current_level: Level, target_level: Level) -> f64 {
    if target_level == 0 {
        return 0.0;
    }
    (100.0 * f64::from(current_level) / f64::from(target_level)).min(100.0)
}

/// Whether the skill has reached its target.
pub fn is_complete(current_level: Level, target_level: Level) -> bool {
    current_level >= target_level
}

// ---------------------------------------------------------------------------
// Aggregate state
// ---------------------------------------------------------------------------

/// The XP state owned by a skill. `current_level` is derived from `total_xp`
/// and is only ever replaced through [`SkillProgress::apply_delta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillProgress {
    pub total_xp: Xp,
    pub current_level: Level,
}

/// Outcome of a single XP mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XpChange {
    pub old_level: Level,
    pub new_level: Level,
    pub level_up: bool,
    pub total_xp: Xp,
}

impl SkillProgress {
    /// State of a freshly created skill.
    pub fn new() -> Self {
        Self {
            total_xp: 0,
            current_level: MIN_LEVEL,
        }
    }

    /// Apply a signed XP delta and recompute the level.
    ///
    /// No lower bound is enforced on the resulting total; callers only issue
    /// deltas that mirror real ledger events. A total above [`MAX_TOTAL_XP`]
    /// is rejected and leaves `self` untouched. A zero delta still
    /// recomputes.
    pub fn apply_delta(&mut self, delta: Xp) -> Result<XpChange, CoreError> {
        let total_xp = self
            .total_xp
            .checked_add(delta)
            .filter(|total| *total <= MAX_TOTAL_XP)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "total_xp cannot exceed {MAX_TOTAL_XP} (current {}, delta {delta})",
                    self.total_xp
                ))
            })?;

        let old_level = self.current_level;
        let new_level = level_for_total_xp(total_xp);

        self.total_xp = total_xp;
        self.current_level = new_level;

        Ok(XpChange {
            old_level,
            new_level,
            level_up: new_level > old_level,
            total_xp,
        })
    }
}

impl Default for SkillProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Every display figure for a skill, computed in one place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub progress_percentage: f64,
    pub xp_for_next_level: Xp,
    pub xp_in_current_level: Xp,
    pub xp_to_next_level: Xp,
    pub is_complete: bool,
}

impl ProgressSummary {
    pub fn compute(total_xp: Xp, current_level: Level, target_level: Level) -> Self {
        Self {
            progress_percentage: progress_percentage(current_level, target_level),
            xp_for_next_level: xp_for_next_level(current_level),
            xp_in_current_level: xp_within_current_level(total_xp, current_level),
            xp_to_next_level: xp_remaining_to_next_level(total_xp, current_level),
            is_complete: is_complete(current_level, target_level),
        }
    }
}
