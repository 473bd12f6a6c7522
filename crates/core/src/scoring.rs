//! Scoring module - line clear points, level progression and game speed
//!
//! - Line clears score `LINE_SCORES[lines] * level`, using the level in force
//!   before the clear is counted.
//! - Level is `lines / 10 + 1` but never drops below the level a game started at.
//! - The tick interval shrinks by 50ms per level down to a 50ms floor.

use crate::types::{
    BASE_SPEED_MS, LINES_PER_LEVEL, LINE_SCORES, MIN_SPEED_MS, SPEED_STEP_MS,
};

/// Points for clearing `lines` rows in one placement at `level`.
/// Zero lines, or more than four, score nothing.
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[lines].saturating_mul(level)
}

/// Level reached after `total_lines` cleared lines.
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Tick interval for a level in milliseconds
pub fn get_speed_ms(level: u32) -> u32 {
    let step = level.saturating_sub(1).saturating_mul(SPEED_STEP_MS);
    BASE_SPEED_MS.saturating_sub(step).max(MIN_SPEED_MS)
}
