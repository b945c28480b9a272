//! Scoring module - line clears, hard drops and answers
//!
//! Line clears use the classic table multiplied by the 1-based level. Hard
//! drops add two points per row travelled; soft drops award nothing.
//! Answers are worth a fixed base plus a speed bonus that decays in steps
//! over the 30 second window; a wrong or timed-out answer costs 50 points.
//! The running score never goes below zero.

use crate::types::{
    CORRECT_ANSWER_POINTS, HARD_DROP_POINTS_PER_ROW, LINE_SCORES,
    QUESTION_TIME_LIMIT_SECS, WRONG_ANSWER_POINTS,
};

/// Points for clearing `lines` rows with one placement at `level`.
///
/// Returns 0 for counts outside the table (0 or more than 4).
pub fn score_for_lines(lines: u32, level: u32) -> u32 {
    LINE_SCORES
        .get(lines as usize)
        .copied()
        .unwrap_or(0)
        .saturating_mul(level)
}

/// Points for a hard drop of `distance` rows
pub fn hard_drop_bonus(distance: u32) -> u32 {
    distance.saturating_mul(HARD_DROP_POINTS_PER_ROW)
}

/// Score delta for an answer submitted after `elapsed_secs`.
///
/// Elapsed time is clamped to `[0, 30]`; the speed bonus is
///
/// | elapsed | bonus |
/// |---------|-------|
/// | 0 to 5 | 200 |
/// | 5 to 15 | 150 falling to 100 |
/// | 15 to 25 | 100 falling to 50 |
/// | 25 to 30 | 50 falling to 0 |
///
/// and the result is floored to an integer.
///
/// ```
/// use tetris_training_core::scoring::answer_points;
///
/// assert_eq!(answer_points(true, 2.0), 300);
/// assert_eq!(answer_points(true, 10.0), 225);
/// assert_eq!(answer_points(false, 1.0), -50);
/// ```
pub fn answer_points(is_correct: bool, elapsed_secs: f64) -> i32 {
    if !is_correct {
        return WRONG_ANSWER_POINTS;
    }

    let limit = f64::from(QUESTION_TIME_LIMIT_SECS);
    let t = if elapsed_secs.is_nan() {
        limit
    } else {
        elapsed_secs.clamp(0.0, limit)
    };

    let bonus = if t <= 5.0 {
        200.0
    } else if t <= 15.0 {
        (150.0 - (t - 5.0) * 5.0).max(100.0)
    } else if t <= 25.0 {
        (100.0 - (t - 15.0) * 5.0).max(50.0)
    } else {
        (50.0 - (t - 25.0) * 10.0).max(0.0)
    };

    CORRECT_ANSWER_POINTS + bonus.floor() as i32
}

/// Apply a signed delta to a score, flooring at zero
pub fn apply_score_delta(score: u32, delta: i32) -> u32 {
    score.saturating_add_signed(delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_for_lines_table() {
        assert_eq!(score_for_lines(0, 1), 0);
        assert_eq!(score_for_lines(1, 1), 40);
        assert_eq!(score_for_lines(2, 1), 100);
        assert_eq!(score_for_lines(3, 1), 300);
        assert_eq!(score_for_lines(4, 1), 1200);
    }

    #[test]
    fn test_score_for_lines_level_multiplier() {
        assert_eq!(score_for_lines(1, 3), 120);
        assert_eq!(score_for_lines(4, 2), 2400);
    }

    #[test]
    fn test_score_for_lines_out_of_range() {
        assert_eq!(score_for_lines(5, 1), 0);
        assert_eq!(score_for_lines(20, 7), 0);
    }

    #[test]
    fn test_hard_drop_bonus() {
        assert_eq!(hard_drop_bonus(0), 0);
        assert_eq!(hard_drop_bonus(18), 36);
    }

    #[test]
    fn test_answer_points_fast() {
        assert_eq!(answer_points(true, 0.0), 300);
        assert_eq!(answer_points(true, 5.0), 300);
    }

    #[test]
    fn test_answer_points_decay_bands() {
        assert_eq!(answer_points(true, 10.0), 225);
        assert_eq!(answer_points(true, 15.0), 200);
        assert_eq!(answer_points(true, 20.0), 175);
        assert_eq!(answer_points(true, 25.0), 150);
        assert_eq!(answer_points(true, 27.0), 130);
        assert_eq!(answer_points(true, 30.0), 100);
    }

    #[test]
    fn test_answer_points_floors_fractional_bonus() {
        // 150 - 1.1 * 5 = 144.5
        assert_eq!(answer_points(true, 6.1), 244);
    }

    #[test]
    fn test_answer_points_clamps_elapsed() {
        assert_eq!(answer_points(true, -3.0), 300);
        assert_eq!(answer_points(true, 90.0), 100);
        assert_eq!(answer_points(true, f64::NAN), 100);
    }

    #[test]
    fn test_wrong_answer_costs_fifty() {
        assert_eq!(answer_points(false, 0.0), -50);
        assert_eq!(answer_points(false, 30.0), -50);
    }

    #[test]
    fn test_apply_score_delta_floors_at_zero() {
        assert_eq!(apply_score_delta(30, -50), 0);
        assert_eq!(apply_score_delta(80, -50), 30);
        assert_eq!(apply_score_delta(0, 300), 300);
    }
}
