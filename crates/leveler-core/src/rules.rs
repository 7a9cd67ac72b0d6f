//! Leveling thresholds.
//!
//! `LevelingRules::default()` is the reference placement behavior: ten levels
//! (0..=9), two-in-a-row to move, a two-level jump for sustained success in
//! the upper band, and a hard stop at 35 questions.

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;

/// Every threshold the engine consults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelingRules {
    /// Highest 0-based level.
    pub max_level: u8,
    /// Correct answers in a row needed to move up one level.
    pub promote_streak: u32,
    /// Wrong answers in a row needed to move down one level.
    pub demote_streak: u32,
    /// Lowest level at which correct answers count toward a jump.
    pub high_performance_level: u8,
    /// High-performance answers in a row needed to jump.
    pub high_performance_streak: u32,
    /// Levels gained by a jump.
    pub jump_size: u8,
    /// Unchanged answers in a row that end the assessment...
    pub stability_stop: u32,
    /// ...once at least this many questions were asked.
    pub stability_min_questions: u32,
    /// Correct streak at `max_level` that ends the assessment...
    pub ceiling_streak: u32,
    /// ...once at least this many questions were asked.
    pub ceiling_min_questions: u32,
    /// Wrong streak at level 0 that ends the assessment...
    pub floor_streak: u32,
    /// ...once at least this many questions were asked.
    pub floor_min_questions: u32,
    /// Repeated oscillation detections that end the assessment...
    pub oscillation_stop: u32,
    /// ...once at least this many questions were asked.
    pub oscillation_min_questions: u32,
    /// Unconditional question limit.
    pub max_questions: u32,
}

impl Default for LevelingRules {
    fn default() -> Self {
        Self {
            max_level: 9,
            promote_streak: 2,
            demote_streak: 2,
            high_performance_level: 6,
            high_performance_streak: 3,
            jump_size: 2,
            stability_stop: 4,
            stability_min_questions: 12,
            ceiling_streak: 2,
            ceiling_min_questions: 15,
            floor_streak: 4,
            floor_min_questions: 10,
            oscillation_stop: 2,
            oscillation_min_questions: 12,
            max_questions: 35,
        }
    }
}

impl LevelingRules {
    /// Number of distinct levels.
    pub fn level_count(&self) -> u16 {
        self.max_level as u16 + 1
    }

    /// Check that a 0-based level is in range.
    pub fn check_level(&self, level: u8, what: &str) -> Result<(), AssessmentError> {
        if level > self.max_level {
            return Err(AssessmentError::invalid_argument(format!(
                "{what} {level} is outside 0..={}",
                self.max_level
            )));
        }
        Ok(())
    }

    /// Reject rule sets the engine cannot run.
    pub fn validate(&self) -> Result<(), AssessmentError> {
        if self.max_level == 0 || self.max_level == u8::MAX {
            return Err(AssessmentError::invalid_argument(format!(
                "max_level {} is outside 1..={}",
                self.max_level,
                u8::MAX - 1
            )));
        }
        if self.high_performance_level > self.max_level {
            return Err(AssessmentError::invalid_argument(format!(
                "high_performance_level {} exceeds max_level {}",
                self.high_performance_level, self.max_level
            )));
        }
        if self.jump_size == 0 {
            return Err(AssessmentError::invalid_argument(
                "jump_size must be at least 1",
            ));
        }
        let counts = [
            ("promote_streak", self.promote_streak),
            ("demote_streak", self.demote_streak),
            ("high_performance_streak", self.high_performance_streak),
            ("stability_stop", self.stability_stop),
            ("ceiling_streak", self.ceiling_streak),
            ("floor_streak", self.floor_streak),
            ("oscillation_stop", self.oscillation_stop),
            ("max_questions", self.max_questions),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(AssessmentError::invalid_argument(format!(
                    "{name} must be at least 1"
                )));
            }
        }
        Ok(())
    }
}
