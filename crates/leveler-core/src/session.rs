//! Assessment session state.
//!
//! A session is plain data: the engine mutates it once per answer and keeps
//! no references between calls, so callers may snapshot it with serde and
//! hand it back later through [`AssessmentEngine::resume`].
//!
//! [`AssessmentEngine::resume`]: crate::engine::AssessmentEngine::resume

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentState {
    Testing,
    Completed,
}

impl fmt::Display for AssessmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssessmentState::Testing => write!(f, "testing"),
            AssessmentState::Completed => write!(f, "completed"),
        }
    }
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Enough consecutive answers left the level unchanged.
    Stability,
    /// Correct streak at the top level.
    Ceiling,
    /// Wrong streak at the bottom level.
    Floor,
    /// The same two-level back-and-forth was seen repeatedly.
    Oscillation,
    /// Hard question limit.
    QuestionLimit,
    /// The caller completed the session early.
    Forced,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Stability => write!(f, "stability"),
            StopReason::Ceiling => write!(f, "ceiling"),
            StopReason::Floor => write!(f, "floor"),
            StopReason::Oscillation => write!(f, "oscillation"),
            StopReason::QuestionLimit => write!(f, "question_limit"),
            StopReason::Forced => write!(f, "forced"),
        }
    }
}

impl FromStr for StopReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stability" => Ok(StopReason::Stability),
            "ceiling" => Ok(StopReason::Ceiling),
            "floor" => Ok(StopReason::Floor),
            "oscillation" => Ok(StopReason::Oscillation),
            "question_limit" | "limit" => Ok(StopReason::QuestionLimit),
            "forced" => Ok(StopReason::Forced),
            other => Err(format!("unknown stop reason: {other}")),
        }
    }
}

/// The two levels of a back-and-forth pattern, `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OscillationPattern {
    pub low: u8,
    pub high: u8,
}

impl OscillationPattern {
    pub fn new(a: u8, b: u8) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }
}

/// One in-progress (or finished) assessment.
///
/// Levels are 0-based here; everything reported outward is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSession {
    /// Difficulty level the next question is drawn from.
    pub current_level: u8,
    /// Consecutive correct answers since the last level change.
    pub correct_streak: u32,
    /// Consecutive wrong answers since the last level change.
    pub wrong_streak: u32,
    /// Consecutive correct answers at or above the high-performance floor.
    pub high_performance_streak: u32,
    /// Consecutive answers that did not move the level.
    pub level_stability_count: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    /// Seed level followed by the level after each answer.
    pub level_history: Vec<u8>,
    /// Consecutive detections of the same oscillation pattern.
    pub oscillation_count: u32,
    #[serde(default)]
    pub last_oscillation_levels: Option<OscillationPattern>,
    pub state: AssessmentState,
    #[serde(default)]
    pub stop_reason: Option<StopReason>,
}

impl AssessmentSession {
    pub(crate) fn seeded(seed_level: u8) -> Self {
        Self {
            current_level: seed_level,
            correct_streak: 0,
            wrong_streak: 0,
            high_performance_streak: 0,
            level_stability_count: 0,
            total_questions: 0,
            correct_answers: 0,
            level_history: vec![seed_level],
            oscillation_count: 0,
            last_oscillation_levels: None,
            state: AssessmentState::Testing,
            stop_reason: None,
        }
    }

    pub fn is_testing(&self) -> bool {
        self.state == AssessmentState::Testing
    }

    pub fn is_completed(&self) -> bool {
        self.state == AssessmentState::Completed
    }

    /// The current level as shown to people (1-based).
    pub fn reported_level(&self) -> u8 {
        self.current_level + 1
    }

}

/// What the caller gets back when an assessment ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Final level, 1-based.
    pub final_level: u8,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub stop_reason: StopReason,
}

impl AssessmentResult {
    /// Fraction of answered questions that were correct.
    pub fn accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            0.0
        } else {
            self.correct_answers as f64 / self.total_questions as f64
        }
    }
}

/// Which level-change rule fired for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelChange {
    /// High-performance jump.
    Jump,
    Promote,
    Demote,
    /// No rule moved the level.
    Hold,
}

/// Summary of one accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub previous_level: u8,
    pub level: u8,
    pub change: LevelChange,
    /// Set when this answer completed the session.
    pub stopped: Option<StopReason>,
}
