//! The adaptive leveling engine.
//!
//! Decides, answer by answer, which level to ask next and when to stop.
//! Every operation is a deterministic transition over an
//! [`AssessmentSession`] owned by the caller.

use crate::error::AssessmentError;
use crate::oscillation;
use crate::rules::LevelingRules;
use crate::session::{
    AnswerOutcome, AssessmentResult, AssessmentSession, AssessmentState, LevelChange, StopReason,
};

/// Stateless engine parameterized by a set of leveling rules.
#[derive(Debug, Clone, Default)]
pub struct AssessmentEngine {
    rules: LevelingRules,
}

impl AssessmentEngine {
    pub fn new(rules: LevelingRules) -> Result<Self, AssessmentError> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &LevelingRules {
        &self.rules
    }

    /// Begin a session at `seed_level` (0 for a fresh placement).
    pub fn start(&self, seed_level: u8) -> Result<AssessmentSession, AssessmentError> {
        self.rules.check_level(seed_level, "seed level")?;
        Ok(AssessmentSession::seeded(seed_level))
    }

    /// Accept a session restored from a snapshot.
    ///
    /// Rejects snapshots that break the session invariants instead of
    /// repairing them.
    pub fn resume(&self, session: AssessmentSession) -> Result<AssessmentSession, AssessmentError> {
        self.rules.check_level(session.current_level, "current level")?;
        if let Some(&bad) = session
            .level_history
            .iter()
            .find(|&&l| l > self.rules.max_level)
        {
            return Err(AssessmentError::invalid_argument(format!(
                "level history contains {bad}, outside 0..={}",
                self.rules.max_level
            )));
        }
        if session.level_history.len() != session.total_questions as usize + 1 {
            return Err(AssessmentError::invalid_argument(format!(
                "level history has {} entries for {} questions",
                session.level_history.len(),
                session.total_questions
            )));
        }
        if session.correct_streak > 0 && session.wrong_streak > 0 {
            return Err(AssessmentError::invalid_argument(
                "correct and wrong streaks are both non-zero",
            ));
        }
        if session.correct_answers > session.total_questions {
            return Err(AssessmentError::invalid_argument(format!(
                "{} correct answers out of {} questions",
                session.correct_answers, session.total_questions
            )));
        }
        if session.oscillation_count > 0 && session.last_oscillation_levels.is_none() {
            return Err(AssessmentError::invalid_argument(
                "oscillation count without oscillation levels",
            ));
        }
        if session.is_testing() && session.stop_reason.is_some() {
            return Err(AssessmentError::invalid_argument(
                "testing session carries a stop reason",
            ));
        }
        Ok(session)
    }

    /// Record one answer and advance the session.
    ///
    /// On error the session is left untouched.
    pub fn submit_answer(
        &self,
        session: &mut AssessmentSession,
        correct: bool,
    ) -> Result<AnswerOutcome, AssessmentError> {
        if !session.is_testing() {
            return Err(AssessmentError::InvalidState {
                state: session.state,
            });
        }

        let previous_level = session.current_level;
        self.update_streaks(session, correct);
        session.total_questions += 1;

        let change = self.apply_level_rules(session);
        if session.current_level == previous_level {
            session.level_stability_count += 1;
        } else {
            tracing::debug!(
                from = previous_level,
                to = session.current_level,
                ?change,
                question = session.total_questions,
                "level changed"
            );
        }

        session.level_history.push(session.current_level);

        if let Some(detection) =
            oscillation::detect(&session.level_history, session.last_oscillation_levels)
        {
            detection.apply(session);
        }

        let level = session.current_level;
        let stopped = self.stop_reason(session);
        if let Some(reason) = stopped {
            self.finish(session, reason);
        }

        Ok(AnswerOutcome {
            previous_level,
            level,
            change,
            stopped,
        })
    }

    /// End the session (if still running) and report the result.
    ///
    /// Calling this on a completed session returns the same result again.
    pub fn complete(&self, session: &mut AssessmentSession) -> AssessmentResult {
        if session.is_testing() {
            session.state = AssessmentState::Completed;
            session.stop_reason = Some(StopReason::Forced);
            tracing::info!(
                level = session.reported_level(),
                questions = session.total_questions,
                "assessment completed early"
            );
        }
        AssessmentResult {
            final_level: session.reported_level(),
            total_questions: session.total_questions,
            correct_answers: session.correct_answers,
            stop_reason: session.stop_reason.unwrap_or(StopReason::Forced),
        }
    }

    /// Which stop condition, if any, holds for the session right now.
    ///
    /// The oscillation stop takes precedence because it decides the final
    /// level; the rest follow in declaration order.
    pub fn stop_reason(&self, session: &AssessmentSession) -> Option<StopReason> {
        let r = &self.rules;
        let total = session.total_questions;

        if session.oscillation_count >= r.oscillation_stop && total >= r.oscillation_min_questions
        {
            return Some(StopReason::Oscillation);
        }
        if session.level_stability_count >= r.stability_stop && total >= r.stability_min_questions
        {
            return Some(StopReason::Stability);
        }
        if session.current_level == r.max_level
            && session.correct_streak >= r.ceiling_streak
            && total >= r.ceiling_min_questions
        {
            return Some(StopReason::Ceiling);
        }
        if session.wrong_streak >= r.floor_streak
            && session.current_level == 0
            && total >= r.floor_min_questions
        {
            return Some(StopReason::Floor);
        }
        if total >= r.max_questions {
            return Some(StopReason::QuestionLimit);
        }
        None
    }

    fn update_streaks(&self, session: &mut AssessmentSession, correct: bool) {
        if correct {
            session.correct_streak += 1;
            session.wrong_streak = 0;
            session.correct_answers += 1;
            if session.current_level >= self.rules.high_performance_level {
                session.high_performance_streak += 1;
            }
        } else {
            session.wrong_streak += 1;
            session.correct_streak = 0;
            session.high_performance_streak = 0;
        }
    }

    /// First matching rule wins.
    fn apply_level_rules(&self, session: &mut AssessmentSession) -> LevelChange {
        let r = &self.rules;
        let level = session.current_level;

        if session.high_performance_streak >= r.high_performance_streak
            && level >= r.high_performance_level
            && level < r.max_level
        {
            session.current_level = level.saturating_add(r.jump_size).min(r.max_level);
            session.correct_streak = 0;
            session.high_performance_streak = 0;
            session.level_stability_count = 0;
            LevelChange::Jump
        } else if session.correct_streak >= r.promote_streak && level < r.max_level {
            session.current_level = level + 1;
            session.correct_streak = 0;
            session.level_stability_count = 0;
            LevelChange::Promote
        } else if session.wrong_streak >= r.demote_streak && level > 0 {
            session.current_level = level - 1;
            session.wrong_streak = 0;
            session.level_stability_count = 0;
            LevelChange::Demote
        } else {
            LevelChange::Hold
        }
    }

    fn finish(&self, session: &mut AssessmentSession, reason: StopReason) {
        if reason == StopReason::Oscillation {
            if let Some(pattern) = session.last_oscillation_levels {
                session.current_level = pattern.low;
            }
        }
        session.state = AssessmentState::Completed;
        session.stop_reason = Some(reason);
        tracing::info!(
            %reason,
            level = session.reported_level(),
            questions = session.total_questions,
            correct = session.correct_answers,
            "assessment completed"
        );
    }
}
