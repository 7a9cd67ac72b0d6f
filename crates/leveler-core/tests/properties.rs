//! Property tests for session invariants over arbitrary answer sequences.

use leveler_core::{AssessmentEngine, AssessmentSession};
use proptest::prelude::*;

/// Feed answers until they run out or the session stops.
fn drive(engine: &AssessmentEngine, seed: u8, answers: &[bool]) -> Vec<AssessmentSession> {
    let mut session = engine.start(seed).unwrap();
    let mut states = vec![session.clone()];
    for &a in answers {
        if !session.is_testing() {
            break;
        }
        engine.submit_answer(&mut session, a).unwrap();
        states.push(session.clone());
    }
    states
}

proptest! {
    #[test]
    fn level_stays_in_bounds(seed in 0u8..=9, answers in prop::collection::vec(any::<bool>(), 0..60)) {
        let engine = AssessmentEngine::default();
        for s in drive(&engine, seed, &answers) {
            prop_assert!(s.current_level <= 9);
            prop_assert!(s.level_history.iter().all(|&l| l <= 9));
        }
    }

    #[test]
    fn history_tracks_question_count(seed in 0u8..=9, answers in prop::collection::vec(any::<bool>(), 0..60)) {
        let engine = AssessmentEngine::default();
        for s in drive(&engine, seed, &answers) {
            prop_assert_eq!(s.level_history.len(), s.total_questions as usize + 1);
            prop_assert_eq!(s.level_history[0], seed);
        }
    }

    #[test]
    fn streaks_are_exclusive(seed in 0u8..=9, answers in prop::collection::vec(any::<bool>(), 0..60)) {
        let engine = AssessmentEngine::default();
        for s in drive(&engine, seed, &answers) {
            prop_assert_eq!(s.correct_streak.min(s.wrong_streak), 0);
        }
    }

    #[test]
    fn question_count_grows_by_one(seed in 0u8..=9, answers in prop::collection::vec(any::<bool>(), 1..60)) {
        let engine = AssessmentEngine::default();
        let states = drive(&engine, seed, &answers);
        for pair in states.windows(2) {
            prop_assert_eq!(pair[1].total_questions, pair[0].total_questions + 1);
        }
    }

    #[test]
    fn every_session_stops_by_question_limit(seed in 0u8..=9, answers in prop::collection::vec(any::<bool>(), 35..80)) {
        let engine = AssessmentEngine::default();
        let last = drive(&engine, seed, &answers).pop().unwrap();
        prop_assert!(last.is_completed());
        prop_assert!(last.total_questions <= 35);
    }

    #[test]
    fn completion_is_idempotent(seed in 0u8..=9, answers in prop::collection::vec(any::<bool>(), 0..40)) {
        let engine = AssessmentEngine::default();
        let mut last = drive(&engine, seed, &answers).pop().unwrap();
        let first = engine.complete(&mut last);
        let second = engine.complete(&mut last);
        prop_assert_eq!(first, second);
        prop_assert!((1..=10).contains(&first.final_level));
    }

    #[test]
    fn snapshots_resume_cleanly(seed in 0u8..=9, answers in prop::collection::vec(any::<bool>(), 0..40)) {
        let engine = AssessmentEngine::default();
        let last = drive(&engine, seed, &answers).pop().unwrap();
        let json = serde_json::to_string(&last).unwrap();
        let restored: AssessmentSession = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(engine.resume(restored).unwrap(), last);
    }
}
