//! Drift detection integration tests.
//!
//! Tests the report comparison workflow end-to-end, including
//! JSON serialization, report loading, and level drift detection.

use leveler_core::report::{AssessmentReport, AssessmentSetSummary, CandidateOutcome};
use leveler_core::session::AssessmentResult;
use leveler_core::statistics::compute_aggregate_stats;
use leveler_core::StopReason;
use uuid::Uuid;

fn make_outcome(candidate_id: &str, final_level: u8, stop_reason: StopReason) -> CandidateOutcome {
    CandidateOutcome {
        candidate_id: candidate_id.into(),
        name: candidate_id.into(),
        subject: "math".into(),
        seed_level: 0,
        result: AssessmentResult {
            final_level,
            total_questions: 14,
            correct_answers: 7,
            stop_reason,
        },
        level_history: vec![0; 15],
        questions: vec![],
        expected_final_level: None,
    }
}

fn make_report(outcomes: Vec<CandidateOutcome>) -> AssessmentReport {
    AssessmentReport {
        id: Uuid::new_v4(),
        created_at: chrono::Utc::now(),
        assessment_set: AssessmentSetSummary {
            id: "test-set".into(),
            name: "Test Set".into(),
            candidate_count: outcomes.len(),
        },
        aggregate: compute_aggregate_stats(&outcomes),
        outcomes,
        failures: vec![],
        duration_ms: 1000,
    }
}

#[test]
fn detect_drift_when_level_drops() {
    let baseline = make_report(vec![
        make_outcome("alice", 5, StopReason::Stability),
        make_outcome("bob", 3, StopReason::Stability),
    ]);

    let current = make_report(vec![
        make_outcome("alice", 3, StopReason::Stability),
        make_outcome("bob", 3, StopReason::Stability),
    ]);

    let report = current.compare(&baseline, 0);

    assert!(report.has_drift());
    assert_eq!(report.drifted.len(), 1);
    assert_eq!(report.drifted[0].candidate_id, "alice");
    assert_eq!(report.drifted[0].delta, -2);
    assert_eq!(report.unchanged, 1);
}

#[test]
fn tolerance_absorbs_small_moves() {
    let baseline = make_report(vec![make_outcome("alice", 5, StopReason::Stability)]);
    let current = make_report(vec![make_outcome("alice", 6, StopReason::QuestionLimit)]);

    assert!(current.compare(&baseline, 0).has_drift());
    assert!(!current.compare(&baseline, 1).has_drift());
}

#[test]
fn no_drift_with_identical_outcomes() {
    let baseline = make_report(vec![
        make_outcome("alice", 5, StopReason::Stability),
        make_outcome("bob", 10, StopReason::Ceiling),
    ]);

    let report = baseline.compare(&baseline, 0);

    assert!(!report.has_drift());
    assert_eq!(report.unchanged, 2);
}

#[test]
fn detect_new_and_removed_candidates() {
    let baseline = make_report(vec![
        make_outcome("old", 2, StopReason::Floor),
        make_outcome("shared", 4, StopReason::Stability),
    ]);

    let current = make_report(vec![
        make_outcome("shared", 4, StopReason::Stability),
        make_outcome("new", 7, StopReason::QuestionLimit),
    ]);

    let report = current.compare(&baseline, 0);

    assert_eq!(report.new_candidates, 1);
    assert_eq!(report.removed_candidates, 1);
    assert_eq!(report.unchanged, 1);
}

#[test]
fn json_roundtrip_preserves_data() {
    let mut floor = make_outcome("floor", 1, StopReason::Floor);
    floor.expected_final_level = Some(2);
    let report = make_report(vec![make_outcome("top", 10, StopReason::Ceiling), floor]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/report.json");

    report.save_json(&path).unwrap();
    let loaded = AssessmentReport::load_json(&path).unwrap();

    assert_eq!(loaded.outcomes.len(), 2);
    assert_eq!(loaded.outcomes[1].result.stop_reason, StopReason::Floor);
    assert_eq!(loaded.aggregate.expectation_mismatches, 1);
    assert_eq!(loaded.expectation_failures().len(), 1);
    assert!(!loaded.compare(&report, 0).has_drift());
}

#[test]
fn markdown_lists_drifted_candidates() {
    let baseline = make_report(vec![make_outcome("alice", 5, StopReason::Stability)]);
    let current = make_report(vec![make_outcome("alice", 8, StopReason::Ceiling)]);

    let md = current.compare(&baseline, 0).to_markdown();

    assert!(md.contains("1 drifted"));
    assert!(md.contains("| alice | 5 | 8 | +3 |"));
}
