//! End-to-end pipeline tests over the bundled assessment scripts.
//!
//! These tests load the scripts from disk, run every candidate through the
//! runner, and check final levels, stop reasons and the report round trip.

use std::path::Path;
use std::sync::Arc;

use leveler_core::bank::GeneratedQuestionBank;
use leveler_core::config::load_config_from;
use leveler_core::model::AssessmentSet;
use leveler_core::parser::{load_path, parse_assessment_set, validate_assessment_set};
use leveler_core::registry::SessionRegistry;
use leveler_core::report::AssessmentReport;
use leveler_core::runner::{AssessmentRunner, NoopReporter, RunnerConfig};
use leveler_core::{AssessmentEngine, LevelingRules, StopReason};

const BASICS: &str = "../../scripts/placement-basics.toml";

fn make_runner(rules: LevelingRules) -> AssessmentRunner {
    AssessmentRunner::new(
        Arc::new(GeneratedQuestionBank::new()),
        AssessmentEngine::new(rules).unwrap(),
        RunnerConfig { parallelism: 3 },
    )
}

async fn run_set(set: &AssessmentSet, rules: LevelingRules) -> AssessmentReport {
    make_runner(rules).run(set, &NoopReporter).await.unwrap()
}

fn outcome<'a>(
    report: &'a AssessmentReport,
    id: &str,
) -> &'a leveler_core::report::CandidateOutcome {
    report
        .outcomes
        .iter()
        .find(|o| o.candidate_id == id)
        .unwrap_or_else(|| panic!("no outcome for {id}"))
}

#[test]
fn bundled_scripts_validate_cleanly() {
    let rules = LevelingRules::default();
    let sets = load_path(Path::new("../../scripts")).unwrap();
    assert_eq!(sets.len(), 2);
    for set in &sets {
        let warnings = validate_assessment_set(set, &rules);
        assert!(warnings.is_empty(), "{}: {warnings:?}", set.id);
    }
}

#[tokio::test]
async fn e2e_bundled_scripts_meet_expectations() {
    for set in load_path(Path::new("../../scripts")).unwrap() {
        let report = run_set(&set, LevelingRules::default()).await;

        assert_eq!(report.outcomes.len(), set.candidates.len(), "{}", set.id);
        assert!(
            report.expectation_failures().is_empty(),
            "{}: {:?}",
            set.id,
            report.expectation_failures()
        );
        assert_eq!(report.aggregate.expectation_mismatches, 0);
    }
}

#[tokio::test]
async fn e2e_stop_reasons_per_candidate() {
    let set = parse_assessment_set(Path::new(BASICS)).unwrap();
    let report = run_set(&set, LevelingRules::default()).await;

    let expected = [
        ("floor", StopReason::Floor, 10),
        ("ceiling", StopReason::Ceiling, 17),
        ("alternating", StopReason::Stability, 12),
        ("sliding", StopReason::Stability, 14),
        ("pairs", StopReason::QuestionLimit, 35),
        ("dropout", StopReason::Forced, 2),
    ];
    for (id, reason, questions) in expected {
        let o = outcome(&report, id);
        assert_eq!(o.result.stop_reason, reason, "{id}");
        assert_eq!(o.result.total_questions, questions, "{id}");
        assert_eq!(o.questions.len(), questions as usize, "{id}");
        assert_eq!(o.level_history.len(), questions as usize + 1, "{id}");
    }

    let ids: Vec<&str> = report
        .outcomes
        .iter()
        .map(|o| o.candidate_id.as_str())
        .collect();
    assert_eq!(
        ids,
        ["floor", "ceiling", "alternating", "sliding", "pairs", "dropout"]
    );
    assert_eq!(report.aggregate.stop_reasons["stability"], 2);
    assert_eq!(report.aggregate.level_distribution[&1], 2);
}

#[tokio::test]
async fn e2e_questions_follow_the_level() {
    let set = parse_assessment_set(Path::new(BASICS)).unwrap();
    let report = run_set(&set, LevelingRules::default()).await;

    let ceiling = outcome(&report, "ceiling");
    for (question, level) in ceiling.questions.iter().zip(&ceiling.level_history) {
        assert!(
            question.starts_with(&format!("math-L{}-", level + 1)),
            "{question} asked at level {level}"
        );
    }
}

#[tokio::test]
async fn e2e_config_rules_change_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("leveler.toml");
    std::fs::write(&config_path, "[rules]\nmax_questions = 20\n").unwrap();

    let config = load_config_from(Some(&config_path)).unwrap();
    assert_eq!(config.rules.max_questions, 20);
    assert_eq!(config.rules.stability_stop, 4);

    let set = parse_assessment_set(Path::new(BASICS)).unwrap();
    let baseline = run_set(&set, LevelingRules::default()).await;
    let current = run_set(&set, config.rules).await;

    let pairs = outcome(&current, "pairs");
    assert_eq!(pairs.result.total_questions, 20);
    assert_eq!(pairs.result.stop_reason, StopReason::QuestionLimit);
    assert_eq!(pairs.result.final_level, 4);

    let drift = current.compare(&baseline, 0);
    assert_eq!(drift.drifted.len(), 1);
    assert_eq!(drift.drifted[0].candidate_id, "pairs");
    assert_eq!(drift.drifted[0].delta, -1);
    assert_eq!(drift.unchanged, 5);
}

#[tokio::test]
async fn e2e_registry_replays_script() {
    let set = parse_assessment_set(Path::new(BASICS)).unwrap();
    let report = run_set(&set, LevelingRules::default()).await;
    let pairs = outcome(&report, "pairs");

    let registry = SessionRegistry::default();
    let id = registry.start(3).await.unwrap();
    for i in 0..35 {
        registry.submit(id, i % 4 < 2).await.unwrap();
    }
    let result = registry.complete(id).await.unwrap();
    assert_eq!(result, pairs.result);

    let snapshot = registry.snapshot(id).await.unwrap();
    assert_eq!(snapshot.level_history, pairs.level_history);

    let err = registry.submit(id, true).await.unwrap_err();
    assert!(err.is_completed_session());
}

#[tokio::test]
async fn e2e_report_survives_disk() {
    let set = parse_assessment_set(Path::new(BASICS)).unwrap();
    let report = run_set(&set, LevelingRules::default()).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    report.save_json(&path).unwrap();
    let loaded = AssessmentReport::load_json(&path).unwrap();

    assert_eq!(loaded.id, report.id);
    assert_eq!(loaded.assessment_set.candidate_count, 6);
    assert!(!loaded.compare(&report, 0).has_drift());
}
