//! Aggregate statistics over candidate outcomes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::report::CandidateOutcome;

/// Aggregate statistics across all outcomes of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    pub candidates: usize,
    /// Mean 1-based final level.
    pub mean_final_level: f64,
    /// Mean number of questions asked.
    pub mean_questions: f64,
    /// Correct answers over all questions asked.
    pub accuracy: f64,
    /// Candidates per 1-based final level.
    pub level_distribution: BTreeMap<u8, usize>,
    /// Candidates per stop reason.
    pub stop_reasons: BTreeMap<String, usize>,
    /// Candidates whose final level missed their expectation.
    pub expectation_mismatches: usize,
}

/// Compute aggregate statistics from all outcomes.
pub fn compute_aggregate_stats(outcomes: &[CandidateOutcome]) -> AggregateStats {
    if outcomes.is_empty() {
        return AggregateStats::default();
    }

    let n = outcomes.len() as f64;
    let mean_final_level = outcomes
        .iter()
        .map(|o| o.result.final_level as f64)
        .sum::<f64>()
        / n;

    let total_questions: u64 = outcomes
        .iter()
        .map(|o| o.result.total_questions as u64)
        .sum();
    let total_correct: u64 = outcomes
        .iter()
        .map(|o| o.result.correct_answers as u64)
        .sum();

    let accuracy = if total_questions == 0 {
        0.0
    } else {
        total_correct as f64 / total_questions as f64
    };

    let mut level_distribution = BTreeMap::new();
    let mut stop_reasons = BTreeMap::new();
    for o in outcomes {
        *level_distribution.entry(o.result.final_level).or_insert(0) += 1;
        *stop_reasons
            .entry(o.result.stop_reason.to_string())
            .or_insert(0) += 1;
    }

    let expectation_mismatches = outcomes
        .iter()
        .filter(|o| o.matches_expectation() == Some(false))
        .count();

    AggregateStats {
        candidates: outcomes.len(),
        mean_final_level,
        mean_questions: total_questions as f64 / n,
        accuracy,
        level_distribution,
        stop_reasons,
        expectation_mismatches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{AssessmentResult, StopReason};

    fn outcome(final_level: u8, total: u32, correct: u32, reason: StopReason) -> CandidateOutcome {
        CandidateOutcome {
            candidate_id: format!("c{final_level}-{total}"),
            name: String::new(),
            subject: "math".into(),
            seed_level: 0,
            result: AssessmentResult {
                final_level,
                total_questions: total,
                correct_answers: correct,
                stop_reason: reason,
            },
            level_history: vec![],
            questions: vec![],
            expected_final_level: None,
        }
    }

    #[test]
    fn empty_outcomes() {
        let stats = compute_aggregate_stats(&[]);
        assert_eq!(stats.candidates, 0);
        assert_eq!(stats.accuracy, 0.0);
    }

    #[test]
    fn means_and_counts() {
        let outcomes = vec![
            outcome(1, 10, 0, StopReason::Floor),
            outcome(10, 17, 17, StopReason::Ceiling),
            outcome(4, 12, 6, StopReason::Stability),
            outcome(4, 13, 7, StopReason::Stability),
        ];
        let stats = compute_aggregate_stats(&outcomes);

        assert_eq!(stats.candidates, 4);
        assert!((stats.mean_final_level - 4.75).abs() < f64::EPSILON);
        assert!((stats.mean_questions - 13.0).abs() < f64::EPSILON);
        assert!((stats.accuracy - 30.0 / 52.0).abs() < 1e-12);
        assert_eq!(stats.level_distribution.get(&4), Some(&2));
        assert_eq!(stats.stop_reasons.get("stability"), Some(&2));
        assert_eq!(stats.stop_reasons.get("floor"), Some(&1));
        assert_eq!(stats.expectation_mismatches, 0);
    }

    #[test]
    fn counts_expectation_mismatches() {
        let mut a = outcome(3, 12, 6, StopReason::Stability);
        a.expected_final_level = Some(2);
        let mut b = outcome(3, 12, 6, StopReason::Stability);
        b.expected_final_level = Some(3);
        let stats = compute_aggregate_stats(&[a, b]);
        assert_eq!(stats.expectation_mismatches, 1);
    }
}
