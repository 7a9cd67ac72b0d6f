//! Assessment reports with JSON persistence and drift detection.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::AssessmentResult;
use crate::statistics::AggregateStats;

/// How one candidate's assessment went.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateOutcome {
    pub candidate_id: String,
    pub name: String,
    pub subject: String,
    /// 0-based starting level.
    pub seed_level: u8,
    pub result: AssessmentResult,
    /// Seed level followed by the level after each answer.
    pub level_history: Vec<u8>,
    /// Question ids in the order they were asked.
    #[serde(default)]
    pub questions: Vec<String>,
    /// 1-based level the script expects, if any.
    #[serde(default)]
    pub expected_final_level: Option<u8>,
}

impl CandidateOutcome {
    /// `None` when the candidate carries no expectation.
    pub fn matches_expectation(&self) -> Option<bool> {
        self.expected_final_level
            .map(|expected| expected == self.result.final_level)
    }
}

/// A complete assessment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub assessment_set: AssessmentSetSummary,
    pub outcomes: Vec<CandidateOutcome>,
    /// Candidates whose assessment errored before completing.
    #[serde(default)]
    pub failures: Vec<CandidateFailure>,
    pub aggregate: AggregateStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// A candidate that produced no outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFailure {
    pub candidate_id: String,
    pub error: String,
}

/// Summary of an assessment set (without the candidate definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSetSummary {
    pub id: String,
    pub name: String,
    pub candidate_count: usize,
}

impl AssessmentReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Candidates whose final level differs from the expected one.
    pub fn expectation_failures(&self) -> Vec<&CandidateOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.matches_expectation() == Some(false))
            .collect()
    }

    /// Compare final levels against a baseline run.
    ///
    /// A candidate drifts when its final level moved by more than
    /// `tolerance` levels.
    pub fn compare(&self, baseline: &AssessmentReport, tolerance: u8) -> DriftReport {
        let levels = |report: &AssessmentReport| -> HashMap<String, u8> {
            report
                .outcomes
                .iter()
                .map(|o| (o.candidate_id.clone(), o.result.final_level))
                .collect()
        };

        let baseline_levels = levels(baseline);
        let current_levels = levels(self);

        let mut drifted = Vec::new();
        let mut unchanged = 0usize;
        let mut new_candidates = 0usize;

        for outcome in &self.outcomes {
            let id = &outcome.candidate_id;
            let current = outcome.result.final_level;
            match baseline_levels.get(id) {
                Some(&baseline_level) => {
                    let delta = current as i16 - baseline_level as i16;
                    if delta.unsigned_abs() > tolerance as u16 {
                        drifted.push(LevelDrift {
                            candidate_id: id.clone(),
                            baseline_level,
                            current_level: current,
                            delta,
                        });
                    } else {
                        unchanged += 1;
                    }
                }
                None => new_candidates += 1,
            }
        }
        drifted.sort_by(|a, b| a.candidate_id.cmp(&b.candidate_id));

        let removed_candidates = baseline_levels
            .keys()
            .filter(|k| !current_levels.contains_key(*k))
            .count();

        DriftReport {
            drifted,
            unchanged,
            new_candidates,
            removed_candidates,
        }
    }
}

/// Result of comparing two reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    /// Candidates whose final level moved beyond the tolerance.
    pub drifted: Vec<LevelDrift>,
    pub unchanged: usize,
    /// Candidates in current but not baseline.
    pub new_candidates: usize,
    /// Candidates in baseline but not current.
    pub removed_candidates: usize,
}

/// A final-level change for one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDrift {
    pub candidate_id: String,
    pub baseline_level: u8,
    pub current_level: u8,
    pub delta: i16,
}

impl DriftReport {
    /// Format the drift report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} drifted, {} unchanged, {} new, {} removed\n\n",
            self.drifted.len(),
            self.unchanged,
            self.new_candidates,
            self.removed_candidates
        ));

        if !self.drifted.is_empty() {
            md.push_str("### Drifted\n\n");
            md.push_str("| Candidate | Baseline | Current | Delta |\n");
            md.push_str("|-----------|----------|---------|-------|\n");
            for d in &self.drifted {
                md.push_str(&format!(
                    "| {} | {} | {} | {:+} |\n",
                    d.candidate_id, d.baseline_level, d.current_level, d.delta
                ));
            }
        }

        md
    }

    /// Returns true if any candidate drifted.
    pub fn has_drift(&self) -> bool {
        !self.drifted.is_empty()
    }
}
