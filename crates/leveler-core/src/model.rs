//! Assessment script data model.
//!
//! An assessment set is a named group of candidates, each of whom answers
//! either from a fixed script or according to a simple ability level. Sets
//! are used to replay and regression-test leveling behavior.

use serde::{Deserialize, Serialize};

/// How a candidate responds to questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePlan {
    /// Answers in order; the assessment is force-completed when they run out.
    Scripted(Vec<bool>),
    /// Answers correctly iff the question's 0-based level is at most this.
    Ability(u8),
}

impl ResponsePlan {
    /// Short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            ResponsePlan::Scripted(answers) => format!("{} scripted answers", answers.len()),
            ResponsePlan::Ability(level) => format!("ability {}", *level as u16 + 1),
        }
    }
}

/// One simulated student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique identifier within the set.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Subject override; falls back to the set's subject.
    #[serde(default)]
    pub subject: Option<String>,
    /// 0-based starting level override; falls back to the set default.
    #[serde(default)]
    pub seed_level: Option<u8>,
    pub responses: ResponsePlan,
    /// Expected 1-based final level, if this candidate is a regression check.
    #[serde(default)]
    pub expected_final_level: Option<u8>,
    /// Tags for filtering candidates.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Candidate {
    pub fn subject_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.subject.as_deref().unwrap_or(default)
    }
}

/// A collection of candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Subject questions are drawn from unless a candidate overrides it.
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Starting level for candidates that don't specify one.
    #[serde(default)]
    pub default_seed_level: u8,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl AssessmentSet {
    /// Seed level a candidate actually starts from.
    pub fn seed_for(&self, candidate: &Candidate) -> u8 {
        candidate.seed_level.unwrap_or(self.default_seed_level)
    }

    /// Keep only candidates carrying at least one of `tags`.
    pub fn retain_tagged(&mut self, tags: &[&str]) {
        self.candidates
            .retain(|c| c.tags.iter().any(|t| tags.contains(&t.as_str())));
    }
}

pub(crate) fn default_subject() -> String {
    "general".to_string()
}
