//! Assessment run orchestrator.
//!
//! Drives every candidate of an assessment set through a full session,
//! concurrently and with bounded parallelism.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::engine::AssessmentEngine;
use crate::model::{AssessmentSet, Candidate};
use crate::report::{AssessmentReport, AssessmentSetSummary, CandidateFailure, CandidateOutcome};
use crate::respondent::respondent_for;
use crate::statistics::compute_aggregate_stats;
use crate::traits::{QuestionBank, Respondent};

/// Configuration for the runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Maximum concurrent sessions.
    pub parallelism: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { parallelism: 4 }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_candidate_start(&self, candidate_id: &str, seed_level: u8);
    fn on_candidate_complete(&self, outcome: &CandidateOutcome);
    fn on_candidate_error(&self, candidate_id: &str, error: &str);
    fn on_set_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_candidate_start(&self, _: &str, _: u8) {}
    fn on_candidate_complete(&self, _: &CandidateOutcome) {}
    fn on_candidate_error(&self, _: &str, _: &str) {}
    fn on_set_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Runs assessment sets against a question bank.
pub struct AssessmentRunner {
    bank: Arc<dyn QuestionBank>,
    engine: AssessmentEngine,
    config: RunnerConfig,
}

impl AssessmentRunner {
    pub fn new(bank: Arc<dyn QuestionBank>, engine: AssessmentEngine, config: RunnerConfig) -> Self {
        Self {
            bank,
            engine,
            config,
        }
    }

    /// Assess every candidate in `set`.
    ///
    /// A failing candidate is logged and reported through `progress`; it
    /// does not abort the run.
    pub async fn run(
        &self,
        set: &AssessmentSet,
        progress: &dyn ProgressReporter,
    ) -> Result<AssessmentReport> {
        anyhow::ensure!(self.config.parallelism >= 1, "parallelism must be at least 1");

        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism));

        let mut futures = FuturesUnordered::new();

        for candidate in &set.candidates {
            let bank = Arc::clone(&self.bank);
            let engine = self.engine.clone();
            let semaphore = Arc::clone(&semaphore);
            let candidate = candidate.clone();
            let subject = candidate.subject_or(&set.subject).to_string();
            let seed_level = set.seed_for(&candidate);

            futures.push(async move {
                let candidate_id = candidate.id.clone();
                let inner = async {
                    let _permit = semaphore
                        .acquire()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                    progress.on_candidate_start(&candidate.id, seed_level);
                    let respondent = respondent_for(&candidate.responses);
                    assess_candidate(
                        &engine,
                        bank.as_ref(),
                        respondent.as_ref(),
                        &candidate,
                        &subject,
                        seed_level,
                    )
                    .await
                };
                (candidate_id, inner.await)
            });
        }

        let mut outcomes = Vec::new();
        let mut failures = Vec::new();
        let mut completed = 0usize;
        let total = futures.len();

        while let Some((candidate_id, result)) = futures.next().await {
            match result {
                Ok(outcome) => {
                    progress.on_candidate_complete(&outcome);
                    outcomes.push(outcome);
                    completed += 1;
                }
                Err(e) => {
                    tracing::error!("assessment failed for {candidate_id}: {e:#}");
                    let error = format!("{e:#}");
                    progress.on_candidate_error(&candidate_id, &error);
                    failures.push(CandidateFailure {
                        candidate_id,
                        error,
                    });
                }
            }
        }

        // Completion order is nondeterministic; reports follow script order.
        let order = |id: &str| set.candidates.iter().position(|c| c.id == id);
        outcomes.sort_by_key(|o| order(&o.candidate_id));
        failures.sort_by_key(|f| order(&f.candidate_id));
        let failed = failures.len();

        let elapsed = start.elapsed();
        progress.on_set_complete(total, completed, failed, elapsed);

        let aggregate = compute_aggregate_stats(&outcomes);

        tracing::debug!(%run_id, completed, failed, "assessment set finished");

        Ok(AssessmentReport {
            id: run_id,
            created_at: chrono::Utc::now(),
            assessment_set: AssessmentSetSummary {
                id: set.id.clone(),
                name: set.name.clone(),
                candidate_count: set.candidates.len(),
            },
            outcomes,
            failures,
            aggregate,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}

/// Run one candidate's session until the engine stops it or the respondent
/// runs out of answers.
pub async fn assess_candidate(
    engine: &AssessmentEngine,
    bank: &dyn QuestionBank,
    respondent: &dyn Respondent,
    candidate: &Candidate,
    subject: &str,
    seed_level: u8,
) -> Result<CandidateOutcome> {
    let mut session = engine
        .start(seed_level)
        .with_context(|| format!("candidate '{}'", candidate.id))?;
    let mut questions = Vec::new();

    while session.is_testing() {
        let question = bank
            .question_for(subject, session.current_level)
            .await
            .with_context(|| {
                format!(
                    "question bank '{}' failed at level {}",
                    bank.name(),
                    session.current_level
                )
            })?;

        let Some(correct) = respondent.answer(&question).await? else {
            break;
        };
        engine.submit_answer(&mut session, correct)?;
        questions.push(question.id);
    }

    let result = engine.complete(&mut session);

    Ok(CandidateOutcome {
        candidate_id: candidate.id.clone(),
        name: candidate.name.clone(),
        subject: subject.to_string(),
        seed_level,
        result,
        level_history: session.level_history,
        questions,
        expected_final_level: candidate.expected_final_level,
    })
}
