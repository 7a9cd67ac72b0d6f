//! The `leveler run` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use leveler_core::bank::GeneratedQuestionBank;
use leveler_core::config::load_config_from;
use leveler_core::parser;
use leveler_core::report::CandidateOutcome;
use leveler_core::runner::{AssessmentRunner, ProgressReporter, RunnerConfig};
use leveler_core::AssessmentEngine;

use super::print_outcome_table;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_candidate_start(&self, candidate_id: &str, seed_level: u8) {
        eprintln!("  Starting: {candidate_id} at level {}", seed_level as u16 + 1);
    }

    fn on_candidate_complete(&self, outcome: &CandidateOutcome) {
        eprintln!(
            "  Done: {} -> level {} after {} questions ({})",
            outcome.candidate_id,
            outcome.result.final_level,
            outcome.result.total_questions,
            outcome.result.stop_reason,
        );
    }

    fn on_candidate_error(&self, candidate_id: &str, error: &str) {
        eprintln!("  ERROR: {candidate_id}: {error}");
    }

    fn on_set_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} assessed, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    script_path: PathBuf,
    parallelism: Option<usize>,
    output: Option<PathBuf>,
    format: String,
    filter: Option<String>,
    fail_on_mismatch: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "table"]
    } else {
        format.split(',').map(|s| s.trim()).collect()
    };

    let mut sets = parser::load_path(&script_path)?;
    tracing::debug!(sets = sets.len(), path = %script_path.display(), "loaded assessment scripts");

    if let Some(filter_tags) = &filter {
        let tags: Vec<&str> = filter_tags.split(',').map(|s| s.trim()).collect();
        for set in &mut sets {
            set.retain_tagged(&tags);
        }
    }

    let engine = AssessmentEngine::new(config.rules.clone())?;
    let runner = AssessmentRunner::new(
        Arc::new(GeneratedQuestionBank::new()),
        engine,
        RunnerConfig { parallelism },
    );
    let reporter = ConsoleReporter;

    let mut mismatches = 0usize;
    let mut failed = 0usize;

    for set in &sets {
        eprintln!(
            "leveler v{}: running {} candidates from '{}'",
            env!("CARGO_PKG_VERSION"),
            set.candidates.len(),
            set.name
        );

        let report = runner.run(set, &reporter).await?;

        for fmt in &formats {
            match *fmt {
                "table" => print_outcome_table(&report),
                "json" => {
                    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
                    let path = output.join(format!("report-{}-{timestamp}.json", set.id));
                    report.save_json(&path)?;
                    eprintln!("Results saved to: {}", path.display());
                }
                other => eprintln!("Unknown format: {other}"),
            }
        }

        let failures = report.expectation_failures();
        for f in &failures {
            println!(
                "MISMATCH {}: expected level {}, got {}",
                f.candidate_id,
                f.expected_final_level.unwrap_or_default(),
                f.result.final_level
            );
        }
        mismatches += failures.len();

        for f in &report.failures {
            println!("FAILED {}: {}", f.candidate_id, f.error);
        }
        failed += report.failures.len();

        println!(
            "{}: {} candidates, mean level {:.2}, {} mismatch(es), {} failed",
            set.name,
            report.aggregate.candidates,
            report.aggregate.mean_final_level,
            failures.len(),
            report.failures.len()
        );
    }

    if fail_on_mismatch && (mismatches > 0 || failed > 0) {
        eprintln!(
            "{mismatches} candidate(s) missed their expected level, {failed} failed to run"
        );
        std::process::exit(1);
    }

    Ok(())
}
