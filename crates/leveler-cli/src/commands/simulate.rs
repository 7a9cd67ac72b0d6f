//! The `leveler simulate` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use leveler_core::bank::GeneratedQuestionBank;
use leveler_core::config::load_config_from;
use leveler_core::model::{AssessmentSet, Candidate, ResponsePlan};
use leveler_core::runner::{AssessmentRunner, NoopReporter, RunnerConfig};
use leveler_core::AssessmentEngine;

use super::print_outcome_table;

/// Parse a 1-based level given on the command line into a 0-based one.
fn zero_based(level: u8, max_level: u8, what: &str) -> Result<u8> {
    anyhow::ensure!(
        (1..=max_level as u16 + 1).contains(&(level as u16)),
        "{what} {level} is outside 1..={}",
        max_level as u16 + 1
    );
    Ok(level - 1)
}

pub async fn execute(
    abilities: String,
    seed_level: u8,
    subject: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let engine = AssessmentEngine::new(config.rules.clone())?;
    let max_level = engine.rules().max_level;

    let seed = zero_based(seed_level, max_level, "seed level")?;

    let candidates = abilities
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            let ability: u8 = s
                .parse()
                .with_context(|| format!("invalid ability '{s}'"))?;
            let responses = ResponsePlan::Ability(zero_based(ability, max_level, "ability")?);
            Ok(Candidate {
                id: format!("ability-{ability}"),
                name: responses.describe(),
                description: String::new(),
                subject: None,
                seed_level: None,
                responses,
                expected_final_level: None,
                tags: vec![],
            })
        })
        .collect::<Result<Vec<_>>>()?;
    anyhow::ensure!(!candidates.is_empty(), "no abilities given");

    let set = AssessmentSet {
        id: "simulation".into(),
        name: "Simulation".into(),
        description: String::new(),
        subject: subject.unwrap_or(config.default_subject),
        default_seed_level: seed,
        candidates,
    };

    let runner = AssessmentRunner::new(
        Arc::new(GeneratedQuestionBank::new()),
        engine,
        RunnerConfig {
            parallelism: config.parallelism.max(1),
        },
    );
    let report = runner.run(&set, &NoopReporter).await?;

    print_outcome_table(&report);

    for o in &report.outcomes {
        println!(
            "{} ({}): level {} after {} questions ({})",
            o.candidate_id,
            o.name,
            o.result.final_level,
            o.result.total_questions,
            o.result.stop_reason
        );
    }

    Ok(())
}
