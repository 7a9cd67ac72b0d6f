//! TOML assessment script parser.
//!
//! Loads assessment sets from TOML files and directories, and validates them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::AssessmentError;
use crate::model::{default_subject, AssessmentSet, Candidate, ResponsePlan};
use crate::rules::LevelingRules;

/// Intermediate TOML structure for parsing script files.
#[derive(Debug, Deserialize)]
struct TomlScriptFile {
    assessment_set: TomlSetHeader,
    #[serde(default)]
    candidates: Vec<TomlCandidate>,
}

#[derive(Debug, Deserialize)]
struct TomlSetHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_subject")]
    subject: String,
    #[serde(default)]
    default_seed_level: u8,
}

#[derive(Debug, Deserialize)]
struct TomlCandidate {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    seed_level: Option<u8>,
    #[serde(default)]
    answers: Option<String>,
    #[serde(default)]
    ability: Option<u8>,
    #[serde(default)]
    expected_final_level: Option<u8>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Parse an answer script such as `"CCW W+-"`.
///
/// `C`, `Y`, `1` and `+` are correct; `W`, `N`, `0` and `-` are wrong.
/// Whitespace is ignored.
pub fn parse_answers(script: &str) -> Result<Vec<bool>, AssessmentError> {
    script
        .chars()
        .filter(|c| !c.is_whitespace())
        .enumerate()
        .map(|(i, c)| match c.to_ascii_uppercase() {
            'C' | 'Y' | '1' | '+' => Ok(true),
            'W' | 'N' | '0' | '-' => Ok(false),
            other => Err(AssessmentError::invalid_argument(format!(
                "unrecognized answer '{other}' at position {}",
                i + 1
            ))),
        })
        .collect()
}

/// Parse a single TOML file into an `AssessmentSet`.
pub fn parse_assessment_set(path: &Path) -> Result<AssessmentSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script file: {}", path.display()))?;

    parse_assessment_set_str(&content, path)
}

/// Parse a TOML string into an `AssessmentSet` (useful for testing).
pub fn parse_assessment_set_str(content: &str, source_path: &Path) -> Result<AssessmentSet> {
    let parsed: TomlScriptFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let candidates = parsed
        .candidates
        .into_iter()
        .map(|c| {
            let responses = match (c.answers, c.ability) {
                (Some(script), None) => ResponsePlan::Scripted(
                    parse_answers(&script)
                        .with_context(|| format!("candidate '{}': bad answers", c.id))?,
                ),
                (None, Some(ability)) => ResponsePlan::Ability(ability),
                (Some(_), Some(_)) => {
                    anyhow::bail!("candidate '{}' sets both answers and ability", c.id)
                }
                (None, None) => {
                    anyhow::bail!("candidate '{}' needs either answers or ability", c.id)
                }
            };

            Ok(Candidate {
                id: c.id,
                name: c.name,
                description: c.description,
                subject: c.subject,
                seed_level: c.seed_level,
                responses,
                expected_final_level: c.expected_final_level,
                tags: c.tags,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AssessmentSet {
        id: parsed.assessment_set.id,
        name: parsed.assessment_set.name,
        description: parsed.assessment_set.description,
        subject: parsed.assessment_set.subject,
        default_seed_level: parsed.assessment_set.default_seed_level,
        candidates,
    })
}

/// Recursively load all `.toml` script files from a directory.
pub fn load_assessment_directory(dir: &Path) -> Result<Vec<AssessmentSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            sets.extend(load_assessment_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_assessment_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// Load a file, or every script under a directory.
pub fn load_path(path: &Path) -> Result<Vec<AssessmentSet>> {
    if path.is_dir() {
        load_assessment_directory(path)
    } else {
        Ok(vec![parse_assessment_set(path)?])
    }
}

/// A warning from script validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The candidate ID (if applicable).
    pub candidate_id: Option<String>,
    pub message: String,
}

/// Validate an assessment set against the rules it will run under.
pub fn validate_assessment_set(set: &AssessmentSet, rules: &LevelingRules) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if rules.check_level(set.default_seed_level, "default seed level").is_err() {
        warnings.push(ValidationWarning {
            candidate_id: None,
            message: format!(
                "default_seed_level {} exceeds max level {}",
                set.default_seed_level, rules.max_level
            ),
        });
    }

    let mut seen_ids = std::collections::HashSet::new();
    for candidate in &set.candidates {
        if !seen_ids.insert(&candidate.id) {
            warnings.push(ValidationWarning {
                candidate_id: Some(candidate.id.clone()),
                message: format!("duplicate candidate ID: {}", candidate.id),
            });
        }
    }

    for candidate in &set.candidates {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                candidate_id: Some(candidate.id.clone()),
                message,
            })
        };

        if let Some(seed) = candidate.seed_level {
            if seed > rules.max_level {
                warn(format!(
                    "seed_level {seed} exceeds max level {}",
                    rules.max_level
                ));
            }
        }

        match &candidate.responses {
            ResponsePlan::Scripted(answers) if answers.is_empty() => {
                warn("answer script is empty".into());
            }
            ResponsePlan::Scripted(answers) if answers.len() > rules.max_questions as usize => {
                warn(format!(
                    "{} answers but assessments stop after {} questions",
                    answers.len(),
                    rules.max_questions
                ));
            }
            ResponsePlan::Ability(ability) if *ability > rules.max_level => {
                warn(format!(
                    "ability {ability} exceeds max level {}",
                    rules.max_level
                ));
            }
            _ => {}
        }

        if let Some(expected) = candidate.expected_final_level {
            let top = rules.level_count();
            if expected == 0 || expected as u16 > top {
                warn(format!(
                    "expected_final_level {expected} is outside 1..={top}"
                ));
            }
        }
    }

    warnings
}
