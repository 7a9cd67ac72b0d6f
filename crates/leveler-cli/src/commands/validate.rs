//! The `leveler validate` command.

use std::path::PathBuf;

use anyhow::Result;

use leveler_core::config::load_config_from;
use leveler_core::parser;

pub fn execute(script_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let sets = parser::load_path(&script_path)?;

    let mut total_warnings = 0;

    for set in &sets {
        println!("Assessment set: {} ({} candidates)", set.name, set.candidates.len());

        let warnings = parser::validate_assessment_set(set, &config.rules);
        for w in &warnings {
            let prefix = w
                .candidate_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All assessment sets valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
