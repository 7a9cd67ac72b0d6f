//! The `leveler compare` command.

use std::path::PathBuf;

use anyhow::Result;

use leveler_core::report::AssessmentReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    tolerance: u8,
    fail_on_drift: bool,
    format: String,
) -> Result<()> {
    let baseline = AssessmentReport::load_json(&baseline_path)?;
    let current = AssessmentReport::load_json(&current_path)?;

    let report = current.compare(&baseline, tolerance);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Comparison: {} drifted, {} unchanged",
                report.drifted.len(),
                report.unchanged
            );

            if !report.drifted.is_empty() {
                println!("\nDrifted:");
                for d in &report.drifted {
                    println!(
                        "  {} level {} -> {} ({:+})",
                        d.candidate_id, d.baseline_level, d.current_level, d.delta
                    );
                }
            }

            if report.new_candidates > 0 {
                println!("\n{} new candidate(s)", report.new_candidates);
            }
            if report.removed_candidates > 0 {
                println!("{} removed candidate(s)", report.removed_candidates);
            }
        }
    }

    if fail_on_drift && report.has_drift() {
        std::process::exit(1);
    }

    Ok(())
}
