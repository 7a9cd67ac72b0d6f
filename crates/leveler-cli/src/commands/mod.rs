pub mod compare;
pub mod init;
pub mod run;
pub mod simulate;
pub mod validate;

use leveler_core::report::AssessmentReport;

/// Print a per-candidate summary table to stderr.
pub fn print_outcome_table(report: &AssessmentReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Candidate",
        "Seed",
        "Final",
        "Expected",
        "Questions",
        "Accuracy",
        "Stop",
    ]);

    for o in &report.outcomes {
        let expected = match (o.expected_final_level, o.matches_expectation()) {
            (Some(level), Some(true)) => format!("{level} ok"),
            (Some(level), _) => format!("{level} MISMATCH"),
            (None, _) => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(&o.candidate_id),
            Cell::new(o.seed_level as u16 + 1),
            Cell::new(o.result.final_level),
            Cell::new(expected),
            Cell::new(o.result.total_questions),
            Cell::new(format!("{:.1}%", o.result.accuracy() * 100.0)),
            Cell::new(o.result.stop_reason),
        ]);
    }

    eprintln!("\n{table}");
}
