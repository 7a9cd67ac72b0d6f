//! The `leveler init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("leveler.toml").exists() {
        println!("leveler.toml already exists, skipping.");
    } else {
        std::fs::write("leveler.toml", SAMPLE_CONFIG)?;
        println!("Created leveler.toml");
    }

    std::fs::create_dir_all("scripts")?;
    let example_path = std::path::Path::new("scripts/example.toml");
    if example_path.exists() {
        println!("scripts/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_SCRIPT)?;
        println!("Created scripts/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Tune the [rules] thresholds in leveler.toml");
    println!("  2. Run: leveler validate --script scripts/example.toml");
    println!("  3. Run: leveler run --script scripts/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# leveler configuration

parallelism = 4
output_dir = "./leveler-results"
default_subject = "general"

# Levels are 0-based here; reports show them 1-based.
[rules]
max_level = 9
promote_streak = 2
demote_streak = 2
high_performance_level = 6
high_performance_streak = 3
jump_size = 2
stability_stop = 4
stability_min_questions = 12
ceiling_streak = 2
ceiling_min_questions = 15
floor_streak = 4
floor_min_questions = 10
oscillation_stop = 2
oscillation_min_questions = 12
max_questions = 35
"#;

const EXAMPLE_SCRIPT: &str = r#"[assessment_set]
id = "example"
name = "Example Assessment Set"
description = "A few scripted students to get started"
subject = "math"
default_seed_level = 0

[[candidates]]
id = "struggling"
name = "Struggling student"
description = "Misses every question from the first level"
answers = "WWWWW WWWWW"
expected_final_level = 1
tags = ["floor"]

[[candidates]]
id = "strong"
name = "Strong student"
description = "Knows every level"
ability = 9
expected_final_level = 10
tags = ["ceiling"]

[[candidates]]
id = "alternating"
name = "Alternating student"
description = "Right, wrong, right, wrong"
seed_level = 3
answers = "CW CW CW CW CW CW"
expected_final_level = 4
tags = ["stability"]
"#;
