//! leveler CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "leveler", version, about = "Adaptive leveling assessment harness")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay assessment scripts through the engine
    Run {
        /// Path to .toml script or directory
        #[arg(long)]
        script: PathBuf,

        /// Max concurrent sessions (default: from config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Output directory (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, table, all
        #[arg(long, default_value = "all")]
        format: String,

        /// Filter candidates by tags (comma-separated)
        #[arg(long)]
        filter: Option<String>,

        /// Exit code 1 if any candidate misses its expected level
        #[arg(long)]
        fail_on_mismatch: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Simulate students of fixed ability
    Simulate {
        /// 1-based ability levels (comma-separated, e.g. "1,5,10")
        #[arg(long)]
        abilities: String,

        /// 1-based starting level
        #[arg(long, default_value = "1")]
        seed_level: u8,

        /// Subject to draw questions from (default: from config)
        #[arg(long)]
        subject: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two run reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Level difference tolerated before a candidate counts as drifted
        #[arg(long, default_value = "0")]
        tolerance: u8,

        /// Exit code 1 if any candidate drifted
        #[arg(long)]
        fail_on_drift: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate assessment script files
    Validate {
        /// Path to script file or directory
        #[arg(long)]
        script: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example script
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("leveler=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            script,
            parallelism,
            output,
            format,
            filter,
            fail_on_mismatch,
            config,
        } => {
            commands::run::execute(
                script,
                parallelism,
                output,
                format,
                filter,
                fail_on_mismatch,
                config,
            )
            .await
        }
        Commands::Simulate {
            abilities,
            seed_level,
            subject,
            config,
        } => commands::simulate::execute(abilities, seed_level, subject, config).await,
        Commands::Compare {
            baseline,
            current,
            tolerance,
            fail_on_drift,
            format,
        } => commands::compare::execute(baseline, current, tolerance, fail_on_drift, format),
        Commands::Validate { script, config } => commands::validate::execute(script, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
