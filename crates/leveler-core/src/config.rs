//! leveler configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::rules::LevelingRules;

/// Top-level leveler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelerConfig {
    /// Max concurrent sessions when running scripts.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Subject used when a script or command doesn't name one.
    #[serde(default = "default_subject")]
    pub default_subject: String,
    /// Leveling thresholds.
    #[serde(default)]
    pub rules: LevelingRules,
}

fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./leveler-results")
}
fn default_subject() -> String {
    "general".to_string()
}

impl Default for LevelerConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
            default_subject: default_subject(),
            rules: LevelingRules::default(),
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `leveler.toml` in the current directory
/// 2. `~/.config/leveler/config.toml`
///
/// Environment variable overrides: `LEVELER_PARALLELISM`, `LEVELER_OUTPUT_DIR`.
pub fn load_config() -> Result<LevelerConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<LevelerConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("leveler.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => parse_config_file(path)?,
        None => LevelerConfig::default(),
    };

    apply_env_overrides(&mut config)?;

    config
        .rules
        .validate()
        .context("invalid leveling rules in config")?;

    tracing::debug!(path = ?config_path, "configuration loaded");
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<LevelerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<LevelerConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn apply_env_overrides(config: &mut LevelerConfig) -> Result<()> {
    if let Ok(value) = std::env::var("LEVELER_PARALLELISM") {
        config.parallelism = value
            .trim()
            .parse()
            .with_context(|| format!("invalid LEVELER_PARALLELISM: '{value}'"))?;
    }
    if let Ok(dir) = std::env::var("LEVELER_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("leveler"))
}
