//! leveler-core: adaptive leveling assessment engine.
//!
//! This crate holds the per-answer leveling engine and everything built on
//! it: assessment scripts, the async runner, the session registry, and
//! reports.

pub mod bank;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod oscillation;
pub mod parser;
pub mod registry;
pub mod report;
pub mod respondent;
pub mod rules;
pub mod runner;
pub mod session;
pub mod statistics;
pub mod traits;

pub use engine::AssessmentEngine;
pub use error::AssessmentError;
pub use rules::LevelingRules;
pub use session::{AssessmentResult, AssessmentSession, AssessmentState, StopReason};
