//! Collaborator seams around the engine.
//!
//! The engine only decides levels. Picking a question for a level and
//! obtaining the student's answer belong to the caller; these async traits
//! are how the runner reaches them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A question presented to a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question-bank identifier.
    pub id: String,
    pub subject: String,
    /// 0-based difficulty level.
    pub level: u8,
    /// Text shown to the student.
    pub prompt: String,
}

/// Source of questions for a subject and level.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Human-readable bank name.
    fn name(&self) -> &str;

    /// Pick the next question for `subject` at 0-based `level`.
    async fn question_for(&self, subject: &str, level: u8) -> anyhow::Result<Question>;
}

/// Whoever answers the questions.
#[async_trait]
pub trait Respondent: Send + Sync {
    /// Answer a question: `Some(true)` correct, `Some(false)` wrong, `None`
    /// when there is nothing left to answer.
    async fn answer(&self, question: &Question) -> anyhow::Result<Option<bool>>;
}
