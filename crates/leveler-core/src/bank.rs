//! Synthetic question bank.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::traits::{Question, QuestionBank};

/// Generates deterministic placeholder questions.
///
/// Ids look like `math-L3-2`: subject, 1-based level, and how many questions
/// of that subject and level were handed out so far.
pub struct GeneratedQuestionBank {
    issued: Mutex<HashMap<(String, u8), u32>>,
    call_count: AtomicU32,
}

impl GeneratedQuestionBank {
    pub fn new() -> Self {
        Self {
            issued: Mutex::new(HashMap::new()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Number of questions handed out.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Default for GeneratedQuestionBank {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionBank for GeneratedQuestionBank {
    fn name(&self) -> &str {
        "generated"
    }

    async fn question_for(&self, subject: &str, level: u8) -> anyhow::Result<Question> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let n = {
            let mut issued = self
                .issued
                .lock()
                .map_err(|_| anyhow::anyhow!("question bank lock poisoned"))?;
            let counter = issued.entry((subject.to_string(), level)).or_insert(0);
            *counter += 1;
            *counter
        };

        Ok(Question {
            id: format!("{subject}-L{}-{n}", level as u16 + 1),
            subject: subject.to_string(),
            level,
            prompt: format!("{subject} question {n} at level {}", level as u16 + 1),
        })
    }
}
