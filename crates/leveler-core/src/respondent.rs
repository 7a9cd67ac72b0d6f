//! Simulated respondents.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::model::ResponsePlan;
use crate::traits::{Question, Respondent};

/// Replays a fixed list of answers, then goes quiet.
pub struct ScriptedRespondent {
    answers: Vec<bool>,
    next: AtomicUsize,
}

impl ScriptedRespondent {
    pub fn new(answers: Vec<bool>) -> Self {
        Self {
            answers,
            next: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Respondent for ScriptedRespondent {
    async fn answer(&self, _question: &Question) -> anyhow::Result<Option<bool>> {
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        Ok(self.answers.get(i).copied())
    }
}

/// Answers correctly exactly when the question is at or below its ability.
pub struct AbilityRespondent {
    ability: u8,
}

impl AbilityRespondent {
    pub fn new(ability: u8) -> Self {
        Self { ability }
    }
}

#[async_trait]
impl Respondent for AbilityRespondent {
    async fn answer(&self, question: &Question) -> anyhow::Result<Option<bool>> {
        Ok(Some(question.level <= self.ability))
    }
}

/// Build the respondent a response plan describes.
pub fn respondent_for(plan: &ResponsePlan) -> Arc<dyn Respondent> {
    match plan {
        ResponsePlan::Scripted(answers) => Arc::new(ScriptedRespondent::new(answers.clone())),
        ResponsePlan::Ability(ability) => Arc::new(AbilityRespondent::new(*ability)),
    }
}
