mod config;
mod gemini;
mod heuristics;
mod prompt;

pub use config::HeuristicConfig;
pub use gemini::{FeedbackModel, GeminiClient, ModelError};
pub use prompt::ResponseParseError;

use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::{Difficulty, Language, PersonaType, Question};
use super::feedback::{BehavioralFeedback, TechnicalFeedback};

/// Inputs for scoring one behavioral answer.
#[derive(Debug, Clone, Copy)]
pub struct BehavioralRequest<'a> {
    pub transcript: &'a str,
    pub question: &'a Question,
    pub persona: PersonaType,
    pub difficulty: Difficulty,
}

/// Inputs for scoring one code submission.
#[derive(Debug, Clone, Copy)]
pub struct TechnicalRequest<'a> {
    pub code: &'a str,
    pub question: &'a Question,
    pub language: Language,
    pub difficulty: Difficulty,
    pub passed_tests: u32,
    pub total_tests: u32,
}

/// Produces answer feedback, preferring the generative model and falling back to the rubric.
///
/// Model failures never reach the caller: transport errors, bad statuses and malformed replies
/// all degrade to the deterministic heuristic result.
#[derive(Clone)]
pub struct FeedbackEvaluator {
    heuristics: HeuristicConfig,
    model: Option<Arc<dyn FeedbackModel>>,
}

impl FeedbackEvaluator {
    pub fn heuristic(heuristics: HeuristicConfig) -> Self {
        Self {
            heuristics,
            model: None,
        }
    }

    pub fn with_model(heuristics: HeuristicConfig, model: Arc<dyn FeedbackModel>) -> Self {
        Self {
            heuristics,
            model: Some(model),
        }
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|model| model.name())
    }

    pub async fn evaluate_behavioral(&self, request: BehavioralRequest<'_>) -> BehavioralFeedback {
        let fallback = heuristics::score_behavioral(&request, &self.heuristics);

        let Some(model) = &self.model else {
            return fallback;
        };

        let reply = match model.generate(&prompt::behavioral_prompt(&request)).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(model = model.name(), error = %err, "behavioral evaluation fell back to heuristics");
                return fallback;
            }
        };

        match prompt::parse_behavioral(&reply, &request) {
            Ok(feedback) => {
                debug!(model = model.name(), "behavioral evaluation produced by model");
                feedback
            }
            Err(err) => {
                warn!(model = model.name(), error = %err, "behavioral evaluation fell back to heuristics");
                fallback
            }
        }
    }

    pub async fn evaluate_technical(&self, request: TechnicalRequest<'_>) -> TechnicalFeedback {
        let fallback = heuristics::score_technical(&request, &self.heuristics);

        let Some(model) = &self.model else {
            return fallback;
        };

        let reply = match model.generate(&prompt::technical_prompt(&request)).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(model = model.name(), error = %err, "technical evaluation fell back to heuristics");
                return fallback;
            }
        };

        match prompt::parse_technical(&reply) {
            Ok(feedback) => {
                debug!(model = model.name(), "technical evaluation produced by model");
                feedback
            }
            Err(err) => {
                warn!(model = model.name(), error = %err, "technical evaluation fell back to heuristics");
                fallback
            }
        }
    }
}

impl Default for FeedbackEvaluator {
    fn default() -> Self {
        Self::heuristic(HeuristicConfig::default())
    }
}

impl std::fmt::Debug for FeedbackEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackEvaluator")
            .field("heuristics", &self.heuristics)
            .field("model", &self.model_name())
            .finish()
    }
}
