use serde::{Deserialize, Serialize};

/// Pronunciation and grammar coaching, only produced for ESL learners.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageFeedback {
    #[serde(default)]
    pub pronunciation_tips: Vec<String>,
    #[serde(default)]
    pub grammar_tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehavioralFeedback {
    pub content_score: f64,
    pub structure_score: f64,
    pub communication_score: f64,
    pub what_went_well: Vec<String>,
    pub improve_next_time: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_feedback: Option<LanguageFeedback>,
}

impl BehavioralFeedback {
    /// Mean of the three rubric scores, on the 0-10 scale.
    pub fn mean_score(&self) -> f64 {
        (self.content_score + self.structure_score + self.communication_score) / 3.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalFeedback {
    pub correctness_score: f64,
    pub efficiency_score: f64,
    pub quality_score: f64,
    pub what_went_well: Vec<String>,
    pub improve_next_time: Vec<String>,
}

impl TechnicalFeedback {
    pub fn mean_score(&self) -> f64 {
        (self.correctness_score + self.efficiency_score + self.quality_score) / 3.0
    }
}

/// Force a rubric score into `[0, 10]`; NaN maps to 1.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        1.0
    } else if score < 0.0 {
        0.0
    } else if score > 10.0 {
        10.0
    } else {
        score
    }
}
