use serde::{Deserialize, Serialize};

/// Tuning constants for the rule-based evaluator.
///
/// The defaults reproduce the long-standing scoring rubric; none of the thresholds carry a
/// deeper calibration, so they are kept adjustable rather than baked into the rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicConfig {
    pub content_words_per_point: usize,
    pub example_bonus: f64,
    pub structure_with_example_and_result: f64,
    pub structure_baseline: f64,
    pub communication_words_per_point: usize,
    pub communication_baseline: f64,
    pub communication_cap: f64,
    pub empty_answer_score: f64,
    pub esl_communication_floor: f64,
    pub efficiency_baseline: f64,
    pub nested_loop_efficiency: f64,
    pub sort_bonus: f64,
    pub quality_baseline: f64,
    pub named_function_bonus: f64,
    pub comment_bonus: f64,
    pub hard_difficulty_cap: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            content_words_per_point: 20,
            example_bonus: 2.0,
            structure_with_example_and_result: 8.0,
            structure_baseline: 5.0,
            communication_words_per_point: 25,
            communication_baseline: 4.0,
            communication_cap: 9.0,
            empty_answer_score: 1.0,
            esl_communication_floor: 7.0,
            efficiency_baseline: 5.0,
            nested_loop_efficiency: 4.0,
            sort_bonus: 1.0,
            quality_baseline: 5.0,
            named_function_bonus: 1.0,
            comment_bonus: 1.0,
            hard_difficulty_cap: 8.0,
        }
    }
}
