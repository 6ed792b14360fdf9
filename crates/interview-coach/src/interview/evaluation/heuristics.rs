use std::sync::LazyLock;

use regex::Regex;

use super::super::domain::Difficulty;
use super::super::feedback::{
    clamp_score, BehavioralFeedback, LanguageFeedback, TechnicalFeedback,
};
use super::config::HeuristicConfig;
use super::{BehavioralRequest, TechnicalRequest};

static EXAMPLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)for example|for instance|one time|once").expect("valid regex")
});
static RESULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)result|outcome|impact|improved|increased|reduced").expect("valid regex")
});
static NESTED_FOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"for\s*\(.*for\s*\(").expect("valid regex"));
static NESTED_WHILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"while\s*\(.*while\s*\(").expect("valid regex"));
static SORT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"sort\s*\(").expect("valid regex"));
static NAMED_FUNCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"function\s+[a-zA-Z]").expect("valid regex"));
static NAMED_ARROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"const\s+[a-zA-Z].*=>").expect("valid regex"));
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//|/\*").expect("valid regex"));

/// Observations pulled from a behavioral transcript before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TranscriptSignals {
    pub word_count: usize,
    pub has_example: bool,
    pub mentions_result: bool,
    pub is_blank: bool,
}

impl TranscriptSignals {
    pub(crate) fn read(transcript: &str) -> Self {
        Self {
            word_count: transcript.split_whitespace().count(),
            has_example: EXAMPLE_RE.is_match(transcript),
            mentions_result: RESULT_RE.is_match(transcript),
            is_blank: transcript.trim().is_empty(),
        }
    }
}

/// Observations pulled from submitted code before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CodeSignals {
    pub nested_loops: bool,
    pub sorts: bool,
    pub named_function: bool,
    pub commented: bool,
}

impl CodeSignals {
    pub(crate) fn read(code: &str) -> Self {
        Self {
            nested_loops: NESTED_FOR_RE.is_match(code) || NESTED_WHILE_RE.is_match(code),
            sorts: SORT_RE.is_match(code),
            named_function: NAMED_FUNCTION_RE.is_match(code) || NAMED_ARROW_RE.is_match(code),
            commented: COMMENT_RE.is_match(code),
        }
    }
}

pub(crate) fn pass_ratio(passed_tests: u32, total_tests: u32) -> f64 {
    if total_tests > 0 {
        f64::from(passed_tests) / f64::from(total_tests)
    } else {
        0.0
    }
}

pub(crate) fn score_behavioral(
    request: &BehavioralRequest<'_>,
    config: &HeuristicConfig,
) -> BehavioralFeedback {
    let signals = TranscriptSignals::read(request.transcript);

    let example_bonus = if signals.has_example {
        config.example_bonus
    } else {
        0.0
    };
    let mut content = (whole_points(signals.word_count, config.content_words_per_point)
        + example_bonus)
        .min(10.0);
    let mut structure = if signals.has_example && signals.mentions_result {
        config.structure_with_example_and_result
    } else {
        config.structure_baseline
    };
    let mut communication = (whole_points(signals.word_count, config.communication_words_per_point)
        + config.communication_baseline)
        .min(config.communication_cap);

    if signals.is_blank {
        content = config.empty_answer_score;
        structure = config.empty_answer_score;
        communication = config.empty_answer_score;
    }

    if request.persona.is_esl() {
        communication = communication.max(config.esl_communication_floor);
    }

    let what_went_well = vec![
        "You attempted to answer the question directly.".to_string(),
        if signals.has_example {
            "You supported your answer with at least one concrete example.".to_string()
        } else {
            "You can build on this by adding a specific example from your experience.".to_string()
        },
    ];
    let improve_next_time = vec![
        "Use a clear structure like STAR (Situation, Task, Action, Result).".to_string(),
        if signals.mentions_result {
            "You mentioned the outcome; next time, add more measurable details if possible."
                .to_string()
        } else {
            "Try to end your answer by clearly stating the outcome or result.".to_string()
        },
    ];

    let language_feedback = request.persona.is_esl().then(esl_language_tips);

    BehavioralFeedback {
        content_score: clamp_score(content),
        structure_score: clamp_score(structure),
        communication_score: clamp_score(communication),
        what_went_well,
        improve_next_time,
        language_feedback,
    }
}

pub(crate) fn score_technical(
    request: &TechnicalRequest<'_>,
    config: &HeuristicConfig,
) -> TechnicalFeedback {
    let ratio = pass_ratio(request.passed_tests, request.total_tests);
    let signals = CodeSignals::read(request.code);

    let correctness = (ratio * 10.0).round();

    let mut efficiency = if signals.nested_loops {
        config.nested_loop_efficiency
    } else {
        config.efficiency_baseline
    };
    if signals.sorts {
        efficiency += config.sort_bonus;
    }

    let mut quality = config.quality_baseline;
    if signals.named_function {
        quality += config.named_function_bonus;
    }
    if signals.commented {
        quality += config.comment_bonus;
    }

    if request.difficulty == Difficulty::Hard {
        efficiency = efficiency.min(config.hard_difficulty_cap);
        quality = quality.min(config.hard_difficulty_cap);
    }

    let headline = if ratio >= 1.0 {
        "Your solution passed all the sample tests."
    } else if ratio > 0.0 {
        "Your solution passed some of the sample tests."
    } else {
        "You attempted a solution and can now iterate from here."
    };
    let edge_cases = if ratio < 1.0 {
        "Re-check edge cases and think about empty inputs or large values."
    } else {
        "Consider how your solution behaves on very large inputs."
    };

    TechnicalFeedback {
        correctness_score: clamp_score(correctness),
        efficiency_score: clamp_score(efficiency),
        quality_score: clamp_score(quality),
        what_went_well: vec![
            headline.to_string(),
            "Your code compiles and follows a basic structure.".to_string(),
        ],
        improve_next_time: vec![
            edge_cases.to_string(),
            "Try to add small comments or clearer variable names to improve readability."
                .to_string(),
        ],
    }
}

fn whole_points(word_count: usize, words_per_point: usize) -> f64 {
    if words_per_point == 0 {
        return 0.0;
    }
    (word_count / words_per_point) as f64
}

fn esl_language_tips() -> LanguageFeedback {
    LanguageFeedback {
        pronunciation_tips: vec![
            "Slow down slightly; a calm pace often makes your speech clearer.".to_string(),
            "Emphasize key words in your answer, like the technology or result.".to_string(),
        ],
        grammar_tips: vec![
            "Focus on using simple, short sentences rather than long complex ones.".to_string(),
            "It is okay to pause briefly to think; this is normal in real interviews.".to_string(),
        ],
    }
}
