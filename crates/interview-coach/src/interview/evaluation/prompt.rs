use serde::Deserialize;
use serde_json::Value;

use super::super::feedback::{
    clamp_score, BehavioralFeedback, LanguageFeedback, TechnicalFeedback,
};
use super::heuristics::pass_ratio;
use super::{BehavioralRequest, TechnicalRequest};

#[derive(Debug, thiserror::Error)]
pub enum ResponseParseError {
    #[error("model response is not the expected JSON shape: {0}")]
    Shape(#[from] serde_json::Error),
}

pub(crate) fn behavioral_prompt(request: &BehavioralRequest<'_>) -> String {
    format!(
        r#"You are a kind but direct mock interview coach.
Evaluate the candidate's behavioral answer.

Return ONLY JSON with the following shape:

{{
  "contentScore": number,         // 0-10
  "structureScore": number,       // 0-10
  "communicationScore": number,   // 0-10
  "whatWentWell": string[],       // 1-4 short bullets
  "improveNextTime": string[],    // 1-4 short bullets
  "languageFeedback": {{
    "pronunciationTips": string[],
    "grammarTips": string[]
  }} | null
}}

Scores:
- 0-3: weak
- 4-6: needs work
- 7-8: decent
- 9-10: strong.

Persona type:
- "student": college CS student.
- "bootcamp": bootcamp/self-taught dev.
- "esl": English is not their first language, be extra gentle and encouraging.

If personaType is not "esl", set languageFeedback to null.

Question:
{title}
{body}

PersonaType: {persona}
Difficulty: {difficulty}

Transcript:
{transcript}"#,
        title = request.question.title,
        body = request.question.body,
        persona = request.persona.label(),
        difficulty = request.difficulty.label(),
        transcript = request.transcript,
    )
}

pub(crate) fn technical_prompt(request: &TechnicalRequest<'_>) -> String {
    let ratio = pass_ratio(request.passed_tests, request.total_tests);
    format!(
        r#"You are a senior engineer reviewing a candidate's solution to an interview problem.

Return ONLY JSON with the following shape:

{{
  "correctnessScore": number,   // 0-10, based on described test pass ratio
  "efficiencyScore": number,    // 0-10, rough time/space complexity and approach
  "qualityScore": number,       // 0-10, readability, structure, naming
  "whatWentWell": string[],     // 1-4 short bullets
  "improveNextTime": string[]   // 1-4 short bullets
}}

Be concise and constructive.

Question:
{title}
{body}

Difficulty: {difficulty}
Language: {language}
Test summary: {passed}/{total} tests passed (pass ratio {ratio:.2}).

User code:
{code}"#,
        title = request.question.title,
        body = request.question.body,
        difficulty = request.difficulty.label(),
        language = request.language.label(),
        passed = request.passed_tests,
        total = request.total_tests,
        code = request.code,
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBehavioralFeedback {
    content_score: f64,
    structure_score: f64,
    communication_score: f64,
    what_went_well: Vec<String>,
    improve_next_time: Vec<String>,
    #[serde(default)]
    language_feedback: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTechnicalFeedback {
    correctness_score: f64,
    efficiency_score: f64,
    quality_score: f64,
    what_went_well: Vec<String>,
    improve_next_time: Vec<String>,
}

/// Parse a behavioral model reply.
///
/// Scores and bullet lists are required. `languageFeedback` is advisory: it is read only for
/// ESL learners, and a malformed value drops the tips without rejecting the reply.
pub(crate) fn parse_behavioral(
    text: &str,
    request: &BehavioralRequest<'_>,
) -> Result<BehavioralFeedback, ResponseParseError> {
    let raw: RawBehavioralFeedback = serde_json::from_str(text)?;
    let language_feedback = if request.persona.is_esl() {
        raw.language_feedback.as_ref().and_then(language_tips)
    } else {
        None
    };

    Ok(BehavioralFeedback {
        content_score: clamp_score(raw.content_score),
        structure_score: clamp_score(raw.structure_score),
        communication_score: clamp_score(raw.communication_score),
        what_went_well: raw.what_went_well,
        improve_next_time: raw.improve_next_time,
        language_feedback,
    })
}

fn language_tips(value: &Value) -> Option<LanguageFeedback> {
    let fields = value.as_object()?;
    Some(LanguageFeedback {
        pronunciation_tips: string_list(fields.get("pronunciationTips")),
        grammar_tips: string_list(fields.get("grammarTips")),
    })
}

// Null, missing or non-array lists read as empty; non-string entries are skipped.
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn parse_technical(text: &str) -> Result<TechnicalFeedback, ResponseParseError> {
    let raw: RawTechnicalFeedback = serde_json::from_str(text)?;

    Ok(TechnicalFeedback {
        correctness_score: clamp_score(raw.correctness_score),
        efficiency_score: clamp_score(raw.efficiency_score),
        quality_score: clamp_score(raw.quality_score),
        what_went_well: raw.what_went_well,
        improve_next_time: raw.improve_next_time,
    })
}
