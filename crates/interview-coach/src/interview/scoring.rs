//! Session-level score rollups.
//!
//! Averages are reported on a 0-100 scale: the 0-10 rubric mean is multiplied by ten.

use super::domain::{BehavioralAnswer, CodeSubmission, InterviewSession, InterviewType};

const LOW_SCORE: f64 = 60.0;
const HIGH_SCORE: f64 = 80.0;

/// Mean behavioral rubric score across answers that carry feedback; `None` when none do.
pub fn behavioral_average(answers: &[BehavioralAnswer]) -> Option<f64> {
    mean(
        answers
            .iter()
            .filter_map(|answer| answer.feedback.as_ref())
            .map(|feedback| feedback.mean_score()),
    )
    .map(|average| average * 10.0)
}

/// Mean technical rubric score across submissions that carry feedback; `None` when none do.
pub fn technical_average(submissions: &[CodeSubmission]) -> Option<f64> {
    mean(
        submissions
            .iter()
            .filter_map(|submission| submission.feedback.as_ref())
            .map(|feedback| feedback.mean_score()),
    )
    .map(|average| average * 10.0)
}

/// Weighted blend of the two averages according to the session type.
///
/// Technical sessions weight technical 0.8 / behavioral 0.2, behavioral sessions the reverse,
/// and mixed sessions split evenly. In the weighted cases a missing minor side borrows the major
/// side's value; in the even split a missing side counts as zero.
pub fn overall_score(
    session: &InterviewSession,
    behavioral: Option<f64>,
    technical: Option<f64>,
) -> Option<f64> {
    if behavioral.is_none() && technical.is_none() {
        return None;
    }

    let score = match session.interview_type {
        InterviewType::Technical => {
            let tech = technical.unwrap_or(0.0);
            let beh = behavioral.unwrap_or(tech);
            0.8 * tech + 0.2 * beh
        }
        InterviewType::Behavioral => {
            let beh = behavioral.unwrap_or(0.0);
            let tech = technical.unwrap_or(beh);
            0.8 * beh + 0.2 * tech
        }
        InterviewType::Mixed => 0.5 * technical.unwrap_or(0.0) + 0.5 * behavioral.unwrap_or(0.0),
    };

    Some(score)
}

/// Practice guidance for the next session.
pub fn suggest_next_practice(
    session: &InterviewSession,
    behavioral: Option<f64>,
    technical: Option<f64>,
) -> &'static str {
    match session.interview_type {
        InterviewType::Technical => match technical {
            Some(score) if score < LOW_SCORE => "More DS/Algo problems at easy/medium level.",
            Some(score) if score >= HIGH_SCORE => {
                "Try harder DS/Algo or system design style questions."
            }
            _ => "Continue with similar technical questions and gradually raise difficulty.",
        },
        InterviewType::Behavioral => match behavioral {
            Some(score) if score < LOW_SCORE && session.persona_type.is_esl() => {
                "Short, focused behavioral questions to practice English speaking and structure."
            }
            Some(score) if score < LOW_SCORE => {
                "More behavioral questions using the STAR structure."
            }
            _ => "Mix in a few technical questions while keeping regular behavioral practice.",
        },
        InterviewType::Mixed => match (technical, behavioral) {
            (Some(tech), Some(beh)) if tech < beh => {
                "More technical practice with medium difficulty coding questions."
            }
            (Some(tech), Some(beh)) if beh < tech => {
                "More behavioral/communication practice, especially describing projects with STAR."
            }
            _ => "Another mixed session with similar difficulty to strengthen both areas.",
        },
    }
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (total, count) = values.fold((0.0, 0usize), |(total, count), value| {
        (total + value, count + 1)
    });
    (count > 0).then(|| total / count as f64)
}
