use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    BehavioralAnswer, CodeSubmission, InterviewSession, InterviewType, SessionId,
};
use super::scoring::{behavioral_average, mean, overall_score, technical_average};

/// Score change, in points, that separates a real trend from noise.
const TREND_MARGIN: f64 = 2.0;
const RECENT_SESSIONS: usize = 3;

/// Aggregates for one session, recomputed from its stored answers and submissions.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionScores {
    pub session: InterviewSession,
    pub behavioral_average: Option<f64>,
    pub technical_average: Option<f64>,
    pub overall_score: Option<f64>,
}

impl SessionScores {
    /// Completed sessions report their frozen overall score, even when it is empty; open sessions
    /// are recomputed.
    pub fn compute(
        session: InterviewSession,
        answers: &[BehavioralAnswer],
        submissions: &[CodeSubmission],
    ) -> Self {
        let behavioral = behavioral_average(answers);
        let technical = technical_average(submissions);
        let overall = if session.is_completed() {
            session.overall_score
        } else {
            overall_score(&session, behavioral, technical)
        };

        Self {
            session,
            behavioral_average: behavioral,
            technical_average: technical,
            overall_score: overall,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improved,
    Dropped,
    Same,
}

impl Trend {
    pub fn between(current: Option<f64>, previous: Option<f64>) -> Self {
        match (current, previous) {
            (Some(current), Some(previous)) if current > previous + TREND_MARGIN => {
                Self::Improved
            }
            (Some(current), Some(previous)) if current < previous - TREND_MARGIN => Self::Dropped,
            _ => Self::Same,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub technical_average: Option<f64>,
    pub behavioral_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSessionView {
    pub id: SessionId,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub score: Option<f64>,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_interviews: usize,
    pub average_score: Option<f64>,
    pub breakdown: ScoreBreakdown,
    pub sessions: Vec<RecentSessionView>,
}

/// Roll per-session scores into the progress dashboard.
///
/// Sessions are ordered newest first; each of the three most recent is compared with the
/// next older one in that window.
pub fn summarize(mut scores: Vec<SessionScores>) -> DashboardSummary {
    scores.sort_by(|a, b| b.session.started_at.cmp(&a.session.started_at));

    let average_score = mean(scores.iter().filter_map(|entry| entry.overall_score));
    let breakdown = ScoreBreakdown {
        technical_average: mean(scores.iter().filter_map(|entry| entry.technical_average)),
        behavioral_average: mean(scores.iter().filter_map(|entry| entry.behavioral_average)),
    };

    let recent = &scores[..scores.len().min(RECENT_SESSIONS)];
    let sessions = recent
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let previous = recent.get(index + 1).and_then(|older| older.overall_score);
            RecentSessionView {
                id: entry.session.id.clone(),
                date: entry.session.started_at,
                interview_type: entry.session.interview_type,
                score: entry.overall_score,
                trend: Trend::between(entry.overall_score, previous),
            }
        })
        .collect();

    DashboardSummary {
        total_interviews: scores.len(),
        average_score,
        breakdown,
        sessions,
    }
}
