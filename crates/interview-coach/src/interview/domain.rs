use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::feedback::{BehavioralFeedback, TechnicalFeedback};

/// Identifier wrapper for practice sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Identifier wrapper for question bank entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl AnswerId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl SubmissionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// User archetype that biases question selection and feedback tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaType {
    Student,
    Bootcamp,
    Esl,
}

impl PersonaType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Bootcamp => "bootcamp",
            Self::Esl => "esl",
        }
    }

    pub const fn is_esl(self) -> bool {
        matches!(self, Self::Esl)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    Technical,
    Behavioral,
    Mixed,
}

impl InterviewType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Behavioral => "behavioral",
            Self::Mixed => "mixed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Whether a question of `candidate` difficulty belongs in a session at `self`.
    ///
    /// Easy sessions keep easy questions only, hard sessions drop easy questions,
    /// medium sessions accept everything.
    pub const fn admits(self, candidate: Difficulty) -> bool {
        match self {
            Self::Easy => matches!(candidate, Difficulty::Easy),
            Self::Hard => !matches!(candidate, Difficulty::Easy),
            Self::Medium => true,
        }
    }
}

/// Languages accepted for code submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[serde(alias = "js", alias = "node")]
    Javascript,
    #[serde(alias = "py")]
    Python,
}

impl Language {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Javascript => "javascript",
            Self::Python => "python",
        }
    }

    /// Lenient parse used for free-form language names.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" | "node" => Some(Self::Javascript),
            "python" | "py" => Some(Self::Python),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Technical,
    Behavioral,
}

/// Immutable question bank entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub kind: QuestionKind,
    pub difficulty: Difficulty,
    pub title: String,
    pub body: String,
    /// Role tag such as "SDE" or "Web Dev"; "Any" matches every role.
    pub role_target: String,
}

impl Question {
    pub fn matches_role(&self, requested: &str) -> bool {
        self.role_target == "Any"
            || requested.is_empty()
            || self.role_target.to_lowercase() == requested.to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    InProgress,
    Completed,
}

/// Practice session owned by the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub id: SessionId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub difficulty: Difficulty,
    pub duration_min: u32,
    pub role_target: String,
    pub persona_type: PersonaType,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    pub question_ids: Vec<QuestionId>,
}

impl InterviewSession {
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Freeze the session. Returns `false` when it was already completed, leaving it untouched.
    pub fn complete(&mut self, overall_score: Option<f64>, finished_at: DateTime<Utc>) -> bool {
        if self.is_completed() {
            return false;
        }

        self.status = SessionStatus::Completed;
        self.finished_at = Some(finished_at);
        if overall_score.is_some() {
            self.overall_score = overall_score;
        }
        true
    }
}

/// Spoken or typed answer to a behavioral question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehavioralAnswer {
    pub id: AnswerId,
    pub session_id: SessionId,
    pub question_id: QuestionId,
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<BehavioralFeedback>,
    pub created_at: DateTime<Utc>,
}

/// Code answer to a technical question along with its test tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSubmission {
    pub id: SubmissionId,
    pub session_id: SessionId,
    pub question_id: QuestionId,
    pub language: Language,
    pub code: String,
    pub passed_tests: u32,
    pub total_tests: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<TechnicalFeedback>,
    pub created_at: DateTime<Utc>,
}
