//! Mock-interview practice workflow.
//!
//! A session draws seed questions from the bank, collects behavioral answers and code
//! submissions scored by the feedback evaluator, and is finally frozen with an overall score
//! that feeds the progress dashboard.

pub mod dashboard;
pub mod domain;
pub mod evaluation;
pub mod feedback;
pub mod harness;
pub mod questions;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use dashboard::{DashboardSummary, RecentSessionView, ScoreBreakdown, SessionScores, Trend};
pub use domain::{
    AnswerId, BehavioralAnswer, CodeSubmission, Difficulty, InterviewSession, InterviewType,
    Language, PersonaType, Question, QuestionId, QuestionKind, SessionId, SessionStatus,
    SubmissionId, UserId,
};
pub use evaluation::{
    BehavioralRequest, FeedbackEvaluator, FeedbackModel, GeminiClient, HeuristicConfig,
    ModelError, ResponseParseError, TechnicalRequest,
};
pub use feedback::{BehavioralFeedback, LanguageFeedback, TechnicalFeedback};
pub use harness::{
    Judge0Endpoint, SandboxHarness, StubHarness, TestCaseResult, TestHarness, TestTally,
};
pub use questions::{QuestionBank, QuestionMix, SelectionRequest};
pub use repository::{InMemorySessionStore, RepositoryError, SessionStore};
pub use router::interview_router;
pub use service::{
    AnswerSubmission, CodeAttempt, CodeOutcome, CompletionOutcome, InterviewService, NewSession,
    PracticeSettings, ServiceError, SessionDetails,
};
