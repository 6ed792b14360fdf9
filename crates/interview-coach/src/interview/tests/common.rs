use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::interview::domain::{
    AnswerId, BehavioralAnswer, CodeSubmission, Difficulty, InterviewSession, InterviewType,
    Language, PersonaType, Question, QuestionId, SessionId, SessionStatus, SubmissionId, UserId,
};
use crate::interview::evaluation::{FeedbackEvaluator, FeedbackModel, HeuristicConfig, ModelError};
use crate::interview::feedback::{BehavioralFeedback, TechnicalFeedback};
use crate::interview::questions::QuestionBank;
use crate::interview::repository::{InMemorySessionStore, RepositoryError, SessionStore};
use crate::interview::service::{InterviewService, NewSession, PracticeSettings};

pub(super) fn seeded_question(id: &str) -> Question {
    QuestionBank::seeded()
        .question(&QuestionId::from(id))
        .cloned()
        .expect("seeded question exists")
}

pub(super) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn new_session(interview_type: InterviewType, persona: PersonaType) -> NewSession {
    NewSession {
        interview_type,
        difficulty: Difficulty::Medium,
        duration_min: 30,
        role_target: "SDE".to_string(),
        persona_type: persona,
        user_id: None,
    }
}

pub(super) fn stored_session(
    id: &str,
    interview_type: InterviewType,
    started_at: DateTime<Utc>,
) -> InterviewSession {
    InterviewSession {
        id: SessionId(id.to_string()),
        user_id: UserId("demo-user".to_string()),
        interview_type,
        difficulty: Difficulty::Medium,
        duration_min: 30,
        role_target: "SDE".to_string(),
        persona_type: PersonaType::Student,
        status: SessionStatus::InProgress,
        started_at,
        finished_at: None,
        overall_score: None,
        question_ids: vec![QuestionId::from("t1"), QuestionId::from("b1")],
    }
}

pub(super) fn behavioral_feedback(score: f64) -> BehavioralFeedback {
    BehavioralFeedback {
        content_score: score,
        structure_score: score,
        communication_score: score,
        what_went_well: vec!["Clear opening.".to_string()],
        improve_next_time: vec!["State the result.".to_string()],
        language_feedback: None,
    }
}

pub(super) fn technical_feedback(score: f64) -> TechnicalFeedback {
    TechnicalFeedback {
        correctness_score: score,
        efficiency_score: score,
        quality_score: score,
        what_went_well: vec!["Readable loop.".to_string()],
        improve_next_time: vec!["Cover empty input.".to_string()],
    }
}

pub(super) fn answer(session: &SessionId, score: f64, offset_minutes: i64) -> BehavioralAnswer {
    BehavioralAnswer {
        id: AnswerId::generate(),
        session_id: session.clone(),
        question_id: QuestionId::from("b1"),
        transcript: "For example, I led a migration and the result was faster deploys."
            .to_string(),
        feedback: Some(behavioral_feedback(score)),
        created_at: base_time() + Duration::minutes(offset_minutes),
    }
}

pub(super) fn submission(session: &SessionId, score: f64, offset_minutes: i64) -> CodeSubmission {
    CodeSubmission {
        id: SubmissionId::generate(),
        session_id: session.clone(),
        question_id: QuestionId::from("t1"),
        language: Language::Javascript,
        code: "function twoSum(nums, target) { return []; }".to_string(),
        passed_tests: 2,
        total_tests: 2,
        feedback: Some(technical_feedback(score)),
        created_at: base_time() + Duration::minutes(offset_minutes),
    }
}

pub(super) fn heuristic_service() -> (
    Arc<InMemorySessionStore>,
    InterviewService<InMemorySessionStore>,
) {
    let store = Arc::new(InMemorySessionStore::default());
    let service = InterviewService::new(
        store.clone(),
        FeedbackEvaluator::default(),
        PracticeSettings::default(),
    );
    (store, service)
}

/// Canned reply for [`ScriptedModel`].
#[derive(Debug, Clone)]
pub(super) enum Script {
    Reply(String),
    Status(u16),
}

/// Feedback model that answers every prompt with the same scripted outcome.
#[derive(Debug)]
pub(super) struct ScriptedModel {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedModel {
    pub(super) fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            script: Script::Reply(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub(super) fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            script: Script::Status(status),
            calls: AtomicUsize::new(0),
        })
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedbackModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Status(status) => Err(ModelError::Status(*status)),
        }
    }
}

pub(super) fn evaluator_with(model: Arc<ScriptedModel>) -> FeedbackEvaluator {
    FeedbackEvaluator::with_model(HeuristicConfig::default(), model)
}

/// Store whose backend is always down.
pub(super) struct UnavailableStore;

fn unavailable<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl SessionStore for UnavailableStore {
    fn insert_session(&self, _session: InterviewSession) -> Result<(), RepositoryError> {
        unavailable()
    }

    fn update_session(&self, _session: InterviewSession) -> Result<(), RepositoryError> {
        unavailable()
    }

    fn session(&self, _id: &SessionId) -> Result<Option<InterviewSession>, RepositoryError> {
        unavailable()
    }

    fn sessions_for_user(&self, _user: &UserId) -> Result<Vec<InterviewSession>, RepositoryError> {
        unavailable()
    }

    fn insert_answer(&self, _answer: BehavioralAnswer) -> Result<(), RepositoryError> {
        unavailable()
    }

    fn answers_for_session(
        &self,
        _session: &SessionId,
    ) -> Result<Vec<BehavioralAnswer>, RepositoryError> {
        unavailable()
    }

    fn insert_submission(&self, _submission: CodeSubmission) -> Result<(), RepositoryError> {
        unavailable()
    }

    fn submissions_for_session(
        &self,
        _session: &SessionId,
    ) -> Result<Vec<CodeSubmission>, RepositoryError> {
        unavailable()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
