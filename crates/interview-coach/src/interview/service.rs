use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::dashboard::{summarize, DashboardSummary, SessionScores};
use super::domain::{
    AnswerId, BehavioralAnswer, CodeSubmission, Difficulty, InterviewSession, InterviewType,
    Language, PersonaType, Question, QuestionId, SessionId, SessionStatus, SubmissionId, UserId,
};
use super::evaluation::{BehavioralRequest, FeedbackEvaluator, TechnicalRequest};
use super::harness::{SandboxHarness, StubHarness, TestCaseResult, TestHarness, TestTally};
use super::questions::{QuestionBank, SelectionRequest};
use super::repository::{RepositoryError, SessionStore};
use super::scoring::{behavioral_average, overall_score, suggest_next_practice, technical_average};
use crate::config::PracticeConfig;

/// Defaults applied to incoming requests.
#[derive(Debug, Clone)]
pub struct PracticeSettings {
    pub default_user: UserId,
    pub question_count: usize,
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            default_user: UserId("demo-user".to_string()),
            question_count: 6,
        }
    }
}

impl From<&PracticeConfig> for PracticeSettings {
    fn from(config: &PracticeConfig) -> Self {
        Self {
            default_user: UserId(config.default_user.clone()),
            question_count: config.question_count,
        }
    }
}

/// Session setup as chosen by the candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub difficulty: Difficulty,
    pub duration_min: u32,
    #[serde(default)]
    pub role_target: String,
    pub persona_type: PersonaType,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    pub transcript: String,
    /// Overrides the session persona for this answer only.
    #[serde(default)]
    pub persona_type: Option<PersonaType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAttempt {
    pub question_id: QuestionId,
    pub code: String,
    pub language: Language,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetails {
    pub session: InterviewSession,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone)]
pub struct CodeOutcome {
    pub submission: CodeSubmission,
    pub tests: Vec<TestCaseResult>,
}

#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub session: InterviewSession,
    pub behavioral_average: Option<f64>,
    pub technical_average: Option<f64>,
    pub next_practice: &'static str,
}

impl CompletionOutcome {
    pub fn overall_score(&self) -> Option<f64> {
        self.session.overall_score
    }
}

/// Composes the question bank, store, evaluator and harnesses into the practice workflow.
pub struct InterviewService<S> {
    store: Arc<S>,
    bank: Arc<QuestionBank>,
    evaluator: Arc<FeedbackEvaluator>,
    harness: Arc<dyn TestHarness>,
    sandbox: Arc<SandboxHarness>,
    settings: PracticeSettings,
}

impl<S> InterviewService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(store: Arc<S>, evaluator: FeedbackEvaluator, settings: PracticeSettings) -> Self {
        Self {
            store,
            bank: Arc::new(QuestionBank::seeded()),
            evaluator: Arc::new(evaluator),
            harness: Arc::new(StubHarness),
            sandbox: Arc::new(SandboxHarness::unconfigured()),
            settings,
        }
    }

    pub fn with_question_bank(mut self, bank: QuestionBank) -> Self {
        self.bank = Arc::new(bank);
        self
    }

    /// Route code execution through `sandbox`; a configured sandbox also grades submissions.
    pub fn with_sandbox(mut self, sandbox: SandboxHarness) -> Self {
        let sandbox = Arc::new(sandbox);
        if sandbox.is_configured() {
            self.harness = sandbox.clone() as Arc<dyn TestHarness>;
        }
        self.sandbox = sandbox;
        self
    }

    pub fn with_harness(mut self, harness: Arc<dyn TestHarness>) -> Self {
        self.harness = harness;
        self
    }

    pub fn questions(&self) -> Vec<Question> {
        self.bank.all().cloned().collect()
    }

    pub fn create_session(&self, request: NewSession) -> Result<InterviewSession, ServiceError> {
        self.create_session_with_rng(request, &mut rand::thread_rng())
    }

    /// Create a session, drawing seed questions with the supplied random source.
    pub fn create_session_with_rng<R>(
        &self,
        request: NewSession,
        rng: &mut R,
    ) -> Result<InterviewSession, ServiceError>
    where
        R: Rng + ?Sized,
    {
        if request.duration_min == 0 {
            return Err(ServiceError::Validation(
                "durationMin must be greater than zero".to_string(),
            ));
        }

        let selection = SelectionRequest {
            interview_type: request.interview_type,
            difficulty: request.difficulty,
            role_target: request.role_target.clone(),
            persona_type: request.persona_type,
            count: self.settings.question_count,
        };
        let seed = self.bank.select(&selection, rng);

        let session = InterviewSession {
            id: SessionId::generate(),
            user_id: request
                .user_id
                .unwrap_or_else(|| self.settings.default_user.clone()),
            interview_type: request.interview_type,
            difficulty: request.difficulty,
            duration_min: request.duration_min,
            role_target: request.role_target,
            persona_type: request.persona_type,
            status: SessionStatus::InProgress,
            started_at: Utc::now(),
            finished_at: None,
            overall_score: None,
            question_ids: seed.into_iter().map(|question| question.id).collect(),
        };

        self.store.insert_session(session.clone())?;
        info!(
            session_id = %session.id.0,
            interview_type = session.interview_type.label(),
            difficulty = session.difficulty.label(),
            questions = session.question_ids.len(),
            "practice session created"
        );

        Ok(session)
    }

    pub fn get_session(&self, id: &SessionId) -> Result<SessionDetails, ServiceError> {
        let session = self.require_session(id)?;
        let questions = self.bank.questions_for(&session.question_ids);
        Ok(SessionDetails { session, questions })
    }

    /// Score a behavioral answer and store it with its feedback.
    pub async fn submit_answer(
        &self,
        session_id: &SessionId,
        submission: AnswerSubmission,
    ) -> Result<BehavioralAnswer, ServiceError> {
        let session = self.require_session(session_id)?;
        let question = self.require_question(&submission.question_id)?;

        let feedback = self
            .evaluator
            .evaluate_behavioral(BehavioralRequest {
                transcript: &submission.transcript,
                question: &question,
                persona: submission.persona_type.unwrap_or(session.persona_type),
                difficulty: session.difficulty,
            })
            .await;

        let answer = BehavioralAnswer {
            id: AnswerId::generate(),
            session_id: session.id.clone(),
            question_id: question.id.clone(),
            transcript: submission.transcript,
            feedback: Some(feedback),
            created_at: Utc::now(),
        };

        self.store.insert_answer(answer.clone())?;
        debug!(session_id = %session.id.0, question_id = %question.id.0, "behavioral answer stored");

        Ok(answer)
    }

    /// Run the harness over submitted code, score it, and store the submission.
    pub async fn submit_code(
        &self,
        session_id: &SessionId,
        attempt: CodeAttempt,
    ) -> Result<CodeOutcome, ServiceError> {
        let session = self.require_session(session_id)?;
        let question = self.require_question(&attempt.question_id)?;

        let tests = self
            .harness
            .run(&attempt.code, attempt.language.label())
            .await;
        let tally = TestTally::of(&tests);

        let feedback = self
            .evaluator
            .evaluate_technical(TechnicalRequest {
                code: &attempt.code,
                question: &question,
                language: attempt.language,
                difficulty: session.difficulty,
                passed_tests: tally.passed,
                total_tests: tally.total,
            })
            .await;

        let submission = CodeSubmission {
            id: SubmissionId::generate(),
            session_id: session.id.clone(),
            question_id: question.id.clone(),
            language: attempt.language,
            code: attempt.code,
            passed_tests: tally.passed,
            total_tests: tally.total,
            feedback: Some(feedback),
            created_at: Utc::now(),
        };

        self.store.insert_submission(submission.clone())?;
        debug!(
            session_id = %session.id.0,
            question_id = %question.id.0,
            harness = self.harness.name(),
            passed = tally.passed,
            total = tally.total,
            "code submission stored"
        );

        Ok(CodeOutcome { submission, tests })
    }

    /// Finish a session, freezing its overall score.
    ///
    /// Completing an already completed session returns the frozen result unchanged.
    pub fn complete_session(&self, id: &SessionId) -> Result<CompletionOutcome, ServiceError> {
        let mut session = self.require_session(id)?;
        let answers = self.store.answers_for_session(id)?;
        let submissions = self.store.submissions_for_session(id)?;

        let behavioral = behavioral_average(&answers);
        let technical = technical_average(&submissions);

        if session.is_completed() {
            debug!(session_id = %id.0, "session already completed");
        } else {
            let overall = overall_score(&session, behavioral, technical);
            session.complete(overall, Utc::now());
            self.store.update_session(session.clone())?;
            info!(
                session_id = %id.0,
                overall_score = ?session.overall_score,
                "practice session completed"
            );
        }

        let next_practice = suggest_next_practice(&session, behavioral, technical);

        Ok(CompletionOutcome {
            session,
            behavioral_average: behavioral,
            technical_average: technical,
            next_practice,
        })
    }

    /// Progress summary across all of a user's sessions.
    pub fn dashboard(&self, user: Option<&UserId>) -> Result<DashboardSummary, ServiceError> {
        let user = user.unwrap_or(&self.settings.default_user);
        let sessions = self.store.sessions_for_user(user)?;

        let mut scores = Vec::with_capacity(sessions.len());
        for session in sessions {
            let answers = self.store.answers_for_session(&session.id)?;
            let submissions = self.store.submissions_for_session(&session.id)?;
            scores.push(SessionScores::compute(session, &answers, &submissions));
        }

        Ok(summarize(scores))
    }

    /// Execute code in the sandbox without storing anything.
    pub async fn run_code(&self, code: &str, language: &str) -> Vec<TestCaseResult> {
        self.sandbox.run(code, language).await
    }

    fn require_session(&self, id: &SessionId) -> Result<InterviewSession, ServiceError> {
        self.store
            .session(id)?
            .ok_or_else(|| ServiceError::SessionNotFound(id.clone()))
    }

    fn require_question(&self, id: &QuestionId) -> Result<Question, ServiceError> {
        self.bank
            .question(id)
            .cloned()
            .ok_or_else(|| ServiceError::QuestionNotFound(id.clone()))
    }
}

/// Error raised by the interview service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
    #[error("question {0} not found")]
    QuestionNotFound(QuestionId),
    #[error("invalid request: {0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
