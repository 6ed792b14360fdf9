use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{QuestionId, SessionId, UserId};
use super::feedback::{BehavioralFeedback, TechnicalFeedback};
use super::harness::TestCaseResult;
use super::repository::SessionStore;
use super::service::{AnswerSubmission, CodeAttempt, InterviewService, NewSession, ServiceError};
use crate::error::AppError;

/// Router builder exposing the practice session endpoints.
pub fn interview_router<S>(service: Arc<InterviewService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/interview", post(create_handler::<S>))
        .route("/api/interview/:session_id", get(session_handler::<S>))
        .route("/api/interview/:session_id/answer", post(answer_handler::<S>))
        .route("/api/interview/:session_id/code", post(code_handler::<S>))
        .route(
            "/api/interview/:session_id/complete",
            post(complete_handler::<S>),
        )
        .route("/api/dashboard/summary", get(dashboard_handler::<S>))
        .route("/api/run-code", post(run_code_handler::<S>))
        .route("/api/questions", get(questions_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedView {
    pub session_id: SessionId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerFeedbackView {
    pub feedback: Option<BehavioralFeedback>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFeedbackView {
    pub feedback: Option<TechnicalFeedback>,
    pub tests: Vec<TestCaseResult>,
    pub passed_tests: u32,
    pub total_tests: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionView {
    pub overall_score: Option<f64>,
    pub behavioral_average: Option<f64>,
    pub technical_average: Option<f64>,
    pub next_practice: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunCodeRequest {
    pub code: String,
    pub language: String,
    #[serde(default)]
    pub question_id: Option<QuestionId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RunCodeView {
    pub tests: Vec<TestCaseResult>,
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    axum::Json(request): axum::Json<NewSession>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.create_session(request) {
        Ok(session) => {
            let view = SessionCreatedView {
                session_id: session.id,
            };
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn session_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.get_session(&SessionId(session_id)) {
        Ok(details) => (StatusCode::OK, axum::Json(details)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn answer_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    Path(session_id): Path<String>,
    axum::Json(submission): axum::Json<AnswerSubmission>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service
        .submit_answer(&SessionId(session_id), submission)
        .await
    {
        Ok(answer) => {
            let view = AnswerFeedbackView {
                feedback: answer.feedback,
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn code_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    Path(session_id): Path<String>,
    axum::Json(attempt): axum::Json<CodeAttempt>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.submit_code(&SessionId(session_id), attempt).await {
        Ok(outcome) => {
            let view = CodeFeedbackView {
                feedback: outcome.submission.feedback,
                tests: outcome.tests,
                passed_tests: outcome.submission.passed_tests,
                total_tests: outcome.submission.total_tests,
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn complete_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.complete_session(&SessionId(session_id)) {
        Ok(outcome) => {
            let view = CompletionView {
                overall_score: outcome.overall_score(),
                behavioral_average: outcome.behavioral_average,
                technical_average: outcome.technical_average,
                next_practice: outcome.next_practice.to_string(),
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    Query(query): Query<DashboardQuery>,
) -> Response
where
    S: SessionStore + 'static,
{
    let user = query
        .user_id
        .filter(|user| !user.trim().is_empty())
        .map(UserId);
    match service.dashboard(user.as_ref()) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn run_code_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    axum::Json(request): axum::Json<RunCodeRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    if let Some(question) = &request.question_id {
        debug!(question_id = %question.0, language = %request.language, "running code sample");
    }
    let tests = service.run_code(&request.code, &request.language).await;
    (StatusCode::OK, axum::Json(RunCodeView { tests })).into_response()
}

pub(crate) async fn questions_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
) -> Response
where
    S: SessionStore + 'static,
{
    (StatusCode::OK, axum::Json(service.questions())).into_response()
}

fn error_response(error: ServiceError) -> Response {
    AppError::from(error).into_response()
}
