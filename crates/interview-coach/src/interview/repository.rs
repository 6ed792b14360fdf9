use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    AnswerId, BehavioralAnswer, CodeSubmission, InterviewSession, SessionId, SubmissionId, UserId,
};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Sessions, answers and submissions are written independently; callers recompute aggregates
/// from answers and submissions rather than trusting any cached session field.
pub trait SessionStore: Send + Sync {
    fn insert_session(&self, session: InterviewSession) -> Result<(), RepositoryError>;
    fn update_session(&self, session: InterviewSession) -> Result<(), RepositoryError>;
    fn session(&self, id: &SessionId) -> Result<Option<InterviewSession>, RepositoryError>;
    fn sessions_for_user(&self, user: &UserId) -> Result<Vec<InterviewSession>, RepositoryError>;
    fn insert_answer(&self, answer: BehavioralAnswer) -> Result<(), RepositoryError>;
    fn answers_for_session(
        &self,
        session: &SessionId,
    ) -> Result<Vec<BehavioralAnswer>, RepositoryError>;
    fn insert_submission(&self, submission: CodeSubmission) -> Result<(), RepositoryError>;
    fn submissions_for_session(
        &self,
        session: &SessionId,
    ) -> Result<Vec<CodeSubmission>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-lifetime store; everything is lost on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, InterviewSession>>>,
    answers: Arc<Mutex<HashMap<AnswerId, BehavioralAnswer>>>,
    submissions: Arc<Mutex<HashMap<SubmissionId, CodeSubmission>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
}

impl SessionStore for InMemorySessionStore {
    fn insert_session(&self, session: InterviewSession) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.sessions)?;
        if guard.contains_key(&session.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(session.id.clone(), session);
        Ok(())
    }

    fn update_session(&self, session: InterviewSession) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.sessions)?;
        if guard.contains_key(&session.id) {
            guard.insert(session.id.clone(), session);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn session(&self, id: &SessionId) -> Result<Option<InterviewSession>, RepositoryError> {
        Ok(lock(&self.sessions)?.get(id).cloned())
    }

    fn sessions_for_user(&self, user: &UserId) -> Result<Vec<InterviewSession>, RepositoryError> {
        Ok(lock(&self.sessions)?
            .values()
            .filter(|session| &session.user_id == user)
            .cloned()
            .collect())
    }

    fn insert_answer(&self, answer: BehavioralAnswer) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.answers)?;
        if guard.contains_key(&answer.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(answer.id.clone(), answer);
        Ok(())
    }

    fn answers_for_session(
        &self,
        session: &SessionId,
    ) -> Result<Vec<BehavioralAnswer>, RepositoryError> {
        let mut answers: Vec<BehavioralAnswer> = lock(&self.answers)?
            .values()
            .filter(|answer| &answer.session_id == session)
            .cloned()
            .collect();
        answers.sort_by_key(|answer| answer.created_at);
        Ok(answers)
    }

    fn insert_submission(&self, submission: CodeSubmission) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.submissions)?;
        if guard.contains_key(&submission.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(submission.id.clone(), submission);
        Ok(())
    }

    fn submissions_for_session(
        &self,
        session: &SessionId,
    ) -> Result<Vec<CodeSubmission>, RepositoryError> {
        let mut submissions: Vec<CodeSubmission> = lock(&self.submissions)?
            .values()
            .filter(|submission| &submission.session_id == session)
            .cloned()
            .collect();
        submissions.sort_by_key(|submission| submission.created_at);
        Ok(submissions)
    }
}
