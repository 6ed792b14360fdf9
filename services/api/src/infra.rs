use interview_coach::config::AppConfig;
use interview_coach::error::AppError;
use interview_coach::interview::{
    FeedbackEvaluator, GeminiClient, HeuristicConfig, InMemorySessionStore, InterviewService,
    PracticeSettings, SandboxHarness,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the practice service from configuration.
///
/// The Gemini evaluator is enabled only when an API key is present, and submissions are graded
/// by the sandbox only when a Judge0 URL is configured.
pub(crate) fn build_service(
    config: &AppConfig,
) -> Result<InterviewService<InMemorySessionStore>, AppError> {
    let evaluator = match GeminiClient::from_config(&config.evaluator)? {
        Some(client) => FeedbackEvaluator::with_model(HeuristicConfig::default(), Arc::new(client)),
        None => FeedbackEvaluator::heuristic(HeuristicConfig::default()),
    };
    let sandbox = SandboxHarness::from_config(&config.sandbox)?;

    info!(
        evaluator = evaluator.model_name().unwrap_or("heuristic"),
        sandbox = sandbox.is_configured(),
        question_count = config.practice.question_count,
        "interview service configured"
    );

    Ok(InterviewService::new(
        Arc::new(InMemorySessionStore::default()),
        evaluator,
        PracticeSettings::from(&config.practice),
    )
    .with_sandbox(sandbox))
}

/// Offline service used by the CLI: heuristic feedback and the stub harness.
pub(crate) fn offline_service(settings: PracticeSettings) -> InterviewService<InMemorySessionStore> {
    InterviewService::new(
        Arc::new(InMemorySessionStore::default()),
        FeedbackEvaluator::heuristic(HeuristicConfig::default()),
        settings,
    )
}
