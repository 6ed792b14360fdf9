use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Upper bound on seed questions per session.
pub const MAX_QUESTION_COUNT: usize = 50;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub practice: PracticeConfig,
    pub evaluator: EvaluatorConfig,
    pub sandbox: SandboxConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let default_user =
            non_empty_var("APP_DEFAULT_USER").unwrap_or_else(|| "demo-user".to_string());
        let question_count = env::var("APP_QUESTION_COUNT")
            .unwrap_or_else(|_| "6".to_string())
            .parse::<usize>()
            .ok()
            .filter(|count| *count <= MAX_QUESTION_COUNT)
            .ok_or(ConfigError::InvalidQuestionCount)?;

        let timeout_secs = env::var("EVALUATOR_TIMEOUT_SECS")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let evaluator = EvaluatorConfig {
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_model: non_empty_var("GEMINI_MODEL")
                .unwrap_or_else(|| "gemini-1.5-flash".to_string()),
            gemini_base_url: non_empty_var("GEMINI_API_URL")
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string()),
            timeout: Duration::from_secs(timeout_secs),
        };

        let sandbox = SandboxConfig {
            judge0_url: non_empty_var("JUDGE0_API_URL"),
            judge0_key: non_empty_var("JUDGE0_API_KEY"),
            judge0_host: non_empty_var("JUDGE0_API_HOST"),
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            practice: PracticeConfig {
                default_user,
                question_count,
            },
            evaluator,
            sandbox,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Session defaults applied when a request leaves them out.
#[derive(Debug, Clone)]
pub struct PracticeConfig {
    /// User that owns sessions when no identity accompanies the request.
    pub default_user: String,
    /// Number of seed questions requested for each new session.
    pub question_count: usize,
}

/// Generative feedback service settings. Without an API key the heuristic evaluator is used.
#[derive(Clone)]
pub struct EvaluatorConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for EvaluatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluatorConfig")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Code execution sandbox settings. Without a URL the stub harness is used.
#[derive(Clone)]
pub struct SandboxConfig {
    pub judge0_url: Option<String>,
    pub judge0_key: Option<String>,
    pub judge0_host: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for SandboxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SandboxConfig")
            .field("judge0_url", &self.judge0_url)
            .field("judge0_key", &self.judge0_key.as_ref().map(|_| "<redacted>"))
            .field("judge0_host", &self.judge0_host)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidQuestionCount,
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidQuestionCount => {
                write!(
                    f,
                    "APP_QUESTION_COUNT must be an integer between 0 and {MAX_QUESTION_COUNT}"
                )
            }
            ConfigError::InvalidTimeout => {
                write!(f, "EVALUATOR_TIMEOUT_SECS must be a whole number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidQuestionCount
            | ConfigError::InvalidTimeout => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_DEFAULT_USER",
            "APP_QUESTION_COUNT",
            "EVALUATOR_TIMEOUT_SECS",
            "GEMINI_API_KEY",
            "GEMINI_MODEL",
            "GEMINI_API_URL",
            "JUDGE0_API_URL",
            "JUDGE0_API_KEY",
            "JUDGE0_API_HOST",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.practice.default_user, "demo-user");
        assert_eq!(config.practice.question_count, 6);
        assert!(config.evaluator.gemini_api_key.is_none());
        assert_eq!(config.evaluator.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.evaluator.timeout, Duration::from_secs(20));
        assert!(config.sandbox.judge0_url.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn blank_api_key_is_treated_as_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("GEMINI_API_KEY", "   ");
        env::set_var("JUDGE0_API_URL", "https://judge0.example.test/");
        let config = AppConfig::load().expect("config loads");
        assert!(config.evaluator.gemini_api_key.is_none());
        assert_eq!(
            config.sandbox.judge0_url.as_deref(),
            Some("https://judge0.example.test/")
        );
        reset_env();
    }

    #[test]
    fn rejects_invalid_question_count() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_QUESTION_COUNT", "six");
        let err = AppConfig::load().expect_err("count must be numeric");
        assert!(matches!(err, ConfigError::InvalidQuestionCount));
        reset_env();
    }

    #[test]
    fn rejects_question_count_above_cap() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_QUESTION_COUNT", usize::MAX.to_string());
        let err = AppConfig::load().expect_err("count is capped");
        assert!(matches!(err, ConfigError::InvalidQuestionCount));

        env::set_var("APP_QUESTION_COUNT", MAX_QUESTION_COUNT.to_string());
        let config = AppConfig::load().expect("cap itself is accepted");
        assert_eq!(config.practice.question_count, MAX_QUESTION_COUNT);
        reset_env();
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = EvaluatorConfig {
            gemini_api_key: Some("secret-key".to_string()),
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout: Duration::from_secs(5),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
