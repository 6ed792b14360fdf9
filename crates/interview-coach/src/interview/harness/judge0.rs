use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use super::{TestCaseResult, TestHarness};
use crate::config::SandboxConfig;
use crate::interview::domain::Language;

/// Connection details for a Judge0-compatible execution service.
#[derive(Clone)]
pub struct Judge0Endpoint {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_host: Option<String>,
}

impl std::fmt::Debug for Judge0Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Judge0Endpoint")
            .field("base_url", &self.base_url)
            .field("api_host", &self.api_host)
            .finish_non_exhaustive()
    }
}

/// Executes code in a remote sandbox; without an endpoint it reports an informational stub.
#[derive(Debug, Clone)]
pub struct SandboxHarness {
    client: reqwest::Client,
    endpoint: Option<Judge0Endpoint>,
}

impl SandboxHarness {
    pub fn new(client: reqwest::Client, endpoint: Option<Judge0Endpoint>) -> Self {
        Self { client, endpoint }
    }

    pub fn unconfigured() -> Self {
        Self::new(reqwest::Client::new(), None)
    }

    pub fn from_config(config: &SandboxConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let endpoint = config.judge0_url.clone().map(|base_url| Judge0Endpoint {
            base_url,
            api_key: config.judge0_key.clone(),
            api_host: config.judge0_host.clone(),
        });
        Ok(Self::new(client, endpoint))
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    async fn execute(
        &self,
        endpoint: &Judge0Endpoint,
        code: &str,
        language_id: u16,
    ) -> Vec<TestCaseResult> {
        let url = format!(
            "{}/submissions?base64_encoded=false&wait=true",
            endpoint.base_url.trim_end_matches('/')
        );
        let payload = json!({
            "source_code": code,
            "language_id": language_id,
            "stdin": "",
            "expected_output": Value::Null,
        });

        let mut request = self.client.post(url).json(&payload);
        if let Some(key) = &endpoint.api_key {
            request = request.header("X-RapidAPI-Key", key);
        }
        if let Some(host) = &endpoint.api_host {
            request = request.header("X-RapidAPI-Host", host);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "execution sandbox unreachable");
                return unreachable_result();
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(%status, "execution sandbox rejected submission");
            return vec![TestCaseResult::new(
                "Execution",
                false,
                format!("Sandbox error: {text}"),
                "Code should compile and run without server errors.",
            )];
        }

        match response.json::<Value>().await {
            Ok(body) => results_from_submission(&body),
            Err(err) => {
                warn!(error = %err, "execution sandbox returned an unreadable body");
                unreachable_result()
            }
        }
    }
}

#[async_trait]
impl TestHarness for SandboxHarness {
    fn name(&self) -> &str {
        if self.endpoint.is_some() {
            "judge0"
        } else {
            "sandbox-stub"
        }
    }

    async fn run(&self, code: &str, language: &str) -> Vec<TestCaseResult> {
        let has_content = !code.trim().is_empty();

        let endpoint = match &self.endpoint {
            Some(endpoint) if has_content => endpoint,
            _ => {
                return vec![TestCaseResult::new(
                    "Sample test",
                    has_content,
                    if has_content {
                        "Code received. Execution sandbox not yet wired."
                    } else {
                        "No code submitted."
                    },
                    "Set JUDGE0_API_URL to connect a real sandbox.",
                )];
            }
        };

        let Some(language_id) = judge0_language_id(language) else {
            return vec![TestCaseResult::new(
                "Sample test",
                false,
                format!("Unsupported language: {language}"),
                "Use JavaScript or Python.",
            )];
        };

        self.execute(endpoint, code, language_id).await
    }
}

/// Judge0 language identifiers: 63 is Node.js, 71 is Python 3.
pub(crate) fn judge0_language_id(language: &str) -> Option<u16> {
    match Language::parse(language)? {
        Language::Javascript => Some(63),
        Language::Python => Some(71),
    }
}

pub(crate) fn results_from_submission(body: &Value) -> Vec<TestCaseResult> {
    let status = body
        .get("status")
        .and_then(|status| status.get("description"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown status");
    let stdout = body.get("stdout").and_then(Value::as_str).unwrap_or("");
    let stderr = body.get("stderr").and_then(Value::as_str).unwrap_or("");

    let passed = status.eq_ignore_ascii_case("accepted") && stderr.is_empty();
    let output = [stdout.trim(), stderr.trim()]
        .into_iter()
        .find(|text| !text.is_empty())
        .unwrap_or(status);

    vec![
        TestCaseResult::new(
            "Execution",
            passed,
            output,
            "Program runs without runtime errors.",
        ),
        TestCaseResult::new(
            "Resource usage",
            true,
            format!(
                "time: {}, memory: {}",
                display_metric(body.get("time")),
                display_metric(body.get("memory"))
            ),
            "These are approximate values from the sandbox.",
        ),
    ]
}

fn display_metric(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => "n/a".to_string(),
    }
}

fn unreachable_result() -> Vec<TestCaseResult> {
    vec![TestCaseResult::new(
        "Execution",
        false,
        "Failed to reach execution sandbox.",
        "Verify JUDGE0_API_URL and network connectivity.",
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_language_aliases() {
        assert_eq!(judge0_language_id("JavaScript"), Some(63));
        assert_eq!(judge0_language_id("node"), Some(63));
        assert_eq!(judge0_language_id("py"), Some(71));
        assert_eq!(judge0_language_id("rust"), None);
    }

    #[test]
    fn accepted_submission_without_stderr_passes() {
        let body = json!({
            "status": { "description": "Accepted" },
            "stdout": "[0,1]\n",
            "stderr": null,
            "time": "0.012",
            "memory": 8120
        });

        let results = results_from_submission(&body);
        assert_eq!(results.len(), 2);
        assert!(results[0].passed);
        assert_eq!(results[0].output, "[0,1]");
        assert_eq!(results[1].output, "time: 0.012, memory: 8120");
    }

    #[test]
    fn runtime_error_surfaces_stderr() {
        let body = json!({
            "status": { "description": "Runtime Error (NZEC)" },
            "stdout": "",
            "stderr": "ReferenceError: x is not defined"
        });

        let results = results_from_submission(&body);
        assert!(!results[0].passed);
        assert_eq!(results[0].output, "ReferenceError: x is not defined");
        assert_eq!(results[1].output, "time: n/a, memory: n/a");
    }

    #[tokio::test]
    async fn unconfigured_sandbox_reports_informational_stub() {
        let harness = SandboxHarness::unconfigured();

        let results = harness.run("print('hi')", "python").await;
        assert_eq!(results.len(), 1);
        assert!(results[0].passed);
        assert!(results[0].output.contains("not yet wired"));

        let empty = harness.run("  ", "python").await;
        assert!(!empty[0].passed);
        assert_eq!(empty[0].output, "No code submitted.");
    }

    #[tokio::test]
    async fn unsupported_language_is_reported_without_calling_out() {
        let harness = SandboxHarness::new(
            reqwest::Client::new(),
            Some(Judge0Endpoint {
                base_url: "http://127.0.0.1:9".to_string(),
                api_key: None,
                api_host: None,
            }),
        );

        let results = harness.run("fn main() {}", "rust").await;
        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);
        assert_eq!(results[0].output, "Unsupported language: rust");
    }

    #[tokio::test]
    async fn unreachable_sandbox_degrades_to_failed_execution() {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .expect("client builds");
        let harness = SandboxHarness::new(
            client,
            Some(Judge0Endpoint {
                base_url: "http://127.0.0.1:9/".to_string(),
                api_key: Some("key".to_string()),
                api_host: None,
            }),
        );

        let results = harness.run("console.log(1)", "javascript").await;
        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);
        assert_eq!(results[0].name, "Execution");
    }
}
