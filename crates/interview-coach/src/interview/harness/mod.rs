//! Test execution for code submissions.
//!
//! Two harnesses are available: a local stub that inspects the source text, and a
//! Judge0-compatible sandbox client. Neither ever fails outright; unreachable or misconfigured
//! sandboxes surface as failed test entries instead.

mod judge0;
mod stub;

pub use judge0::{Judge0Endpoint, SandboxHarness};
pub use stub::StubHarness;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a single harness check, shown to the candidate verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    pub name: String,
    pub passed: bool,
    pub output: String,
    pub expected: String,
}

impl TestCaseResult {
    pub fn new(
        name: impl Into<String>,
        passed: bool,
        output: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            passed,
            output: output.into(),
            expected: expected.into(),
        }
    }
}

/// Pass/fail tally for a harness run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestTally {
    pub passed: u32,
    pub total: u32,
}

impl TestTally {
    pub fn of(results: &[TestCaseResult]) -> Self {
        let passed = results.iter().filter(|result| result.passed).count();
        Self {
            passed: u32::try_from(passed).unwrap_or(u32::MAX),
            total: u32::try_from(results.len()).unwrap_or(u32::MAX),
        }
    }
}

#[async_trait]
pub trait TestHarness: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, code: &str, language: &str) -> Vec<TestCaseResult>;
}
