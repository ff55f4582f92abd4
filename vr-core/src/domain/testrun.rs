//! Uptest run domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The result of running the uptests of one proc
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub procname: String,
    pub passed: bool,
    /// Raw uptest output
    #[serde(default)]
    pub results: serde_json::Value,
}

/// A complete uptest sweep over the fleet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRun {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub testresults: Vec<TestResult>,
}

impl TestRun {
    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.testresults.iter().filter(|r| !r.passed)
    }
}
