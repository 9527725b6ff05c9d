// src/health/status.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Identifies one dependency to health-check, usually a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<Url> for Target {
    fn from(url: Url) -> Self {
        Self(url.into())
    }
}

/// Outcome of a single check: the status code and body the target answered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub status_code: u16,
    pub body: String,
}

impl CheckResult {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status_code == 200
    }
}

/// Aggregate health signal across a batch of targets.
pub type Verdict = bool;

/// Reduce a batch of results to a verdict: true iff every result is a 200.
///
/// An empty batch is healthy. Order of the input does not matter.
pub fn reduce_results<'a, I>(results: I) -> Verdict
where
    I: IntoIterator<Item = &'a CheckResult>,
{
    results.into_iter().all(CheckResult::is_healthy)
}
