// src/health/error.rs
use super::status::Target;
use std::time::Duration;
use tokio::task::JoinError;

/// A check that produced no result. Health of the batch is unknown.
#[derive(Debug, thiserror::Error)]
#[error("Health check for {target} failed: {cause}")]
pub struct CheckFailure {
    pub target: Target,
    #[source]
    pub cause: FailureCause,
}

#[derive(Debug, thiserror::Error)]
pub enum FailureCause {
    #[error(transparent)]
    Check(anyhow::Error),

    #[error("No result within {0:?}")]
    TimedOut(Duration),

    #[error("Check task aborted: {0}")]
    Aborted(#[from] JoinError),
}

impl CheckFailure {
    pub fn new(target: Target, cause: FailureCause) -> Self {
        Self { target, cause }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.cause, FailureCause::TimedOut(_))
    }
}
