// src/probe/mod.rs
mod http;

pub use http::HttpProbe;

use crate::health::{CheckResult, Target};
use async_trait::async_trait;

/// Produces a [`CheckResult`] for a single target.
///
/// Failing to reach the target is an error; reaching it and getting a bad
/// status back is a result.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, target: &Target) -> anyhow::Result<CheckResult>;
}
