// src/health/aggregator.rs
use super::error::{CheckFailure, FailureCause};
use super::status::{reduce_results, CheckResult, Target, Verdict};
use crate::config::{AggregatorConfig, Config};
use crate::probe::{HttpProbe, Probe};
use futures::future::try_join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{timeout_at, Duration, Instant};
use tracing::{debug, info, warn};

/// Run `check` against every target concurrently and reduce the results to a verdict.
///
/// All-or-nothing: if any check errors, panics, or misses the deadline the whole
/// call fails with a [`CheckFailure`] naming that target. An empty target list is
/// healthy and never invokes `check`.
pub async fn check_all<F, Fut, E>(
    targets: Vec<Target>,
    check: F,
    timeout: Duration,
) -> Result<Verdict, CheckFailure>
where
    F: Fn(Target) -> Fut,
    Fut: Future<Output = Result<CheckResult, E>> + Send + 'static,
    E: Into<anyhow::Error> + Send + 'static,
{
    let results = collect_results(targets, check, timeout).await?;
    let verdict = reduce_results(results.iter().map(|(_, result)| result));

    let healthy_count = results.iter().filter(|(_, r)| r.is_healthy()).count();
    info!(
        "Health check complete: {} healthy, {} unhealthy",
        healthy_count,
        results.len() - healthy_count
    );

    Ok(verdict)
}

/// Fan out `check` over every target and join on all of them.
///
/// Results come back in the same order as `targets`. One deadline covers the
/// whole batch. The first failure observed aborts the join; checks still in
/// flight are left to finish on their own and their outcome is discarded.
pub async fn collect_results<F, Fut, E>(
    targets: Vec<Target>,
    check: F,
    timeout: Duration,
) -> Result<Vec<(Target, CheckResult)>, CheckFailure>
where
    F: Fn(Target) -> Fut,
    Fut: Future<Output = Result<CheckResult, E>> + Send + 'static,
    E: Into<anyhow::Error> + Send + 'static,
{
    if targets.is_empty() {
        debug!("No targets to check");
        return Ok(Vec::new());
    }

    // None when the timeout is too large to represent; such a batch has no deadline.
    let deadline = Instant::now().checked_add(timeout);
    let mut tasks = Vec::with_capacity(targets.len());

    for target in targets {
        let pending = check(target.clone());
        let handle = tokio::spawn(run_check(target.clone(), pending, deadline, timeout));

        tasks.push(async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(CheckFailure::new(target, FailureCause::Aborted(e))),
            }
        });
    }

    try_join_all(tasks).await.map_err(|failure| {
        warn!(id = %failure.target, "{}", failure);
        failure
    })
}

async fn run_check<Fut, E>(
    target: Target,
    pending: Fut,
    deadline: Option<Instant>,
    timeout: Duration,
) -> Result<(Target, CheckResult), CheckFailure>
where
    Fut: Future<Output = Result<CheckResult, E>>,
    E: Into<anyhow::Error>,
{
    let start = Instant::now();

    let outcome = match deadline {
        Some(deadline) => timeout_at(deadline, pending).await,
        None => Ok(pending.await),
    };

    match outcome {
        Ok(Ok(result)) => {
            debug!(
                id = %target,
                status = result.status_code,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Check completed"
            );
            Ok((target, result))
        }
        Ok(Err(e)) => Err(CheckFailure::new(target, FailureCause::Check(e.into()))),
        Err(_) => Err(CheckFailure::new(target, FailureCause::TimedOut(timeout))),
    }
}

/// Runs batches of checks with a configured deadline.
#[derive(Debug, Clone)]
pub struct HealthAggregator {
    config: AggregatorConfig,
}

impl HealthAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Probe every configured target over HTTP with the configured deadline.
    pub async fn check_config(config: &Config) -> anyhow::Result<Verdict> {
        let probe = Arc::new(HttpProbe::new(config.probe.clone())?);
        let aggregator = Self::new(config.aggregator.clone());

        let verdict = aggregator
            .check_all_with_probe(config.targets.clone(), probe)
            .await?;
        Ok(verdict)
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    pub async fn check_all<F, Fut, E>(
        &self,
        targets: Vec<Target>,
        check: F,
    ) -> Result<Verdict, CheckFailure>
    where
        F: Fn(Target) -> Fut,
        Fut: Future<Output = Result<CheckResult, E>> + Send + 'static,
        E: Into<anyhow::Error> + Send + 'static,
    {
        check_all(targets, check, self.timeout()).await
    }

    pub async fn collect_results<F, Fut, E>(
        &self,
        targets: Vec<Target>,
        check: F,
    ) -> Result<Vec<(Target, CheckResult)>, CheckFailure>
    where
        F: Fn(Target) -> Fut,
        Fut: Future<Output = Result<CheckResult, E>> + Send + 'static,
        E: Into<anyhow::Error> + Send + 'static,
    {
        collect_results(targets, check, self.timeout()).await
    }

    /// Check every target through `probe`, e.g. an [`HttpProbe`](crate::probe::HttpProbe).
    pub async fn check_all_with_probe<P>(
        &self,
        targets: Vec<Target>,
        probe: Arc<P>,
    ) -> Result<Verdict, CheckFailure>
    where
        P: Probe + 'static,
    {
        self.check_all(targets, move |target| {
            let probe = probe.clone();
            async move { probe.probe(&target).await }
        })
        .await
    }
}
