// src/config/models.rs
use crate::health::Target;
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub targets: Vec<Target>,
    #[serde(default)]
    pub aggregator: AggregatorConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.aggregator.validate()?;
        self.probe.validate()?;

        let mut seen = HashSet::new();
        for target in &self.targets {
            ensure!(seen.insert(target), "Duplicate target: {}", target);
        }

        if self.probe.timeout() > self.aggregator.timeout() {
            tracing::warn!(
                "Probe timeout {:?} exceeds aggregator deadline {:?}",
                self.probe.timeout(),
                self.aggregator.timeout()
            );
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Deadline for a whole batch of checks
    #[serde(default = "default_aggregator_timeout_secs")]
    pub timeout_secs: u64,
}

impl AggregatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.timeout_secs > 0, "Aggregator timeout must be greater than zero");
        Ok(())
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_aggregator_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Joined onto each target URL; `None` probes the target URL as given.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_probe_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.timeout_secs > 0, "Probe timeout must be greater than zero");
        Ok(())
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            path: None,
            timeout_secs: default_probe_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_aggregator_timeout_secs() -> u64 {
    5
}

fn default_probe_timeout_secs() -> u64 {
    2
}

fn default_user_agent() -> String {
    concat!("health-aggregator/", env!("CARGO_PKG_VERSION")).to_string()
}
