// src/probe/http.rs
use super::Probe;
use crate::config::ProbeConfig;
use crate::health::{CheckResult, Target};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Checks a target by issuing an HTTP GET and recording status and body.
pub struct HttpProbe {
    config: ProbeConfig,
    client: Client,
}

impl HttpProbe {
    pub fn new(config: ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { config, client })
    }

    fn health_url(&self, target: &Target) -> Result<Url> {
        let url = Url::parse(target.as_str())
            .with_context(|| format!("Invalid target URL: {}", target))?;

        match &self.config.path {
            Some(path) => url
                .join(path)
                .with_context(|| format!("Cannot join {} onto {}", path, url)),
            None => Ok(url),
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, target: &Target) -> Result<CheckResult> {
        let url = self.health_url(target)?;
        debug!("Probing {}", url);

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        Ok(CheckResult::new(status_code, body))
    }
}
